// tests/common/mod.rs

#![allow(dead_code)]

use std::io::Write;

use tempfile::NamedTempFile;

/// Write `contents` to a fresh temp file that lives as long as the handle.
pub fn toml_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

/// Two projects, one workflow, a small task graph.
pub const SNAPSHOT: &str = r#"
[[project]]
id = "p1"
name = "Smith residence"
start_date = "2024-01-01T00:00:00Z"
end_date = "2024-01-07T00:00:00Z"
trades = ["roofing"]

[[project]]
id = "p2"
name = "Jones garage"

[[workflow]]
project_id = "p1"

[[workflow.steps]]
id = "inspect"
name = "Site inspection"
phase = "prospect"
role = "sales"
estimated_days = 2
is_completed = true
scheduled_start = "2024-01-01T00:00:00Z"
scheduled_end = "2024-01-03T00:00:00Z"

[[workflow.steps]]
id = "deliver"
name = "Material delivery"
phase = "execution"
role = "crew"
estimated_days = 2
category = "materials"
scheduled_start = "2024-01-03T00:00:00Z"
scheduled_end = "2024-01-05T00:00:00Z"

[[workflow.steps]]
id = "tear_off"
name = "Tear-off and install"
phase = "execution"
role = "crew"
estimated_days = 2
trade = "roofing"
scheduled_start = "2024-01-05T00:00:00Z"
scheduled_end = "2024-01-07T00:00:00Z"

[[task]]
id = "order"
project_id = "p1"
title = "Order shingles"
status = "Done"

[[task]]
id = "deliver"
project_id = "p1"
title = "Deliver shingles"
status = "To Do"
depends_on = ["order"]

[[task]]
id = "install"
project_id = "p1"
title = "Install"
status = "To Do"
depends_on = ["deliver"]
"#;
