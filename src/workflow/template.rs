// src/workflow/template.rs

//! Step templates and the built-in phase checklist.
//!
//! A template is an ordered list of [`StepTemplate`]s. Order is significant:
//! it is the authoritative sequencing used by the scheduler and for display.
//! Custom templates can be supplied as `[[step]]` tables in `Phaseflow.toml`.

use serde::Deserialize;

use crate::types::{Phase, Priority, StepCategory, StepId};
use crate::workflow::step::{AlertTrigger, Step, SubTask};

/// Definition of a step before it is instantiated for a project.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StepTemplate {
    pub id: StepId,
    pub name: String,
    pub phase: Phase,
    pub role: String,
    pub estimated_days: u32,

    #[serde(default)]
    pub depends_on: Vec<StepId>,

    #[serde(default)]
    pub category: Option<StepCategory>,

    #[serde(default)]
    pub trade: Option<String>,

    #[serde(default)]
    pub priority: Option<Priority>,

    #[serde(default)]
    pub alert_days: Option<u32>,

    #[serde(default)]
    pub overdue_intervals: Option<Vec<u32>>,

    /// Sub-task names; ids are derived as `"{step_id}-{n}"`.
    #[serde(default)]
    pub subtasks: Vec<String>,
}

impl StepTemplate {
    pub fn new(
        id: &str,
        name: &str,
        phase: Phase,
        role: &str,
        estimated_days: u32,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            phase,
            role: role.to_string(),
            estimated_days,
            depends_on: Vec::new(),
            category: None,
            trade: None,
            priority: None,
            alert_days: None,
            overdue_intervals: None,
            subtasks: Vec::new(),
        }
    }

    pub fn after(mut self, deps: &[&str]) -> Self {
        self.depends_on.extend(deps.iter().map(|d| d.to_string()));
        self
    }

    pub fn category(mut self, category: StepCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn subtasks(mut self, names: &[&str]) -> Self {
        self.subtasks.extend(names.iter().map(|n| n.to_string()));
        self
    }

    /// Create a fresh, unscheduled, uncompleted step.
    pub fn instantiate(&self) -> Step {
        let mut step = Step::new(self.id.clone(), self.name.clone(), self.phase);
        step.role = self.role.clone();
        step.estimated_days = self.estimated_days;
        step.depends_on = self.depends_on.clone();
        step.category = self.category;
        step.trade = self.trade.clone();
        step.alert = AlertTrigger {
            priority: self.priority,
            alert_days: self.alert_days,
            overdue_intervals: self.overdue_intervals.clone(),
        };
        step.subtasks = self
            .subtasks
            .iter()
            .enumerate()
            .map(|(i, name)| SubTask::new(format!("{}-{}", self.id, i + 1), name.clone()))
            .collect();
        step
    }
}

/// The built-in checklist: Lead → Prospect → Approved → Execution →
/// 2nd Supplement → Completion.
pub fn default_template() -> Vec<StepTemplate> {
    use Phase::*;
    use Priority::*;

    vec![
        StepTemplate::new("lead_intake", "Lead intake", Lead, "office", 1)
            .priority(Medium)
            .subtasks(&["Record contact details", "Capture property address", "Log lead source"]),
        StepTemplate::new("initial_contact", "Initial homeowner contact", Lead, "sales", 1)
            .after(&["lead_intake"])
            .priority(High)
            .subtasks(&["Call homeowner", "Book inspection"]),
        StepTemplate::new("site_inspection", "Site inspection", Prospect, "sales", 2)
            .after(&["initial_contact"])
            .priority(High)
            .subtasks(&["Roof photos", "Measurements", "Damage notes"]),
        StepTemplate::new("insurance_claim", "Insurance claim filing", Prospect, "sales", 2)
            .after(&["site_inspection"])
            .subtasks(&["File claim", "Record claim number"]),
        StepTemplate::new("adjuster_meeting", "Adjuster meeting", Prospect, "sales", 3)
            .after(&["insurance_claim"])
            .priority(High)
            .subtasks(&["Schedule adjuster", "Attend meeting"]),
        StepTemplate::new("estimate_prep", "Estimate preparation", Prospect, "office", 2)
            .after(&["site_inspection"])
            .subtasks(&["Draft estimate", "Review line items"]),
        StepTemplate::new("contract_signed", "Contract signed", Approved, "sales", 2)
            .after(&["adjuster_meeting", "estimate_prep"])
            .priority(High)
            .subtasks(&["Send contract", "Collect signature"]),
        StepTemplate::new("scope_review", "Scope of loss review", Approved, "supplement_specialist", 2)
            .after(&["contract_signed"]),
        StepTemplate::new("permit", "Permit application", Approved, "office", 3)
            .after(&["contract_signed"])
            .subtasks(&["Submit permit", "Receive permit"]),
        StepTemplate::new("material_order", "Material order", Approved, "project_manager", 2)
            .after(&["scope_review"])
            .category(StepCategory::Materials)
            .priority(High)
            .subtasks(&["Confirm colors", "Place order"]),
        StepTemplate::new("crew_scheduling", "Crew scheduling", Approved, "project_manager", 1)
            .after(&["permit"]),
        StepTemplate::new("material_delivery", "Material delivery", Execution, "project_manager", 1)
            .after(&["material_order"])
            .category(StepCategory::Materials)
            .priority(High)
            .subtasks(&["Confirm delivery window", "Verify delivered quantities"]),
        StepTemplate::new("tear_off", "Tear-off", Execution, "crew", 1)
            .after(&["material_delivery", "crew_scheduling"])
            .priority(High),
        StepTemplate::new("installation", "Installation", Execution, "crew", 3)
            .after(&["tear_off"])
            .priority(High)
            .subtasks(&["Underlayment", "Shingles", "Flashing", "Ventilation"]),
        StepTemplate::new("cleanup", "Site cleanup", Execution, "crew", 1)
            .after(&["installation"])
            .subtasks(&["Magnet sweep", "Debris haul-off"]),
        StepTemplate::new("quality_inspection", "Quality inspection", Execution, "project_manager", 1)
            .after(&["cleanup"])
            .category(StepCategory::Admin),
        StepTemplate::new("supplement_submission", "Supplement submission", SecondSupplement, "supplement_specialist", 3)
            .after(&["quality_inspection"])
            .subtasks(&["Compile invoices", "Submit supplement"]),
        StepTemplate::new("supplement_approval", "Supplement approval", SecondSupplement, "supplement_specialist", 5)
            .after(&["supplement_submission"])
            .priority(Low),
        StepTemplate::new("final_invoice", "Final invoice", Completion, "accounting", 2)
            .after(&["supplement_approval"])
            .subtasks(&["Issue invoice", "Collect depreciation"]),
        StepTemplate::new("project_closeout", "Project closeout", Completion, "office", 1)
            .after(&["final_invoice"])
            .priority(Low)
            .subtasks(&["Warranty registration", "Customer review request"]),
    ]
}
