// tests/property/main.rs

mod scheduling;
mod task_graph;
