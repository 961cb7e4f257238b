#![allow(dead_code)]

use chrono::{DateTime, Utc};
use phaseflow::config::{ConfigFile, RawConfigFile};
use phaseflow::tasks::Task;
use phaseflow::types::{Phase, Priority, StepCategory, TaskStatus, WorkflowStatus};
use phaseflow::workflow::{Project, Step, StepTemplate, SubTask, Workflow};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn with_step(mut self, step: StepTemplate) -> Self {
        self.config.step.push(step);
        self
    }

    pub fn with_overdue_intervals(mut self, intervals: &[u32]) -> Self {
        self.config.alerts.overdue_intervals = intervals.to_vec();
        self
    }

    pub fn with_alert_days(mut self, high: u32, medium: u32, low: u32) -> Self {
        self.config.alerts.alert_days.high = high;
        self.config.alerts.alert_days.medium = medium;
        self.config.alerts.alert_days.low = low;
        self
    }

    pub fn with_min_step_days(mut self, days: u32) -> Self {
        self.config.schedule.min_step_days = days;
        self
    }

    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.config.sweep.max_concurrent = n;
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a single `Step`.
pub struct StepBuilder {
    step: Step,
}

impl StepBuilder {
    pub fn new(id: &str, phase: Phase) -> Self {
        Self {
            step: Step::new(id, id, phase),
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.step.name = name.to_string();
        self
    }

    pub fn days(mut self, days: u32) -> Self {
        self.step.estimated_days = days;
        self
    }

    pub fn category(mut self, category: StepCategory) -> Self {
        self.step.category = Some(category);
        self
    }

    pub fn trade(mut self, trade: &str) -> Self {
        self.step.trade = Some(trade.to_string());
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.step.alert.priority = Some(priority);
        self
    }

    pub fn alert_days(mut self, days: u32) -> Self {
        self.step.alert.alert_days = Some(days);
        self
    }

    pub fn overdue_intervals(mut self, intervals: &[u32]) -> Self {
        self.step.alert.overdue_intervals = Some(intervals.to_vec());
        self
    }

    pub fn due(mut self, end: DateTime<Utc>) -> Self {
        self.step.scheduled_end = Some(end);
        self
    }

    pub fn subtask(mut self, name: &str) -> Self {
        let n = self.step.subtasks.len() + 1;
        let id = format!("{}-{}", self.step.id, n);
        self.step.subtasks.push(SubTask::new(id, name));
        self
    }

    pub fn completed(mut self) -> Self {
        self.step.is_completed = true;
        self
    }

    pub fn build(self) -> Step {
        self.step
    }
}

/// Builder for `Workflow`.
pub struct WorkflowBuilder {
    workflow: Workflow,
}

impl WorkflowBuilder {
    pub fn new(project_id: &str) -> Self {
        Self {
            workflow: Workflow::from_template(project_id, &[]),
        }
    }

    pub fn from_template(project_id: &str, template: &[StepTemplate]) -> Self {
        Self {
            workflow: Workflow::from_template(project_id, template),
        }
    }

    pub fn step(mut self, step: Step) -> Self {
        self.workflow.steps.push(step);
        self
    }

    pub fn status(mut self, status: WorkflowStatus) -> Self {
        self.workflow.status = status;
        self
    }

    pub fn build(self) -> Workflow {
        self.workflow
    }
}

/// Builder for `Project`.
pub struct ProjectBuilder {
    project: Project,
}

impl ProjectBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            project: Project::new(id, id),
        }
    }

    pub fn window(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.project.start_date = Some(start);
        self.project.end_date = Some(end);
        self
    }

    pub fn trade(mut self, trade: &str) -> Self {
        self.project.trades.push(trade.to_string());
        self
    }

    pub fn build(self) -> Project {
        self.project
    }
}

/// Builder for `Task`.
pub struct TaskBuilder {
    task: Task,
}

impl TaskBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            task: Task::new(id, "p1", id),
        }
    }

    pub fn project(mut self, project_id: &str) -> Self {
        self.task.project_id = project_id.to_string();
        self
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.task.depends_on.push(dep.to_string());
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.task.status = status;
        self
    }

    pub fn done(self) -> Self {
        self.status(TaskStatus::Done)
    }

    pub fn build(self) -> Task {
        self.task
    }
}
