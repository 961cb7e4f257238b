// src/alerts/mod.rs

//! Due-date alert classification.
//!
//! [`evaluate`] is a pure function of `(steps, now, defaults)`. Delivery and
//! dedup against already-sent alerts live in [`crate::engine`].

pub mod evaluator;
pub mod event;

pub use evaluator::{
    AlertDefaults, evaluate, evaluate_workflow, resolve_alert_days, resolve_overdue_intervals,
};
pub use event::AlertEvent;
