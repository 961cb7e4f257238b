// src/engine/sink.rs

//! Pluggable alert delivery.
//!
//! The sweep runtime hands new alerts to an `AlertSink` instead of knowing
//! about email, push or sockets. Formatting and transport belong to whoever
//! sits behind the sink.
//!
//! - [`LogSink`] writes each alert as a structured `tracing` event.
//! - [`ChannelSink`] forwards alerts over an mpsc channel to a delivery task.
//! - Tests can provide their own sink that records what it received.

use std::future::Future;
use std::pin::Pin;

use tokio::sync::mpsc;
use tracing::info;

use crate::alerts::AlertEvent;
use crate::errors::{Error, Result};

/// Trait abstracting where alerts go once the sweep decides to send them.
pub trait AlertSink: Send {
    fn deliver(
        &mut self,
        events: Vec<AlertEvent>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Logs every alert at `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl AlertSink for LogSink {
    fn deliver(
        &mut self,
        events: Vec<AlertEvent>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            for e in events {
                info!(
                    project = %e.project_id,
                    step = %e.step_id,
                    kind = %e.kind,
                    offset_days = e.offset_days,
                    "{}",
                    e.step_name
                );
            }
            Ok(())
        })
    }
}

/// Forwards alerts to a receiver owned by the delivery layer.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<AlertEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<AlertEvent>) -> Self {
        Self { tx }
    }
}

impl AlertSink for ChannelSink {
    fn deliver(
        &mut self,
        events: Vec<AlertEvent>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        // Clone the sender so the future doesn't borrow `self` across `await`.
        let tx = self.tx.clone();

        Box::pin(async move {
            for event in events {
                tx.send(event).await.map_err(Error::from)?;
            }
            Ok(())
        })
    }
}
