use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use phaseflow::alerts::AlertEvent;
use phaseflow::engine::AlertSink;
use phaseflow::errors::{PhaseflowError, Result};

/// An alert sink that:
/// - records every delivered alert, in delivery order
/// - counts `deliver` calls (one per sweep that produced something)
/// - optionally rejects its first few `deliver` calls.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    delivered: Arc<Mutex<Vec<AlertEvent>>>,
    batches: Arc<Mutex<usize>>,
    failures_left: Arc<Mutex<usize>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose first `n` deliveries fail without recording anything.
    pub fn failing_first(n: usize) -> Self {
        let sink = Self::default();
        *sink.failures_left.lock().unwrap() = n;
        sink
    }

    /// Everything delivered so far. Clones of the sink share the record.
    pub fn delivered(&self) -> Vec<AlertEvent> {
        self.delivered.lock().unwrap().clone()
    }

    pub fn batches(&self) -> usize {
        *self.batches.lock().unwrap()
    }
}

impl AlertSink for RecordingSink {
    fn deliver(
        &mut self,
        events: Vec<AlertEvent>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let delivered = Arc::clone(&self.delivered);
        let batches = Arc::clone(&self.batches);
        let failures_left = Arc::clone(&self.failures_left);

        Box::pin(async move {
            {
                let mut left = failures_left.lock().unwrap();
                if *left > 0 {
                    *left -= 1;
                    return Err(PhaseflowError::Other(anyhow::anyhow!("transport down")));
                }
            }
            delivered.lock().unwrap().extend(events);
            *batches.lock().unwrap() += 1;
            Ok(())
        })
    }
}
