//! Deadband recorder: decides which readings reach the store.

use std::sync::Arc;

use chrono::TimeDelta;
use tokio::sync::Mutex;

use crate::domain::deadband::{self, DEFAULT_HEARTBEAT, Decision, SavedPoint};
use crate::domain::{Clock, MetricKind, PerMetric, Reading};
use crate::error::GatewayError;
use crate::persistence::MeasurementStore;

/// Outcome of a recording attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordOutcome {
    /// Whether the reading was written to the store.
    pub persisted: bool,
    /// Rule that produced the decision.
    pub decision: Decision,
}

/// Applies the deadband rule per metric and persists material readings.
///
/// Holds one [`SavedPoint`] per metric kind, each behind its own
/// [`tokio::sync::Mutex`]. The lock is held across decide → write →
/// update so concurrent readings of the same kind are serialized, while
/// different kinds proceed in parallel. State is only updated after the
/// store confirms the write.
#[derive(Debug)]
pub struct DeadbandRecorder {
    store: Arc<dyn MeasurementStore>,
    clock: Arc<dyn Clock>,
    heartbeat: TimeDelta,
    last_saved: PerMetric<Mutex<Option<SavedPoint>>>,
}

impl DeadbandRecorder {
    /// Creates a recorder with empty memory and the default heartbeat.
    #[must_use]
    pub fn new(store: Arc<dyn MeasurementStore>, clock: Arc<dyn Clock>) -> Self {
        Self::with_heartbeat(store, clock, DEFAULT_HEARTBEAT)
    }

    /// Creates a recorder with a custom heartbeat interval.
    #[must_use]
    pub fn with_heartbeat(
        store: Arc<dyn MeasurementStore>,
        clock: Arc<dyn Clock>,
        heartbeat: TimeDelta,
    ) -> Self {
        Self {
            store,
            clock,
            heartbeat,
            last_saved: PerMetric::default(),
        }
    }

    /// Returns whether `value` would be persisted right now. Read-only.
    pub async fn should_record(&self, kind: MetricKind, value: f64) -> bool {
        let last = *self.last_saved.get(kind).lock().await;
        deadband::decide(kind, last, value, self.clock.now(), self.heartbeat).should_record()
    }

    /// Persists the reading if the deadband rule says so.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Persistence`] if the store rejects the
    /// write; the recorder's memory is left untouched in that case.
    pub async fn record_if_needed(
        &self,
        kind: MetricKind,
        device_id: &str,
        value: f64,
    ) -> Result<RecordOutcome, GatewayError> {
        let mut slot = self.last_saved.get(kind).lock().await;
        let now = self.clock.now();
        let decision = deadband::decide(kind, *slot, value, now, self.heartbeat);

        if !decision.should_record() {
            tracing::debug!(metric = %kind, device_id, value, "reading within deadband, skipped");
            return Ok(RecordOutcome {
                persisted: false,
                decision,
            });
        }

        let reading = Reading::new(device_id, value, now);
        self.store.append(kind, &reading).await?;
        *slot = Some(SavedPoint {
            value,
            saved_at: now,
        });

        tracing::info!(
            metric = %kind,
            device_id,
            value,
            reason = decision.as_str(),
            "reading saved"
        );
        Ok(RecordOutcome {
            persisted: true,
            decision,
        })
    }
}
