//! Delivery diagnostics.
//!
//! Every failure the push pipeline absorbs instead of propagating is reported
//! as a [`DeliveryEvent`] through a [`DeliveryObserver`].

/// A failure observed during push delivery or reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryEvent {
    /// A token failed the format check and was not submitted.
    TokenRejected { token: String },
    /// A whole send batch failed; none of its messages got tickets.
    BatchSubmitFailed {
        batch: usize,
        size: usize,
        error: String,
    },
    /// A receipt query failed; its ids were not classified.
    ReceiptQueryFailed {
        batch: usize,
        size: usize,
        error: String,
    },
    /// The relay reported that a message could not be delivered.
    ReceiptFailed { id: String, message: String },
    /// Machine-readable code for a failed receipt.
    ReceiptErrorCode { id: String, code: String },
}

/// Sink for delivery diagnostics.
pub trait DeliveryObserver: Send + Sync {
    fn observe(&self, event: &DeliveryEvent);
}

impl<T: DeliveryObserver + ?Sized> DeliveryObserver for std::sync::Arc<T> {
    fn observe(&self, event: &DeliveryEvent) {
        (**self).observe(event);
    }
}

/// Observer that emits each event through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl DeliveryObserver for TracingObserver {
    fn observe(&self, event: &DeliveryEvent) {
        match event {
            DeliveryEvent::TokenRejected { token } => {
                tracing::warn!(token = %token, "push token is not a valid relay token");
            }
            DeliveryEvent::BatchSubmitFailed { batch, size, error } => {
                tracing::error!(batch, size, error = %error, "failed to send push batch");
            }
            DeliveryEvent::ReceiptQueryFailed { batch, size, error } => {
                tracing::error!(batch, size, error = %error, "failed to fetch push receipts");
            }
            DeliveryEvent::ReceiptFailed { id, message } => {
                tracing::error!(receipt_id = %id, message = %message, "push notification delivery failed");
            }
            DeliveryEvent::ReceiptErrorCode { id, code } => {
                tracing::error!(receipt_id = %id, error_code = %code, "push receipt error code");
            }
        }
    }
}

/// Observer that keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: std::sync::Mutex<Vec<DeliveryEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events seen so far.
    pub fn events(&self) -> Vec<DeliveryEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl DeliveryObserver for RecordingObserver {
    fn observe(&self, event: &DeliveryEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
