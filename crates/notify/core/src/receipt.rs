//! Delivery receipts and their classification.

use serde::{Deserialize, Serialize};

use crate::ErrorDetails;

/// Fallback text for error receipts that carry no message.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Relay's resolved delivery outcome for one ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Receipt {
    Ok,
    Error {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<ErrorDetails>,
    },
}

/// Classified outcome of a single receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DeliveryStatus {
    Delivered,
    Failed {
        message: String,
        #[serde(rename = "errorCode", skip_serializing_if = "Option::is_none")]
        error_code: Option<String>,
    },
}

/// A receipt classification keyed by its receipt id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptOutcome {
    pub id: String,
    #[serde(flatten)]
    pub status: DeliveryStatus,
}

impl ReceiptOutcome {
    /// Classify `receipt`.
    ///
    /// Error receipts without a message get [`UNKNOWN_ERROR`]; an error code
    /// is kept only if the relay supplied one.
    pub fn classify(id: impl Into<String>, receipt: &Receipt) -> Self {
        let status = match receipt {
            Receipt::Ok => DeliveryStatus::Delivered,
            Receipt::Error { message, details } => DeliveryStatus::Failed {
                message: message
                    .as_deref()
                    .filter(|m| !m.is_empty())
                    .unwrap_or(UNKNOWN_ERROR)
                    .to_string(),
                error_code: details.as_ref().and_then(|d| d.error.clone()),
            },
        };

        Self {
            id: id.into(),
            status,
        }
    }

    /// Check if the message reached the device's push service.
    pub fn is_delivered(&self) -> bool {
        matches!(self.status, DeliveryStatus::Delivered)
    }

    /// Machine-readable error code, if any.
    pub fn error_code(&self) -> Option<&str> {
        match &self.status {
            DeliveryStatus::Failed { error_code, .. } => error_code.as_deref(),
            DeliveryStatus::Delivered => None,
        }
    }
}
