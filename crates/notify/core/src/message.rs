//! Outbound push messages and submission tickets.

use serde::{Deserialize, Serialize};

use crate::PushToken;

/// Notification sound to play on the device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sound {
    /// The device's default notification sound.
    #[default]
    Default,
}

/// One push message addressed to a single device.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundMessage {
    /// Destination device token.
    pub to: PushToken,
    pub title: String,
    pub body: String,
    /// Caller payload, passed through untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    pub sound: Sound,
}

impl OutboundMessage {
    /// Build a message for `to` with the default sound.
    pub fn new(
        to: PushToken,
        title: impl Into<String>,
        body: impl Into<String>,
        data: Option<serde_json::Value>,
    ) -> Self {
        Self {
            to,
            title: title.into(),
            body: body.into(),
            data,
            sound: Sound::Default,
        }
    }
}

/// Extra information attached to an error ticket or receipt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Machine-readable error code, e.g. `DeviceNotRegistered`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Relay acknowledgment of one submitted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Ticket {
    /// Accepted; `id` can later be exchanged for a receipt.
    Ok { id: String },
    /// Rejected before delivery was attempted.
    Error {
        #[serde(default)]
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<ErrorDetails>,
    },
}

impl Ticket {
    /// Create an accepted ticket.
    pub fn ok(id: impl Into<String>) -> Self {
        Self::Ok { id: id.into() }
    }

    /// Check if the relay accepted the message.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }
}

/// Anything that may carry a receipt id.
///
/// Entries without an id, or with an empty one, are skipped during
/// reconciliation.
pub trait HasReceiptId {
    fn receipt_id(&self) -> Option<&str>;
}

impl HasReceiptId for Ticket {
    fn receipt_id(&self) -> Option<&str> {
        match self {
            Self::Ok { id } => Some(id),
            Self::Error { .. } => None,
        }
    }
}

/// Loosely-shaped ticket supplied by external callers.
///
/// Only the id matters; any other fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl TicketRef {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            status: None,
        }
    }
}

impl HasReceiptId for TicketRef {
    fn receipt_id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl<T: HasReceiptId + ?Sized> HasReceiptId for &T {
    fn receipt_id(&self) -> Option<&str> {
        (**self).receipt_id()
    }
}
