//! Channel traits.

use crate::{ChannelError, SmsReceipt};

/// Sends text messages.
#[trait_variant::make(Send)]
pub trait SmsSender: Send + Sync {
    /// Send `body` to the phone number `to`.
    async fn send_sms(&self, to: &str, body: &str) -> Result<SmsReceipt, ChannelError>;
}

/// Sends HTML email.
#[trait_variant::make(Send)]
pub trait EmailSender: Send + Sync {
    /// Send an HTML email to `to`.
    async fn send_email(&self, to: &str, subject: &str, html: &str) -> Result<(), ChannelError>;
}
