//! Push relay traits.

use std::collections::HashMap;
use std::num::NonZeroUsize;

use notify_core::{OutboundMessage, Receipt, Ticket};

use crate::RelayError;

/// Client for a push relay that acknowledges with tickets and resolves receipts later.
#[trait_variant::make(Send)]
pub trait PushRelay: Send + Sync {
    /// Submit one batch. Either every message gets a ticket or the batch fails.
    async fn send_batch(&self, messages: &[OutboundMessage]) -> Result<Vec<Ticket>, RelayError>;

    /// Fetch receipts for one batch of ids. Unresolved ids are absent from the map.
    async fn get_receipts(&self, ids: &[String]) -> Result<HashMap<String, Receipt>, RelayError>;

    /// Check whether the relay can deliver to `token`.
    fn is_valid_token(&self, token: &str) -> bool {
        notify_core::is_valid_token(token)
    }

    /// Maximum messages per [`PushRelay::send_batch`] call.
    fn send_batch_limit(&self) -> NonZeroUsize {
        notify_core::SEND_BATCH_LIMIT
    }

    /// Maximum ids per [`PushRelay::get_receipts`] call.
    fn receipt_batch_limit(&self) -> NonZeroUsize {
        notify_core::RECEIPT_BATCH_LIMIT
    }

    /// Maximum batch requests in flight at once.
    fn max_concurrent_requests(&self) -> NonZeroUsize {
        notify_core::MAX_CONCURRENT_REQUESTS
    }
}
