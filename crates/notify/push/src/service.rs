//! Push delivery orchestration and receipt reconciliation.

use std::collections::HashSet;

use futures::StreamExt;
use notify_core::{
    DeliveryEvent, DeliveryObserver, DeliveryStatus, HasReceiptId, OutboundMessage, PushToken,
    ReceiptOutcome, Ticket, TracingObserver, partition,
};
use notify_storage::TokenStore;

use crate::PushRelay;

/// Title of the welcome-back notification.
pub const WELCOME_BACK_TITLE: &str = "Welcome back skater! 🛹";

/// Body of the welcome-back notification.
pub const WELCOME_BACK_BODY: &str = "Ready to discover some epic spots?";

/// Push service that validates, batches, submits and reconciles notifications.
///
/// Failures of individual tokens or batches are reported to the observer and
/// never abort the surrounding operation.
pub struct PushService<R, O = TracingObserver> {
    relay: R,
    observer: O,
}

impl<R: PushRelay> PushService<R> {
    /// Create a push service that reports diagnostics through `tracing`.
    pub fn new(relay: R) -> Self {
        Self::with_observer(relay, TracingObserver)
    }
}

impl<R, O> PushService<R, O>
where
    R: PushRelay,
    O: DeliveryObserver,
{
    /// Create a push service with a custom diagnostics observer.
    pub fn with_observer(relay: R, observer: O) -> Self {
        Self { relay, observer }
    }

    /// Access the underlying relay.
    pub fn relay(&self) -> &R {
        &self.relay
    }

    /// Send one notification to every valid token.
    ///
    /// Returns the tickets of all batches the relay accepted, in batch order.
    /// Invalid tokens and failed batches contribute nothing.
    pub async fn send_push_notification(
        &self,
        tokens: &[String],
        title: &str,
        body: &str,
        data: Option<serde_json::Value>,
    ) -> Vec<Ticket> {
        let messages: Vec<OutboundMessage> = tokens
            .iter()
            .filter_map(|token| self.accept_token(token))
            .map(|to| OutboundMessage::new(to, title, body, data.clone()))
            .collect();

        let batches = partition(&messages, self.relay.send_batch_limit());
        if batches.is_empty() {
            tracing::debug!(tokens = tokens.len(), "no deliverable push tokens");
            return Vec::new();
        }

        let requests: Vec<_> = batches.iter().map(|batch| self.relay.send_batch(batch)).collect();
        let results: Vec<_> = futures::stream::iter(requests)
            .buffered(self.relay.max_concurrent_requests().get())
            .collect()
            .await;

        let mut tickets = Vec::with_capacity(messages.len());
        for (index, (batch, result)) in batches.iter().zip(results).enumerate() {
            match result {
                Ok(batch_tickets) => tickets.extend(batch_tickets),
                Err(e) => self.observer.observe(&DeliveryEvent::BatchSubmitFailed {
                    batch: index,
                    size: batch.len(),
                    error: e.to_string(),
                }),
            }
        }

        if tickets.is_empty() {
            tracing::warn!(
                tokens = tokens.len(),
                messages = messages.len(),
                batches = batches.len(),
                "push notification not accepted by relay"
            );
        } else {
            tracing::info!(
                tokens = tokens.len(),
                messages = messages.len(),
                batches = batches.len(),
                tickets = tickets.len(),
                "push notification sent"
            );
        }

        tickets
    }

    /// Fetch and classify receipts for previously issued tickets.
    ///
    /// Entries without a receipt id are skipped and repeated ids are queried
    /// once. Every failed receipt is
    /// reported to the observer (message, then error code if present) and
    /// every classified receipt is returned, in the order of the ticket ids.
    /// Ids the relay has not resolved yet are left out.
    pub async fn handle_push_notification_receipts<T: HasReceiptId>(
        &self,
        tickets: &[T],
    ) -> Vec<ReceiptOutcome> {
        let mut seen = HashSet::new();
        let ids: Vec<String> = tickets
            .iter()
            .filter_map(|ticket| ticket.receipt_id())
            .filter(|id| !id.is_empty() && seen.insert(*id))
            .map(str::to_string)
            .collect();

        let batches = partition(&ids, self.relay.receipt_batch_limit());
        let requests: Vec<_> = batches.iter().map(|batch| self.relay.get_receipts(batch)).collect();
        let results: Vec<_> = futures::stream::iter(requests)
            .buffered(self.relay.max_concurrent_requests().get())
            .collect()
            .await;

        let mut outcomes = Vec::with_capacity(ids.len());
        for (index, (batch, result)) in batches.iter().zip(results).enumerate() {
            let receipts = match result {
                Ok(receipts) => receipts,
                Err(e) => {
                    self.observer.observe(&DeliveryEvent::ReceiptQueryFailed {
                        batch: index,
                        size: batch.len(),
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            for id in batch {
                let Some(receipt) = receipts.get(id) else {
                    tracing::debug!(receipt_id = %id, "push receipt not available yet");
                    continue;
                };

                let outcome = ReceiptOutcome::classify(id.as_str(), receipt);
                self.report(&outcome);
                outcomes.push(outcome);
            }
        }

        outcomes
    }

    /// Send the welcome-back notification to all of a user's devices.
    ///
    /// Best-effort: lookup and delivery problems are logged, never returned.
    pub async fn send_welcome_back<S: TokenStore>(&self, store: &S, user_id: &str) {
        let tokens = match store.get(user_id) {
            Ok(tokens) => tokens,
            Err(e) => {
                tracing::error!(user_id = %user_id, error = %e, "failed to load push tokens");
                return;
            }
        };

        if tokens.is_empty() {
            return;
        }

        let tickets = self
            .send_push_notification(
                &tokens,
                WELCOME_BACK_TITLE,
                WELCOME_BACK_BODY,
                Some(serde_json::json!({ "type": "welcome_back" })),
            )
            .await;

        tracing::info!(user_id = %user_id, tickets = tickets.len(), "welcome back notification sent");
    }

    fn accept_token(&self, token: &str) -> Option<PushToken> {
        let accepted = PushToken::parse_with(token, |t| self.relay.is_valid_token(t));
        if accepted.is_none() {
            self.observer.observe(&DeliveryEvent::TokenRejected {
                token: token.to_string(),
            });
        }
        accepted
    }

    fn report(&self, outcome: &ReceiptOutcome) {
        let DeliveryStatus::Failed {
            message,
            error_code,
        } = &outcome.status
        else {
            return;
        };

        self.observer.observe(&DeliveryEvent::ReceiptFailed {
            id: outcome.id.clone(),
            message: message.clone(),
        });

        if let Some(code) = error_code {
            self.observer.observe(&DeliveryEvent::ReceiptErrorCode {
                id: outcome.id.clone(),
                code: code.clone(),
            });
        }
    }
}
