//! Push notification handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use notify_core::{ReceiptOutcome, TicketRef};
use notify_push::{PushRelay, PushService};
use notify_storage::TokenStore;

use crate::handlers::{body_or_default, error, ok, required};

/// Shared state for push routes.
pub struct PushState<R, T> {
    pub service: Arc<PushService<R>>,
    pub tokens: T,
}

impl<R, T: Clone> Clone for PushState<R, T> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            tokens: self.tokens.clone(),
        }
    }
}

impl<R, T> PushState<R, T> {
    pub fn new(service: PushService<R>, tokens: T) -> Self {
        Self {
            service: Arc::new(service),
            tokens,
        }
    }
}

/// Send push request.
#[derive(Debug, Default, Deserialize)]
pub struct PushRequest {
    #[serde(default, rename = "userId")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    /// Opaque payload forwarded to the device.
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// Send push response.
#[derive(Debug, Serialize, Deserialize)]
pub struct PushResponse {
    pub message: String,
    /// Number of tickets the relay issued.
    pub tickets: usize,
}

/// Send a push notification to every device registered for a user.
pub async fn send_push<R, T>(
    State(state): State<PushState<R, T>>,
    payload: Result<Json<PushRequest>, JsonRejection>,
) -> Response
where
    R: PushRelay,
    T: TokenStore,
{
    let request = body_or_default(payload);
    let (Some(user_id), Some(title), Some(body)) = (
        required(&request.user_id),
        required(&request.title),
        required(&request.body),
    ) else {
        return error(
            StatusCode::BAD_REQUEST,
            r#"Missing "userId", "title", or "body" in request."#,
        );
    };

    let tokens = match state.tokens.get(user_id) {
        Ok(tokens) => tokens,
        Err(e) => {
            tracing::error!(user_id = %user_id, error = %e, "failed to load push tokens");
            return error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to send push notification.",
            );
        }
    };

    if tokens.is_empty() {
        return error(StatusCode::NOT_FOUND, "No push tokens found for user.");
    }

    let tickets = state
        .service
        .send_push_notification(&tokens, title, body, request.data.clone())
        .await;

    (
        StatusCode::OK,
        Json(PushResponse {
            message: "Push notification sent successfully.".to_string(),
            tickets: tickets.len(),
        }),
    )
        .into_response()
}

/// Register token request.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default, rename = "userId")]
    pub user_id: Option<String>,
    #[serde(default, rename = "pushToken")]
    pub push_token: Option<String>,
}

/// Register a push token for a user.
pub async fn register_token<R, T>(
    State(state): State<PushState<R, T>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Response
where
    R: PushRelay,
    T: TokenStore,
{
    let request = body_or_default(payload);
    let (Some(user_id), Some(push_token)) =
        (required(&request.user_id), required(&request.push_token))
    else {
        return error(
            StatusCode::BAD_REQUEST,
            r#"Missing "userId" or "pushToken" in request."#,
        );
    };

    match state.tokens.add(user_id, push_token) {
        Ok(()) => {
            tracing::info!(user_id = %user_id, push_token = %push_token, "registered push token");
            ok("Push token registered successfully.")
        }
        Err(e) => {
            tracing::error!(user_id = %user_id, error = %e, "failed to register push token");
            error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to register push token.",
            )
        }
    }
}

/// Check receipts request.
#[derive(Debug, Default, Deserialize)]
pub struct ReceiptsRequest {
    #[serde(default)]
    pub tickets: Option<Vec<TicketRef>>,
}

/// Check receipts response.
#[derive(Debug, Serialize)]
pub struct ReceiptsResponse {
    /// Number of receipts the relay has resolved.
    pub checked: usize,
    /// Resolved receipts that report a delivery failure.
    pub failed: Vec<ReceiptOutcome>,
}

/// Look up delivery receipts for previously issued tickets.
pub async fn check_receipts<R, T>(
    State(state): State<PushState<R, T>>,
    payload: Result<Json<ReceiptsRequest>, JsonRejection>,
) -> Response
where
    R: PushRelay,
    T: TokenStore,
{
    let Some(tickets) = body_or_default(payload).tickets else {
        return error(StatusCode::BAD_REQUEST, r#"Missing "tickets" in request."#);
    };

    let receipts = state
        .service
        .handle_push_notification_receipts(&tickets)
        .await;
    let checked = receipts.len();
    let failed = receipts
        .into_iter()
        .filter(|outcome| !outcome.is_delivered())
        .collect();

    (StatusCode::OK, Json(ReceiptsResponse { checked, failed }))
        .into_response()
}
