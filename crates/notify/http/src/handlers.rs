//! SMS and email handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use notify_channels::{EmailSender, SmsSender};

/// Success body.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Error body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Build a `{ "message": .. }` response with status 200.
pub(crate) fn ok(message: &str) -> Response {
    (
        StatusCode::OK,
        Json(MessageResponse {
            message: message.to_string(),
        }),
    )
        .into_response()
}

/// Build a `{ "error": .. }` response.
pub(crate) fn error(status: StatusCode, error: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}

/// Unwrap a JSON body, treating an unreadable body as an empty one.
///
/// Required-field checks then report what is missing.
pub(crate) fn body_or_default<T: Default>(payload: Result<Json<T>, JsonRejection>) -> T {
    match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "unreadable request body");
            T::default()
        }
    }
}

/// Return the value if it is present and non-empty.
pub(crate) fn required(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.is_empty())
}

/// Send SMS request.
#[derive(Debug, Default, Deserialize)]
pub struct SmsRequest {
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

/// Send an SMS.
pub async fn send_sms<S>(
    State(sender): State<Arc<S>>,
    payload: Result<Json<SmsRequest>, JsonRejection>,
) -> Response
where
    S: SmsSender,
{
    let request = body_or_default(payload);
    let (Some(to), Some(body)) = (required(&request.to), required(&request.body)) else {
        return error(
            StatusCode::BAD_REQUEST,
            r#"Missing "to" or "body" in request."#,
        );
    };

    match sender.send_sms(to, body).await {
        Ok(_) => ok("SMS sent successfully."),
        Err(e) => {
            tracing::error!(error = %e, config = e.is_config(), "failed to send SMS");
            error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to send SMS.")
        }
    }
}

/// Send email request.
#[derive(Debug, Default, Deserialize)]
pub struct EmailRequest {
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub html: Option<String>,
}

/// Send an email.
pub async fn send_email<E>(
    State(sender): State<Arc<E>>,
    payload: Result<Json<EmailRequest>, JsonRejection>,
) -> Response
where
    E: EmailSender,
{
    let request = body_or_default(payload);
    let (Some(to), Some(subject), Some(html)) = (
        required(&request.to),
        required(&request.subject),
        required(&request.html),
    ) else {
        return error(
            StatusCode::BAD_REQUEST,
            r#"Missing "to", "subject", or "html" in request."#,
        );
    };

    match sender.send_email(to, subject, html).await {
        Ok(()) => ok("Email sent successfully."),
        Err(e) => {
            tracing::error!(error = %e, config = e.is_config(), "failed to send email");
            error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to send email.")
        }
    }
}

/// Fallback for unknown routes and unsupported methods.
pub async fn not_found() -> Response {
    error(StatusCode::NOT_FOUND, "Not found")
}
