//! Expo push relay client using reqwest.

use std::collections::HashMap;
use std::time::Duration;

use notify_core::{OutboundMessage, Receipt, Ticket};
use serde::Deserialize;

use crate::{PushRelay, RelayError};

/// Production Expo push API.
pub const EXPO_API_URL: &str = "https://exp.host/--/api/v2";

/// Default per-request timeout.
pub const DEFAULT_RELAY_TIMEOUT: Duration = Duration::from_secs(30);

/// Error entry in a relay response envelope.
#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: String,
}

/// `{ "data": ..., "errors": [...] }` envelope shared by both endpoints.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<ApiError>,
}

impl<T> Envelope<T> {
    fn into_data(self) -> Result<T, RelayError> {
        if let Some(first) = self.errors.first() {
            let reason = match &first.code {
                Some(code) => format!("{code}: {}", first.message),
                None => first.message.clone(),
            };
            return Err(RelayError::Rejected(reason));
        }

        self.data
            .ok_or_else(|| RelayError::Rejected("response carried no data".to_string()))
    }
}

/// Expo push relay client.
#[derive(Debug, Clone)]
pub struct ExpoRelay {
    client: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
}

impl ExpoRelay {
    /// Create a client for the production Expo API.
    pub fn new(access_token: Option<String>) -> Result<Self, RelayError> {
        Self::with_base_url(EXPO_API_URL, access_token, DEFAULT_RELAY_TIMEOUT)
    }

    /// Create a client for a custom API base URL.
    pub fn with_base_url(
        base_url: impl Into<String>,
        access_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, RelayError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(RelayError::Config("relay base URL is empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RelayError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            access_token,
        })
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, RelayError>
    where
        B: serde::Serialize + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        let mut request = self
            .client
            .post(format!("{}{path}", self.base_url))
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body);

        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RelayError::Status { status, body });
        }

        let envelope: Envelope<T> = response.json().await?;
        envelope.into_data()
    }
}

impl PushRelay for ExpoRelay {
    async fn send_batch(&self, messages: &[OutboundMessage]) -> Result<Vec<Ticket>, RelayError> {
        let tickets: Vec<Ticket> = self.post("/push/send", messages).await?;

        if tickets.len() != messages.len() {
            return Err(RelayError::TicketCountMismatch {
                expected: messages.len(),
                actual: tickets.len(),
            });
        }

        tracing::debug!(messages = messages.len(), "push batch accepted");
        Ok(tickets)
    }

    async fn get_receipts(&self, ids: &[String]) -> Result<HashMap<String, Receipt>, RelayError> {
        #[derive(serde::Serialize)]
        struct ReceiptQuery<'a> {
            ids: &'a [String],
        }

        self.post("/push/getReceipts", &ReceiptQuery { ids }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify_core::PushToken;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn relay(server: &MockServer, token: Option<&str>) -> ExpoRelay {
        ExpoRelay::with_base_url(
            server.uri(),
            token.map(str::to_string),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn message(token: &str) -> OutboundMessage {
        OutboundMessage::new(PushToken::parse(token).unwrap(), "Title", "Body", None)
    }

    #[tokio::test]
    async fn test_send_batch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/push/send"))
            .and(header("authorization", "Bearer secret"))
            .and(body_json(serde_json::json!([
                {"to": "ExponentPushToken[a]", "title": "Title", "body": "Body", "sound": "default"},
                {"to": "ExponentPushToken[b]", "title": "Title", "body": "Body", "sound": "default"},
            ])))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [
                    {"status": "ok", "id": "r-a"},
                    {"status": "error", "message": "bad", "details": {"error": "DeviceNotRegistered"}},
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tickets = relay(&server, Some("secret"))
            .send_batch(&[message("ExponentPushToken[a]"), message("ExponentPushToken[b]")])
            .await
            .unwrap();

        assert_eq!(tickets.len(), 2);
        assert_eq!(tickets[0], Ticket::ok("r-a"));
        assert!(!tickets[1].is_ok());
    }

    #[tokio::test]
    async fn test_send_batch_ticket_mismatch() {
        let server = MockServer::start().await;
        Mock::given(path("/push/send"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"data": [{"status": "ok", "id": "r"}]})),
            )
            .mount(&server)
            .await;

        let err = relay(&server, None)
            .send_batch(&[message("ExponentPushToken[a]"), message("ExponentPushToken[b]")])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RelayError::TicketCountMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[tokio::test]
    async fn test_send_batch_envelope_errors() {
        let server = MockServer::start().await;
        Mock::given(path("/push/send"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "errors": [{"code": "PUSH_TOO_MANY_EXPERIENCE_IDS", "message": "mixed projects"}]
            })))
            .mount(&server)
            .await;

        let err = relay(&server, None)
            .send_batch(&[message("ExponentPushToken[a]")])
            .await
            .unwrap_err();

        match err {
            RelayError::Rejected(reason) => {
                assert_eq!(reason, "PUSH_TOO_MANY_EXPERIENCE_IDS: mixed projects");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let server = MockServer::start().await;
        Mock::given(path("/push/send"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let err = relay(&server, None)
            .send_batch(&[message("ExponentPushToken[a]")])
            .await
            .unwrap_err();

        match err {
            RelayError::Status { status, body } => {
                assert_eq!(status.as_u16(), 503);
                assert_eq!(body, "unavailable");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_get_receipts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/push/getReceipts"))
            .and(body_json(serde_json::json!({"ids": ["r1", "r2"]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {
                    "r1": {"status": "ok"},
                    "r2": {"status": "error", "message": "Invalid token",
                           "details": {"error": "DeviceNotRegistered"}},
                }
            })))
            .mount(&server)
            .await;

        let receipts = relay(&server, None)
            .get_receipts(&["r1".to_string(), "r2".to_string()])
            .await
            .unwrap();

        assert_eq!(receipts.len(), 2);
        assert_eq!(receipts["r1"], Receipt::Ok);
        assert!(matches!(receipts["r2"], Receipt::Error { .. }));
    }

    #[tokio::test]
    async fn test_timeout_is_relay_error() {
        let server = MockServer::start().await;
        Mock::given(path("/push/getReceipts"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"data": {}}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let relay =
            ExpoRelay::with_base_url(server.uri(), None, Duration::from_millis(100)).unwrap();
        let err = relay.get_receipts(&["r1".to_string()]).await.unwrap_err();

        assert!(matches!(err, RelayError::Transport(e) if e.is_timeout()));
    }

    #[tokio::test]
    async fn test_envelope_without_data() {
        let server = MockServer::start().await;
        Mock::given(path("/push/getReceipts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let err = relay(&server, None)
            .get_receipts(&["r-a".to_string()])
            .await
            .unwrap_err();

        match err {
            RelayError::Rejected(reason) => assert_eq!(reason, "response carried no data"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_base_url() {
        assert!(matches!(
            ExpoRelay::with_base_url("", None, DEFAULT_RELAY_TIMEOUT),
            Err(RelayError::Config(_))
        ));
    }
}
