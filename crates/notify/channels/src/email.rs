//! SendGrid email sender.

use std::time::Duration;

use serde::Serialize;

use crate::{ChannelError, EmailSender};

/// Production SendGrid API.
pub const SENDGRID_API_URL: &str = "https://api.sendgrid.com";

/// SendGrid account settings. Missing values are reported on first send.
#[derive(Debug, Clone, Default)]
pub struct SendGridConfig {
    pub api_key: Option<String>,
    /// Verified sender address.
    pub sender_email: Option<String>,
}

#[derive(Serialize)]
struct Address<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct Personalization<'a> {
    to: [Address<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    value: &'a str,
}

/// Body of `POST /v3/mail/send`.
#[derive(Serialize)]
struct MailSend<'a> {
    personalizations: [Personalization<'a>; 1],
    from: Address<'a>,
    subject: &'a str,
    content: [Content<'a>; 1],
}

/// Email sender backed by the SendGrid v3 mail API.
#[derive(Debug, Clone)]
pub struct SendGridEmail {
    client: reqwest::Client,
    base_url: String,
    config: SendGridConfig,
}

impl SendGridEmail {
    /// Create a sender for the production SendGrid API.
    pub fn new(config: SendGridConfig, timeout: Duration) -> Result<Self, ChannelError> {
        Self::with_base_url(SENDGRID_API_URL, config, timeout)
    }

    /// Create a sender for a custom API base URL.
    pub fn with_base_url(
        base_url: impl Into<String>,
        config: SendGridConfig,
        timeout: Duration,
    ) -> Result<Self, ChannelError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            config,
        })
    }
}

impl EmailSender for SendGridEmail {
    async fn send_email(&self, to: &str, subject: &str, html: &str) -> Result<(), ChannelError> {
        let from = self
            .config
            .sender_email
            .as_deref()
            .ok_or(ChannelError::NotConfigured("sender email"))?;
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ChannelError::NotConfigured("SendGrid API key"))?;

        let mail = MailSend {
            personalizations: [Personalization {
                to: [Address { email: to }],
            }],
            from: Address { email: from },
            subject,
            content: [Content {
                kind: "text/html",
                value: html,
            }],
        };

        let response = self
            .client
            .post(format!("{}/v3/mail/send", self.base_url))
            .bearer_auth(api_key)
            .json(&mail)
            .send()
            .await
            .inspect_err(|e| tracing::error!(to = %to, error = %e, "error sending email"))?;

        if !response.status().is_success() {
            let err = crate::error::rejected(response).await;
            tracing::error!(to = %to, error = %err, "error sending email");
            return Err(err);
        }

        tracing::info!(to = %to, "email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config() -> SendGridConfig {
        SendGridConfig {
            api_key: Some("SG.key".to_string()),
            sender_email: Some("noreply@example.com".to_string()),
        }
    }

    fn sender(server: &MockServer, config: SendGridConfig) -> SendGridEmail {
        SendGridEmail::with_base_url(server.uri(), config, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_send_email() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v3/mail/send"))
            .and(header("authorization", "Bearer SG.key"))
            .and(body_json(serde_json::json!({
                "personalizations": [{"to": [{"email": "test@example.com"}]}],
                "from": {"email": "noreply@example.com"},
                "subject": "Test",
                "content": [{"type": "text/html", "value": "<p>Test</p>"}],
            })))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        sender(&server, config())
            .send_email("test@example.com", "Test", "<p>Test</p>")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_missing_sender() {
        let server = MockServer::start().await;
        let config = SendGridConfig {
            sender_email: None,
            ..config()
        };

        let err = sender(&server, config)
            .send_email("test@example.com", "Test", "<p>Test</p>")
            .await
            .unwrap_err();

        assert!(err.is_config());
        assert_eq!(err.to_string(), "sender email is not configured");
    }

    #[tokio::test]
    async fn test_provider_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "errors": [{"message": "The provided authorization grant is invalid"}]
            })))
            .mount(&server)
            .await;

        let err = sender(&server, config())
            .send_email("test@example.com", "Test", "<p>Test</p>")
            .await
            .unwrap_err();

        assert!(!err.is_config());
        assert!(matches!(err, ChannelError::Rejected { status: 401, .. }));
        assert!(err.to_string().contains("authorization grant is invalid"));
    }
}
