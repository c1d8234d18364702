//! Twilio SMS sender.

use std::time::Duration;

use crate::{ChannelError, SmsSender};

/// Production Twilio REST API.
pub const TWILIO_API_URL: &str = "https://api.twilio.com";

/// Twilio account settings. Missing values are reported on first send.
#[derive(Debug, Clone, Default)]
pub struct TwilioConfig {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    /// Sender phone number.
    pub from_number: Option<String>,
}

/// Identifier Twilio assigns to an accepted message.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct SmsReceipt {
    pub sid: String,
}

/// SMS sender backed by the Twilio Messages API.
#[derive(Debug, Clone)]
pub struct TwilioSms {
    client: reqwest::Client,
    base_url: String,
    config: TwilioConfig,
}

impl TwilioSms {
    /// Create a sender for the production Twilio API.
    pub fn new(config: TwilioConfig, timeout: Duration) -> Result<Self, ChannelError> {
        Self::with_base_url(TWILIO_API_URL, config, timeout)
    }

    /// Create a sender for a custom API base URL.
    pub fn with_base_url(
        base_url: impl Into<String>,
        config: TwilioConfig,
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

impl SmsSender for TwilioSms {
    async fn send_sms(&self, to: &str, body: &str) -> Result<SmsReceipt, ChannelError> {
        let from = self
            .config
            .from_number
            .as_deref()
            .ok_or(ChannelError::NotConfigured("Twilio phone number"))?;
        let sid = self
            .config
            .account_sid
            .as_deref()
            .ok_or(ChannelError::NotConfigured("Twilio account SID"))?;
        let token = self
            .config
            .auth_token
            .as_deref()
            .ok_or(ChannelError::NotConfigured("Twilio auth token"))?;

        let response = self
            .client
            .post(format!(
                "{}/2010-04-01/Accounts/{sid}/Messages.json",
                self.base_url
            ))
            .basic_auth(sid, Some(token))
            .form(&[("To", to), ("From", from), ("Body", body)])
            .send()
            .await
            .inspect_err(|e| tracing::error!(to = %to, error = %e, "error sending SMS"))?;

        if !response.status().is_success() {
            let err = crate::error::rejected(response).await;
            tracing::error!(to = %to, error = %err, "error sending SMS");
            return Err(err);
        }

        let receipt: SmsReceipt = response.json().await?;
        tracing::info!(to = %to, sid = %receipt.sid, "SMS sent");

        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config() -> TwilioConfig {
        TwilioConfig {
            account_sid: Some("AC123".to_string()),
            auth_token: Some("token".to_string()),
            from_number: Some("+15550000000".to_string()),
        }
    }

    fn sender(server: &MockServer, config: TwilioConfig) -> TwilioSms {
        TwilioSms::with_base_url(server.uri(), config, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_send_sms() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/2010-04-01/Accounts/AC123/Messages.json"))
            .and(header_exists("authorization"))
            .and(body_string_contains("To=%2B1234567890"))
            .and(body_string_contains("Body=Test+message"))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(serde_json::json!({"sid": "SM1"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let receipt = sender(&server, config())
            .send_sms("+1234567890", "Test message")
            .await
            .unwrap();

        assert_eq!(receipt.sid, "SM1");
    }

    #[tokio::test]
    async fn test_missing_phone_number() {
        let server = MockServer::start().await;
        let config = TwilioConfig {
            from_number: None,
            ..config()
        };

        let err = sender(&server, config)
            .send_sms("+1234567890", "Test")
            .await
            .unwrap_err();

        assert!(err.is_config());
        assert_eq!(err.to_string(), "Twilio phone number is not configured");
    }

    #[tokio::test]
    async fn test_provider_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "code": 21211,
                "message": "The 'To' number is not a valid phone number.",
                "status": 400
            })))
            .mount(&server)
            .await;

        let err = sender(&server, config())
            .send_sms("bogus", "Test")
            .await
            .unwrap_err();

        match err {
            ChannelError::Rejected { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "The 'To' number is not a valid phone number.");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
