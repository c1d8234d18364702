//! Channel errors.

/// Failure to hand a message to a provider.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// Required provider setting is missing. Not a delivery failure.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider rejected message (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },
}

impl ChannelError {
    /// Check if the error comes from missing configuration.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::NotConfigured(_))
    }
}

/// Map a non-success provider response to [`ChannelError::Rejected`].
pub(crate) async fn rejected(response: reqwest::Response) -> ChannelError {
    #[derive(serde::Deserialize)]
    struct ProviderError {
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        errors: Vec<ProviderError>,
    }

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<ProviderError>(&body)
        .ok()
        .and_then(|e| {
            e.message
                .or_else(|| e.errors.into_iter().find_map(|inner| inner.message))
        })
        .unwrap_or(body);

    ChannelError::Rejected { status, message }
}
