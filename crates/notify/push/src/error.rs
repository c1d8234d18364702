//! Push relay errors.

/// Failure of a single relay request.
///
/// Always scoped to one batch; the service never lets it escape to callers.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("relay request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("relay returned HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("relay rejected request: {0}")]
    Rejected(String),

    #[error("relay returned {actual} tickets for {expected} messages")]
    TicketCountMismatch { expected: usize, actual: usize },

    #[error("invalid relay configuration: {0}")]
    Config(String),
}
