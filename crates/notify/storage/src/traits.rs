//! Storage traits.

/// Push token registry keyed by user id.
pub trait TokenStore: Send + Sync {
    /// Get all tokens registered for a user, oldest first.
    fn get(&self, user_id: &str) -> color_eyre::eyre::Result<Vec<String>>;

    /// Register a token for a user. Registering a known token is a no-op.
    fn add(&self, user_id: &str, token: &str) -> color_eyre::eyre::Result<()>;
}

impl<T: TokenStore + ?Sized> TokenStore for std::sync::Arc<T> {
    fn get(&self, user_id: &str) -> color_eyre::eyre::Result<Vec<String>> {
        (**self).get(user_id)
    }

    fn add(&self, user_id: &str, token: &str) -> color_eyre::eyre::Result<()> {
        (**self).add(user_id, token)
    }
}
