//! In-memory token registry.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::TokenStore;

/// Process-local token registry. Contents are lost on restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    tokens: Arc<RwLock<HashMap<String, Vec<String>>>>,
}

impl MemoryTokenStore {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, user_id: &str) -> color_eyre::eyre::Result<Vec<String>> {
        let tokens = self
            .tokens
            .read()
            .map_err(|_| color_eyre::eyre::eyre!("token registry lock poisoned"))?;

        Ok(tokens.get(user_id).cloned().unwrap_or_default())
    }

    fn add(&self, user_id: &str, token: &str) -> color_eyre::eyre::Result<()> {
        let mut tokens = self
            .tokens
            .write()
            .map_err(|_| color_eyre::eyre::eyre!("token registry lock poisoned"))?;

        let registered = tokens.entry(user_id.to_string()).or_default();
        if registered.iter().any(|t| t == token) {
            tracing::debug!(user_id = %user_id, "push token already registered");
            return Ok(());
        }

        registered.push(token.to_string());
        Ok(())
    }
}
