//! # API Token Storage
//!
//! The bearer token for the backend lives in the device's secure storage,
//! which the mobile shell owns. This module only defines the lookup seam and
//! two simple stores.
//!
//! ```text
//! ImageFetcher ──► TokenStore::token() ──► Some(token) ──► Authorization: Bearer …
//!                                     └──► None        ──► placeholder, no request
//! ```

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::ClientResult;

/// Source of the current API bearer token.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Returns the token, or `None` when the user is not signed in.
    async fn token(&self) -> ClientResult<Option<String>>;
}

/// In-memory token store, filled by the login flow.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    token: Arc<RwLock<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Arc::new(RwLock::new(Some(token.into()))),
        }
    }

    pub async fn set_token(&self, token: impl Into<String>) {
        *self.token.write().await = Some(token.into());
        debug!("API token stored");
    }

    pub async fn clear(&self) {
        *self.token.write().await = None;
        debug!("API token cleared");
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn token(&self) -> ClientResult<Option<String>> {
        Ok(self.token.read().await.clone())
    }
}

/// Reads the token from an environment variable on every lookup.
///
/// Used by the command-line probe; blank values count as missing.
#[derive(Debug, Clone)]
pub struct EnvTokenStore {
    var: String,
}

impl EnvTokenStore {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

#[async_trait]
impl TokenStore for EnvTokenStore {
    async fn token(&self) -> ClientResult<Option<String>> {
        Ok(std::env::var(&self.var)
            .ok()
            .filter(|token| !token.trim().is_empty()))
    }
}
