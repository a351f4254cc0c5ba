//! Application state shared across API handlers

use std::sync::Arc;

use composer_core::{AppConfig, ComposeConfig};
use route_composer::TokenList;
use tokio::sync::RwLock;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    tokens: RwLock<TokenList>,
}

impl AppState {
    /// Create a new application state with default config
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create with a specific config
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                tokens: RwLock::new(TokenList::new()),
            }),
        }
    }

    /// Startup config; fixed for the lifetime of the server
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get engine settings
    pub fn compose_config(&self) -> &ComposeConfig {
        &self.inner.config.compose
    }

    /// Snapshot of the registered token list
    pub async fn tokens(&self) -> TokenList {
        self.inner.tokens.read().await.clone()
    }

    /// Replace the registered token list
    pub async fn set_tokens(&self, tokens: TokenList) {
        let mut current = self.inner.tokens.write().await;
        tracing::info!(
            "Token list replaced ({} -> {} entries)",
            current.len(),
            tokens.len()
        );
        *current = tokens;
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
