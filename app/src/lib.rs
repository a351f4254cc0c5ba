//! Route composer service library

use std::path::Path;

use anyhow::Context;
use composer_api::AppState;
use composer_core::AppConfig;
use route_composer::TokenList;

/// Environment variable naming an optional token list JSON file to preload.
pub const TOKEN_LIST_ENV: &str = "ROUTE_COMPOSER_TOKENS";

/// Install the global tracing subscriber.
pub fn init_tracing() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("route_composer=debug".parse()?)
        .add_directive("info".parse()?);

    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

/// Load a token list document (JSON array of `{address, symbol, decimals, logo?}`).
pub fn load_token_list(path: &Path) -> composer_core::Result<TokenList> {
    let contents = std::fs::read_to_string(path).map_err(|e| composer_core::Error::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let list: TokenList = serde_json::from_str(&contents)?;
    Ok(list)
}

/// Build application state from config and the optional preloaded token list.
pub async fn build_state(config: AppConfig) -> anyhow::Result<AppState> {
    let state = AppState::with_config(config);

    if let Ok(path) = std::env::var(TOKEN_LIST_ENV) {
        let path = path.trim();
        if !path.is_empty() {
            let tokens = load_token_list(Path::new(path))
                .with_context(|| format!("loading token list {}", path))?;
            tracing::info!("Loaded {} tokens from {}", tokens.len(), path);
            state.set_tokens(tokens).await;
        }
    }

    Ok(state)
}

/// Run the service until the server stops.
pub async fn run() -> anyhow::Result<()> {
    init_tracing()?;

    tracing::info!("Starting route composer");

    let config = AppConfig::from_env().context("loading configuration")?;
    let state = build_state(config).await?;

    composer_api::start_server(state)
        .await
        .context("API server failed")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use composer_core::Address;
    use route_composer::TokenResolver;

    #[test]
    fn test_load_token_list() {
        let path = std::env::temp_dir()
            .join(format!("route-composer-tokens-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"[{"address": "0xC02A", "symbol": "WETH", "decimals": 18}]"#,
        )
        .unwrap();

        let list = load_token_list(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(list.len(), 1);
        assert_eq!(list.resolve(&Address::new("0xc02a")).unwrap().symbol, "WETH");
    }

    #[test]
    fn test_load_token_list_missing_file() {
        let err = load_token_list(Path::new("/nonexistent/tokens.json")).unwrap_err();
        assert!(matches!(err, composer_core::Error::Io { .. }));
    }
}
