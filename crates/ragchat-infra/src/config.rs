//! Client configuration loader for RagChat.
//!
//! Reads `config.toml` from the data directory (`~/.ragchat/` in production)
//! and deserializes it into [`ClientConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::Path;

use ragchat_types::config::{ClientConfig, DEFAULT_BASE_URL};

/// Environment variable that overrides the configured base URL.
pub const BASE_URL_ENV: &str = "RAGCHAT_BASE_URL";

/// Load client configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`ClientConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
pub async fn load_config(data_dir: &Path) -> ClientConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ClientConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ClientConfig::default();
        }
    };

    match toml::from_str::<ClientConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ClientConfig::default()
        }
    }
}

/// Resolve the service base URL.
///
/// Priority:
/// 1. `--base-url` flag
/// 2. `RAGCHAT_BASE_URL` environment variable
/// 3. `base_url` from `config.toml`
/// 4. [`DEFAULT_BASE_URL`]
///
/// Blank candidates are skipped; trailing slashes are stripped.
pub fn resolve_base_url(config: &ClientConfig, flag: Option<&str>, env: Option<&str>) -> String {
    [flag, env, Some(config.base_url.as_str())]
        .into_iter()
        .flatten()
        .map(|url| url.trim().trim_end_matches('/'))
        .find(|url| !url.is_empty())
        .unwrap_or(DEFAULT_BASE_URL)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).await;
        assert_eq!(config, ClientConfig::default());
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            "base_url = \"https://rag.internal:9000\"\nenable_otel = true\n",
        )
        .await
        .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.base_url, "https://rag.internal:9000");
        assert!(config.enable_otel);
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn resolve_base_url_precedence() {
        let config = ClientConfig {
            base_url: "http://from-file:1".to_string(),
            enable_otel: false,
        };
        assert_eq!(
            resolve_base_url(&config, Some("http://flag:3/"), Some("http://env:2")),
            "http://flag:3"
        );
        assert_eq!(
            resolve_base_url(&config, None, Some("http://env:2")),
            "http://env:2"
        );
        assert_eq!(resolve_base_url(&config, None, None), "http://from-file:1");
    }

    #[test]
    fn resolve_base_url_skips_blank_values() {
        let config = ClientConfig {
            base_url: "  ".to_string(),
            enable_otel: false,
        };
        assert_eq!(resolve_base_url(&config, Some(""), Some("  ")), DEFAULT_BASE_URL);
    }
}
