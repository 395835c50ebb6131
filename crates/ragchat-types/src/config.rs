//! Client configuration types for RagChat.
//!
//! `ClientConfig` represents the `config.toml` that points the client at a
//! RAG service and toggles trace export.

use serde::{Deserialize, Serialize};

/// Base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Top-level configuration for the RagChat client.
///
/// Loaded from `~/.ragchat/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the RAG service (scheme + host, no trailing slash needed).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[serde(default)]
    pub enable_otel: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            enable_otel: false,
        }
    }
}
