//! Client context wiring the chat client to its backend and configuration.
//!
//! `ClientContext` is built once in `main` and handed to every command. It
//! pins the generic `ChatClient` to the HTTP backend.

use std::path::PathBuf;
use std::sync::Arc;

use ragchat_core::client::ChatClient;
use ragchat_infra::config::{BASE_URL_ENV, resolve_base_url};
use ragchat_infra::http::HttpRagBackend;
use ragchat_types::config::ClientConfig;

/// Concrete client type pinned to the HTTP backend.
pub type HttpChatClient = ChatClient<HttpRagBackend>;

/// Everything a command needs to talk to the RAG service.
#[derive(Clone)]
pub struct ClientContext {
    pub client: Arc<HttpChatClient>,
    pub config: ClientConfig,
    pub base_url: String,
    pub data_dir: PathBuf,
}

impl ClientContext {
    /// Resolve the base URL and build the HTTP-backed client.
    pub fn init(
        config: ClientConfig,
        data_dir: PathBuf,
        base_url_flag: Option<&str>,
    ) -> anyhow::Result<Self> {
        let env_url = std::env::var(BASE_URL_ENV).ok();
        let base_url = resolve_base_url(&config, base_url_flag, env_url.as_deref());

        let backend = HttpRagBackend::new(&base_url)?;
        tracing::debug!(base_url = %base_url, data_dir = %data_dir.display(), "Client initialized");

        Ok(Self {
            client: Arc::new(ChatClient::new(backend)),
            config,
            base_url,
            data_dir,
        })
    }
}
