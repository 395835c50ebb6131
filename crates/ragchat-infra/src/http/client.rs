//! HttpRagBackend -- concrete [`RagBackend`] over the service's JSON/HTTP API.
//!
//! Three endpoints, one request each:
//!
//! | Operation   | Request                                  |
//! |-------------|------------------------------------------|
//! | upload file | `POST /api/upload`, multipart field `file` |
//! | upload url  | `POST /api/upload-url`, JSON `{url, title}` |
//! | chat        | `POST /api/chat`, JSON `{session_id, message}` |
//!
//! Non-success responses are mapped to [`BackendError::Status`], carrying the
//! body's `detail` field when the service sent one. No retries.

use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;

use ragchat_core::backend::RagBackend;
use ragchat_types::error::BackendError;
use ragchat_types::rag::{ChatRequest, ChatResponse, ErrorBody, IngestResponse, IngestUrlRequest};

/// RAG service client bound to one base URL.
#[derive(Debug, Clone)]
pub struct HttpRagBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRagBackend {
    const UPLOAD_PATH: &'static str = "/api/upload";
    const UPLOAD_URL_PATH: &'static str = "/api/upload-url";
    const CHAT_PATH: &'static str = "/api/chat";

    /// Create a backend for `base_url` (trailing slashes are ignored).
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("ragchat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BackendError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a prepared request and decode a success body into `T`.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, BackendError> {
        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Transport(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.detail_text());
            tracing::debug!(status = status.as_u16(), ?detail, "RAG service returned an error");
            return Err(BackendError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| BackendError::Transport(format!("failed to read response body: {e}")))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| BackendError::MalformedResponse(format!("failed to parse response: {e}")))
    }
}

impl RagBackend for HttpRagBackend {
    #[tracing::instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn upload_file(&self, bytes: Vec<u8>, filename: &str) -> Result<IngestResponse, BackendError> {
        let part = Part::bytes(bytes).file_name(filename.to_string());
        let form = Form::new().part("file", part);

        let request = self.client.post(self.url(Self::UPLOAD_PATH)).multipart(form);
        self.execute(request).await
    }

    #[tracing::instrument(skip(self, request), fields(url = %request.url))]
    async fn upload_url(&self, request: &IngestUrlRequest) -> Result<IngestResponse, BackendError> {
        let request = self.client.post(self.url(Self::UPLOAD_URL_PATH)).json(request);
        self.execute(request).await
    }

    #[tracing::instrument(skip(self, request), fields(session_id = %request.session_id))]
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError> {
        let request = self.client.post(self.url(Self::CHAT_PATH)).json(request);
        self.execute(request).await
    }
}
