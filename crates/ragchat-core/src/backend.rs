//! RagBackend trait definition.
//!
//! The port through which the core reaches the remote RAG service.
//! Uses RPITIT so implementations stay zero-cost and the core never
//! depends on an HTTP crate.

use ragchat_types::error::BackendError;
use ragchat_types::rag::{ChatRequest, ChatResponse, IngestResponse, IngestUrlRequest};

/// Remote ingestion + answering service.
///
/// Every method issues exactly one outbound request.
/// Implementations live in ragchat-infra (e.g., `HttpRagBackend`).
pub trait RagBackend: Send + Sync + 'static {
    /// Upload a document; the service creates a session for it.
    fn upload_file(
        &self,
        bytes: Vec<u8>,
        filename: &str,
    ) -> impl std::future::Future<Output = Result<IngestResponse, BackendError>> + Send;

    /// Ask the service to fetch and ingest a URL.
    fn upload_url(
        &self,
        request: &IngestUrlRequest,
    ) -> impl std::future::Future<Output = Result<IngestResponse, BackendError>> + Send;

    /// Ask a question within a session.
    fn chat(
        &self,
        request: &ChatRequest,
    ) -> impl std::future::Future<Output = Result<ChatResponse, BackendError>> + Send;
}
