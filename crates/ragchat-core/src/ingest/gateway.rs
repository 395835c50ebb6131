//! IngestionGateway -- turns a file or URL into a new, active session.
//!
//! Each ingest issues one request. Only a complete `Session` ever reaches the
//! store, and only after the service confirmed it; failures leave the store
//! untouched. One ingest runs at a time across every entry point (file picker,
//! URL form, drag-and-drop); a concurrent attempt fails fast with
//! [`IngestError::Busy`].

use std::sync::Arc;

use ragchat_types::chat::Session;
use ragchat_types::error::{BackendError, IngestError};
use ragchat_types::rag::{IngestResponse, IngestUrlRequest};
use tracing::{info, warn};

use crate::backend::RagBackend;
use crate::flight::SingleFlight;
use crate::session::store::SessionStore;

pub struct IngestionGateway<B: RagBackend> {
    backend: Arc<B>,
    store: SessionStore,
    in_flight: SingleFlight<()>,
}

impl<B: RagBackend> IngestionGateway<B> {
    pub fn new(backend: Arc<B>, store: SessionStore) -> Self {
        Self {
            backend,
            store,
            in_flight: SingleFlight::new(),
        }
    }

    /// Whether an ingest is currently running (drives the loading indicator).
    pub fn is_busy(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Upload a document and open a session for it.
    pub async fn ingest_file(&self, bytes: Vec<u8>, filename: &str) -> Result<Session, IngestError> {
        let _guard = self.in_flight.try_acquire(()).ok_or(IngestError::Busy)?;
        info!(filename, size = bytes.len(), "Uploading document");

        let response = self.backend.upload_file(bytes, filename).await;
        self.commit(response)
    }

    /// Ingest a web page. A blank `url` is a local no-op (`Ok(None)`).
    ///
    /// A blank `title` lets the service pick the session name.
    pub async fn ingest_url(
        &self,
        url: &str,
        title: Option<&str>,
    ) -> Result<Option<Session>, IngestError> {
        let Some(request) = IngestUrlRequest::from_input(url, title) else {
            return Ok(None);
        };
        let _guard = self.in_flight.try_acquire(()).ok_or(IngestError::Busy)?;
        info!(url = %request.url, "Ingesting URL");

        let response = self.backend.upload_url(&request).await;
        self.commit(response).map(Some)
    }

    /// Build the seeded session, add it to the store, and make it active.
    fn commit(&self, response: Result<IngestResponse, BackendError>) -> Result<Session, IngestError> {
        let response = response.inspect_err(|err| warn!(error = %err, "Ingestion failed"))?;
        if response.session_id.as_str().trim().is_empty() {
            warn!("Ingestion response carried an empty session_id");
            return Err(BackendError::MalformedResponse("empty session_id".to_string()).into());
        }

        let session = Session::seeded(response.session_id, response.filename);
        let seed = session.messages[0].clone();
        let id = self.store.create_session(session.id.clone(), &session.name, seed)?;
        self.store.set_active(Some(&id))?;

        info!(session_id = %id, name = %session.name, "Session ready");
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::state::AppState;
    use crate::testing::MockBackend;
    use ragchat_types::chat::{Sender, SessionId};

    fn setup(backend: MockBackend) -> (IngestionGateway<MockBackend>, SessionStore, Arc<MockBackend>) {
        let store = SessionStore::new();
        let backend = Arc::new(backend);
        (
            IngestionGateway::new(Arc::clone(&backend), store.clone()),
            store,
            backend,
        )
    }

    #[tokio::test]
    async fn test_ingest_file_creates_seeded_active_session() {
        let (gateway, store, backend) = setup(MockBackend::new().push_session("abc", "report.pdf"));

        let session = gateway.ingest_file(b"%PDF".to_vec(), "report.pdf").await.unwrap();

        assert_eq!(session.id, SessionId::from("abc"));
        assert_eq!(session.name, "report.pdf");
        assert_eq!(session.messages.len(), 1);
        assert_eq!(session.messages[0].sender, Sender::Ai);
        assert!(session.messages[0].text.contains("report.pdf"));

        let state = store.snapshot();
        assert_eq!(state.sessions(), &[session]);
        assert_eq!(state.active_id(), Some(&SessionId::from("abc")));
        assert_eq!(backend.uploads(), 1);
        assert_eq!(backend.uploaded.lock().unwrap()[0], ("report.pdf".to_string(), 4));
    }

    #[tokio::test]
    async fn test_failed_ingest_leaves_store_unchanged() {
        let (gateway, store, _backend) = setup(MockBackend::new().push_ingest(Err(
            BackendError::Status {
                status: 500,
                detail: Some("An error occurred: no bucket".to_string()),
            },
        )));

        let err = gateway.ingest_file(vec![1, 2, 3], "a.txt").await.unwrap_err();

        assert_eq!(err.notice(), "Failed to create session: An error occurred: no bucket");
        assert_eq!(store.snapshot(), AppState::default());
        assert!(!gateway.is_busy());
    }

    #[tokio::test]
    async fn test_empty_session_id_is_malformed() {
        let (gateway, store, _backend) = setup(MockBackend::new().push_session("  ", "a.txt"));

        let err = gateway.ingest_file(vec![], "a.txt").await.unwrap_err();

        assert!(matches!(err, IngestError::Backend(BackendError::MalformedResponse(_))));
        assert!(store.snapshot().sessions().is_empty());
    }

    #[tokio::test]
    async fn test_blank_url_issues_no_request() {
        let (gateway, store, backend) = setup(MockBackend::new());

        let result = gateway.ingest_url("   ", Some("ignored")).await.unwrap();

        assert!(result.is_none());
        assert_eq!(backend.uploads(), 0);
        assert!(store.snapshot().sessions().is_empty());
    }

    #[tokio::test]
    async fn test_ingest_url_normalizes_request() {
        let (gateway, store, backend) =
            setup(MockBackend::new().push_session("u1", "Example Domain"));

        let session = gateway
            .ingest_url(" https://example.com ", Some("  "))
            .await
            .unwrap()
            .unwrap();

        let sent = backend.url_requests.lock().unwrap();
        assert_eq!(sent[0].url, "https://example.com");
        assert_eq!(sent[0].title, None);
        assert_eq!(session.name, "Example Domain");
        assert_eq!(store.active_id(), Some(SessionId::from("u1")));
    }

    #[tokio::test]
    async fn test_new_session_becomes_active_and_keeps_order() {
        let (gateway, store, _backend) = setup(
            MockBackend::new()
                .push_session("first", "one.pdf")
                .push_session("second", "two.pdf"),
        );

        gateway.ingest_file(vec![], "one.pdf").await.unwrap();
        gateway.ingest_file(vec![], "two.pdf").await.unwrap();

        let state = store.snapshot();
        let ids: Vec<&str> = state.sessions().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second"]);
        assert_eq!(state.active_id(), Some(&SessionId::from("second")));
    }

    #[tokio::test]
    async fn test_concurrent_ingest_is_rejected_as_busy() {
        let (backend, gate) = MockBackend::gated();
        let (gateway, store, backend) = setup(backend.push_session("only", "a.pdf"));
        let gateway = Arc::new(gateway);

        let first = {
            let gateway = Arc::clone(&gateway);
            tokio::spawn(async move { gateway.ingest_file(vec![], "a.pdf").await })
        };
        while !gateway.is_busy() {
            tokio::task::yield_now().await;
        }

        let second = gateway.ingest_url("https://example.com", None).await;
        assert_eq!(second.unwrap_err(), IngestError::Busy);

        gate.add_permits(1);
        first.await.unwrap().unwrap();
        assert_eq!(backend.uploads(), 1);
        assert_eq!(store.snapshot().sessions().len(), 1);
        assert!(!gateway.is_busy());
    }
}
