//! DragDropIngestor -- page-wide drop zone feeding the ingestion gateway.

use std::sync::Arc;

use ragchat_types::chat::Session;
use ragchat_types::error::IngestError;
use tracing::{debug, info};

use crate::backend::RagBackend;
use crate::ui::event::{DroppedFile, UiEvent};
use crate::ui::listeners::{Listener, ListenerRegistry};

use super::gateway::IngestionGateway;

pub struct DragDropIngestor<B: RagBackend> {
    gateway: Arc<IngestionGateway<B>>,
    dragging: bool,
    listeners: ListenerRegistry,
}

impl<B: RagBackend> DragDropIngestor<B> {
    pub fn new(gateway: Arc<IngestionGateway<B>>) -> Self {
        Self {
            gateway,
            dragging: false,
            listeners: ListenerRegistry::new(),
        }
    }

    pub fn activate(&mut self) {
        self.listeners.install(Listener::DragOver);
        self.listeners.install(Listener::DragLeave);
        self.listeners.install(Listener::Drop);
    }

    pub fn deactivate(&mut self) {
        self.listeners.teardown_all();
        self.dragging = false;
    }

    /// Whether something is currently being dragged over the page.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    /// React to a drag gesture. A drop ingests the first file and returns the
    /// new session; every other event returns `Ok(None)`.
    pub async fn handle(&mut self, event: UiEvent) -> Result<Option<Session>, IngestError> {
        match self.begin(event) {
            Some(pending) => pending.settle().await.map(Some),
            None => Ok(None),
        }
    }

    /// Synchronous half of [`handle`](Self::handle): update the dragging flag
    /// and, for a drop carrying files, hand back the upload of the first one.
    ///
    /// The returned [`PendingDrop`] borrows nothing from the ingestor, so the
    /// caller can settle it on a spawned task and keep dispatching events.
    pub fn begin(&mut self, event: UiEvent) -> Option<PendingDrop<B>> {
        match event {
            UiEvent::DragOver if self.listeners.is_installed(Listener::DragOver) => {
                self.dragging = true;
                None
            }
            UiEvent::DragLeave if self.listeners.is_installed(Listener::DragLeave) => {
                self.dragging = false;
                None
            }
            UiEvent::Drop { files } if self.listeners.is_installed(Listener::Drop) => {
                self.dragging = false;
                let dropped = files.len();
                let Some(file) = files.into_iter().next() else {
                    debug!("Drop carried no files");
                    return None;
                };
                if dropped > 1 {
                    info!(dropped, kept = %file.name, "Only the first dropped file is ingested");
                }
                Some(PendingDrop {
                    gateway: Arc::clone(&self.gateway),
                    file,
                })
            }
            _ => None,
        }
    }
}

/// A dropped file waiting to be uploaded.
pub struct PendingDrop<B: RagBackend> {
    gateway: Arc<IngestionGateway<B>>,
    file: DroppedFile,
}

impl<B: RagBackend> PendingDrop<B> {
    pub fn file_name(&self) -> &str {
        &self.file.name
    }

    pub async fn settle(self) -> Result<Session, IngestError> {
        self.gateway.ingest_file(self.file.bytes, &self.file.name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::store::SessionStore;
    use crate::testing::MockBackend;

    fn ingestor(backend: MockBackend) -> (DragDropIngestor<MockBackend>, SessionStore, Arc<MockBackend>) {
        let store = SessionStore::new();
        let backend = Arc::new(backend);
        let gateway = Arc::new(IngestionGateway::new(Arc::clone(&backend), store.clone()));
        let mut ingestor = DragDropIngestor::new(gateway);
        ingestor.activate();
        (ingestor, store, backend)
    }

    #[tokio::test]
    async fn test_dragging_flag_follows_gesture() {
        let (mut ingestor, _store, _backend) = ingestor(MockBackend::new());

        ingestor.handle(UiEvent::DragOver).await.unwrap();
        assert!(ingestor.is_dragging());
        ingestor.handle(UiEvent::DragLeave).await.unwrap();
        assert!(!ingestor.is_dragging());
    }

    #[tokio::test]
    async fn test_drop_ingests_only_first_file() {
        let (mut ingestor, store, backend) =
            ingestor(MockBackend::new().push_session("d1", "first.pdf"));

        ingestor.handle(UiEvent::DragOver).await.unwrap();
        let session = ingestor
            .handle(UiEvent::Drop {
                files: vec![
                    DroppedFile::new("first.pdf", vec![1, 2]),
                    DroppedFile::new("second.pdf", vec![3]),
                ],
            })
            .await
            .unwrap()
            .unwrap();

        assert!(!ingestor.is_dragging());
        assert_eq!(session.name, "first.pdf");
        assert_eq!(backend.uploads(), 1);
        assert_eq!(backend.uploaded.lock().unwrap()[0].0, "first.pdf");
        assert_eq!(store.snapshot().sessions().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_drop_clears_flag_and_reports() {
        let (mut ingestor, store, _backend) = ingestor(MockBackend::new());

        ingestor.handle(UiEvent::DragOver).await.unwrap();
        let err = ingestor
            .handle(UiEvent::Drop {
                files: vec![DroppedFile::new("a.txt", vec![])],
            })
            .await
            .unwrap_err();

        assert!(err.notice().starts_with("Failed to create session: "));
        assert!(!ingestor.is_dragging());
        assert!(store.snapshot().sessions().is_empty());
    }

    #[tokio::test]
    async fn test_empty_drop_is_noop() {
        let (mut ingestor, _store, backend) = ingestor(MockBackend::new());
        let result = ingestor.handle(UiEvent::Drop { files: vec![] }).await.unwrap();
        assert!(result.is_none());
        assert_eq!(backend.uploads(), 0);
    }

    #[tokio::test]
    async fn test_inactive_ingestor_ignores_events() {
        let (mut ingestor, _store, backend) =
            ingestor(MockBackend::new().push_session("x", "x.pdf"));
        ingestor.deactivate();
        assert!(ingestor.listeners().is_empty());

        ingestor.handle(UiEvent::DragOver).await.unwrap();
        assert!(!ingestor.is_dragging());
        let result = ingestor
            .handle(UiEvent::Drop {
                files: vec![DroppedFile::new("x.pdf", vec![])],
            })
            .await
            .unwrap();
        assert!(result.is_none());
        assert_eq!(backend.uploads(), 0);
    }

    #[tokio::test]
    async fn test_pending_drop_settles_after_ingestor_moves_on() {
        let (backend, gate) = MockBackend::gated();
        let (mut ingestor, store, backend) = ingestor(backend.push_session("d2", "late.pdf"));

        ingestor.begin(UiEvent::DragOver);
        let pending = ingestor
            .begin(UiEvent::Drop {
                files: vec![DroppedFile::new("late.pdf", vec![7])],
            })
            .unwrap();
        assert_eq!(pending.file_name(), "late.pdf");
        assert!(!ingestor.is_dragging());

        let task = tokio::spawn(pending.settle());

        // The ingestor keeps reacting while the upload is parked.
        ingestor.begin(UiEvent::DragOver);
        assert!(ingestor.is_dragging());
        ingestor.begin(UiEvent::DragLeave);
        assert!(store.snapshot().sessions().is_empty());

        gate.add_permits(1);
        let session = task.await.unwrap().unwrap();
        assert_eq!(session.name, "late.pdf");
        assert_eq!(backend.uploads(), 1);
        assert_eq!(store.active_id(), Some(session.id));
    }
}
