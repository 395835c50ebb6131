//! ChatClient -- the explicit application object.
//!
//! Owns the one `SessionStore` and wires the ingestion gateway and the
//! conversation controller to it and to a single backend. Presentation code
//! receives this object instead of reaching for globals.

use std::sync::Arc;

use ragchat_types::chat::SessionId;
use ragchat_types::error::StoreError;
use tracing::debug;

use crate::backend::RagBackend;
use crate::chat::controller::ConversationController;
use crate::ingest::drag_drop::DragDropIngestor;
use crate::ingest::gateway::IngestionGateway;
use crate::session::store::SessionStore;

pub struct ChatClient<B: RagBackend> {
    backend: Arc<B>,
    store: SessionStore,
    gateway: Arc<IngestionGateway<B>>,
    conversation: ConversationController<B>,
}

impl<B: RagBackend> ChatClient<B> {
    pub fn new(backend: B) -> Self {
        Self::with_store(Arc::new(backend), SessionStore::new())
    }

    pub fn with_store(backend: Arc<B>, store: SessionStore) -> Self {
        let gateway = Arc::new(IngestionGateway::new(Arc::clone(&backend), store.clone()));
        let conversation = ConversationController::new(Arc::clone(&backend), store.clone());
        Self {
            backend,
            store,
            gateway,
            conversation,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn gateway(&self) -> &Arc<IngestionGateway<B>> {
        &self.gateway
    }

    pub fn conversation(&self) -> &ConversationController<B> {
        &self.conversation
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// A drop zone bound to this client's gateway, already listening.
    pub fn drop_zone(&self) -> DragDropIngestor<B> {
        let mut ingestor = DragDropIngestor::new(Arc::clone(&self.gateway));
        ingestor.activate();
        ingestor
    }

    /// Make `id` the active session.
    pub fn select_session(&self, id: &SessionId) -> Result<(), StoreError> {
        self.store.set_active(Some(id))?;
        debug!(session_id = %id, "Session selected");
        Ok(())
    }
}
