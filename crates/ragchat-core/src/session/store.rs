//! SessionStore -- the single owner of the application state value.
//!
//! Every mutation is a pure function of the *latest* state, applied through
//! `watch::Sender::send_if_modified`. Two async completions that race can never
//! overwrite each other, and observers subscribe to whole-value snapshots.

use std::sync::Arc;

use ragchat_types::chat::{Message, Session, SessionId};
use ragchat_types::error::StoreError;
use tokio::sync::watch;
use tracing::debug;

use super::state::AppState;

/// Cheaply cloneable handle to the shared application state.
#[derive(Clone)]
pub struct SessionStore {
    tx: Arc<watch::Sender<AppState>>,
}

impl SessionStore {
    /// Create an empty store: no sessions, nothing active.
    pub fn new() -> Self {
        Self::with_state(AppState::default())
    }

    pub fn with_state(state: AppState) -> Self {
        Self {
            tx: Arc::new(watch::Sender::new(state)),
        }
    }

    /// Clone of the current state value.
    pub fn snapshot(&self) -> AppState {
        self.tx.borrow().clone()
    }

    /// Receive every state value published after this call.
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.tx.subscribe()
    }

    pub fn session(&self, id: &SessionId) -> Option<Session> {
        self.tx.borrow().session(id).cloned()
    }

    pub fn active_session(&self) -> Option<Session> {
        self.tx.borrow().active_session().cloned()
    }

    pub fn active_id(&self) -> Option<SessionId> {
        self.tx.borrow().active_id().cloned()
    }

    /// Append a new session holding `seed` as its only message.
    ///
    /// Does not change the active pointer.
    pub fn create_session(
        &self,
        id: SessionId,
        name: &str,
        seed: Message,
    ) -> Result<SessionId, StoreError> {
        let session = Session::new(id.clone(), name, seed);
        self.apply(|state| state.with_session(session))?;
        debug!(session_id = %id, name, "Session created");
        Ok(id)
    }

    pub fn set_active(&self, id: Option<&SessionId>) -> Result<(), StoreError> {
        self.apply(|state| state.with_active(id))
    }

    /// Rename a session. Blank names are ignored.
    pub fn rename(&self, id: &SessionId, new_name: &str) -> Result<(), StoreError> {
        self.apply(|state| state.renamed(id, new_name))
    }

    /// Remove a session, moving the active pointer if it pointed there.
    /// Returns `false` (and publishes nothing) for an unknown id.
    pub fn delete(&self, id: &SessionId) -> bool {
        let removed = self.tx.send_if_modified(|state| {
            let next = state.without_session(id);
            let changed = next != *state;
            *state = next;
            changed
        });
        if removed {
            debug!(session_id = %id, "Session deleted");
        }
        removed
    }

    /// Append a message to a session's history.
    pub fn append_message(&self, id: &SessionId, message: Message) -> Result<(), StoreError> {
        self.apply(|state| state.with_message(id, message))
    }

    /// Replace the state with `op(latest)`; failed ops publish nothing.
    fn apply(
        &self,
        op: impl FnOnce(&AppState) -> Result<AppState, StoreError>,
    ) -> Result<(), StoreError> {
        let mut result = Ok(());
        self.tx.send_if_modified(|state| match op(state) {
            Ok(next) => {
                let changed = next != *state;
                *state = next;
                changed
            }
            Err(err) => {
                result = Err(err);
                false
            }
        });
        result
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
