//! ConversationController -- the per-session `Idle -> Sending -> Idle` machine.
//!
//! Sending is a two-phase protocol:
//!
//! 1. [`ConversationController::begin_send`] runs synchronously. It validates
//!    the input, claims the session's single-flight slot (`Sending`), and
//!    appends the user's message to the store right away.
//! 2. [`PendingSend::settle`] issues the chat request and appends exactly one
//!    AI message: the first answer on success, the apology otherwise.
//!
//! The user's message is never retracted. The slot is released when the
//! `PendingSend` is consumed or dropped, so `Idle` is reached on every path.

use std::sync::Arc;

use ragchat_types::chat::{Message, SessionId};
use ragchat_types::error::{BackendError, StoreError};
use ragchat_types::rag::ChatRequest;
use tracing::{debug, warn};

use crate::backend::RagBackend;
use crate::flight::{InFlightGuard, SingleFlight};
use crate::session::store::SessionStore;

/// How a send attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank text, or the session was already `Sending`. Nothing changed.
    Ignored,
    /// The first answer was appended.
    Answered,
    /// The request failed; the apology was appended.
    Apologized,
    /// The session was deleted before the reply arrived; the reply was dropped.
    Discarded,
}

/// Result of the asynchronous settlement phase.
#[derive(Debug, Clone)]
pub struct Settled {
    pub session_id: SessionId,
    pub outcome: SendOutcome,
    pub reply: Message,
}

/// Drives message sends for every session against one backend.
pub struct ConversationController<B: RagBackend> {
    backend: Arc<B>,
    store: SessionStore,
    sending: SingleFlight<SessionId>,
}

impl<B: RagBackend> ConversationController<B> {
    pub fn new(backend: Arc<B>, store: SessionStore) -> Self {
        Self {
            backend,
            store,
            sending: SingleFlight::new(),
        }
    }

    /// Whether a reply is pending for this session.
    pub fn is_sending(&self, session_id: &SessionId) -> bool {
        self.sending.is_in_flight(session_id)
    }

    /// Phase 1: validate, enter `Sending`, and append the user's message.
    ///
    /// Returns `Ok(None)` for the silent no-op cases (blank text, already
    /// sending). Fails only when the session does not exist.
    pub fn begin_send(
        &self,
        session_id: &SessionId,
        text: &str,
    ) -> Result<Option<PendingSend<B>>, StoreError> {
        if text.trim().is_empty() {
            debug!(session_id = %session_id, "Ignoring blank message");
            return Ok(None);
        }

        let Some(guard) = self.sending.try_acquire(session_id.clone()) else {
            debug!(session_id = %session_id, "Send already in flight, ignoring");
            return Ok(None);
        };

        // On error the guard drops here and the session is back to Idle.
        self.store.append_message(session_id, Message::user(text))?;

        Ok(Some(PendingSend {
            backend: Arc::clone(&self.backend),
            store: self.store.clone(),
            request: ChatRequest {
                session_id: session_id.clone(),
                message: text.to_string(),
            },
            _guard: guard,
        }))
    }

    /// Both phases back to back.
    pub async fn send_message(
        &self,
        session_id: &SessionId,
        text: &str,
    ) -> Result<SendOutcome, StoreError> {
        match self.begin_send(session_id, text)? {
            Some(pending) => Ok(pending.settle().await.outcome),
            None => Ok(SendOutcome::Ignored),
        }
    }
}

/// A send whose user message is already recorded and whose reply is owed.
///
/// Holds the session's `Sending` slot until settled or dropped.
pub struct PendingSend<B: RagBackend> {
    backend: Arc<B>,
    store: SessionStore,
    request: ChatRequest,
    _guard: InFlightGuard<SessionId>,
}

impl<B: RagBackend> PendingSend<B> {
    pub fn session_id(&self) -> &SessionId {
        &self.request.session_id
    }

    /// Phase 2: call the service and append the converging or compensating reply.
    pub async fn settle(self) -> Settled {
        let session_id = self.request.session_id.clone();

        let answer = match self.backend.chat(&self.request).await {
            Ok(response) => response.into_first_answer().ok_or_else(|| {
                BackendError::MalformedResponse("no valid answer in response".to_string())
            }),
            Err(err) => Err(err),
        };

        let (reply, mut outcome) = match answer {
            Ok(text) => (Message::ai(text), SendOutcome::Answered),
            Err(err) => {
                warn!(session_id = %session_id, error = %err, "Chat request failed");
                (Message::apology(), SendOutcome::Apologized)
            }
        };

        if let Err(err) = self.store.append_message(&session_id, reply.clone()) {
            warn!(session_id = %session_id, error = %err, "Dropping reply for removed session");
            outcome = SendOutcome::Discarded;
        }

        Settled {
            session_id,
            outcome,
            reply,
        }
    }
}
