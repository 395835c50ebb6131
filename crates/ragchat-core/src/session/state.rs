//! The application state value: every session plus the active-session pointer.
//!
//! `AppState` is immutable from the outside. Each operation borrows the current
//! value and returns the next one, so a caller that derives a mutation from the
//! latest value can never lose a concurrent update.

use ragchat_types::chat::{Message, Session, SessionId};
use ragchat_types::error::StoreError;

/// Ordered sessions (unique by id) and the active-session pointer.
///
/// Invariant: `active`, when set, names a session in `sessions`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    sessions: Vec<Session>,
    active: Option<SessionId>,
}

impl AppState {
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn active_id(&self) -> Option<&SessionId> {
        self.active.as_ref()
    }

    pub fn session(&self, id: &SessionId) -> Option<&Session> {
        self.sessions.iter().find(|s| &s.id == id)
    }

    pub fn active_session(&self) -> Option<&Session> {
        self.active.as_ref().and_then(|id| self.session(id))
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.session(id).is_some()
    }

    /// Append a new session at the end of the ordering.
    pub fn with_session(&self, session: Session) -> Result<Self, StoreError> {
        if self.contains(&session.id) {
            return Err(StoreError::DuplicateSession(session.id));
        }
        let mut next = self.clone();
        next.sessions.push(session);
        Ok(next)
    }

    /// Point the active pointer at `id` (or clear it with `None`).
    pub fn with_active(&self, id: Option<&SessionId>) -> Result<Self, StoreError> {
        if let Some(id) = id
            && !self.contains(id)
        {
            return Err(StoreError::SessionNotFound(id.clone()));
        }
        Ok(Self {
            sessions: self.sessions.clone(),
            active: id.cloned(),
        })
    }

    /// Replace the name of one session.
    ///
    /// A blank name leaves the state untouched.
    pub fn renamed(&self, id: &SessionId, new_name: &str) -> Result<Self, StoreError> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Ok(self.clone());
        }
        if !self.contains(id) {
            return Err(StoreError::SessionNotFound(id.clone()));
        }
        let sessions = self
            .sessions
            .iter()
            .map(|s| {
                if &s.id == id {
                    Session {
                        name: new_name.to_string(),
                        ..s.clone()
                    }
                } else {
                    s.clone()
                }
            })
            .collect();
        Ok(Self {
            sessions,
            active: self.active.clone(),
        })
    }

    /// Remove one session.
    ///
    /// Deleting the active session moves the pointer to the first remaining
    /// session, or clears it when none remain.
    pub fn without_session(&self, id: &SessionId) -> Self {
        let sessions: Vec<Session> = self
            .sessions
            .iter()
            .filter(|s| &s.id != id)
            .cloned()
            .collect();
        let active = match &self.active {
            Some(active) if active == id => sessions.first().map(|s| s.id.clone()),
            other => other.clone(),
        };
        Self { sessions, active }
    }

    /// Append one message to a session.
    ///
    /// The timestamp is raised to the previous message's if the clock went
    /// backwards, keeping each session non-decreasing in time.
    pub fn with_message(&self, id: &SessionId, mut message: Message) -> Result<Self, StoreError> {
        if !self.contains(id) {
            return Err(StoreError::SessionNotFound(id.clone()));
        }
        let sessions = self
            .sessions
            .iter()
            .map(|s| {
                if &s.id != id {
                    return s.clone();
                }
                if let Some(last) = s.last_message()
                    && message.timestamp < last.timestamp
                {
                    message.timestamp = last.timestamp;
                }
                let mut messages = s.messages.clone();
                messages.push(message.clone());
                Session {
                    messages,
                    ..s.clone()
                }
            })
            .collect();
        Ok(Self {
            sessions,
            active: self.active.clone(),
        })
    }
}
