use thiserror::Error;

use crate::chat::SessionId;

/// Errors from talking to the remote RAG service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("server returned HTTP {status}{}", detail_suffix(.detail))]
    Status { status: u16, detail: Option<String> },

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(": {d}"))
        .unwrap_or_default()
}

impl BackendError {
    /// Text shown to the user: the server's `detail` when it sent one,
    /// otherwise this error's own description.
    pub fn user_detail(&self) -> String {
        match self {
            BackendError::Status {
                detail: Some(detail),
                ..
            } => detail.clone(),
            other => other.to_string(),
        }
    }
}

/// Errors from session store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("session '{0}' not found")]
    SessionNotFound(SessionId),

    #[error("session '{0}' already exists")]
    DuplicateSession(SessionId),
}

/// Errors from turning a file or URL into a session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("another document is still being ingested")]
    Busy,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IngestError {
    /// The blocking notice shown when ingestion fails.
    pub fn notice(&self) -> String {
        let detail = match self {
            IngestError::Backend(err) => err.user_detail(),
            other => other.to_string(),
        };
        format!("Failed to create session: {detail}")
    }
}
