//! Request/response shapes of the remote RAG service.
//!
//! These mirror the three HTTP endpoints the client talks to:
//! `/api/upload`, `/api/upload-url`, and `/api/chat`.

use serde::{Deserialize, Serialize};

use crate::chat::SessionId;

/// Successful response of both ingestion endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestResponse {
    pub session_id: SessionId,
    pub filename: String,
}

/// Body of `POST /api/upload-url`.
///
/// `title` serializes as `null` when absent so the server assigns a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestUrlRequest {
    pub url: String,
    pub title: Option<String>,
}

impl IngestUrlRequest {
    /// Normalize user input: trims both fields and drops a blank title.
    ///
    /// Returns `None` when the url is blank.
    pub fn from_input(url: &str, title: Option<&str>) -> Option<Self> {
        let url = url.trim();
        if url.is_empty() {
            return None;
        }
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        Some(Self {
            url: url.to_string(),
            title,
        })
    }
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub session_id: SessionId,
    pub message: String,
}

/// Response of `POST /api/chat`.
///
/// The service may answer with several entries; only the first is used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub answers: Option<Vec<String>>,
}

impl ChatResponse {
    /// The first answer, if the list is present and non-empty.
    pub fn into_first_answer(self) -> Option<String> {
        self.answers.and_then(|answers| answers.into_iter().next())
    }
}

/// Error body returned by the service on failure.
///
/// `detail` is usually a string; validation errors carry structured JSON instead.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Render `detail` for display, if present and non-empty.
    pub fn detail_text(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) if s.trim().is_empty() => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}
