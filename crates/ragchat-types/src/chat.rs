//! Chat session and message types for RagChat.
//!
//! A session is a conversation bound to one ingested document or URL.
//! Messages inside it are append-only and ordered by insertion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Greeting seeded into every freshly ingested session.
pub const GREETING_TEMPLATE: &str = "Hi! I'm ready to answer questions about {name}.";

/// AI text appended when a chat request fails to produce an answer.
pub const APOLOGY_TEXT: &str =
    "I apologize, but I couldn't process your request. Please try again.";

/// Number of characters shown in a session preview.
pub const PREVIEW_CHARS: usize = 50;

/// Opaque session identifier assigned by the ingestion service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Ai => write!(f, "ai"),
        }
    }
}

impl FromStr for Sender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Sender::User),
            "ai" => Ok(Sender::Ai),
            other => Err(format!("invalid sender: '{other}'")),
        }
    }
}

/// A single turn within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// A message typed by the user, stamped now.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// A message produced by the answering service, stamped now.
    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Ai,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// The fixed apology shown in place of an answer.
    pub fn apology() -> Self {
        Self::ai(APOLOGY_TEXT)
    }

    /// The greeting that opens a session about `name`.
    pub fn greeting(name: &str) -> Self {
        Self::ai(GREETING_TEMPLATE.replace("{name}", name))
    }
}

/// A conversation bound to one ingested document or URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub name: String,
    pub messages: Vec<Message>,
}

impl Session {
    /// Build a session holding exactly one seed message.
    pub fn new(id: SessionId, name: impl Into<String>, seed: Message) -> Self {
        Self {
            id,
            name: name.into(),
            messages: vec![seed],
        }
    }

    /// Build a freshly ingested session, seeded with the greeting for `name`.
    pub fn seeded(id: SessionId, name: impl Into<String>) -> Self {
        let name = name.into();
        let greeting = Message::greeting(&name);
        Self::new(id, name, greeting)
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Leading characters of the last message, for session listings.
    pub fn preview(&self) -> String {
        self.last_message()
            .map(|m| m.text.chars().take(PREVIEW_CHARS).collect())
            .unwrap_or_default()
    }
}
