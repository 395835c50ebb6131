//! Shared domain types for RagChat.
//!
//! This crate contains the values every other layer agrees on: chat sessions
//! and their messages, the wire shapes of the RAG service, client configuration,
//! and the error enums surfaced to callers.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod rag;
