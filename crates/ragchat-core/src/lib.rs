//! Session state, ingestion, and conversation logic for RagChat.
//!
//! This crate defines the `RagBackend` port that the infrastructure layer
//! implements. It depends only on `ragchat-types` -- never on `ragchat-infra`
//! or any HTTP or filesystem crate.

pub mod backend;
pub mod chat;
pub mod client;
pub mod flight;
pub mod ingest;
pub mod session;
pub mod ui;

#[cfg(test)]
pub(crate) mod testing;
