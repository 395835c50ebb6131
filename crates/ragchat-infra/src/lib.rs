//! Infrastructure layer for RagChat.
//!
//! Contains the HTTP implementation of the `RagBackend` port defined in
//! `ragchat-core`, plus configuration loading and filesystem helpers.

pub mod config;
pub mod filesystem;
pub mod http;
