//! HTTP adapter for the remote RAG service.

pub mod client;

pub use client::HttpRagBackend;
