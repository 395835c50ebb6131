//! Turning documents and URLs into sessions.
//!
//! `IngestionGateway` talks to the service; `DragDropIngestor` adapts drop
//! gestures onto it.

pub mod drag_drop;
pub mod gateway;
