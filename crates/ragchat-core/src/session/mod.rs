//! Authoritative in-memory session collection.
//!
//! `state` holds the pure `AppState` value and its transformations;
//! `store` owns the shared value and applies those transformations.

pub mod state;
pub mod store;
