//! Message sending within a session.
//!
//! This module defines the `ConversationController`, which owns each session's
//! `Idle -> Sending -> Idle` state and reconciles optimistic user messages with
//! the service's replies.

pub mod controller;
