//! Presentation-side state that is independent of sessions: layout mode,
//! sidebar geometry, and the listeners components hold while mounted.

pub mod event;
pub mod listeners;
pub mod viewport;
