//! Interactive terminal chat for RagChat.
//!
//! Sessions are listed like a sidebar, answers render as markdown, and files
//! dragged onto the terminal are uploaded. Entry point:
//! `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod drop;
pub mod input;
pub mod loop_runner;
pub mod renderer;
pub mod sidebar;
pub mod uploads;
