//! Main chat loop orchestration.
//!
//! Reads lines, dispatches slash commands and dropped files, and sends
//! everything else to the active session. Replies and uploads settle on
//! spawned tasks and are printed through the readline's `SharedWriter`, so the
//! prompt stays usable (and other sessions reachable) while they are pending.

use std::fmt::Display;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use console::style;
use crossterm::style::Color;
use rustyline_async::SharedWriter;
use tracing::{debug, warn};

use ragchat_core::chat::controller::SendOutcome;
use ragchat_core::ingest::drag_drop::DragDropIngestor;
use ragchat_core::ui::event::{DroppedFile, UiEvent};
use ragchat_core::ui::viewport::{MAX_SIDEBAR_WIDTH, MIN_SIDEBAR_WIDTH, ViewportAdapter};
use ragchat_infra::filesystem::read_upload;
use ragchat_infra::http::HttpRagBackend;
use ragchat_types::chat::SessionId;
use ragchat_types::error::IngestError;

use crate::state::{ClientContext, HttpChatClient};

use super::banner::welcome_banner;
use super::commands::{self, ChatCommand};
use super::drop::{dropped_paths, first_dropped};
use super::input::{ChatInput, InputEvent};
use super::renderer::ChatRenderer;
use super::sidebar::{render_sessions, resolve_session, terminal_width_px};
use super::uploads::{IngestJob, render_ingest_report, run_ingest};

/// What the loop does after handling a command.
enum Flow {
    Continue,
    Clear,
    Exit,
}

/// State owned by one interactive chat.
struct ChatLoop {
    client: Arc<HttpChatClient>,
    renderer: Arc<ChatRenderer>,
    out: SharedWriter,
    viewport: ViewportAdapter,
    drop_zone: DragDropIngestor<HttpRagBackend>,
    /// Active session as of the last line, to notice switches made by uploads.
    last_active: Option<SessionId>,
}

/// Run the interactive chat until `/exit` or Ctrl+D.
pub async fn run_chat_loop(ctx: &ClientContext) -> anyhow::Result<()> {
    let client = Arc::clone(&ctx.client);
    let (mut input, out) = ChatInput::new(prompt(&client))
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    let mut viewport = ViewportAdapter::new();
    viewport.activate(terminal_width_px());

    let mut chat = ChatLoop {
        drop_zone: client.drop_zone(),
        last_active: client.store().active_id(),
        renderer: Arc::new(ChatRenderer::new(Some(Color::Cyan))),
        client,
        out,
        viewport,
    };
    chat.say(welcome_banner(&ctx.base_url));

    loop {
        match input.read_line().await {
            InputEvent::Eof => {
                chat.say(format!("\n  {}", style("Chat ended.").dim()));
                break;
            }
            InputEvent::Interrupted => {
                chat.say(format!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim()));
                continue;
            }
            InputEvent::Line(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                if let Some(cmd) = commands::parse(&line) {
                    match chat.handle_command(cmd) {
                        Flow::Continue => {}
                        Flow::Clear => input.clear(),
                        Flow::Exit => {
                            chat.say(format!("\n  {}", style("Chat ended.").dim()));
                            break;
                        }
                    }
                } else if let Some(paths) = dropped_paths(&line) {
                    chat.handle_drop(paths).await;
                } else {
                    chat.send(line);
                }
            }
        }
        chat.follow_active_session();
        input.update_prompt(&prompt(&chat.client));
    }

    chat.drop_zone.deactivate();
    chat.viewport.deactivate();
    input.flush();
    Ok(())
}

fn prompt(client: &HttpChatClient) -> String {
    let active = client.store().active_session();
    prompt_text(active.as_ref().map(|s| s.name.as_str()), client.gateway().is_busy())
}

/// Prompt naming the active session, flagged while an upload is running.
fn prompt_text(session_name: Option<&str>, uploading: bool) -> String {
    let label = style(format!("{} >", session_name.unwrap_or("ragchat"))).green().bold();
    if uploading {
        format!("  {} {label} ", style("[uploading…]").yellow())
    } else {
        format!("  {label} ")
    }
}

impl ChatLoop {
    fn say(&mut self, text: impl Display) {
        let _ = writeln!(self.out, "{text}");
    }

    fn warn_user(&mut self, text: impl Display) {
        self.say(format!("\n  {} {text}\n", style("!").red().bold()));
    }

    fn handle_command(&mut self, cmd: ChatCommand) -> Flow {
        match cmd {
            ChatCommand::Help => self.say(commands::help_text()),
            ChatCommand::Clear => return Flow::Clear,
            ChatCommand::Exit => return Flow::Exit,
            ChatCommand::Upload(path) => self.start_ingest(IngestJob::File(PathBuf::from(path))),
            ChatCommand::Url { url, title } => self.start_ingest(IngestJob::Url { url, title }),
            ChatCommand::Sessions => self.list_sessions(),
            ChatCommand::Switch(arg) => self.switch(&arg),
            ChatCommand::Rename(name) => self.rename(&name),
            ChatCommand::Delete => self.delete(),
            ChatCommand::History => self.history(),
            ChatCommand::Sidebar(px) => self.resize_sidebar(px),
            ChatCommand::Usage(usage) => {
                self.say(format!("\n  {} Usage: {}\n", style("?").yellow().bold(), style(usage).cyan()))
            }
            ChatCommand::Unknown(name) => self.say(format!(
                "\n  {} Unknown command: {}. Type /help for available commands.\n",
                style("?").yellow().bold(),
                style(name).dim()
            )),
        }
        Flow::Continue
    }

    /// Send `text` to the active session and settle the reply in the background.
    fn send(&mut self, text: String) {
        let Some(session) = self.client.store().active_session() else {
            self.say(format!(
                "\n  {} No active session. Start one with {} or {}\n",
                style("i").blue().bold(),
                style("/upload <path>").yellow(),
                style("/url <url>").yellow()
            ));
            return;
        };

        let pending = match self.client.conversation().begin_send(&session.id, &text) {
            Ok(Some(pending)) => pending,
            Ok(None) => {
                if self.client.conversation().is_sending(&session.id) {
                    self.say(format!(
                        "  {}",
                        style("Still waiting for the previous answer in this session.").dim()
                    ));
                }
                return;
            }
            Err(e) => {
                self.warn_user(e);
                return;
            }
        };

        if self.viewport.is_mobile() {
            self.viewport.close_sidebar();
        }
        self.say(format!("  {}", style(format!("{} is typing…", session.name)).dim()));

        let mut out = self.out.clone();
        let renderer = Arc::clone(&self.renderer);
        let store = self.client.store().clone();
        tokio::spawn(async move {
            let settled = pending.settle().await;
            if settled.outcome == SendOutcome::Discarded {
                return;
            }
            let name = store
                .session(&settled.session_id)
                .map(|s| s.name)
                .unwrap_or(session.name);
            let _ = writeln!(out, "\n{}\n", renderer.render_message(&settled.reply, &name));
        });
    }

    /// Run an ingest job in the background and print its outcome when done.
    fn start_ingest(&mut self, job: IngestJob<HttpRagBackend>) {
        if self.client.gateway().is_busy() {
            self.warn_user(IngestError::Busy.notice());
            return;
        }
        self.say(format!("  {}", style(job.describe()).dim()));

        let gateway = Arc::clone(self.client.gateway());
        let renderer = Arc::clone(&self.renderer);
        let mut out = self.out.clone();
        tokio::spawn(async move {
            let result = run_ingest(&gateway, job).await;
            let _ = write!(out, "{}", render_ingest_report(&result, &renderer));
        });
    }

    /// Dispatch a terminal drop through the drop zone: drag-over, then drop of
    /// the first path. The rest are ignored.
    async fn handle_drop(&mut self, paths: Vec<PathBuf>) {
        debug!(count = paths.len(), "Files dropped onto the prompt");
        self.drop_zone.begin(UiEvent::DragOver);

        let Some((path, ignored)) = first_dropped(paths) else {
            self.drop_zone.begin(UiEvent::DragLeave);
            return;
        };
        if self.client.gateway().is_busy() {
            self.drop_zone.begin(UiEvent::DragLeave);
            self.warn_user(IngestError::Busy.notice());
            return;
        }
        let upload = match read_upload(&path).await {
            Ok(upload) => upload,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Dropped file is unreadable");
                self.drop_zone.begin(UiEvent::DragLeave);
                self.warn_user(format!("Cannot read {}: {e}", path.display()));
                return;
            }
        };
        if ignored > 0 {
            self.say(format!(
                "  {}",
                style(format!("Only the first dropped file is uploaded; {ignored} more ignored.")).dim()
            ));
        }

        let files = vec![DroppedFile::new(upload.filename, upload.bytes)];
        if let Some(pending) = self.drop_zone.begin(UiEvent::Drop { files }) {
            self.start_ingest(IngestJob::Drop(pending));
        }
    }

    /// Close the mobile overlay when the active session changed behind the
    /// loop's back, e.g. a finished upload opened a new one.
    fn follow_active_session(&mut self) {
        let active = self.client.store().active_id();
        if active != self.last_active {
            if active.is_some() {
                self.viewport.on_session_selected();
            }
            self.last_active = active;
        }
    }

    fn list_sessions(&mut self) {
        self.viewport.handle(&UiEvent::ViewportResized {
            width: terminal_width_px(),
        });
        if self.viewport.is_mobile() {
            self.viewport.open_sidebar();
        }
        let state = self.client.store().snapshot();
        let conversation = self.client.conversation();
        let listing = render_sessions(&state, &self.viewport, |id| conversation.is_sending(id));
        self.say(listing);
        if self.client.gateway().is_busy() {
            self.say(format!("  {}\n", style("Uploading a document…").yellow()));
        }
    }

    fn switch(&mut self, arg: &str) {
        let state = self.client.store().snapshot();
        let Some(id) = resolve_session(&state, arg) else {
            self.warn_user(format!("No session matches '{arg}'. See /sessions."));
            return;
        };
        if let Err(e) = self.client.select_session(&id) {
            self.warn_user(e);
            return;
        }
        self.viewport.on_session_selected();

        if let Some(session) = self.client.store().session(&id) {
            self.say(format!("\n  Switched to {}", style(&session.name).cyan().bold()));
            if let Some(last) = session.last_message() {
                let rendered = self.renderer.render_message(last, &session.name);
                self.say(format!("{rendered}\n"));
            }
        }
    }

    fn rename(&mut self, name: &str) {
        let Some(id) = self.client.store().active_id() else {
            self.warn_user("No active session to rename.");
            return;
        };
        match self.client.store().rename(&id, name) {
            Ok(()) => {
                let renamed = self.client.store().session(&id).map(|s| s.name).unwrap_or_default();
                self.say(format!("\n  {} Renamed to {}\n", style("✓").green().bold(), style(renamed).cyan()));
            }
            Err(e) => self.warn_user(e),
        }
    }

    fn delete(&mut self) {
        let Some(session) = self.client.store().active_session() else {
            self.warn_user("No active session to delete.");
            return;
        };
        self.client.store().delete(&session.id);
        self.say(format!("\n  {} Deleted {}", style("✓").green().bold(), style(&session.name).bold()));
        match self.client.store().active_session() {
            Some(next) => self.say(format!("  Now in {}\n", style(next.name).cyan())),
            None => self.say(format!("  {}\n", style("No sessions left.").dim())),
        }
    }

    fn history(&mut self) {
        let Some(session) = self.client.store().active_session() else {
            self.warn_user("No active session.");
            return;
        };
        self.say("");
        for message in &session.messages {
            let rendered = self.renderer.render_message(message, &session.name);
            self.say(format!("{rendered}\n"));
        }
        if self.client.conversation().is_sending(&session.id) {
            self.say(format!("  {}", style(format!("{} is typing…", session.name)).dim()));
        }
    }

    /// Drive the resize handle: press, move to `px`, release.
    fn resize_sidebar(&mut self, px: i32) {
        self.viewport.handle(&UiEvent::ViewportResized {
            width: terminal_width_px(),
        });
        if self.viewport.is_mobile() {
            self.warn_user("The sidebar can't be resized in the narrow layout.");
            return;
        }

        let before = self.viewport.sidebar_width();
        self.viewport.handle(&UiEvent::ResizeHandlePressed);
        self.viewport.handle(&UiEvent::PointerMoved { x: px });
        self.viewport.handle(&UiEvent::PointerReleased);
        let after = self.viewport.sidebar_width();

        if after == before && u32::try_from(px).map_or(true, |w| w != before) {
            self.say(format!(
                "\n  {} Sidebar width stays {before}px (allowed {MIN_SIDEBAR_WIDTH}-{MAX_SIDEBAR_WIDTH})\n",
                style("i").blue().bold()
            ));
        } else {
            self.say(format!("\n  {} Sidebar width {after}px\n", style("✓").green().bold()));
        }
    }
}
