//! Slash command parsing and help for the chat loop.
//!
//! Commands start with `/` and manage sessions, ingestion, and the sidebar
//! from inside the chat.

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Clear the terminal screen.
    Clear,
    /// Exit the chat.
    Exit,
    /// Upload a document from disk.
    Upload(String),
    /// Ingest a web page, optionally naming the session.
    Url { url: String, title: Option<String> },
    /// List sessions.
    Sessions,
    /// Make a session active, by list position (1-based) or id.
    Switch(String),
    /// Rename the active session.
    Rename(String),
    /// Delete the active session.
    Delete,
    /// Show the active session's messages.
    History,
    /// Resize the sidebar to the given width in pixels.
    Sidebar(i32),
    /// Known command with missing or invalid arguments.
    Usage(&'static str),
    /// Unknown command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let (cmd, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd.to_lowercase(), rest.trim()),
        None => (trimmed.to_lowercase(), ""),
    };

    let command = match cmd.as_str() {
        "/help" | "/h" | "/?" => ChatCommand::Help,
        "/clear" | "/cls" => ChatCommand::Clear,
        "/exit" | "/quit" | "/q" => ChatCommand::Exit,
        "/upload" | "/up" => required(arg, "/upload <path>", |a| ChatCommand::Upload(unquote(a))),
        "/url" => required(arg, "/url <url> [title]", |a| {
            let (url, title) = match a.split_once(char::is_whitespace) {
                Some((url, title)) => (url, Some(title.trim().to_string())),
                None => (a, None),
            };
            ChatCommand::Url {
                url: url.to_string(),
                title,
            }
        }),
        "/sessions" | "/ls" => ChatCommand::Sessions,
        "/switch" | "/sw" => required(arg, "/switch <n|id>", |a| ChatCommand::Switch(a.to_string())),
        "/rename" => required(arg, "/rename <name>", |a| ChatCommand::Rename(a.to_string())),
        "/delete" | "/rm" => ChatCommand::Delete,
        "/history" => ChatCommand::History,
        "/sidebar" => match arg.parse::<i32>() {
            Ok(px) => ChatCommand::Sidebar(px),
            Err(_) => ChatCommand::Usage("/sidebar <px>"),
        },
        other => ChatCommand::Unknown(other.to_string()),
    };
    Some(command)
}

fn required(arg: &str, usage: &'static str, build: impl FnOnce(&str) -> ChatCommand) -> ChatCommand {
    if arg.is_empty() {
        ChatCommand::Usage(usage)
    } else {
        build(arg)
    }
}

/// Strip one pair of surrounding quotes, as shells add around paths with spaces.
fn unquote(arg: &str) -> String {
    for quote in ['"', '\''] {
        if let Some(inner) = arg
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner.to_string();
        }
    }
    arg.to_string()
}

/// Help text listing all available commands.
pub fn help_text() -> String {
    let rows = [
        ("/help", "Show this help message"),
        ("/clear", "Clear the screen"),
        ("/exit", "End the chat"),
        ("/upload <path>", "Upload a document and open a session for it"),
        ("/url <url> [title]", "Ingest a web page"),
        ("/sessions", "List sessions"),
        ("/switch <n|id>", "Switch to another session"),
        ("/rename <name>", "Rename the active session"),
        ("/delete", "Delete the active session"),
        ("/history", "Show the active session's messages"),
        ("/sidebar <px>", "Resize the session sidebar (250-500)"),
    ];

    let mut out = String::new();
    out.push('\n');
    out.push_str(&format!("  {}\n\n", style("Available commands:").bold()));
    for (cmd, help) in rows {
        out.push_str(&format!("  {} {}\n", style(format!("{cmd:<20}")).cyan(), help));
    }
    out.push('\n');
    out.push_str(&format!(
        "  {}\n",
        style("Paste or drag a file path to upload it. Ctrl+D to exit.").dim()
    ));
    out
}
