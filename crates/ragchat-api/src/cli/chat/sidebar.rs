//! Session listing, laid out like the sidebar for the current viewport.
//!
//! Desktop: a table as wide as the sidebar, with previews. Mobile: the
//! overlay shows names only.

use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use ragchat_core::session::state::AppState;
use ragchat_core::ui::viewport::ViewportAdapter;
use ragchat_types::chat::SessionId;

/// Logical pixels per terminal column.
pub const PX_PER_COLUMN: u32 = 8;

/// Current terminal width in logical pixels.
pub fn terminal_width_px() -> u32 {
    let (_, columns) = console::Term::stdout().size();
    u32::from(columns) * PX_PER_COLUMN
}

/// Resolve a `/switch` argument: a 1-based list position, else a session id.
pub fn resolve_session(state: &AppState, arg: &str) -> Option<SessionId> {
    let arg = arg.trim();
    if let Ok(position) = arg.parse::<usize>()
        && let Some(session) = position.checked_sub(1).and_then(|i| state.sessions().get(i))
    {
        return Some(session.id.clone());
    }
    let id = SessionId::from(arg);
    state.contains(&id).then_some(id)
}

/// Render the session list for the viewport's layout.
pub fn render_sessions(
    state: &AppState,
    viewport: &ViewportAdapter,
    is_sending: impl Fn(&SessionId) -> bool,
) -> String {
    if state.sessions().is_empty() {
        return format!(
            "\n  {} No sessions yet. Start one with {} or {}\n",
            style("i").blue().bold(),
            style("/upload <path>").yellow(),
            style("/url <url>").yellow()
        );
    }

    if viewport.is_mobile() {
        return render_names(state, &is_sending);
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_width(sidebar_columns(viewport));

    table.set_header(vec![
        Cell::new("#").fg(Color::White),
        Cell::new("Session").fg(Color::White),
        Cell::new("Last message").fg(Color::White),
    ]);

    for (i, session) in state.sessions().iter().enumerate() {
        let active = state.active_id() == Some(&session.id);
        let mut name = session.name.clone();
        if is_sending(&session.id) {
            name.push_str(" …");
        }
        let name_cell = if active {
            Cell::new(format!("▸ {name}")).fg(Color::Cyan)
        } else {
            Cell::new(name)
        };
        table.add_row(vec![
            Cell::new(i + 1),
            name_cell,
            Cell::new(session.preview()).fg(Color::DarkGrey),
        ]);
    }

    format!("\n{table}\n")
}

fn render_names(state: &AppState, is_sending: &impl Fn(&SessionId) -> bool) -> String {
    let mut out = String::from("\n");
    for (i, session) in state.sessions().iter().enumerate() {
        let marker = if state.active_id() == Some(&session.id) { "▸" } else { " " };
        let typing = if is_sending(&session.id) { " …" } else { "" };
        out.push_str(&format!("  {marker} {}. {}{typing}\n", i + 1, session.name));
    }
    out
}

fn sidebar_columns(viewport: &ViewportAdapter) -> u16 {
    u16::try_from(viewport.sidebar_width() / PX_PER_COLUMN).unwrap_or(u16::MAX)
}
