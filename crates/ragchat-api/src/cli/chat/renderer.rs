//! Terminal rendering of chat messages.
//!
//! `ChatRenderer` combines `termimad` for prose and `syntect` for code block
//! syntax highlighting. Answers from the service are markdown; user messages
//! are echoed verbatim.

use crossterm::style::Color;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::as_24_bit_terminal_escaped;
use termimad::MadSkin;

use console::style;
use ragchat_types::chat::{Message, Sender};

const CODE_THEME: &str = "base16-ocean.dark";

/// Terminal markdown renderer with syntax highlighting.
pub struct ChatRenderer {
    skin: MadSkin,
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl ChatRenderer {
    /// Create a new renderer with an optional accent color for headers and bold text.
    pub fn new(accent_color: Option<Color>) -> Self {
        let mut skin = MadSkin::default_dark();

        if let Some(color) = accent_color {
            let tc = Self::crossterm_to_termimad(color);
            skin.bold.set_fg(tc);
            skin.headers[0].set_fg(tc);
            skin.headers[1].set_fg(tc);
        }

        skin.inline_code
            .set_fg(termimad::crossterm::style::Color::Yellow);

        Self {
            skin,
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    /// Render one message with its sender label.
    ///
    /// `session_name` labels AI messages, so replies that land after a
    /// session switch still say where they came from.
    pub fn render_message(&self, message: &Message, session_name: &str) -> String {
        let time = message.timestamp.with_timezone(&chrono::Local).format("%H:%M");
        match message.sender {
            Sender::User => format!(
                "  {} {} {}",
                style(time).dim(),
                style("You >").green().bold(),
                message.text
            ),
            Sender::Ai => format!(
                "  {} {}\n{}",
                style(time).dim(),
                style(format!("{session_name} >")).cyan().bold(),
                indent(self.render_final(&message.text).trim_end())
            ),
        }
    }

    /// Render a complete markdown answer with syntax-highlighted code blocks.
    ///
    /// Code fences with a language tag are highlighted via syntect; everything
    /// else is rendered through termimad.
    pub fn render_final(&self, markdown: &str) -> String {
        let mut output = String::new();
        let mut in_code_block = false;
        let mut code_lang = String::new();
        let mut code_buf = String::new();

        for line in markdown.lines() {
            if line.starts_with("```") && !in_code_block {
                in_code_block = true;
                code_lang = line.trim_start_matches('`').trim().to_string();
                code_buf.clear();
            } else if line.starts_with("```") && in_code_block {
                in_code_block = false;
                output.push_str(&self.highlight_code(&code_buf, &code_lang));
                output.push('\n');
            } else if in_code_block {
                code_buf.push_str(line);
                code_buf.push('\n');
            } else {
                output.push_str(&self.skin.term_text(line).to_string());
            }
        }

        // Unclosed code block
        if in_code_block && !code_buf.is_empty() {
            output.push_str(&self.highlight_code(&code_buf, &code_lang));
        }

        output
    }

    /// Highlight a code block using syntect.
    fn highlight_code(&self, code: &str, lang: &str) -> String {
        let syntax = if lang.is_empty() {
            self.syntax_set.find_syntax_plain_text()
        } else {
            self.syntax_set
                .find_syntax_by_token(lang)
                .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
        };

        let mut output = String::new();
        output.push_str(&format!("  {}\n", style(format!("--- {lang} ---")).dim()));

        let Some(theme) = self.theme_set.themes.get(CODE_THEME) else {
            for line in code.lines() {
                output.push_str(&format!("  {line}\n"));
            }
            return output;
        };

        let mut h = HighlightLines::new(syntax, theme);
        for line in code.lines() {
            let ranges: Vec<(Style, &str)> = h
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_default();
            let escaped = as_24_bit_terminal_escaped(&ranges[..], false);
            output.push_str(&format!("  {escaped}\x1b[0m\n"));
        }

        output
    }

    /// Convert a crossterm Color to termimad Color.
    fn crossterm_to_termimad(color: Color) -> termimad::crossterm::style::Color {
        match color {
            Color::Cyan => termimad::crossterm::style::Color::Cyan,
            Color::Green => termimad::crossterm::style::Color::Green,
            Color::Yellow => termimad::crossterm::style::Color::Yellow,
            Color::Magenta => termimad::crossterm::style::Color::Magenta,
            Color::Blue => termimad::crossterm::style::Color::Blue,
            Color::Red => termimad::crossterm::style::Color::Red,
            Color::Rgb { r, g, b } => termimad::crossterm::style::Color::Rgb { r, g, b },
            _ => termimad::crossterm::style::Color::Cyan,
        }
    }
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("    {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_is_verbatim() {
        let renderer = ChatRenderer::new(None);
        let rendered = renderer.render_message(&Message::user("  *not markdown*  "), "doc.pdf");
        assert!(rendered.contains("  *not markdown*  "));
    }

    #[test]
    fn test_ai_message_labelled_with_session() {
        let renderer = ChatRenderer::new(Some(Color::Cyan));
        let rendered = renderer.render_message(&Message::ai("Plain answer"), "handbook.pdf");
        assert!(rendered.contains("handbook.pdf >"));
        assert!(rendered.contains("Plain answer"));
    }

    #[test]
    fn test_code_block_gets_language_header() {
        let renderer = ChatRenderer::new(None);
        let rendered = renderer.render_final("Example:\n```rust\nlet x = 1;\n```\n");
        assert!(rendered.contains("--- rust ---"));
    }

    #[test]
    fn test_unclosed_code_block_still_rendered() {
        let renderer = ChatRenderer::new(None);
        let rendered = renderer.render_final("```\nplain\n");
        assert!(rendered.contains("plain"));
    }
}
