//! Welcome banner display for the chat loop.

use console::style;

/// Build the banner shown when the chat starts: service URL and how to begin.
pub fn welcome_banner(base_url: &str) -> String {
    format!(
        "\n  {} {}\n  {}\n\n  {}  {}\n\n  {}\n  {}\n  {}\n",
        style("*").cyan().bold(),
        style("RagChat").cyan().bold(),
        style("Chat with your documents").dim(),
        style("Service:").bold(),
        style(base_url).dim(),
        style("Start with /upload <path>, /url <url>, or drag a file onto this window.").dim(),
        style("Type /help for commands, Ctrl+D to exit").dim(),
        style("---").dim(),
    )
}
