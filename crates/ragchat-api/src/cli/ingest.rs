//! One-shot ingestion commands: `ragchat upload` and `ragchat upload-url`.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use ragchat_infra::filesystem::read_upload;
use ragchat_types::chat::Session;

use crate::state::ClientContext;

/// JSON shape printed with `--json`.
#[derive(Debug, Serialize)]
struct IngestSummary<'a> {
    session_id: &'a str,
    name: &'a str,
    greeting: &'a str,
}

/// Upload a document from disk.
///
/// # Examples
///
/// ```bash
/// ragchat upload ./handbook.pdf
/// ragchat upload ./notes.md --json
/// ```
pub async fn upload_file(ctx: &ClientContext, path: &Path, json: bool) -> Result<()> {
    let upload = read_upload(path)
        .await
        .with_context(|| format!("cannot read {}", path.display()))?;

    let spinner = spinner(json, format!("Uploading {}...", upload.filename));
    let result = ctx
        .client
        .gateway()
        .ingest_file(upload.bytes, &upload.filename)
        .await;
    spinner.finish_and_clear();

    let session = result.map_err(|e| anyhow::anyhow!(e.notice()))?;
    print_session(&session, json)
}

/// Ingest a web page by URL.
pub async fn upload_url(
    ctx: &ClientContext,
    url: &str,
    title: Option<&str>,
    json: bool,
) -> Result<()> {
    if url.trim().is_empty() {
        anyhow::bail!("a URL is required");
    }

    let spinner = spinner(json, format!("Fetching {}...", url.trim()));
    let result = ctx.client.gateway().ingest_url(url, title).await;
    spinner.finish_and_clear();

    match result.map_err(|e| anyhow::anyhow!(e.notice()))? {
        Some(session) => print_session(&session, json),
        None => anyhow::bail!("a URL is required"),
    }
}

/// A steady-ticking spinner, hidden in JSON mode.
fn spinner(json: bool, message: String) -> ProgressBar {
    if json {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg}") {
        spinner.set_style(template);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

fn print_session(session: &Session, json: bool) -> Result<()> {
    let greeting = session
        .messages
        .first()
        .map(|m| m.text.as_str())
        .unwrap_or_default();

    if json {
        let summary = IngestSummary {
            session_id: session.id.as_str(),
            name: &session.name,
            greeting,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Session created: {} {}",
        style("✓").green().bold(),
        style(&session.name).cyan().bold(),
        style(format!("({})", session.id)).dim()
    );
    println!("  {}", greeting);
    println!();
    Ok(())
}
