//! Background ingestion for the chat loop.
//!
//! The loop turns `/upload`, `/url` and drops into an [`IngestJob`] and runs
//! it on a spawned task, so the prompt keeps reading lines while the service
//! works. The gateway lets one job through at a time.

use std::path::PathBuf;

use console::style;

use ragchat_core::backend::RagBackend;
use ragchat_core::ingest::drag_drop::PendingDrop;
use ragchat_core::ingest::gateway::IngestionGateway;
use ragchat_infra::filesystem::read_upload;
use ragchat_types::chat::Session;
use ragchat_types::error::IngestError;

use super::renderer::ChatRenderer;

pub enum IngestJob<B: RagBackend> {
    File(PathBuf),
    Url { url: String, title: Option<String> },
    Drop(PendingDrop<B>),
}

impl<B: RagBackend> IngestJob<B> {
    /// Status line printed when the job starts.
    pub fn describe(&self) -> String {
        match self {
            IngestJob::File(path) => format!("Uploading {}…", path.display()),
            IngestJob::Url { url, .. } => format!("Fetching {}…", url.trim()),
            IngestJob::Drop(pending) => format!("Uploading {}…", pending.file_name()),
        }
    }
}

/// Run one job to completion. Failures come back as the notice shown to the user.
pub async fn run_ingest<B: RagBackend>(
    gateway: &IngestionGateway<B>,
    job: IngestJob<B>,
) -> Result<Option<Session>, String> {
    match job {
        IngestJob::File(path) => {
            if gateway.is_busy() {
                return Err(IngestError::Busy.notice());
            }
            let upload = read_upload(&path)
                .await
                .map_err(|e| format!("Cannot read {}: {e}", path.display()))?;
            gateway
                .ingest_file(upload.bytes, &upload.filename)
                .await
                .map(Some)
                .map_err(|e| e.notice())
        }
        IngestJob::Url { url, title } => gateway
            .ingest_url(&url, title.as_deref())
            .await
            .map_err(|e| e.notice()),
        IngestJob::Drop(pending) => pending.settle().await.map(Some).map_err(|e| e.notice()),
    }
}

/// Text printed once a job has finished.
pub fn render_ingest_report(result: &Result<Option<Session>, String>, renderer: &ChatRenderer) -> String {
    match result {
        Ok(Some(session)) => {
            let mut report = format!(
                "\n  {} Session created: {} {}\n",
                style("✓").green().bold(),
                style(&session.name).cyan().bold(),
                style(format!("({})", session.id)).dim()
            );
            for message in &session.messages {
                report.push_str(&renderer.render_message(message, &session.name));
                report.push_str("\n\n");
            }
            report
        }
        Ok(None) => format!(
            "\n  {} Usage: {}\n\n",
            style("?").yellow().bold(),
            style("/url <url> [title]").cyan()
        ),
        Err(notice) => format!("\n  {} {notice}\n\n", style("!").red().bold()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use ragchat_core::client::ChatClient;
    use ragchat_infra::http::HttpRagBackend;
    use ragchat_types::chat::SessionId;
    use serde_json::json;
    use tempfile::tempdir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> ChatClient<HttpRagBackend> {
        ChatClient::new(HttpRagBackend::new(&server.uri()).unwrap())
    }

    fn url_job(url: &str) -> IngestJob<HttpRagBackend> {
        IngestJob::Url {
            url: url.to_string(),
            title: None,
        }
    }

    #[tokio::test]
    async fn test_second_job_is_busy_while_first_is_pending() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/upload-url"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"session_id": "u1", "filename": "Example Domain"}))
                    .set_delay(Duration::from_millis(300)),
            )
            .expect(1)
            .mount(&server)
            .await;
        let client = client(&server);
        let gateway = Arc::clone(client.gateway());

        let first = {
            let gateway = Arc::clone(&gateway);
            tokio::spawn(async move { run_ingest(&gateway, url_job("https://example.com")).await })
        };
        while !gateway.is_busy() {
            tokio::task::yield_now().await;
        }

        let second = run_ingest(&gateway, url_job("https://example.org")).await;
        assert_eq!(second.unwrap_err(), IngestError::Busy.notice());
        let dir = tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        std::fs::write(&file, "hello").unwrap();
        let third = run_ingest(&gateway, IngestJob::File(file)).await;
        assert_eq!(third.unwrap_err(), IngestError::Busy.notice());

        let session = first.await.unwrap().unwrap().unwrap();
        assert_eq!(session.name, "Example Domain");
        assert_eq!(client.store().active_id(), Some(SessionId::from("u1")));
        assert!(!gateway.is_busy());
    }

    #[tokio::test]
    async fn test_file_job_uploads_and_activates_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/upload"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"session_id": "f1", "filename": "notes.txt"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        let client = client(&server);
        let dir = tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        std::fs::write(&file, "hello").unwrap();

        let session = run_ingest(client.gateway(), IngestJob::File(file))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(session.id, SessionId::from("f1"));
        assert_eq!(client.store().active_id(), Some(SessionId::from("f1")));
    }

    #[tokio::test]
    async fn test_unreadable_file_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;
        let client = client(&server);
        let dir = tempdir().unwrap();

        let err = run_ingest(client.gateway(), IngestJob::File(dir.path().join("missing.pdf")))
            .await
            .unwrap_err();

        assert!(err.starts_with("Cannot read "));
        assert!(!client.gateway().is_busy());
        assert!(client.store().snapshot().sessions().is_empty());
    }

    #[test]
    fn test_report_names_session_or_notice() {
        let renderer = ChatRenderer::new(None);
        let session = Session::seeded(SessionId::from("abc"), "report.pdf");

        let ok = console::strip_ansi_codes(&render_ingest_report(&Ok(Some(session)), &renderer)).to_string();
        assert!(ok.contains("Session created: report.pdf (abc)"));

        let err = render_ingest_report(&Err(IngestError::Busy.notice()), &renderer);
        assert!(console::strip_ansi_codes(&err).contains("another document is still being ingested"));
    }
}
