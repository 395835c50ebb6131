//! CLI command definitions and dispatch for the `ragchat` binary.
//!
//! Uses clap derive macros for argument parsing. Without a subcommand the
//! interactive chat starts.

pub mod chat;
pub mod ingest;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Chat with your documents through a RAG service.
#[derive(Parser)]
#[command(name = "ragchat", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Base URL of the RAG service (overrides RAGCHAT_BASE_URL and config.toml).
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Start an interactive chat (the default).
    Chat,

    /// Upload a document and print the new session.
    Upload {
        /// Path of the document to ingest.
        path: PathBuf,
    },

    /// Ingest a web page and print the new session.
    #[command(name = "upload-url")]
    UploadUrl {
        /// Page to fetch and ingest.
        url: String,

        /// Session name (the service picks one when omitted).
        #[arg(long)]
        title: Option<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::try_parse_from(["ragchat"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_upload_url_with_title() {
        let cli = Cli::try_parse_from([
            "ragchat",
            "upload-url",
            "https://example.com",
            "--title",
            "Example",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Some(Commands::UploadUrl { url, title }) => {
                assert_eq!(url, "https://example.com");
                assert_eq!(title.as_deref(), Some("Example"));
            }
            _ => panic!("expected upload-url"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["ragchat", "chat", "-vv", "--base-url", "http://rag:9000"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.base_url.as_deref(), Some("http://rag:9000"));
    }

    #[test]
    fn test_cli_definition_is_valid() {
        <Cli as clap::CommandFactory>::command().debug_assert();
    }
}
