//! RagChat CLI entry point.
//!
//! Binary name: `ragchat`
//!
//! Parses CLI arguments, loads configuration, sets up tracing, then dispatches
//! to a one-shot ingest command or the interactive chat loop.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use ragchat_infra::config::load_config;
use ragchat_infra::filesystem::resolve_data_dir;
use ragchat_observe::tracing_setup::{init_tracing, shutdown_tracing, verbosity_filter};

use cli::{Cli, Commands};
use state::ClientContext;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command.clone().unwrap_or(Commands::Chat);

    // Shell completions don't need a client
    if let Commands::Completions { shell } = command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(shell, &mut cmd, "ragchat", &mut std::io::stdout());
        return Ok(());
    }

    let data_dir = resolve_data_dir();
    let config = load_config(&data_dir).await;

    init_tracing(verbosity_filter(cli.quiet, cli.verbose), config.enable_otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let ctx = ClientContext::init(config, data_dir, cli.base_url.as_deref())?;

    let result = match command {
        Commands::Chat => cli::chat::loop_runner::run_chat_loop(&ctx).await,
        Commands::Upload { path } => cli::ingest::upload_file(&ctx, &path, cli.json).await,
        Commands::UploadUrl { url, title } => {
            cli::ingest::upload_url(&ctx, &url, title.as_deref(), cli.json).await
        }
        Commands::Completions { .. } => unreachable!("handled above"),
    };

    shutdown_tracing();
    result
}
