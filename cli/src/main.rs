//! ui-rag entry point
//!
//! Parses arguments, loads configuration, runs one subcommand and prints its
//! result as JSON on stdout. Logs go to stderr.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use ui_rag_cli::app::{store_stats, App};
use ui_rag_cli::{run_blocking, Cli, CliError, CliResult};
use ui_rag_core::RagConfig;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(cli).await {
        tracing::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let mut config = match &cli.config {
        Some(path) => RagConfig::load(path)?,
        None => RagConfig::default(),
    }
    .apply_env();
    if let Some(db) = cli.db {
        config.store.path = db;
    }

    cli.command.validate()?;

    let timeout = config.request_timeout();
    let command = cli.command;

    let output = if command.needs_embeddings() {
        tracing::info!("Loading embedding model {}", config.embedding.model_name);
        // Model download on first use is not bounded by the request timeout
        let app = tokio::task::spawn_blocking(move || App::open(&config))
            .await
            .map_err(|e| CliError::Task(e.to_string()))??;
        run_blocking(timeout, move || app.execute(&command)).await?
    } else {
        run_blocking(timeout, move || store_stats(&config)).await?
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
