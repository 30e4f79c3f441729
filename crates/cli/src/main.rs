//! paperchat CLI
//!
//! Session shell around the QA engine: one-shot questions with optional
//! document grounding, and an interactive chat loop with a login gate.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, ChatCommand};
use paperchat_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// paperchat - document-grounded question answering
#[derive(Parser, Debug)]
#[command(name = "paperchat")]
#[command(about = "Ask questions, optionally grounded in an uploaded document", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "PAPERCHAT_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Generation provider (gemini, ollama)
    #[arg(short, long, global = true, env = "PAPERCHAT_PROVIDER")]
    provider: Option<String>,

    /// Generation model identifier
    #[arg(short, long, global = true, env = "PAPERCHAT_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a single question, optionally grounded in a document
    Ask(AskCommand),

    /// Interactive chat with login gate and document upload
    Chat(ChatCommand),
}

#[tokio::main]
async fn main() {
    // Errors reach the user as their Display message, never Debug output
    if let Err(e) = run().await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from environment
    let config = AppConfig::load()?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.config,
        cli.provider,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    )?;

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("paperchat starting");
    tracing::debug!("Generation provider: {}", config.qa.generation_provider);
    tracing::debug!("Embedding provider: {}", config.qa.embedding_provider);

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Chat(_) => "chat",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Chat(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
