//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod analyze;
mod check;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::analysis::{Language, Operation};
use crate::config::load_settings;

#[derive(Parser)]
#[command(name = "demystify")]
#[command(about = "Plain-language analysis of legal, medical and employment documents")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API
    Serve {
        /// Address to bind to: PORT, HOST, or HOST:PORT (default from config, 127.0.0.1:8501)
        bind: Option<String>,
    },

    /// Classify a batch of documents
    Classify {
        /// PDF or image files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Run one analysis operation on a batch of documents
    Analyze {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Operation to run
        #[arg(short, long, value_enum)]
        operation: Operation,
        /// Output language
        #[arg(short, long, value_enum, default_value_t)]
        language: Language,
    },

    /// Translate the beginning of the extracted text
    Translate {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(short, long, value_enum, default_value_t = Language::Hindi)]
        language: Language,
    },

    /// Ask a question about a batch of documents
    Ask {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// The question
        #[arg(short, long)]
        question: String,
        #[arg(short, long, value_enum, default_value_t)]
        language: Language,
    },

    /// Show resolved configuration and enabled capabilities
    Check,
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref()).await;

    match cli.command {
        Commands::Check => check::cmd_check(settings),
        Commands::Serve { bind } => serve::cmd_serve(&settings?, bind.as_deref()).await,
        Commands::Classify { files } => analyze::cmd_classify(&settings?, &files).await,
        Commands::Analyze {
            files,
            operation,
            language,
        } => analyze::cmd_analyze(&settings?, &files, operation, language).await,
        Commands::Translate { files, language } => {
            analyze::cmd_translate(&settings?, &files, language).await
        }
        Commands::Ask {
            files,
            question,
            language,
        } => analyze::cmd_ask(&settings?, &files, &question, language).await,
    }
}
