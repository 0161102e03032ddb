//! CLI command definitions and handlers.

use anyhow::Result;
use clap::{Parser, Subcommand};
use lre_core::config::AppConfig;
use std::path::PathBuf;

pub mod analyze;
pub mod serve;

/// Layout Reverse Engineering - structured analysis of marketing images
#[derive(Parser)]
#[command(name = "lre")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file (defaults to ./lre.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Gemini model to use for analysis
    #[arg(long, global = true)]
    pub model: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web interface
    Serve(serve::ServeArgs),

    /// Analyze a single image and print the result
    Analyze(analyze::AnalyzeArgs),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let mut config = AppConfig::load(self.config.as_deref())?;
        if let Some(model) = self.model {
            config.model = model;
        }

        let api_key = self
            .api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "GEMINI_API_KEY environment variable not set.\n\
                     Set it with: export GEMINI_API_KEY=your-key"
                )
            })?;

        match self.command {
            Commands::Serve(args) => serve::execute(args, config, &api_key).await,
            Commands::Analyze(args) => analyze::execute(args, config, &api_key).await,
        }
    }
}
