//! One-shot image analysis from the command line.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use lre_core::analysis::gemini::GeminiClient;
use lre_core::config::AppConfig;
use lre_core::ingest::UploadedImage;
use lre_core::presenter::{present, Tab};
use lre_core::AnalysisBackend;

use crate::output;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Image file to analyze (png, jpg, jpeg, webp, gif)
    pub path: PathBuf,

    /// Tab to print: branding, elementos, informacoes, diagramacao, materiais, json
    #[arg(long, default_value = "branding")]
    pub tab: Tab,

    /// Print every tab
    #[arg(long, conflicts_with_all = ["tab", "json"])]
    pub all: bool,

    /// Print the raw analysis JSON only
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: AnalyzeArgs, config: AppConfig, api_key: &str) -> Result<()> {
    let image = UploadedImage::from_path(&args.path)
        .await
        .with_context(|| format!("Failed to load image {}", args.path.display()))?;

    let client = GeminiClient::new(config.gemini(api_key))?;
    tracing::debug!(model = client.model(), mime = %image.mime_type, "Starting analysis");

    if !args.json {
        println!(
            "{} Analyzing {} with {}",
            "→".dimmed(),
            args.path.display(),
            client.model().cyan()
        );
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Processando visão computacional...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let outcome = client.analyze(&image).await;
    spinner.finish_and_clear();
    let outcome = outcome.context("Falha na análise. Verifique sua conexão ou tente novamente.")?;

    if args.json {
        println!("{}", outcome.result().to_pretty_json());
        return Ok(());
    }

    println!("{} Analysis complete", "✓".green().bold());
    println!();

    let tabs: Vec<Tab> = if args.all {
        Tab::ALL.to_vec()
    } else {
        vec![args.tab]
    };

    for (i, tab) in tabs.iter().enumerate() {
        output::print_presentation(&present(Some(&outcome), *tab), i + 1 == tabs.len());
    }

    Ok(())
}
