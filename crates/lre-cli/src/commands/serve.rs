//! Web server command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use lre_core::analysis::gemini::GeminiClient;
use lre_core::config::AppConfig;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long)]
    pub port: Option<u16>,

    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Mirror logs to a file
    #[arg(long)]
    pub log: bool,

    /// Log file path (defaults to ./lre-serve.log)
    #[arg(long, requires = "log")]
    pub log_file: Option<PathBuf>,
}

pub async fn execute(args: ServeArgs, mut config: AppConfig, api_key: &str) -> Result<()> {
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(host) = args.host {
        config.host = host;
    }

    let client = GeminiClient::new(config.gemini(api_key))?;

    println!();
    println!(
        "  {} {}",
        "LRE".cyan().bold(),
        "Layout Reverse Engineering".bold()
    );
    println!();
    println!("  {}  http://{}:{}", "Interface".green(), config.host, config.port);
    println!("  {}        http://{}:{}/api", "API".green(), config.host, config.port);
    println!("  {}      {}", "Modelo".green(), client.model());
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    lre_web::run_server(Arc::new(client), &config.host, config.port).await?;

    Ok(())
}
