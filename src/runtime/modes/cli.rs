//! CLI mode
//!
//! One-shot commands that open the store directly, without starting the
//! server or the background tasks.

use std::io::{self, BufRead, Write};

use colored::Colorize;

use crate::cli::Commands;
use crate::config::AppConfig;
use crate::errors::{Result, ShortenerError};
use crate::runtime::lifetime::startup;
use crate::utils::full_short_url;

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(cmd: Commands, config: &AppConfig) -> Result<()> {
    match cmd {
        Commands::Create { url } => {
            let url = match url {
                Some(url) => url,
                None => prompt_url(io::stdin().lock())?,
            };
            create_link(config, &url).await
        }
        Commands::Stats { code } => show_stats(config, &code).await,
        Commands::ConfigGen => {
            print!("{}", AppConfig::sample_toml());
            Ok(())
        }
        Commands::RunServer => Err(ShortenerError::config(
            "run-server is not a one-shot command",
        )),
    }
}

async fn open(config: &AppConfig) -> Result<startup::StartupContext> {
    startup::prepare_services(config)
        .await
        .map_err(|e| ShortenerError::store_unavailable(format!("{:#}", e)))
}

/// 未给出 `--url` 时从标准输入读取一行
fn prompt_url(reader: impl BufRead) -> Result<String> {
    print!("{} URL to shorten: ", "➜".bold().cyan());
    io::stdout().flush()?;
    read_url(reader)
}

fn read_url(mut reader: impl BufRead) -> Result<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    let url = line.trim();
    if url.is_empty() {
        return Err(ShortenerError::invalid_input("No URL given"));
    }
    Ok(url.to_string())
}

async fn create_link(config: &AppConfig, url: &str) -> Result<()> {
    let ctx = open(config).await?;
    let link = ctx.link_service.create_link(url).await?;
    let full = full_short_url(&config.server.base_url, &link.shortcode);

    println!(
        "{} Added short link: {} -> {}",
        "✓".bold().green(),
        link.shortcode.cyan(),
        link.long_url.blue().underline()
    );
    println!("  {}", full.magenta());
    Ok(())
}

async fn show_stats(config: &AppConfig, code: &str) -> Result<()> {
    let ctx = open(config).await?;
    let stats = ctx.link_service.get_link_stats(code).await?;

    println!(
        "{} {} -> {}",
        "ℹ".bold().blue(),
        stats.link.shortcode.cyan(),
        stats.link.long_url.blue().underline()
    );
    println!("  Created:      {}", stats.link.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("  Total clicks: {}", stats.total_clicks.to_string().yellow());
    Ok(())
}
