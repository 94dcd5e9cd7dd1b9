use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::AsyncReadExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod host;
mod script;
mod session;

use script::parse_script;

/// Headless driver for the site view orchestrator.
#[derive(Parser, Debug)]
struct Args {
    /// Address shown in the address bar at startup.
    #[arg(long, default_value = "/")]
    address: String,
    /// Interaction script; read from stdin when omitted.
    #[arg(long)]
    script: Option<PathBuf>,
    /// JSON dataset, overrides `content_path` from the settings.
    #[arg(long)]
    content_path: Option<PathBuf>,
    /// HTTP(S) dataset endpoint, overrides `content_url` from the settings.
    #[arg(long)]
    content_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = config::load_settings();
    if let Some(path) = args.content_path {
        settings.content_path = Some(path);
    }
    if let Some(url) = args.content_url {
        settings.content_url = Some(url);
    }
    let source = settings.content_source()?;
    info!(source = %source.describe(), address = %args.address, "starting site shell");

    let raw_script = read_script(args.script.as_ref()).await?;
    let commands = parse_script(&raw_script)?;

    let report = session::run_session(
        args.address,
        settings.site_config(),
        source,
        settings.page_loader(),
        &commands,
    )
    .await?;
    info!(
        entries = report.history.len(),
        page = report.last_frame.page().name(),
        "site shell finished"
    );
    Ok(())
}

async fn read_script(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read script '{}'", path.display())),
        None => {
            let mut raw = String::new();
            tokio::io::stdin()
                .read_to_string(&mut raw)
                .await
                .context("failed to read script from stdin")?;
            Ok(raw)
        }
    }
}
