mod app;
mod browse;
mod catalog;
mod config;
mod error;
mod proxy;
mod ui;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::app::App;
use crate::catalog::AniListClient;
use crate::config::Config;
use crate::error::Result;
use crate::proxy::AppState;

#[derive(Parser)]
#[command(name = "kansou", version, about = "Browse and search the AniList manga catalog")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the terminal browser (default)
    Browse {
        /// Base URL of the search proxy
        #[arg(long)]
        proxy: Option<String>,
    },
    /// Run the search proxy in front of the GraphQL catalog
    Serve {
        /// Address to listen on, e.g. 127.0.0.1:3000
        #[arg(long)]
        bind: Option<String>,
        /// GraphQL endpoint to forward searches to
        #[arg(long)]
        upstream: Option<String>,
    },
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kansou=info"))
}

/// The TUI owns the terminal, so logs go to a daily file.
fn setup_file_logging() -> Result<()> {
    let data_dir = config::data_dir()?;
    std::fs::create_dir_all(&data_dir)?;

    let file_appender = tracing_appender::rolling::daily(&data_dir, "kansou.log");

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(file_appender).with_ansi(false))
        .init();

    Ok(())
}

fn setup_stderr_logging() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn browse(mut config: Config, proxy: Option<String>) -> Result<()> {
    if let Err(e) = setup_file_logging() {
        eprintln!("Warning: Could not set up logging: {}", e);
    }

    if let Some(proxy) = proxy {
        config.ui.proxy_url = proxy;
    }
    info!(proxy = %config.ui.proxy_url, "Starting kansou browser");

    let mut terminal = app::init_terminal()?;

    let mut app = App::new(config);
    let result = app.run(&mut terminal).await;

    app::restore_terminal()?;

    result
}

async fn serve(mut config: Config, bind: Option<String>, upstream: Option<String>) -> Result<()> {
    setup_stderr_logging();

    if let Some(bind) = bind {
        config.server.bind = bind;
    }
    if let Some(upstream) = upstream {
        config.upstream.endpoint = upstream;
    }
    info!(upstream = %config.upstream.endpoint, "Starting kansou proxy");

    let catalog = AniListClient::new(config.upstream.endpoint);
    proxy::serve(&config.server.bind, AppState::new(Arc::new(catalog))).await
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command.unwrap_or(Command::Browse { proxy: None }) {
        Command::Browse { proxy } => browse(config, proxy).await,
        Command::Serve { bind, upstream } => serve(config, bind, upstream).await,
    }
}
