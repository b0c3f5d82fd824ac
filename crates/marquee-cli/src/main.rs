//! marquee - command-line client for a personal movie and TV-show catalog.
//!
//! Each command is one screen of the catalog app: the authentication
//! commands drive signup and login, the catalog commands require a session
//! and operate on the signed-in user's list.

mod cli;
mod commands;
mod config;
mod output;
mod session;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::Cli;
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    let config = Config::load(cli.api_url.as_deref(), cli.page_size)?;
    commands::handle(cli.command, &config).await
}

/// Library and CLI events follow `-v`; dependencies stay at warn unless
/// `RUST_LOG` says otherwise.
fn init_logging(verbosity: u8, json: bool) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let directives = format!("warn,marquee={level},marquee_cli={level}");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
