//! Logout command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::config::Config;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct LogoutArgs {}

pub async fn run(_args: LogoutArgs, config: &Config) -> Result<()> {
    let app = session::open_app(config)?;

    let result = app.auth().logout();
    output::notices(app.notices());
    result.context("Failed to remove session file")?;

    Ok(())
}
