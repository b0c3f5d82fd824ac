//! Signup command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::config::Config;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct SignupArgs {
    /// Display name
    #[arg(long)]
    pub username: String,

    /// Account email
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long)]
    pub password: String,
}

pub async fn run(args: SignupArgs, config: &Config) -> Result<()> {
    let app = session::open_app(config)?;

    let result = app
        .auth()
        .signup(&args.username, &args.email, &args.password)
        .await;
    output::notices(app.notices());
    let next = result.context("Failed to sign up")?;

    output::info(&format!("Next: marquee login --email {}", args.email));
    tracing::debug!(route = %next, "Signup complete");
    Ok(())
}
