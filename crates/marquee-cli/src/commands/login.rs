//! Login command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use marquee::Credentials;

use crate::config::Config;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long)]
    pub password: String,
}

pub async fn run(args: LoginArgs, config: &Config) -> Result<()> {
    let app = session::open_app(config)?;
    let credentials = Credentials::new(&args.email, &args.password);

    eprintln!("{}", "Logging in...".dimmed());

    let result = app.auth().login(&credentials).await;
    output::notices(app.notices());
    result.context("Failed to login")?;

    println!();
    output::field("Email", &args.email);
    output::field("API", config.api_url.as_str());

    Ok(())
}
