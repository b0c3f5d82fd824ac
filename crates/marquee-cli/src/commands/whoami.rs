//! Whoami command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::config::Config;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct WhoamiArgs {
    /// Print the profile as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: WhoamiArgs, config: &Config) -> Result<()> {
    let app = session::open_app(config)?;
    session::require_session(&app)?;

    let result = app.list().resolve_user().await;
    output::notices(app.notices());
    let profile = result.context("Failed to load profile")?;

    if args.json {
        return output::json(&profile);
    }

    output::field("Username", &profile.username);
    output::field("Email", &profile.email);
    output::field("User ID", &profile.id.to_string());
    output::field("API", config.api_url.as_str());

    Ok(())
}
