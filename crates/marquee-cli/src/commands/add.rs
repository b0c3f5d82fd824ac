//! Add command implementation.

use anyhow::{Context, Result};
use clap::Args;

use marquee::Submitted;

use crate::config::Config;
use crate::output;
use crate::session;

use super::ItemArgs;

#[derive(Args, Debug)]
pub struct AddArgs {
    #[command(flatten)]
    pub item: ItemArgs,

    /// Print the created item as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: AddArgs, config: &Config) -> Result<()> {
    let app = session::open_app(config)?;
    session::require_session(&app)?;

    let mut form = app.form();
    args.item.apply(form.draft_mut());

    let result = form.submit().await;
    output::notices(app.notices());

    let (Submitted::Added(item) | Submitted::Updated(item)) =
        result.context("Failed to add movie")?;

    if args.json {
        return output::json(&item);
    }
    println!();
    output::item_detail(&item);

    Ok(())
}
