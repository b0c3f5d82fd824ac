//! Delete command implementation.

use anyhow::{Context, Result};
use clap::Args;

use marquee::{ItemId, Removal};

use crate::config::Config;
use crate::output;
use crate::session;

use super::{locate, parse_item_id};

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// ID of the item to delete
    #[arg(value_parser = parse_item_id)]
    pub id: ItemId,

    /// Skip confirmation prompt
    #[arg(long, short = 'f')]
    pub force: bool,
}

pub async fn run(args: DeleteArgs, config: &Config) -> Result<()> {
    let app = session::open_app(config)?;
    session::require_session(&app)?;

    // Only used to name the item in the prompt
    if !args.force {
        let found = locate(app.list(), &args.id).await;
        output::notices(app.notices());
        found?;
    }

    let mut form = app.form();
    let result = if args.force {
        form.remove(&args.id, &|_: &str| true).await
    } else {
        form.remove(&args.id, &output::confirm).await
    };
    output::notices(app.notices());

    if result.context("Failed to delete movie")? == Removal::Declined {
        eprintln!("Aborted.");
    }

    Ok(())
}
