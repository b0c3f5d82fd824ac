//! Edit command implementation.
//!
//! Loads pages until the item is found, then submits it with the given
//! fields changed. Updates replace every field, so unchanged ones are sent
//! as they were loaded.

use anyhow::{Context, Result, bail};
use clap::Args;

use marquee::{ItemId, Submitted};

use crate::config::Config;
use crate::output;
use crate::session;

use super::{ItemArgs, locate, parse_item_id};

#[derive(Args, Debug)]
pub struct EditArgs {
    /// ID of the item to edit
    #[arg(value_parser = parse_item_id)]
    pub id: ItemId,

    #[command(flatten)]
    pub item: ItemArgs,

    /// Print the updated item as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: EditArgs, config: &Config) -> Result<()> {
    let app = session::open_app(config)?;
    session::require_session(&app)?;

    let found = locate(app.list(), &args.id).await;
    output::notices(app.notices());
    let Some(existing) = found? else {
        bail!("Movie {} not found", args.id);
    };

    let mut form = app.form();
    form.select_for_edit(&existing);
    args.item.apply(form.draft_mut());

    let result = form.submit().await;
    output::notices(app.notices());

    let (Submitted::Added(item) | Submitted::Updated(item)) =
        result.context("Failed to update movie")?;

    if args.json {
        return output::json(&item);
    }
    println!();
    output::item_detail(&item);

    Ok(())
}
