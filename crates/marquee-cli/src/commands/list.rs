//! List command implementation.
//!
//! The terminal is the viewport: after each page is printed, its last row
//! is the one that scrolled into view, and seeing it asks the list for the
//! next page through the proximity port.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use marquee::catalog::{ProximitySignal, proximity};
use marquee::{CatalogItem, CatalogList, Category, Filter, Phase};

use crate::config::Config;
use crate::output;
use crate::session;

use super::parse_category;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only show titles containing this text (case-insensitive)
    #[arg(long, short)]
    pub search: Option<String>,

    /// Only show this category: movie or tvshow
    #[arg(long, short, value_parser = parse_category)]
    pub category: Option<Category>,

    /// Number of pages to load
    #[arg(long, default_value_t = 1, conflicts_with = "all")]
    pub pages: u32,

    /// Keep loading until the catalog is exhausted
    #[arg(long)]
    pub all: bool,

    /// Print one JSON object per item
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: ListArgs, config: &Config) -> Result<()> {
    let app = session::open_app(config)?;
    session::require_session(&app)?;
    let list = app.list();

    let resolved = list.resolve_user().await;
    output::notices(app.notices());
    resolved.context("Failed to load profile")?;

    let mut filter = Filter::new().category(args.category);
    if let Some(search) = &args.search {
        filter = filter.search(search);
    }

    let (signal, trigger) = proximity();
    let loader = list.attach(trigger);

    let first = list.load_next().await;
    output::notices(app.notices());
    first.context("Failed to load movies")?;

    let mut shown = 0;
    let mut printed = 0;
    let mut pages = 1;
    loop {
        let items = list.items();
        let start = printed.min(items.len());
        for item in filter.apply(&items[start..]) {
            print_item(item, args.json)?;
            shown += 1;
        }
        printed = items.len();

        let wanted = args.all || pages < args.pages;
        if !wanted || !list.has_more() {
            break;
        }

        if !scroll(list, &signal, items.last()).await {
            output::notices(app.notices());
            break;
        }
        output::notices(app.notices());
        pages += 1;
    }

    signal.release();
    loader.await.context("Loader task failed")?;

    if !args.json {
        summarize(list, shown, &filter);
    }
    Ok(())
}

/// Report the last printed row as visible and wait for the resulting load.
///
/// Returns false if nothing more was loaded.
async fn scroll(
    list: &CatalogList,
    signal: &ProximitySignal,
    last: Option<&CatalogItem>,
) -> bool {
    let Some(last) = last else {
        return false;
    };

    let mut revisions = list.subscribe();
    revisions.borrow_and_update();
    let len = list.len();

    signal.arm(Some(&last.id));
    if !signal.row_visible(&last.id) {
        return false;
    }

    // Every load request publishes once it is settled, skipped requests
    // included, so the first revision seen outside Loading ends the wait
    loop {
        if revisions.changed().await.is_err() {
            return false;
        }
        revisions.borrow_and_update();
        if list.phase() != Phase::Loading {
            break;
        }
    }

    list.len() > len
}

fn print_item(item: &CatalogItem, json: bool) -> Result<()> {
    if json {
        output::json(item)
    } else {
        output::item_row(item);
        Ok(())
    }
}

fn summarize(list: &CatalogList, shown: usize, filter: &Filter) {
    let loaded = list.len();
    let more = if list.has_more() {
        " (more available, use --all)"
    } else {
        ""
    };

    if loaded == 0 {
        eprintln!("{}", "No movies yet.".dimmed());
    } else if filter.is_empty() {
        eprintln!("{}", format!("{} loaded{}", loaded, more).dimmed());
    } else {
        eprintln!(
            "{}",
            format!("{} of {} loaded match{}", shown, loaded, more).dimmed()
        );
    }
}
