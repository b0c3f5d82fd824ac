//! Watch command implementation.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;
use colored::Colorize;

use marquee::session::DEFAULT_POLL_INTERVAL;
use marquee::{SessionState, SlotWatcher};

use crate::session;

#[derive(Args, Debug)]
pub struct WatchArgs {}

pub async fn run(_args: WatchArgs) -> Result<()> {
    let store = session::open_store()?;
    let _watcher =
        SlotWatcher::start(&store, DEFAULT_POLL_INTERVAL).context("Failed to watch session")?;
    let mut changes = store.subscribe();

    print_state(&changes.borrow_and_update());
    eprintln!("{}", "Watching for session changes (Ctrl-C to stop)".dimmed());

    loop {
        tokio::select! {
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                print_state(&changes.borrow_and_update());
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}

fn print_state(state: &SessionState) {
    let now = Local::now().format("%H:%M:%S");
    let status = if state.is_authenticated() {
        "logged in".green()
    } else {
        "logged out".yellow()
    };
    println!("{} {}", now.to_string().dimmed(), status);
}
