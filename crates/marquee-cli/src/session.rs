//! Session slot location and app construction.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;

use marquee::{App, FileSlot, Route, SessionStore};

use crate::config::Config;

/// Directory holding the session slot, created on first use.
pub fn data_dir() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "marquee").context("Could not determine data directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.to_path_buf())
}

/// Open the persistent session store.
pub fn open_store() -> Result<SessionStore> {
    let slot = FileSlot::token_in(data_dir()?);
    SessionStore::open(slot).context("Failed to load session")
}

/// Build the app over the persistent session.
pub fn open_app(config: &Config) -> Result<App> {
    let store = open_store()?;
    App::connect(config.api_url.clone(), store, config.page_size)
        .context("Failed to create API client")
}

/// Fail unless the dashboard is reachable, i.e. a token is held.
pub fn require_session(app: &App) -> Result<()> {
    if app.route(Route::Dashboard) != Route::Dashboard {
        bail!("No active session. Run 'marquee login' first.");
    }
    Ok(())
}
