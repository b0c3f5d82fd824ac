//! Subcommand implementations.

pub mod add;
pub mod delete;
pub mod edit;
pub mod list;
pub mod login;
pub mod logout;
pub mod show_config;
pub mod signup;
pub mod watch;
pub mod whoami;

use anyhow::{Context, Result};
use clap::Args;

use marquee::{CatalogItem, CatalogList, Category, Draft, ItemId, LoadOutcome};

use crate::cli::Commands;
use crate::config::Config;

pub async fn handle(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Signup(args) => signup::run(args, config).await,
        Commands::Login(args) => login::run(args, config).await,
        Commands::Logout(args) => logout::run(args, config).await,
        Commands::Whoami(args) => whoami::run(args, config).await,
        Commands::List(args) => list::run(args, config).await,
        Commands::Add(args) => add::run(args, config).await,
        Commands::Edit(args) => edit::run(args, config).await,
        Commands::Delete(args) => delete::run(args, config).await,
        Commands::Watch(args) => watch::run(args).await,
        Commands::Config(args) => show_config::run(args, config),
    }
}

/// Catalog fields shared by `add` and `edit`.
#[derive(Args, Debug, Default)]
pub struct ItemArgs {
    /// Title
    #[arg(long)]
    pub title: Option<String>,

    /// Category: movie or tvshow
    #[arg(long, value_parser = parse_category)]
    pub category: Option<Category>,

    /// Director
    #[arg(long)]
    pub director: Option<String>,

    /// Budget
    #[arg(long)]
    pub budget: Option<f64>,

    /// Filming location
    #[arg(long)]
    pub location: Option<String>,

    /// Duration, e.g. "2h 50m" or "3 seasons"
    #[arg(long)]
    pub duration: Option<String>,

    /// Release year
    #[arg(long)]
    pub year: Option<i32>,

    /// Poster image URL
    #[arg(long)]
    pub poster: Option<String>,
}

impl ItemArgs {
    /// Overwrite the draft fields that were given on the command line.
    pub fn apply(self, draft: &mut Draft) {
        if let Some(title) = self.title {
            draft.title = title;
        }
        if self.category.is_some() {
            draft.category = self.category;
        }
        if self.director.is_some() {
            draft.director = self.director;
        }
        if self.budget.is_some() {
            draft.budget = self.budget;
        }
        if self.location.is_some() {
            draft.location = self.location;
        }
        if self.duration.is_some() {
            draft.duration = self.duration;
        }
        if self.year.is_some() {
            draft.year = self.year;
        }
        if self.poster.is_some() {
            draft.poster = self.poster;
        }
    }
}

pub fn parse_category(s: &str) -> Result<Category, marquee::Error> {
    s.parse()
}

pub fn parse_item_id(s: &str) -> Result<ItemId, marquee::Error> {
    s.parse()
}

/// Page through the catalog until `id` is loaded or the catalog ends.
pub async fn locate(list: &CatalogList, id: &ItemId) -> Result<Option<CatalogItem>> {
    list.resolve_user().await.context("Failed to load profile")?;

    loop {
        if let Some(item) = list.find(id) {
            return Ok(Some(item));
        }

        match list.load_next().await.context("Failed to load movies")? {
            LoadOutcome::Loaded { .. } => continue,
            LoadOutcome::Skipped(_) | LoadOutcome::Stale => return Ok(None),
        }
    }
}
