//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::{
    add, delete, edit, list, login, logout, show_config, signup, watch, whoami,
};

/// Personal movie and TV-show catalog client.
#[derive(Parser, Debug)]
#[command(name = "marquee")]
#[command(author, version = env!("MARQUEE_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Catalog service base URL (overrides MARQUEE_API_URL and the config file)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Items fetched per page (overrides MARQUEE_PAGE_SIZE and the config file)
    #[arg(long, global = true)]
    pub page_size: Option<u32>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register a new account
    Signup(signup::SignupArgs),

    /// Log in and store the session token
    Login(login::LoginArgs),

    /// End the stored session
    Logout(logout::LogoutArgs),

    /// Display the signed-in user
    Whoami(whoami::WhoamiArgs),

    /// List movies and shows in the catalog
    List(list::ListArgs),

    /// Add a movie or show
    Add(add::AddArgs),

    /// Edit a movie or show
    Edit(edit::EditArgs),

    /// Delete a movie or show
    Delete(delete::DeleteArgs),

    /// Follow logins and logouts made by other processes
    Watch(watch::WatchArgs),

    /// Show the effective configuration
    Config(show_config::ConfigArgs),
}
