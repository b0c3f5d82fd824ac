//! marquee - Personal movie and TV-show catalog client
//!
//! This library drives a remote catalog REST service: account signup and
//! login, a persisted session, and a paginated, filterable list of the
//! signed-in user's movies and shows with add, edit and delete.
//!
//! All state a view needs is owned by controllers that publish changes on
//! watch channels and report failures as [`Notice`]s.
//!
//! # Example
//!
//! ```no_run
//! use marquee::{ApiUrl, App, Credentials, Filter, SessionStore};
//!
//! # async fn example() -> Result<(), marquee::Error> {
//! let api = ApiUrl::new("https://movies.example.com/api")?;
//! let app = App::connect(api, SessionStore::in_memory(), 20)?;
//!
//! app.auth()
//!     .login(&Credentials::new("alice@example.com", "hunter2"))
//!     .await?;
//! app.list().resolve_user().await?;
//! app.list().load_next().await?;
//!
//! for item in app.list().visible(&Filter::new().search("dark")) {
//!     println!("{} ({})", item.title(), item.category());
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod app;
pub mod auth;
pub mod catalog;
pub mod error;
pub mod gateway;
pub mod notice;
pub mod route;
pub mod session;
pub mod types;

// Re-export primary types at crate root for convenience
pub use app::App;
pub use auth::{Authenticator, Credentials, Registration, Token, UserProfile};
pub use catalog::{
    CatalogItem, CatalogList, Category, Confirm, Draft, Filter, FormController, ItemFields,
    LoadOutcome, Phase, Removal, Submitted,
};
pub use error::Error;
pub use gateway::{CatalogApi, HttpGateway};
pub use notice::{Notice, NoticeLevel, Notices};
pub use route::Route;
pub use session::{FileSlot, SessionState, SessionStore, SlotWatcher};
pub use types::{ApiUrl, ItemId, UserId};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
