//! Core catalog service types.
//!
//! These types enforce invariants at construction time,
//! ensuring invalid states are unrepresentable.

mod api_url;
mod id;

pub use api_url::ApiUrl;
pub use id::{ItemId, UserId};
