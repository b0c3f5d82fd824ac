//! HTTP client for the catalog REST service.

mod client;
mod endpoints;

pub use client::{ApiClient, DEFAULT_TIMEOUT};
pub(crate) use endpoints::*;
