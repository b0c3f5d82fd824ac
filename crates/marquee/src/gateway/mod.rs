//! Catalog service gateway abstraction.
//!
//! This module provides the seam between controllers and the remote
//! service, so controllers can be driven by the HTTP implementation in
//! production and by in-process fakes in tests.

mod http;

pub use http::HttpGateway;

use async_trait::async_trait;

use crate::Result;
use crate::auth::{Credentials, Registration, Token, UserProfile};
use crate::catalog::{CatalogItem, ItemFields};
use crate::types::{ItemId, UserId};

/// Domain operations offered by the catalog service.
///
/// Implementations are stateless: every authenticated call receives the
/// token explicitly and never retries on rejection.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Register a new account.
    async fn signup(&self, registration: &Registration) -> Result<()>;

    /// Exchange credentials for a bearer token.
    async fn login(&self, credentials: &Credentials) -> Result<Token>;

    /// Fetch the profile of the token's owner.
    async fn profile(&self, token: &Token) -> Result<UserProfile>;

    /// Fetch one page (1-based) of the owner's catalog, at most `limit` items.
    async fn list_items(
        &self,
        token: &Token,
        owner: &UserId,
        page: u32,
        limit: u32,
    ) -> Result<Vec<CatalogItem>>;

    /// Create an item owned by `owner`; returns it with its new identifier.
    async fn add_item(
        &self,
        token: &Token,
        owner: &UserId,
        fields: &ItemFields,
    ) -> Result<CatalogItem>;

    /// Replace every field of an existing item.
    async fn update_item(
        &self,
        token: &Token,
        id: &ItemId,
        fields: &ItemFields,
    ) -> Result<CatalogItem>;

    /// Delete an item.
    async fn delete_item(&self, token: &Token, id: &ItemId) -> Result<()>;
}
