//! REST endpoint definitions and request/response types.

use serde::{Deserialize, Serialize};

use crate::catalog::ItemFields;
use crate::types::{ItemId, UserId};

// ============================================================================
// Endpoint Paths
// ============================================================================

/// POST, unauthenticated.
pub const SIGNUP: &str = "auth/signup";

/// POST, unauthenticated.
pub const LOGIN: &str = "auth/login";

/// GET, bearer token.
pub const PROFILE: &str = "auth/profile";

/// GET (paged listing) and POST (add), bearer token.
pub const MOVIES: &str = "movies";

/// Path of a single catalog item, for PUT and DELETE.
pub fn movie(id: &ItemId) -> String {
    format!("{}/{}", MOVIES, id)
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for signup.
#[derive(Debug, Serialize)]
pub struct SignupRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Request body for login.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Response from login. Only the token is consumed.
#[derive(Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Query parameters for a catalog page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMoviesQuery<'a> {
    pub user_id: &'a str,
    pub page: u32,
    pub limit: u32,
}

/// Request body for adding an item: the item fields plus the owner.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMovieRequest<'a> {
    #[serde(flatten)]
    pub fields: &'a ItemFields,
    pub user_id: &'a UserId,
}

/// Error response body.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
