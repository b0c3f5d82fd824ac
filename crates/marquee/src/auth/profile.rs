//! Authenticated user profile.

use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// The profile returned for a valid token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(alias = "_id")]
    pub id: UserId,
    pub username: String,
    pub email: String,
}
