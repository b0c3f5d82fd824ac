//! Authentication types and flows.
//!
//! Credentials never reach a log line; the token is only ever held by the
//! [`SessionStore`](crate::session::SessionStore).

mod credentials;
mod flows;
mod profile;
mod token;

pub use credentials::{Credentials, Registration};
pub use flows::Authenticator;
pub use profile::UserProfile;
pub use token::Token;
