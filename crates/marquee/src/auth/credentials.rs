//! Login and signup credential types.

use std::fmt;

use crate::error::{Error, ValidationError};

/// Login credentials for the catalog service.
///
/// # Security
///
/// The password is never exposed in Debug output to prevent accidental logging.
///
/// # Example
///
/// ```
/// use marquee::Credentials;
///
/// let creds = Credentials::new("alice@example.com", "hunter2");
/// assert_eq!(creds.email(), "alice@example.com");
/// ```
#[derive(Clone)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    /// Create new credentials.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Returns the account email.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the password.
    ///
    /// Use this only when constructing authentication requests.
    pub(crate) fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Details for registering a new account.
#[derive(Clone)]
pub struct Registration {
    username: String,
    email: String,
    password: String,
}

impl Registration {
    /// Create a registration, rejecting blank fields before anything is sent.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Incomplete`] if any field is blank.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, Error> {
        let registration = Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        };

        let blank = [
            &registration.username,
            &registration.email,
            &registration.password,
        ]
        .iter()
        .any(|field| field.trim().is_empty());

        if blank {
            return Err(ValidationError::Incomplete.into());
        }

        Ok(registration)
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
