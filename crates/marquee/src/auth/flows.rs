//! Signup, login and logout flows.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::Result;
use crate::gateway::CatalogApi;
use crate::notice::Notices;
use crate::route::Route;
use crate::session::SessionStore;

use super::credentials::{Credentials, Registration};

/// Drives the authentication screens.
///
/// Every flow posts its outcome as a notice and returns the route to show
/// next. Failures leave the session untouched.
#[derive(Clone)]
pub struct Authenticator {
    api: Arc<dyn CatalogApi>,
    session: SessionStore,
    notices: Notices,
}

impl Authenticator {
    pub fn new(api: Arc<dyn CatalogApi>, session: SessionStore, notices: Notices) -> Self {
        Self {
            api,
            session,
            notices,
        }
    }

    /// Register an account. Blank fields are rejected before any request.
    ///
    /// On success the login screen follows; the new account is not signed in.
    #[instrument(skip(self, password), fields(username = %username, email = %email))]
    pub async fn signup(&self, username: &str, email: &str, password: &str) -> Result<Route> {
        let registration = match Registration::new(username, email, password) {
            Ok(registration) => registration,
            Err(e) => {
                self.notices.error(e.user_message("Please fill all fields"));
                return Err(e);
            }
        };

        if let Err(e) = self.api.signup(&registration).await {
            warn!(error = %e, "Signup failed");
            self.notices.error(e.user_message("Signup failed"));
            return Err(e);
        }

        info!("Account registered");
        self.notices.success("Signup successful! Please login.");
        Ok(Route::Login)
    }

    /// Exchange credentials for a token and start the session.
    #[instrument(skip(self, credentials), fields(email = %credentials.email()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<Route> {
        let token = match self.api.login(credentials).await {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Login failed");
                self.notices.error(e.user_message("Login failed"));
                return Err(e);
            }
        };

        if let Err(e) = self.session.sign_in(token) {
            self.notices.error(e.user_message("Login failed"));
            return Err(e);
        }

        self.notices.success("Login successful!");
        Ok(Route::Dashboard)
    }

    /// End the session.
    ///
    /// The session is over even if the slot could not be cleared; the error
    /// is still returned so the caller can report it.
    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<Route> {
        let result = self.session.end();
        self.notices.success("Logged out successfully");
        result.map(|()| Route::Login)
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
