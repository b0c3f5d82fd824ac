//! Session-gated route selection.

use std::fmt;

use crate::session::SessionState;

/// Screens of the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Login,
    Signup,
    Dashboard,
}

impl Route {
    /// Where the root location leads for the given session.
    pub fn root(session: &SessionState) -> Route {
        if session.is_authenticated() {
            Route::Dashboard
        } else {
            Route::Login
        }
    }

    /// The route actually shown when `self` is requested.
    ///
    /// The dashboard is gated on a token and falls back to login;
    /// the authentication screens are always reachable.
    pub fn resolve(self, session: &SessionState) -> Route {
        match self {
            Route::Dashboard if !session.is_authenticated() => Route::Login,
            other => other,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Route::Login => "/login",
            Route::Signup => "/signup",
            Route::Dashboard => "/dashboard",
        })
    }
}
