//! API base URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{Error, InvalidInputError};

/// A validated base URL for the catalog service.
///
/// Endpoint paths such as `/auth/login` or `/movies` are resolved relative
/// to this base, so a base of `https://example.com/api` yields
/// `https://example.com/api/movies`.
///
/// The URL must use HTTPS; plain HTTP is only accepted for localhost.
///
/// # Example
///
/// ```
/// use marquee::ApiUrl;
///
/// let api = ApiUrl::new("https://movies.example.com/api/").unwrap();
/// assert_eq!(api.endpoint("/movies"), "https://movies.example.com/api/movies");
///
/// let local = ApiUrl::new("http://localhost:5000/api").unwrap();
/// assert_eq!(local.endpoint("auth/login"), "http://localhost:5000/api/auth/login");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApiUrl(Url);

const LOOPBACK_HOSTS: [&str; 3] = ["localhost", "127.0.0.1", "[::1]"];

impl ApiUrl {
    /// Parse and validate a base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not absolute, has no host, or uses
    /// plain HTTP for anything but a loopback host.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let reject = |reason: &str| -> Error {
            InvalidInputError::ApiUrl {
                value: s.to_string(),
                reason: reason.to_string(),
            }
            .into()
        };

        let mut url = Url::parse(s).map_err(|e| reject(&e.to_string()))?;
        if url.cannot_be_a_base() {
            return Err(reject("must be an absolute URL"));
        }
        let Some(host) = url.host_str() else {
            return Err(reject("must have a host"));
        };
        let loopback = LOOPBACK_HOSTS.contains(&host);
        match url.scheme() {
            "https" => {}
            "http" if loopback => {}
            _ => return Err(reject("must use HTTPS (HTTP allowed only for localhost)")),
        }

        // Paths are joined onto the base, so it carries no trailing slash,
        // query or fragment
        let path = url.path().trim_end_matches('/').to_string();
        url.set_path(&path);
        url.set_query(None);
        url.set_fragment(None);

        Ok(Self(url))
    }

    /// Returns the full URL for an endpoint path.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.0.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    /// True for a service running on this machine.
    pub fn is_local(&self) -> bool {
        self.host().is_some_and(|h| LOOPBACK_HOSTS.contains(&h))
    }
}

impl fmt::Display for ApiUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl FromStr for ApiUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ApiUrl {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<ApiUrl> for String {
    fn from(api: ApiUrl) -> Self {
        api.0.into()
    }
}
