//! Opaque identifiers assigned by the catalog service.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// The raw wire form of a service identifier.
///
/// The service may hand out numeric or string identifiers. The received
/// representation is kept so the identifier is echoed back unchanged, both
/// in JSON bodies and in query strings.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

impl fmt::Display for RawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawId::Number(n) => write!(f, "{}", n),
            RawId::Text(s) => f.write_str(s),
        }
    }
}

impl RawId {
    fn parse(s: &str) -> Result<Self, Error> {
        let s = s.trim();
        if s.is_empty() {
            return Err(InvalidInputError::Id {
                value: s.to_string(),
                reason: "must be non-empty".to_string(),
            }
            .into());
        }
        Ok(match s.parse::<u64>() {
            Ok(n) => RawId::Number(n),
            Err(_) => RawId::Text(s.to_string()),
        })
    }
}

macro_rules! service_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(RawId);

        impl $name {
            /// Parse an identifier typed by a user.
            ///
            /// Digit-only input becomes a numeric identifier.
            ///
            /// # Errors
            ///
            /// Returns an error if the input is empty.
            pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
                RawId::parse(s.as_ref()).map(Self)
            }

            /// Returns true if the service issued a numeric identifier.
            pub fn is_numeric(&self) -> bool {
                matches!(self.0, RawId::Number(_))
            }
        }

        impl From<u64> for $name {
            fn from(n: u64) -> Self {
                Self(RawId::Number(n))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

service_id! {
    /// Identifier of a catalog item, assigned by the service on creation.
    ItemId
}

service_id! {
    /// Identifier of a user account.
    UserId
}
