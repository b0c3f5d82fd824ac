//! Catalog entry types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};
use crate::types::ItemId;

/// The kind of catalog entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Movie,
    #[serde(rename = "TVShow")]
    TvShow,
}

impl Category {
    /// Returns the wire name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Movie => "Movie",
            Category::TvShow => "TVShow",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "movie" | "film" => Ok(Category::Movie),
            "tvshow" | "tv" | "show" | "series" => Ok(Category::TvShow),
            _ => Err(InvalidInputError::Category {
                value: s.to_string(),
            }
            .into()),
        }
    }
}

/// Every field of a catalog entry except its identifier.
///
/// This is the payload of both add and update requests. Updates are
/// full-field replacements, so absent optional fields are cleared.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFields {
    pub title: String,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
}

/// A persisted catalog entry.
///
/// The identifier is always assigned by the service; the client never
/// fabricates one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    #[serde(alias = "_id")]
    pub id: ItemId,
    #[serde(flatten)]
    pub fields: ItemFields,
}

impl CatalogItem {
    pub fn title(&self) -> &str {
        &self.fields.title
    }

    pub fn category(&self) -> Category {
        self.fields.category
    }
}
