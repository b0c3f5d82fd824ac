//! Client-side filtering of the loaded catalog.
//!
//! Filters run over whatever has been loaded so far. They never fetch and
//! never touch pagination, so a filtered view can be empty while more
//! unfiltered pages remain loadable.

use super::item::{CatalogItem, Category};

/// Search term and category filter applied to the loaded items.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Filter {
    search: String,
    category: Option<Category>,
}

impl Filter {
    /// A filter that matches everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Match titles containing `search`, ignoring case. Blank matches all.
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into().trim().to_lowercase();
        self
    }

    /// Match only items of `category`.
    pub fn category(mut self, category: impl Into<Option<Category>>) -> Self {
        self.category = category.into();
        self
    }

    /// Returns true if the filter matches everything.
    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.category.is_none()
    }

    pub fn matches(&self, item: &CatalogItem) -> bool {
        let title_ok =
            self.search.is_empty() || item.title().to_lowercase().contains(&self.search);
        let category_ok = self.category.is_none_or(|c| c == item.category());
        title_ok && category_ok
    }

    /// Returns the matching items in their loaded order.
    pub fn apply<'a>(&self, items: &'a [CatalogItem]) -> Vec<&'a CatalogItem> {
        items.iter().filter(|item| self.matches(item)).collect()
    }
}
