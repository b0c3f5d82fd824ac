//! Catalog items, the paginated list controller and the add/edit form.

mod filter;
mod form;
mod item;
mod list;
mod proximity;

pub use filter::Filter;
pub use form::{Confirm, Draft, FormController, Removal, Submitted};
pub use item::{CatalogItem, Category, ItemFields};
pub use list::{CatalogList, DEFAULT_PAGE_SIZE, LoadOutcome, Phase, SESSION_EXPIRED, Skipped};
pub use proximity::{ProximitySignal, ProximityTrigger, proximity};
