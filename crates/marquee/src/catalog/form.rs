//! Add/edit form controller.

use tracing::{debug, info, instrument, warn};

use crate::Result;
use crate::error::{AuthError, Error, ValidationError};
use crate::types::{ItemId, UserId};

use super::item::{CatalogItem, Category, ItemFields};
use super::list::CatalogList;

/// In-progress form state: a partial catalog item.
///
/// A draft carrying an identifier is an edit of that item; one without is a
/// new item.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Draft {
    pub id: Option<ItemId>,
    pub title: String,
    pub category: Option<Category>,
    pub director: Option<String>,
    pub budget: Option<f64>,
    pub location: Option<String>,
    pub duration: Option<String>,
    pub year: Option<i32>,
    pub poster: Option<String>,
}

impl Draft {
    /// A draft holding every field of `item`, identifier included.
    pub fn from_item(item: &CatalogItem) -> Self {
        let fields = item.fields.clone();
        Self {
            id: Some(item.id.clone()),
            title: fields.title,
            category: Some(fields.category),
            director: fields.director,
            budget: fields.budget,
            location: fields.location,
            duration: fields.duration,
            year: fields.year,
            poster: fields.poster,
        }
    }

    /// True if submitting updates an existing item.
    pub fn is_edit(&self) -> bool {
        self.id.is_some()
    }

    pub fn is_empty(&self) -> bool {
        *self == Draft::default()
    }

    /// Check required fields and produce the submission payload.
    pub fn validate(&self) -> std::result::Result<ItemFields, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::Required { field: "title" });
        }
        let category = self
            .category
            .ok_or(ValidationError::Required { field: "category" })?;
        if self.budget.is_some_and(|budget| budget < 0.0) {
            return Err(ValidationError::Negative { field: "budget" });
        }

        Ok(ItemFields {
            title: title.to_string(),
            category,
            director: non_blank(&self.director),
            budget: self.budget,
            location: non_blank(&self.location),
            duration: non_blank(&self.duration),
            year: self.year,
            poster: non_blank(&self.poster),
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Gate in front of destructive actions.
pub trait Confirm {
    /// Ask the user; true means go ahead.
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// What a successful submit did.
#[derive(Clone, Debug, PartialEq)]
pub enum Submitted {
    Added(CatalogItem),
    Updated(CatalogItem),
}

/// What a remove request did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Removal {
    Deleted,
    Declined,
}

/// Owns the draft and turns submit/delete intents into service calls plus
/// reconciliation of the list.
#[derive(Debug)]
pub struct FormController {
    list: CatalogList,
    draft: Draft,
}

impl FormController {
    pub fn new(list: CatalogList) -> Self {
        Self {
            list,
            draft: Draft::default(),
        }
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }

    /// Discard the draft.
    pub fn clear(&mut self) {
        self.draft = Draft::default();
    }

    /// Load `item` into the draft; the next submit updates it.
    pub fn select_for_edit(&mut self, item: &CatalogItem) {
        debug!(id = %item.id, "Editing item");
        self.draft = Draft::from_item(item);
    }

    /// Validate and submit the draft.
    ///
    /// Invalid drafts post a notice and never reach the network. On success
    /// the list is reconciled and the draft cleared; on failure the draft is
    /// kept for another attempt.
    #[instrument(skip(self), fields(edit = self.draft.is_edit()))]
    pub async fn submit(&mut self) -> Result<Submitted> {
        let fields = match self.draft.validate() {
            Ok(fields) => fields,
            Err(e) => {
                debug!(error = %e, "Draft rejected");
                self.list.notices().error(e.to_string());
                return Err(e.into());
            }
        };

        let result = match self.draft.id.clone() {
            Some(id) => self.update(&id, &fields).await,
            None => self.add(&fields).await,
        };

        match result {
            Ok(submitted) => {
                self.draft = Draft::default();
                Ok(submitted)
            }
            Err(e) => Err(self.report(e, "Failed to save movie")),
        }
    }

    async fn add(&self, fields: &ItemFields) -> Result<Submitted> {
        let token = self.token()?;
        let owner = self.owner().await?;

        let item = self.list.api().add_item(&token, &owner, fields).await?;
        info!(id = %item.id, "Added item");

        self.list.prepend(item.clone());
        self.list.notices().success("Movie added");
        Ok(Submitted::Added(item))
    }

    async fn update(&self, id: &ItemId, fields: &ItemFields) -> Result<Submitted> {
        let token = self.token()?;

        let item = self.list.api().update_item(&token, id, fields).await?;
        info!(id = %item.id, "Updated item");

        if !self.list.replace(item.clone()) {
            debug!(id = %item.id, "Updated item is not loaded; list unchanged");
        }
        self.list.notices().success("Movie updated");
        Ok(Submitted::Updated(item))
    }

    /// Delete an item after the user confirms.
    ///
    /// Declining sends nothing. A failed delete leaves the list untouched
    /// and is not retried.
    #[instrument(skip(self, confirm))]
    pub async fn remove(&mut self, id: &ItemId, confirm: &dyn Confirm) -> Result<Removal> {
        let label = self
            .list
            .find(id)
            .map(|item| format!("\"{}\"", item.title()))
            .unwrap_or_else(|| format!("item {}", id));

        if !confirm.confirm(&format!("Delete {}?", label)) {
            debug!("Delete declined");
            return Ok(Removal::Declined);
        }

        let token = match self.token() {
            Ok(token) => token,
            Err(e) => return Err(self.report(e, "Failed to delete movie")),
        };

        if let Err(e) = self.list.api().delete_item(&token, id).await {
            return Err(self.report(e, "Failed to delete movie"));
        }

        info!("Deleted item");
        self.list.remove(id);
        if self.draft.id.as_ref() == Some(id) {
            self.draft = Draft::default();
        }
        self.list.notices().success("Movie deleted");
        Ok(Removal::Deleted)
    }

    fn token(&self) -> Result<crate::auth::Token> {
        self.list
            .session()
            .token()
            .ok_or_else(|| AuthError::MissingToken.into())
    }

    async fn owner(&self) -> Result<UserId> {
        match self.list.user() {
            Some(user) => Ok(user.id),
            None => Ok(self.list.resolve_user().await?.id),
        }
    }

    /// Turn a failure into a notice, ending the session on token rejection.
    fn report(&self, error: Error, fallback: &str) -> Error {
        if error.is_auth_error() {
            return self.list.invalidate_session(error);
        }
        warn!(error = %error, "Form action failed");
        self.list.notices().error(error.user_message(fallback));
        error
    }
}
