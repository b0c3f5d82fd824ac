//! The paginated catalog list controller.
//!
//! The controller owns the items loaded so far for the signed-in user and
//! the pagination cursor. It enforces at most one outstanding page fetch:
//! load requests arriving while a fetch is in flight are dropped, not
//! queued. Each fetch carries the generation it was started in, and a
//! response from an older generation (the user changed or the list was
//! reset meanwhile) is discarded.
//!
//! The list follows the session channel: once a user is resolved, any
//! change of session (logout, a new login, an external write to the slot)
//! drops the user and everything loaded, so nothing carries over to the
//! next session.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::Result;
use crate::auth::{Token, UserProfile};
use crate::error::{AuthError, Error};
use crate::gateway::CatalogApi;
use crate::notice::Notices;
use crate::session::{SessionState, SessionStore};
use crate::types::{ItemId, UserId};

use super::filter::Filter;
use super::item::CatalogItem;
use super::proximity::ProximityTrigger;

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Notice shown when the profile cannot be fetched or a token is rejected.
pub const SESSION_EXPIRED: &str = "Session expired. Login again.";

/// Where the list stands in its browsing session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Nothing loaded yet, with or without a resolved user.
    Idle,
    /// A page fetch is in flight.
    Loading,
    /// The last page was full; the next one may be requested.
    MoreAvailable,
    /// The last page was short; nothing more is fetched until a reset.
    Exhausted,
}

/// Why a load request did nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Skipped {
    /// No user has been resolved.
    NoUser,
    /// Another fetch is in flight.
    InFlight,
    /// The catalog has been fully loaded.
    Exhausted,
}

/// Result of a load request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page was fetched and applied.
    Loaded {
        page: u32,
        received: usize,
        exhausted: bool,
    },
    /// No request was sent.
    Skipped(Skipped),
    /// The response arrived after a reset and was thrown away.
    Stale,
}

#[derive(Debug)]
struct ListState {
    session: watch::Receiver<SessionState>,
    user: Option<UserProfile>,
    items: Vec<CatalogItem>,
    phase: Phase,
    /// Last page successfully applied; 0 when nothing is loaded.
    page: u32,
    generation: u64,
}

impl ListState {
    fn new(session: watch::Receiver<SessionState>) -> Self {
        Self {
            session,
            user: None,
            items: Vec::new(),
            phase: Phase::Idle,
            page: 0,
            generation: 0,
        }
    }

    fn reset(&mut self, user: Option<UserProfile>) {
        self.user = user;
        self.items.clear();
        self.phase = Phase::Idle;
        self.page = 0;
        self.generation += 1;
    }

    /// Drop the resolved user if the session changed since it was resolved.
    ///
    /// Returns true if the state was reset.
    fn follow_session(&mut self) -> bool {
        if self.user.is_none() || !self.session.has_changed().unwrap_or(false) {
            return false;
        }
        self.session.borrow_and_update();
        debug!("Session changed; dropping loaded catalog");
        self.reset(None);
        true
    }
}

enum Target {
    Next,
    Page(u32),
}

/// Controller for the signed-in user's catalog.
///
/// Cheap to clone: clones drive the same list.
#[derive(Clone)]
pub struct CatalogList {
    inner: Arc<ListInner>,
}

struct ListInner {
    api: Arc<dyn CatalogApi>,
    session: SessionStore,
    notices: Notices,
    page_size: u32,
    state: Mutex<ListState>,
    revision: watch::Sender<u64>,
}

impl CatalogList {
    /// Create a list controller. A page size of 0 is raised to 1.
    pub fn new(
        api: Arc<dyn CatalogApi>,
        session: SessionStore,
        notices: Notices,
        page_size: u32,
    ) -> Self {
        let (revision, _) = watch::channel(0);
        let state = ListState::new(session.subscribe());
        Self {
            inner: Arc::new(ListInner {
                api,
                session,
                notices,
                page_size: page_size.max(1),
                state: Mutex::new(state),
                revision,
            }),
        }
    }

    pub fn page_size(&self) -> u32 {
        self.inner.page_size
    }

    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    /// True until a short page has been received for the current user.
    pub fn has_more(&self) -> bool {
        self.lock().phase != Phase::Exhausted
    }

    /// The resolved user, if any.
    pub fn user(&self) -> Option<UserProfile> {
        self.lock().user.clone()
    }

    /// Last page applied to the list; 0 when nothing is loaded.
    pub fn loaded_page(&self) -> u32 {
        self.lock().page
    }

    /// Every loaded item, in server order.
    pub fn items(&self) -> Vec<CatalogItem> {
        self.lock().items.clone()
    }

    /// Loaded items matching `filter`. Never fetches.
    pub fn visible(&self, filter: &Filter) -> Vec<CatalogItem> {
        let state = self.lock();
        filter.apply(&state.items).into_iter().cloned().collect()
    }

    pub fn find(&self, id: &ItemId) -> Option<CatalogItem> {
        self.lock().items.iter().find(|item| &item.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    /// Subscribe to state changes. The value is a revision counter that
    /// increases on every change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    /// Fetch the profile for the current token and start a fresh browsing
    /// session for that user.
    ///
    /// Any failure means the session is invalid: the token is cleared, a
    /// notice is posted and the error is returned.
    #[instrument(skip(self))]
    pub async fn resolve_user(&self) -> Result<UserProfile> {
        let Some(token) = self.inner.session.token() else {
            return Err(self.invalidate_session(AuthError::MissingToken.into()));
        };

        match self.inner.api.profile(&token).await {
            Ok(profile) => {
                info!(user = %profile.id, "Resolved user");
                {
                    let mut state = self.lock();
                    state.reset(Some(profile.clone()));
                    state.session.borrow_and_update();
                }
                self.publish();
                Ok(profile)
            }
            Err(e) => Err(self.invalidate_session(e)),
        }
    }

    /// Load the page after the last one applied.
    pub async fn load_next(&self) -> Result<LoadOutcome> {
        self.load(Target::Next).await
    }

    /// Load page `page` (1-based). Page 1 replaces the list; later pages
    /// append.
    pub async fn load_page(&self, page: u32) -> Result<LoadOutcome> {
        self.load(Target::Page(page.max(1))).await
    }

    #[instrument(skip(self, target))]
    async fn load(&self, target: Target) -> Result<LoadOutcome> {
        let (token, owner, page, generation) = {
            let mut state = self.lock();
            let owner = match (&state.user, state.phase) {
                (None, _) => Err(Skipped::NoUser),
                (_, Phase::Loading) => Err(Skipped::InFlight),
                (_, Phase::Exhausted) => Err(Skipped::Exhausted),
                (Some(user), _) => Ok(user.id.clone()),
            };
            let owner = match owner {
                Ok(owner) => owner,
                Err(reason) => {
                    drop(state);
                    debug!(?reason, "Load request skipped");
                    self.publish();
                    return Ok(LoadOutcome::Skipped(reason));
                }
            };

            let Some(token) = self.inner.session.token() else {
                drop(state);
                return Err(self.invalidate_session(AuthError::MissingToken.into()));
            };

            let page = match target {
                Target::Next => state.page + 1,
                Target::Page(page) => page,
            };

            state.phase = Phase::Loading;
            (token, owner, page, state.generation)
        };
        self.publish();

        let mut in_flight = InFlight {
            list: self,
            generation,
            settled: false,
        };
        debug!(page, generation, "Fetching catalog page");
        let result = self.fetch(&token, &owner, page).await;
        in_flight.settled = true;

        let mut state = self.lock();
        if state.generation != generation {
            drop(state);
            warn!(page, generation, "Discarding stale catalog page");
            self.publish();
            return Ok(LoadOutcome::Stale);
        }

        match result {
            Ok(items) => {
                let received = items.len();
                let exhausted = received < self.inner.page_size as usize;

                if received > 0 {
                    if page == 1 {
                        state.items = items;
                    } else {
                        state.items.extend(items);
                    }
                    state.page = page;
                }
                state.phase = if exhausted {
                    Phase::Exhausted
                } else {
                    Phase::MoreAvailable
                };
                drop(state);
                self.publish();

                debug!(page, received, exhausted, "Applied catalog page");
                Ok(LoadOutcome::Loaded {
                    page,
                    received,
                    exhausted,
                })
            }
            Err(e) => {
                state.phase = Phase::MoreAvailable;
                drop(state);

                if e.is_auth_error() {
                    return Err(self.invalidate_session(e));
                }

                warn!(page, error = %e, "Failed to load catalog page");
                self.inner
                    .notices
                    .error(e.user_message("Failed to load movies"));
                self.publish();
                Err(e)
            }
        }
    }

    async fn fetch(
        &self,
        token: &Token,
        owner: &UserId,
        page: u32,
    ) -> Result<Vec<CatalogItem>> {
        self.inner
            .api
            .list_items(token, owner, page, self.inner.page_size)
            .await
    }

    /// Drive loading from a proximity trigger until its detector is released.
    ///
    /// Each signal starts `load_next`; signals arriving while a fetch is in
    /// flight are no-ops.
    pub fn attach(&self, mut trigger: ProximityTrigger) -> JoinHandle<()> {
        let list = self.clone();
        tokio::spawn(async move {
            while trigger.triggered().await {
                let list = list.clone();
                tokio::spawn(async move {
                    // Failures are already reported as notices
                    let _ = list.load_next().await;
                });
            }
            debug!("Proximity detector released");
        })
    }

    /// Forget the user and everything loaded.
    pub fn reset(&self) {
        self.lock().reset(None);
        self.publish();
    }

    /// Insert a newly created item at the top.
    pub fn prepend(&self, item: CatalogItem) {
        self.lock().items.insert(0, item);
        self.publish();
    }

    /// Replace the item with the same identifier in place.
    ///
    /// Returns false if no such item is loaded.
    pub fn replace(&self, item: CatalogItem) -> bool {
        let replaced = {
            let mut state = self.lock();
            match state.items.iter_mut().find(|existing| existing.id == item.id) {
                Some(slot) => {
                    *slot = item;
                    true
                }
                None => false,
            }
        };
        if replaced {
            self.publish();
        }
        replaced
    }

    /// Remove the item with identifier `id`. Returns false if absent.
    pub fn remove(&self, id: &ItemId) -> bool {
        let removed = {
            let mut state = self.lock();
            let before = state.items.len();
            state.items.retain(|item| &item.id != id);
            state.items.len() != before
        };
        if removed {
            self.publish();
        }
        removed
    }

    /// End the session after a rejected or missing token.
    pub(crate) fn invalidate_session(&self, error: Error) -> Error {
        warn!(error = %error, "Session is no longer valid");

        // The slot failure is already logged; the session is over either way
        let _ = self.inner.session.end();
        self.inner.notices.error(SESSION_EXPIRED);
        self.reset();
        error
    }

    pub(crate) fn api(&self) -> &Arc<dyn CatalogApi> {
        &self.inner.api
    }

    pub(crate) fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    pub(crate) fn notices(&self) -> &Notices {
        &self.inner.notices
    }

    fn publish(&self) {
        self.inner.revision.send_modify(|revision| *revision += 1);
    }

    fn lock(&self) -> MutexGuard<'_, ListState> {
        let mut state = self
            .inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if state.follow_session() {
            self.publish();
        }
        state
    }
}

/// Marks a page fetch in flight. If the fetch is abandoned before its
/// outcome is applied (the load future was dropped), the list goes back to
/// MoreAvailable so the next trigger can retry.
struct InFlight<'a> {
    list: &'a CatalogList,
    generation: u64,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut state = self.list.lock();
        if state.generation == self.generation && state.phase == Phase::Loading {
            state.phase = Phase::MoreAvailable;
            drop(state);
            debug!(generation = self.generation, "Catalog fetch abandoned");
            self.list.publish();
        }
    }
}

impl std::fmt::Debug for CatalogList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("CatalogList")
            .field("user", &state.user.as_ref().map(|u| &u.id))
            .field("items", &state.items.len())
            .field("phase", &state.phase)
            .field("page", &state.page)
            .finish()
    }
}
