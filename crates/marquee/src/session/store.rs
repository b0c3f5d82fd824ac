//! Observable session state.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::Result;
use crate::auth::Token;

use super::slot::{MemorySlot, TokenSlot};

/// Whether the user currently holds a token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated(Token),
}

impl SessionState {
    fn from_token(token: Option<Token>) -> Self {
        match token {
            Some(token) => SessionState::Authenticated(token),
            None => SessionState::Anonymous,
        }
    }

    pub fn token(&self) -> Option<&Token> {
        match self {
            SessionState::Authenticated(token) => Some(token),
            SessionState::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }
}

/// The single owner of the session token.
///
/// Every change is persisted to the backing [`TokenSlot`] and then published
/// on one watch channel; views and controllers subscribe instead of reading
/// the slot themselves.
///
/// Cheap to clone: clones share the same state and channel.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    slot: Box<dyn TokenSlot>,
    state: watch::Sender<SessionState>,
}

impl SessionStore {
    /// Open a store over `slot`, starting from whatever token it holds.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be read.
    pub fn open(slot: impl TokenSlot + 'static) -> Result<Self> {
        let initial = SessionState::from_token(slot.load()?);
        debug!(authenticated = initial.is_authenticated(), "Opened session store");

        let (state, _) = watch::channel(initial);
        Ok(Self {
            inner: Arc::new(StoreInner {
                slot: Box::new(slot),
                state,
            }),
        })
    }

    /// A store that lives only as long as the process.
    pub fn in_memory() -> Self {
        let (state, _) = watch::channel(SessionState::Anonymous);
        Self {
            inner: Arc::new(StoreInner {
                slot: Box::new(MemorySlot::new()),
                state,
            }),
        }
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// Current token, if authenticated.
    pub fn token(&self) -> Option<Token> {
        self.inner.state.borrow().token().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    /// Subscribe to session changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Store a freshly issued token and publish it.
    #[instrument(skip(self, token))]
    pub fn sign_in(&self, token: Token) -> Result<()> {
        self.inner.slot.store(&token)?;
        self.publish(SessionState::Authenticated(token));
        info!("Session started");
        Ok(())
    }

    /// End the session: clear the slot and publish the anonymous state.
    ///
    /// The anonymous state is published even if clearing the slot fails,
    /// so the rejected token is never used again by this process.
    #[instrument(skip(self))]
    pub fn end(&self) -> Result<()> {
        let cleared = self.inner.slot.clear();
        if let Err(ref e) = cleared {
            warn!(error = %e, "Failed to clear session slot");
        }
        self.publish(SessionState::Anonymous);
        info!("Session ended");
        cleared
    }

    /// Re-read the slot and publish if another writer changed it.
    ///
    /// Returns true if the published state changed.
    pub fn reload(&self) -> Result<bool> {
        let latest = SessionState::from_token(self.inner.slot.load()?);
        let changed = self.publish(latest);
        if changed {
            debug!("Session slot changed externally");
        }
        Ok(changed)
    }

    pub(crate) fn slot(&self) -> &dyn TokenSlot {
        self.inner.slot.as_ref()
    }

    fn publish(&self, next: SessionState) -> bool {
        self.inner.state.send_if_modified(|state| {
            if *state == next {
                false
            } else {
                *state = next;
                true
            }
        })
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .field("path", &self.inner.slot.path())
            .finish()
    }
}
