//! Session state, its durable slot, and cross-process change propagation.

mod slot;
mod store;
mod watcher;

pub use slot::{FileSlot, MemorySlot, TOKEN_KEY, TokenSlot};
pub use store::{SessionState, SessionStore};
pub use watcher::{DEFAULT_POLL_INTERVAL, SlotWatcher};
