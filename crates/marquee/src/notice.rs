//! User-facing notices.
//!
//! Controllers never surface failures by panicking or by letting errors
//! escape to the view; they post a notice here and leave prior state intact.
//! Notices stay active until the view dismisses them.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

/// Severity of a notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A dismissible message for the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, Default)]
struct Board {
    next_id: u64,
    active: Vec<Notice>,
}

/// Shared, cheaply cloneable board of active notices.
#[derive(Clone, Debug, Default)]
pub struct Notices {
    board: Arc<Mutex<Board>>,
}

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Post a notice and return its id.
    pub fn post(&self, level: NoticeLevel, message: impl Into<String>) -> u64 {
        let message = message.into();
        debug!(?level, %message, "notice");

        let mut board = self.lock();
        board.next_id += 1;
        let id = board.next_id;
        board.active.push(Notice { id, level, message });
        id
    }

    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.post(NoticeLevel::Info, message)
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.post(NoticeLevel::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.post(NoticeLevel::Error, message)
    }

    /// Dismiss a notice. Returns false if it was already gone.
    pub fn dismiss(&self, id: u64) -> bool {
        let mut board = self.lock();
        let before = board.active.len();
        board.active.retain(|n| n.id != id);
        board.active.len() != before
    }

    /// Snapshot of the active notices, oldest first.
    pub fn active(&self) -> Vec<Notice> {
        self.lock().active.clone()
    }

    /// Remove and return every active notice.
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut self.lock().active)
    }

    fn lock(&self) -> MutexGuard<'_, Board> {
        self.board.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
