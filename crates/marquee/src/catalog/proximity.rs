//! Proximity trigger port.
//!
//! The list controller only needs to hear "more data should be loaded".
//! How that is detected (viewport intersection, a key press, a terminal
//! prompt) belongs to the view, which holds the [`ProximitySignal`] end.
//!
//! The view re-arms the signal with its current last row after every
//! render, since appending or filtering changes which row is last. Only
//! visibility of the armed row fires, once per arming. Dropping the signal
//! releases the port and ends any task consuming the trigger.

use std::sync::{Mutex, PoisonError};

use tokio::sync::mpsc;
use tracing::trace;

use crate::types::ItemId;

/// Create a connected signal/trigger pair.
pub fn proximity() -> (ProximitySignal, ProximityTrigger) {
    // Capacity 1: bursts collapse into one pending signal
    let (tx, rx) = mpsc::channel(1);
    (
        ProximitySignal {
            armed: Mutex::new(None),
            tx,
        },
        ProximityTrigger { rx },
    )
}

/// The detector side, owned by the view.
#[derive(Debug)]
pub struct ProximitySignal {
    armed: Mutex<Option<ItemId>>,
    tx: mpsc::Sender<()>,
}

impl ProximitySignal {
    /// Observe `last_row` as the row whose visibility asks for more.
    ///
    /// Pass `None` when nothing is rendered.
    pub fn arm(&self, last_row: Option<&ItemId>) {
        trace!(row = ?last_row, "arming proximity detector");
        *self.armed.lock().unwrap_or_else(PoisonError::into_inner) = last_row.cloned();
    }

    /// Report that `row` became visible.
    ///
    /// Returns true if this fired the trigger. Rows other than the armed
    /// one are ignored, and the detector disarms after firing.
    pub fn row_visible(&self, row: &ItemId) -> bool {
        let mut armed = self.armed.lock().unwrap_or_else(PoisonError::into_inner);
        if armed.as_ref() != Some(row) {
            return false;
        }
        *armed = None;

        match self.tx.try_send(()) {
            Ok(()) | Err(mpsc::error::TrySendError::Full(())) => true,
            Err(mpsc::error::TrySendError::Closed(())) => false,
        }
    }

    /// Stop observing and release the port.
    pub fn release(self) {}
}

/// The consumer side, handed to [`CatalogList::attach`](super::CatalogList::attach).
#[derive(Debug)]
pub struct ProximityTrigger {
    rx: mpsc::Receiver<()>,
}

impl ProximityTrigger {
    /// Wait for the next signal. Returns false once the signal is released.
    pub async fn triggered(&mut self) -> bool {
        self.rx.recv().await.is_some()
    }
}
