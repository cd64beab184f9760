//! Undo/redo history as a bounded list of document snapshots.
//!
//! Each committed edit records a full deep copy of the element list. A
//! cursor points at the snapshot matching the current document; undo and
//! redo move the cursor and hand back the snapshot to restore. Recording
//! while the cursor sits mid-list truncates the redo tail first, and the
//! list is capped by dropping its oldest entry.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use serde::{Deserialize, Serialize};

use crate::consts::HISTORY_CAP;
use crate::element::Element;

/// Bounded snapshot history with a cursor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History {
    snapshots: Vec<Vec<Element>>,
    /// Index of the snapshot matching the current document.
    cursor: usize,
}

impl Default for History {
    /// Starts with one empty snapshot so the very first edit can be undone
    /// back to an empty canvas.
    fn default() -> Self {
        Self { snapshots: vec![Vec::new()], cursor: 0 }
    }
}

impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed history with a loaded document as its baseline.
    #[must_use]
    pub fn with_baseline(elements: Vec<Element>) -> Self {
        Self { snapshots: vec![elements], cursor: 0 }
    }

    /// Record the document state after an edit. Drops any redo tail, then
    /// evicts the oldest snapshot if over the cap.
    pub fn record(&mut self, elements: Vec<Element>) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(elements);
        if self.snapshots.len() > HISTORY_CAP {
            self.snapshots.remove(0);
        }
        self.cursor = self.snapshots.len() - 1;
    }

    /// The snapshot under the cursor, i.e. the last committed document
    /// state. The snapshot list is never empty, so this always exists.
    #[must_use]
    pub fn current(&self) -> &[Element] {
        &self.snapshots[self.cursor]
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Step back one snapshot, returning the state to restore.
    pub fn undo(&mut self) -> Option<Vec<Element>> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(self.snapshots[self.cursor].clone())
    }

    /// Step forward one snapshot, returning the state to restore.
    pub fn redo(&mut self) -> Option<Vec<Element>> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(self.snapshots[self.cursor].clone())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
