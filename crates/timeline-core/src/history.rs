//! Snapshot-based undo/redo history.
//!
//! - Undo/redo stacks of [`ProjectSnapshot`]s (elements, tracks, markers)
//! - Pushing a new entry clears the redo stack
//! - Bounded depth: the oldest entries are evicted first

use std::collections::VecDeque;

use layercut_project_model::ProjectSnapshot;

/// Undo/redo stacks of project snapshots.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: VecDeque<ProjectSnapshot>,
    redo_stack: Vec<ProjectSnapshot>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Record the state as it was *before* a command.
    pub fn push(&mut self, snapshot: ProjectSnapshot) {
        self.redo_stack.clear();
        self.undo_stack.push_back(snapshot);
        while self.undo_stack.len() > self.capacity {
            self.undo_stack.pop_front();
        }
        tracing::trace!(undo_depth = self.undo_stack.len(), "History entry pushed");
    }

    /// Step back. `current` is kept for redo; returns the snapshot to restore.
    pub fn undo(&mut self, current: ProjectSnapshot) -> Option<ProjectSnapshot> {
        let previous = self.undo_stack.pop_back()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Step forward again after an undo.
    pub fn redo(&mut self, current: ProjectSnapshot) -> Option<ProjectSnapshot> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push_back(current);
        while self.undo_stack.len() > self.capacity {
            self.undo_stack.pop_front();
        }
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
