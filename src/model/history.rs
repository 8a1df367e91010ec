use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::edge::Edge;
use super::node::Node;
use super::zone::Zone;

/// Default bound on the number of snapshots kept.
pub const MAX_HISTORY_LENGTH: usize = 50;

/// One fully materialised copy of the graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub zones: Vec<Zone>,
}

/// Linear undo/redo over whole-graph snapshots.
///
/// Always holds at least one entry; `index` points at the snapshot that
/// matches the live graph.
#[derive(Debug, Clone)]
pub struct UndoHistory {
    entries: VecDeque<GraphSnapshot>,
    index: usize,
    max_len: usize,
}

impl UndoHistory {
    pub fn new(initial: GraphSnapshot) -> Self {
        Self::with_limit(initial, MAX_HISTORY_LENGTH)
    }

    /// History bounded to `max_len` snapshots (at least one).
    pub fn with_limit(initial: GraphSnapshot, max_len: usize) -> Self {
        let mut entries = VecDeque::with_capacity(max_len.max(1));
        entries.push_back(initial);
        Self {
            entries,
            index: 0,
            max_len: max_len.max(1),
        }
    }

    /// Record the state produced by a mutation. Drops any redo-able future,
    /// then evicts from the front once the bound is exceeded.
    pub fn record(&mut self, snapshot: GraphSnapshot) {
        self.entries.truncate(self.index + 1);
        self.entries.push_back(snapshot);
        while self.entries.len() > self.max_len {
            self.entries.pop_front();
        }
        self.index = self.entries.len() - 1;
    }

    /// Step back one snapshot, returning it.
    pub fn undo(&mut self) -> Option<&GraphSnapshot> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        self.entries.get(self.index)
    }

    /// Step forward one snapshot, returning it.
    pub fn redo(&mut self) -> Option<&GraphSnapshot> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        self.entries.get(self.index)
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// Replace everything with a history of one.
    pub fn reset(&mut self, snapshot: GraphSnapshot) {
        self.entries.clear();
        self.entries.push_back(snapshot);
        self.index = 0;
    }

    pub fn current(&self) -> Option<&GraphSnapshot> {
        self.entries.get(self.index)
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new(GraphSnapshot::default())
    }
}
