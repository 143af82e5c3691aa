use std::collections::HashMap;
use std::sync::Arc;

use crate::model::Node;

/// Expand/load state of one node within a rendered root.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeEntry {
    pub expanded: bool,
    /// `None` until the node's children have been resolved once.
    pub items: Option<Vec<Node>>,
}

impl NodeEntry {
    pub fn phase(&self) -> NodePhase {
        match (self.expanded, &self.items) {
            (false, _) => NodePhase::Collapsed,
            (true, None) => NodePhase::Loading,
            (true, Some(_)) => NodePhase::Expanded,
        }
    }
}

/// Node-level state machine. A failed resolve still reaches `Expanded`,
/// with an empty child list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodePhase {
    Collapsed,
    Loading,
    Expanded,
}

/// Immutable view of one root's tree state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeSnapshot {
    root_expanded: bool,
    roots: Vec<Node>,
    nodes: HashMap<String, NodeEntry>,
}

impl TreeSnapshot {
    pub fn root_expanded(&self) -> bool {
        self.root_expanded
    }

    /// Top-level items of this root, as produced by the last resolve pass.
    pub fn roots(&self) -> &[Node] {
        &self.roots
    }

    pub fn entry(&self, key: &str) -> Option<&NodeEntry> {
        self.nodes.get(key)
    }
}

/// Expand/load state for one rendered root (one favorite/recent entry).
///
/// Updates are copy-on-write: every mutation installs a fresh snapshot, so
/// an observer holding a previous `Arc<TreeSnapshot>` keeps reading a
/// complete, consistent state. Overlapping passes over the same root thus
/// interleave as whole-snapshot replacements, never torn reads.
pub struct TreeStateStore {
    snapshot: Arc<TreeSnapshot>,
}

impl TreeStateStore {
    pub fn new() -> Self {
        Self {
            snapshot: Arc::new(TreeSnapshot::default()),
        }
    }

    pub fn snapshot(&self) -> Arc<TreeSnapshot> {
        Arc::clone(&self.snapshot)
    }

    fn update(&mut self, mutate: impl FnOnce(&mut TreeSnapshot)) {
        let mut next = (*self.snapshot).clone();
        mutate(&mut next);
        self.snapshot = Arc::new(next);
    }

    /// Install a freshly resolved top-level item list.
    ///
    /// A structurally different list discards all descendant expand/load
    /// state; an identical one is a no-op. Root expansion survives either
    /// way, keeping the entry's own arrow stable across re-renders.
    /// Returns whether a reset happened.
    pub fn replace_roots(&mut self, items: Vec<Node>) -> bool {
        if self.snapshot.roots == items {
            return false;
        }
        self.update(|snapshot| {
            snapshot.roots = items;
            snapshot.nodes.clear();
        });
        true
    }

    /// Flip the expansion of the entry itself (the rendered root).
    pub fn toggle_root(&mut self) {
        self.update(|snapshot| snapshot.root_expanded = !snapshot.root_expanded);
    }

    /// Flip `expanded` for one node. Touches no other key and does not
    /// require the node's items to be loaded, so a node can be toggled
    /// while its resolve is still in flight.
    pub fn toggle(&mut self, key: &str) {
        self.update(|snapshot| {
            let entry = snapshot
                .nodes
                .entry(key.to_string())
                .or_insert(NodeEntry {
                    expanded: false,
                    items: None,
                });
            entry.expanded = !entry.expanded;
        });
    }

    /// Install resolved children for `key` unless already loaded.
    ///
    /// Idempotent: a second call for a loaded key is a no-op even with the
    /// same items. A pre-toggled entry keeps its expanded flag, completing
    /// the Loading → Expanded transition. Returns whether items were
    /// installed.
    pub fn ensure_loaded(&mut self, key: &str, items: Vec<Node>) -> bool {
        if matches!(self.snapshot.nodes.get(key), Some(entry) if entry.items.is_some()) {
            return false;
        }
        self.update(|snapshot| {
            let entry = snapshot
                .nodes
                .entry(key.to_string())
                .or_insert(NodeEntry {
                    expanded: false,
                    items: None,
                });
            entry.items = Some(items);
        });
        true
    }
}

impl Default for TreeStateStore {
    fn default() -> Self {
        Self::new()
    }
}
