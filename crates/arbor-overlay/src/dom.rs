use std::sync::Arc;

use arbor_core::anchor_id;

use crate::host::{DomHost, HostEntry, HostError};

/// Idempotent injection and lookup of render anchors in the host DOM.
///
/// Anchors are never removed here: an entry that disappears from the
/// sidebar takes its anchor down with the rest of its host-owned subtree.
pub struct DomReconciler {
    dom: Arc<dyn DomHost>,
}

impl DomReconciler {
    pub fn new(dom: Arc<dyn DomHost>) -> Self {
        Self { dom }
    }

    /// Ensure the entry has exactly one anchor container, returning its id.
    ///
    /// Re-invocation with an existing anchor is a no-op apart from clearing
    /// a stray arrow, so two overlapping triggers for the same entry cannot
    /// double-inject. A missing injection target is the host's DOM not
    /// being ready; the caller skips the entry until the next signal.
    pub async fn ensure_anchor(&self, entry: &HostEntry) -> Result<String, HostError> {
        let id = anchor_id(entry.kind, &entry.entity_ref);

        // An arrow from a previous run would otherwise double up next to
        // the fresh one.
        self.dom.remove_arrow(entry);

        if self.dom.element_exists(&id) {
            return Ok(id);
        }

        let selector = format!(
            ".{}[data-ref=\"{}\"]",
            entry.kind.entry_class(),
            entry.entity_ref
        );
        self.dom.inject(&id, &selector).await?;
        Ok(id)
    }
}
