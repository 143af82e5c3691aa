use std::sync::Arc;

use log::warn;

use arbor_core::collation::{sort_nodes, Collation};
use arbor_core::model::{Node, NodeKind};

use crate::host::HierarchyQuery;

/// Computes the ordered children of a node.
///
/// Filtered nodes resolve synchronously from their materialized subitems.
/// Plain nodes issue one host lookup, sort the result under the configured
/// collation and truncate it. A failed or empty lookup yields an empty
/// list; errors are logged here and never escape, the next external
/// signal re-attempts.
pub struct HierarchyResolver {
    query: Arc<dyn HierarchyQuery>,
    collation: Arc<dyn Collation>,
}

impl HierarchyResolver {
    pub fn new(query: Arc<dyn HierarchyQuery>, collation: Arc<dyn Collation>) -> Self {
        Self { query, collation }
    }

    pub async fn resolve(
        &self,
        node: &Node,
        hierarchy_property: &str,
        limit: usize,
    ) -> Vec<Node> {
        match &node.kind {
            NodeKind::Filtered(group) => group.subitems.clone(),
            NodeKind::Plain => {
                self.resolve_ref(&node.original_name, hierarchy_property, limit)
                    .await
            }
        }
    }

    /// Resolve by raw page name, the path taken for top-level sidebar
    /// entries where no `Node` exists yet.
    pub async fn resolve_ref(
        &self,
        raw_name: &str,
        hierarchy_property: &str,
        limit: usize,
    ) -> Vec<Node> {
        match self.query.related_pages(raw_name, hierarchy_property).await {
            Ok(Some(mut items)) => {
                sort_nodes(&mut items, &*self.collation);
                items.truncate(limit);
                items
            }
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!("hierarchy lookup for \"{}\" failed: {}", raw_name, err);
                Vec::new()
            }
        }
    }
}
