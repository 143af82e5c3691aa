use serde::{Deserialize, Serialize};

use crate::model::{Node, NodeKind};
use crate::state::TreeSnapshot;

/// Which glyph the host should draw in front of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeIcon {
    /// The configured quick-filter icon.
    Filter,
    /// Page-specific icon from the page's properties.
    Custom(String),
    /// The host's default page glyph.
    Default,
}

/// View model for one node row, ready for the host UI to draw below an
/// anchor. Pure data; the host owns the actual markup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderNode {
    pub key: String,
    pub label: String,
    pub icon: NodeIcon,
    /// Present when child data is known and non-empty; carries the arrow's
    /// expanded rotation. Absent means no arrow, nothing further to open.
    pub arrow: Option<bool>,
    /// Children of this node, included only while it is expanded.
    pub children: Vec<RenderNode>,
}

/// View model for a whole rendered root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderTree {
    /// Whether the entry's own sublist is unfolded.
    pub expanded: bool,
    pub nodes: Vec<RenderNode>,
}

/// Build the full view model for one root against its current snapshot.
pub fn build_tree(snapshot: &TreeSnapshot) -> RenderTree {
    RenderTree {
        expanded: snapshot.root_expanded(),
        nodes: build_level(snapshot.roots(), snapshot),
    }
}

fn build_level(items: &[Node], snapshot: &TreeSnapshot) -> Vec<RenderNode> {
    items
        .iter()
        .map(|item| {
            let key = item.state_key().to_string();
            let entry = snapshot.entry(&key);
            let loaded_items = entry.and_then(|entry| entry.items.as_deref());
            let has_children = loaded_items.map_or(false, |items| !items.is_empty());
            let expanded = entry.map_or(false, |entry| entry.expanded);

            let children = if expanded && has_children {
                build_level(loaded_items.unwrap_or_default(), snapshot)
            } else {
                Vec::new()
            };

            RenderNode {
                key,
                label: label_for(item),
                icon: icon_for(item),
                arrow: has_children.then_some(expanded),
                children,
            }
        })
        .collect()
}

fn icon_for(node: &Node) -> NodeIcon {
    if node.is_filtered() {
        NodeIcon::Filter
    } else if let Some(icon) = node.icon() {
        NodeIcon::Custom(icon.to_string())
    } else {
        NodeIcon::Default
    }
}

/// Filtered group labels drop the owning page's `name/` prefix so the row
/// reads as the filter name alone.
fn label_for(node: &Node) -> String {
    let display = &node.display_name;
    if node.is_filtered() {
        let prefix_len = node.name.len() + 1;
        if display.len() > prefix_len
            && display.is_char_boundary(prefix_len)
            && display[..prefix_len].to_lowercase() == format!("{}/", node.name)
        {
            return display[prefix_len..].to_string();
        }
    }
    display.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FilteredGroup;
    use crate::state::TreeStateStore;

    fn plain(name: &str) -> Node {
        Node {
            name: name.to_lowercase(),
            original_name: name.to_string(),
            display_name: name.to_string(),
            properties: None,
            uuid: None,
            page_uuid: None,
            block_uuid: None,
            kind: NodeKind::Plain,
        }
    }

    fn filtered(name: &str, display: &str) -> Node {
        let mut node = plain(name);
        node.display_name = display.to_string();
        node.kind = NodeKind::Filtered(FilteredGroup {
            filters: vec!["active".to_string()],
            subitems: vec![],
        });
        node
    }

    #[test]
    fn test_prefix_stripped_for_filtered_nodes_only() {
        let group = filtered("projects", "Projects/Active");
        assert_eq!(label_for(&group), "Active");

        let mut page = plain("projects");
        page.display_name = "projects/Active".to_string();
        assert_eq!(label_for(&page), "projects/Active");
    }

    #[test]
    fn test_prefix_kept_when_not_matching() {
        let group = filtered("projects", "Other/Active");
        assert_eq!(label_for(&group), "Other/Active");
    }

    #[test]
    fn test_filter_icon_wins_over_custom() {
        let mut group = filtered("projects", "projects/Active");
        group.properties = Some(serde_json::json!({ "icon": "📁" }));
        assert_eq!(icon_for(&group), NodeIcon::Filter);

        let mut page = plain("projects");
        page.properties = Some(serde_json::json!({ "icon": "📁" }));
        assert_eq!(icon_for(&page), NodeIcon::Custom("📁".to_string()));
        assert_eq!(icon_for(&plain("projects")), NodeIcon::Default);
    }

    #[test]
    fn test_arrow_only_for_loaded_nonempty_children() {
        let mut store = TreeStateStore::new();
        store.replace_roots(vec![plain("a"), plain("b"), plain("c")]);
        store.ensure_loaded("a", vec![plain("x")]);
        store.ensure_loaded("b", vec![]);

        let tree = build_tree(&store.snapshot());
        assert_eq!(tree.nodes[0].arrow, Some(false));
        assert_eq!(tree.nodes[1].arrow, None); // loaded but empty
        assert_eq!(tree.nodes[2].arrow, None); // not loaded
    }

    #[test]
    fn test_children_rendered_only_while_expanded() {
        let mut store = TreeStateStore::new();
        store.replace_roots(vec![plain("a")]);
        store.ensure_loaded("a", vec![plain("x")]);

        let collapsed = build_tree(&store.snapshot());
        assert!(collapsed.nodes[0].children.is_empty());

        store.toggle("a");
        let expanded = build_tree(&store.snapshot());
        assert_eq!(expanded.nodes[0].arrow, Some(true));
        assert_eq!(expanded.nodes[0].children.len(), 1);
        assert_eq!(expanded.nodes[0].children[0].key, "x");
    }
}
