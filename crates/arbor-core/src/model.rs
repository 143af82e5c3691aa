use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One entry in the tree overlaid onto the host's sidebar.
///
/// `name` is the host's normalized (lower-cased) page identifier,
/// `original_name` the raw one. The `properties` bag carries whatever the
/// host stored on the page; only `icon` is read by the overlay itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub original_name: String,
    pub display_name: String,
    #[serde(default)]
    pub properties: Option<serde_json::Value>,
    #[serde(default)]
    pub uuid: Option<Uuid>,
    #[serde(default)]
    pub page_uuid: Option<Uuid>,
    /// Backing block for filtered groups, the target of the
    /// `filters::` line rewrite.
    #[serde(default)]
    pub block_uuid: Option<Uuid>,
    pub kind: NodeKind,
}

/// Closed two-variant distinction: a node is either a plain page whose
/// children come from the host query, or a synthetic filtered group whose
/// children were materialized up front. Never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Plain,
    Filtered(FilteredGroup),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredGroup {
    /// Ordered quick-filter names defining this group.
    pub filters: Vec<String>,
    /// Pre-materialized children, insertion order of the host's mapping.
    pub subitems: Vec<Node>,
}

impl Node {
    /// Key under which expand/load state is tracked.
    ///
    /// Filtered nodes key by display name, plain nodes by identifier. Two
    /// siblings sharing a display name would collide here; the host data
    /// does not produce that in practice and we keep the derivation as is.
    pub fn state_key(&self) -> &str {
        match self.kind {
            NodeKind::Filtered(_) => &self.display_name,
            NodeKind::Plain => &self.name,
        }
    }

    pub fn is_filtered(&self) -> bool {
        matches!(self.kind, NodeKind::Filtered(_))
    }

    /// Page-specific icon from the properties bag, if any.
    pub fn icon(&self) -> Option<&str> {
        self.properties
            .as_ref()
            .and_then(|props| props.get("icon"))
            .and_then(|icon| icon.as_str())
    }

    /// Target for side-panel navigation.
    pub fn panel_target(&self) -> Option<Uuid> {
        self.uuid.or(self.page_uuid)
    }
}

/// Which host list a sidebar entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    Favorite,
    Recent,
}

impl EntryKind {
    /// Short tag used inside anchor element ids.
    pub fn tag(&self) -> char {
        match self {
            EntryKind::Favorite => 'f',
            EntryKind::Recent => 'r',
        }
    }

    /// Host CSS class of entries of this kind.
    pub fn entry_class(&self) -> &'static str {
        match self {
            EntryKind::Favorite => "favorite-item",
            EntryKind::Recent => "recent-item",
        }
    }
}
