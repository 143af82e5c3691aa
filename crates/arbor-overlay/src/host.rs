use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use arbor_core::model::{EntryKind, Node};
use arbor_core::render::RenderTree;
use arbor_core::TxDelta;

/// Failures surfaced by the host seams. None of these ever propagate into
/// the host's own control flow; callers log and move on.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("host query failed: {0}")]
    Query(String),
    #[error("injection target not found: {0}")]
    MissingTarget(String),
    #[error("block {0} not found")]
    MissingBlock(Uuid),
    #[error("host call failed: {0}")]
    Call(String),
}

/// One batch of deltas from a single change notification.
pub type TxBatch = Vec<TxDelta>;

/// Lookup of pages related to a page through the hierarchy property.
#[async_trait]
pub trait HierarchyQuery: Send + Sync {
    /// All pages whose `hierarchy_property` references `raw_name`.
    /// `None` when the host has no data for the page.
    async fn related_pages(
        &self,
        raw_name: &str,
        hierarchy_property: &str,
    ) -> Result<Option<Vec<Node>>, HostError>;
}

/// Read/write access to the host's content blocks, used for the
/// `filters::` line rewrite.
#[async_trait]
pub trait BlockStore: Send + Sync {
    async fn read_block(&self, block: Uuid) -> Result<String, HostError>;
    async fn write_block(&self, block: Uuid, content: &str) -> Result<(), HostError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavMode {
    InPlace,
    SidePanel,
}

impl NavMode {
    /// Side panel when the modifier key was held on the pointer event.
    pub fn from_modifier(modifier: bool) -> Self {
        if modifier {
            NavMode::SidePanel
        } else {
            NavMode::InPlace
        }
    }
}

/// Navigation requests into the host UI.
#[async_trait]
pub trait Navigator: Send + Sync {
    /// Name of the page the host currently shows, if any.
    fn current_page(&self) -> Option<String>;
    async fn scroll_to_page(&self, name: &str) -> Result<(), HostError>;
    async fn scroll_to_block(&self, block: Uuid) -> Result<(), HostError>;
    async fn open_in_side_panel(&self, target: Uuid) -> Result<(), HostError>;
}

/// A favorite/recent entry currently present in the host sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEntry {
    pub kind: EntryKind,
    /// The host's `data-ref` for the entry, a raw page name.
    pub entity_ref: String,
}

/// Injection and lookup of persistent containers in the host DOM. The host
/// owns every element's lifecycle; the overlay only asks for mounts and
/// renders below them.
#[async_trait]
pub trait DomHost: Send + Sync {
    /// Entries currently present in the overlaid sidebar container.
    fn entries(&self) -> Vec<HostEntry>;
    fn element_exists(&self, id: &str) -> bool;
    /// Mount a persistent `<div id>` container next to `selector`.
    async fn inject(&self, id: &str, selector: &str) -> Result<(), HostError>;
    /// Drop a stray arrow control under the entry's navigation anchor, if
    /// one is left over from an earlier pass.
    fn remove_arrow(&self, entry: &HostEntry);
    /// Mount or refresh the rendered subtree below an anchor.
    fn render(&self, anchor_id: &str, tree: &RenderTree);
}

/// Guard for a host feed subscription; releases it when dropped or when
/// `release` is called explicitly on shutdown.
pub struct Subscription {
    off: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(off: impl FnOnce() + Send + 'static) -> Self {
        Self {
            off: Some(Box::new(off)),
        }
    }

    pub fn release(mut self) {
        if let Some(off) = self.off.take() {
            off();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(off) = self.off.take() {
            off();
        }
    }
}
