use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use arbor_core::collation::Collation;
use arbor_core::filters::rewrite_filters_line;
use arbor_core::model::{Node, NodeKind};
use arbor_core::render::build_tree;
use arbor_core::state::{NodePhase, TreeSnapshot};
use arbor_core::{anchor_id, needs_resolve, FilterSet, OverlayConfig, TreeStateStore, TxDelta};

use crate::dom::DomReconciler;
use crate::host::{
    BlockStore, DomHost, HierarchyQuery, HostError, NavMode, Navigator, Subscription, TxBatch,
};
use crate::resolver::HierarchyResolver;

/// Orchestrates the resolve-and-inject pipeline in response to the two
/// external signal sources, and handles user activation of nodes.
///
/// Both signal paths funnel into the same `process_entries` pass. Every
/// step of that pass is idempotent or a whole-state replacement, so
/// overlapping triggers need no mutual exclusion beyond the store map
/// lock; the last writer wins with a complete, possibly stale, state.
pub struct OverlayController {
    resolver: HierarchyResolver,
    reconciler: DomReconciler,
    dom: Arc<dyn DomHost>,
    blocks: Arc<dyn BlockStore>,
    nav: Arc<dyn Navigator>,
    config: RwLock<OverlayConfig>,
    /// One store per rendered root, keyed by anchor id. Stores for entries
    /// gone from the sidebar are dropped on the next pass.
    stores: Mutex<HashMap<String, TreeStateStore>>,
    subscription: Mutex<Option<Subscription>>,
}

impl OverlayController {
    pub fn new(
        query: Arc<dyn HierarchyQuery>,
        dom: Arc<dyn DomHost>,
        blocks: Arc<dyn BlockStore>,
        nav: Arc<dyn Navigator>,
        collation: Arc<dyn Collation>,
        config: OverlayConfig,
    ) -> Self {
        Self {
            resolver: HierarchyResolver::new(query, collation),
            reconciler: DomReconciler::new(Arc::clone(&dom)),
            dom,
            blocks,
            nav,
            config: RwLock::new(config),
            stores: Mutex::new(HashMap::new()),
            subscription: Mutex::new(None),
        }
    }

    /// Hand over the transaction feed subscription so it can be released
    /// on shutdown.
    pub async fn hold_subscription(&self, subscription: Subscription) {
        *self.subscription.lock().await = Some(subscription);
    }

    pub async fn update_config(&self, config: OverlayConfig) {
        *self.config.write().await = config;
    }

    /// Drive the pipeline until both feeds close, then release the
    /// transaction subscription.
    pub async fn run(
        &self,
        mut container_signals: UnboundedReceiver<()>,
        mut transactions: UnboundedReceiver<TxBatch>,
    ) {
        loop {
            tokio::select! {
                signal = container_signals.recv() => match signal {
                    Some(()) => self.process_entries().await,
                    None => break,
                },
                batch = transactions.recv() => match batch {
                    Some(batch) => self.on_transaction(&batch).await,
                    None => break,
                },
            }
        }
        if let Some(subscription) = self.subscription.lock().await.take() {
            subscription.release();
        }
    }

    /// Transaction feed path: run the change detector first, recompute
    /// only when the batch touched hierarchy-relevant data.
    pub async fn on_transaction(&self, batch: &[TxDelta]) {
        let hierarchy_property = self.config.read().await.hierarchy_property.clone();
        if needs_resolve(batch, &hierarchy_property) {
            self.process_entries().await;
        }
    }

    /// The single re-entrant pipeline: scan all present entries, resolve
    /// each at the top level, ensure its anchor, refresh its render.
    pub async fn process_entries(&self) {
        let config = self.config.read().await.clone();
        let entries = self.dom.entries();
        debug!("overlay pass over {} entries", entries.len());

        // A store lives exactly as long as its entry is present in the
        // host UI; a pass whose resolve came back empty (or failed) must
        // not count as the entry leaving.
        let present: HashSet<String> = entries
            .iter()
            .map(|entry| anchor_id(entry.kind, &entry.entity_ref))
            .collect();

        let mut stores = self.stores.lock().await;

        for entry in entries {
            let items = self
                .resolver
                .resolve_ref(
                    &entry.entity_ref,
                    &config.hierarchy_property,
                    config.tagged_page_limit,
                )
                .await;
            if items.is_empty() {
                continue;
            }

            let anchor = match self.reconciler.ensure_anchor(&entry).await {
                Ok(anchor) => anchor,
                Err(err) => {
                    // Host DOM not ready for this entry; the next signal
                    // retries.
                    warn!("anchor for \"{}\" skipped: {}", entry.entity_ref, err);
                    continue;
                }
            };

            let store = stores.entry(anchor.clone()).or_default();
            store.replace_roots(items);
            if store.snapshot().root_expanded() {
                // A reset dropped the children of an unfolded list; load
                // them again so the arrows come back.
                let roots = store.snapshot().roots().to_vec();
                self.preload_level(store, &roots, &config).await;
            }
            self.dom.render(&anchor, &build_tree(&store.snapshot()));
        }

        // Entries gone from the sidebar take their store with them; their
        // anchors are left to the host DOM lifecycle.
        stores.retain(|anchor, _| present.contains(anchor));
    }

    /// Current snapshot for a rendered root, if its anchor is live.
    pub async fn tree_snapshot(&self, anchor: &str) -> Option<Arc<TreeSnapshot>> {
        self.stores
            .lock()
            .await
            .get(anchor)
            .map(|store| store.snapshot())
    }

    /// Unfold/fold the sublist of a sidebar entry itself.
    pub async fn toggle_entry(&self, anchor: &str) {
        let config = self.config.read().await.clone();
        let mut stores = self.stores.lock().await;
        let Some(store) = stores.get_mut(anchor) else {
            return;
        };
        store.toggle_root();
        if store.snapshot().root_expanded() {
            let roots = store.snapshot().roots().to_vec();
            self.preload_level(store, &roots, &config).await;
        }
        self.dom.render(anchor, &build_tree(&store.snapshot()));
    }

    /// Toggle one node within a rendered root.
    pub async fn toggle_node(&self, anchor: &str, node: &Node) {
        let config = self.config.read().await.clone();
        let mut stores = self.stores.lock().await;
        let Some(store) = stores.get_mut(anchor) else {
            return;
        };

        let key = node.state_key().to_string();
        store.toggle(&key);

        if store.snapshot().entry(&key).map(|entry| entry.phase()) == Some(NodePhase::Loading) {
            let items = self
                .resolver
                .resolve(node, &config.hierarchy_property, config.tagged_page_limit)
                .await;
            store.ensure_loaded(&key, items);
        }

        let expanded_items = store.snapshot().entry(&key).and_then(|entry| {
            (entry.phase() == NodePhase::Expanded).then(|| entry.items.clone().unwrap_or_default())
        });
        if let Some(items) = expanded_items {
            // Load the unfolded level's own children so its arrows show.
            self.preload_level(store, &items, &config).await;
        }

        self.dom.render(anchor, &build_tree(&store.snapshot()));
    }

    /// Resolve children for every item of a newly visible level, skipping
    /// items whose entry is already loaded.
    async fn preload_level(
        &self,
        store: &mut TreeStateStore,
        items: &[Node],
        config: &OverlayConfig,
    ) {
        for item in items {
            let key = item.state_key().to_string();
            let loaded = store
                .snapshot()
                .entry(&key)
                .map_or(false, |entry| entry.items.is_some());
            if loaded {
                continue;
            }
            let children = self
                .resolver
                .resolve(item, &config.hierarchy_property, config.tagged_page_limit)
                .await;
            store.ensure_loaded(&key, children);
        }
    }

    /// User activation of a node row.
    ///
    /// Filtered nodes first rewrite their backing block's `filters::` line
    /// so the host applies the group's quick filters, then navigation is
    /// issued. Failures are logged, never thrown into the host.
    pub async fn open_node(&self, node: &Node, mode: NavMode) {
        if let NodeKind::Filtered(group) = &node.kind {
            if let Some(block) = node.block_uuid {
                if let Err(err) = self.rewrite_filters(block, &group.filters).await {
                    warn!(
                        "quick filter rewrite for \"{}\" failed: {}",
                        node.display_name, err
                    );
                }
            }
        }

        let on_target_page = self.nav.current_page().as_deref() == Some(node.name.as_str());
        let outcome = if !on_target_page {
            match mode {
                NavMode::SidePanel => self.open_panel(node).await,
                NavMode::InPlace => self.nav.scroll_to_page(&node.name).await,
            }
        } else if node.is_filtered() {
            match mode {
                // Side panel views cannot be refreshed in place yet.
                NavMode::SidePanel => self.open_panel(node).await,
                NavMode::InPlace => self.refresh_same_page(node).await,
            }
        } else {
            Ok(())
        };

        if let Err(err) = outcome {
            warn!("navigation to \"{}\" failed: {}", node.name, err);
        }
    }

    async fn open_panel(&self, node: &Node) -> Result<(), HostError> {
        match node.panel_target() {
            Some(target) => self.nav.open_in_side_panel(target).await,
            None => Ok(()),
        }
    }

    /// The host does not repaint the current page after the block rewrite;
    /// scroll to the rewritten block, then back to the page after a short
    /// delay. Workaround until the host refreshes filtered views on its
    /// own.
    async fn refresh_same_page(&self, node: &Node) -> Result<(), HostError> {
        if let Some(block) = node.block_uuid {
            self.nav.scroll_to_block(block).await?;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
        self.nav.scroll_to_page(&node.name).await
    }

    async fn rewrite_filters(&self, block: Uuid, filters: &[String]) -> Result<(), HostError> {
        let content = self.blocks.read_block(block).await?;
        let set = FilterSet::new(filters.iter().map(String::as_str));
        self.blocks
            .write_block(block, &rewrite_filters_line(&content, &set))
            .await
    }
}
