//! Arbor Overlay Library
//!
//! Host bridge layer: async seams to the document-graph host, the DOM
//! reconciler and the overlay controller driving the resolve-and-inject
//! pipeline.

pub mod controller;
pub mod dom;
pub mod host;
pub mod resolver;


pub use controller::OverlayController;
pub use dom::DomReconciler;
pub use host::{
    BlockStore, DomHost, HierarchyQuery, HostEntry, HostError, NavMode, Navigator, Subscription,
    TxBatch,
};
pub use resolver::HierarchyResolver;
