//! Arbor Core Library
//!
//! Pure logic for the hierarchical favorites overlay: node model, per-root
//! tree state, change detection, filter serialization, render view models.
//! No host IO, no async.

pub mod collation;
pub mod config;
pub mod detect;
pub mod filters;
pub mod model;
pub mod render;
pub mod state;
pub mod utils;

pub use collation::{CaseInsensitive, Collation};
pub use config::OverlayConfig;
pub use detect::{needs_resolve, TxDelta};
pub use filters::FilterSet;
pub use model::{EntryKind, FilteredGroup, Node, NodeKind};
pub use state::{NodePhase, TreeSnapshot, TreeStateStore};
pub use utils::anchor_id;
