use crate::model::EntryKind;

/// Derive the stable DOM anchor id for a sidebar entry.
///
/// Truncated SHA-256 over the entry's raw ref; it only needs to keep the
/// handful of entries present in the sidebar apart, not resist attack. The
/// kind tag keeps a page favorited and recently-visited at once from
/// sharing an anchor.
pub fn anchor_id(kind: EntryKind, entity_ref: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(entity_ref.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    format!("arbor-{}-{}", kind.tag(), &digest[..16])
}
