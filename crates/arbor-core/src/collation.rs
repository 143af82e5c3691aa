use std::cmp::Ordering;

use crate::model::Node;

/// Pluggable locale collation used when sorting resolved children.
///
/// The overlay never hardcodes an alphabet's ordering; the host picks an
/// implementation matching its `sorting_locale` setting and hands it in.
pub trait Collation: Send + Sync {
    fn compare(&self, a: &str, b: &str) -> Ordering;
}

/// Case-insensitive codepoint ordering, the fallback when the host provides
/// no locale-specific collator.
pub struct CaseInsensitive;

impl Collation for CaseInsensitive {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        a.to_lowercase().cmp(&b.to_lowercase())
    }
}

/// Sort nodes by display name under the given collation, ties broken by the
/// raw identifier so the result is deterministic for a fixed input.
pub fn sort_nodes(nodes: &mut [Node], collation: &dyn Collation) {
    nodes.sort_by(|a, b| {
        collation
            .compare(&a.display_name, &b.display_name)
            .then_with(|| a.original_name.cmp(&b.original_name))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeKind;

    fn node(display: &str, original: &str) -> Node {
        Node {
            name: original.to_lowercase(),
            original_name: original.to_string(),
            display_name: display.to_string(),
            properties: None,
            uuid: None,
            page_uuid: None,
            block_uuid: None,
            kind: NodeKind::Plain,
        }
    }

    #[test]
    fn test_sort_is_case_insensitive() {
        let mut nodes = vec![node("banana", "banana"), node("Apple", "Apple")];
        sort_nodes(&mut nodes, &CaseInsensitive);
        assert_eq!(nodes[0].display_name, "Apple");
        assert_eq!(nodes[1].display_name, "banana");
    }

    #[test]
    fn test_ties_broken_by_raw_identifier() {
        let mut nodes = vec![node("Same", "z-page"), node("Same", "a-page")];
        sort_nodes(&mut nodes, &CaseInsensitive);
        assert_eq!(nodes[0].original_name, "a-page");
        assert_eq!(nodes[1].original_name, "z-page");
    }

    #[test]
    fn test_sort_is_deterministic() {
        let mut first = vec![node("b", "b"), node("A", "A"), node("c", "c")];
        let mut second = first.clone();
        sort_nodes(&mut first, &CaseInsensitive);
        sort_nodes(&mut second, &CaseInsensitive);
        assert_eq!(first, second);
    }
}
