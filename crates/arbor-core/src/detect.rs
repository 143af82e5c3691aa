use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One attribute-level delta from the host's transaction feed.
///
/// The feed reports retractions and additions as separate deltas sharing
/// the entity; `added` distinguishes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxDelta {
    #[serde(default)]
    pub entity: i64,
    pub attribute: String,
    pub value: Value,
    pub added: bool,
}

impl TxDelta {
    pub fn new(attribute: &str, value: Value, added: bool) -> Self {
        Self {
            entity: 0,
            attribute: attribute.to_string(),
            value,
            added,
        }
    }
}

/// Decide whether a change batch requires recomputing the overlay.
///
/// Renames and (when the hierarchy property is `tags`) tag edits always
/// trigger. Property edits trigger only when the hierarchy property's or
/// the quick-filter list's value actually changed across the batch; the
/// whole batch is scanned first so a retract/add pair carrying the same
/// value stays quiet. Deltas of unexpected shape are ignored; the
/// detector prefers missing an update over spurious recomputation.
pub fn needs_resolve(batch: &[TxDelta], hierarchy_property: &str) -> bool {
    let mut old_property = None;
    let mut new_property = None;
    let mut old_quick_filters = None;
    let mut new_quick_filters = None;

    for delta in batch {
        match delta.attribute.as_str() {
            "originalName" => return true,
            "tags" if hierarchy_property == "tags" => return true,
            "properties" => {
                let Value::Object(props) = &delta.value else {
                    continue;
                };
                if let Some(value) = props.get(hierarchy_property) {
                    if !value.is_null() {
                        let text = normalize(value);
                        if delta.added {
                            new_property = Some(text);
                        } else {
                            old_property = Some(text);
                        }
                    }
                }
                if let Some(value) = props.get("quickFilters") {
                    if !value.is_null() {
                        let text = normalize(value);
                        if delta.added {
                            new_quick_filters = Some(text);
                        } else {
                            old_quick_filters = Some(text);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    if old_property.is_none()
        && new_property.is_none()
        && old_quick_filters.is_none()
        && new_quick_filters.is_none()
    {
        return false;
    }
    old_property != new_property || old_quick_filters != new_quick_filters
}

/// Stable textual form for value comparison. Arrays flatten to their
/// comma-joined elements so reordering or extending a list reads as a
/// change, not as a different encoding.
fn normalize(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(normalize)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rename_always_triggers() {
        let batch = vec![TxDelta::new("originalName", json!("New Name"), true)];
        assert!(needs_resolve(&batch, "tags"));
    }

    #[test]
    fn test_tags_trigger_only_for_tags_hierarchy() {
        let batch = vec![TxDelta::new("tags", json!("projects"), true)];
        assert!(needs_resolve(&batch, "tags"));
        assert!(!needs_resolve(&batch, "area"));
    }

    #[test]
    fn test_unrelated_property_is_quiet() {
        let batch = vec![TxDelta::new("properties", json!({ "unrelated": 1 }), true)];
        assert!(!needs_resolve(&batch, "tags"));
    }

    #[test]
    fn test_changed_property_value_triggers() {
        let batch = vec![
            TxDelta::new("properties", json!({ "tags": ["a"] }), false),
            TxDelta::new("properties", json!({ "tags": ["a", "b"] }), true),
        ];
        assert!(needs_resolve(&batch, "tags"));
    }

    #[test]
    fn test_rewritten_identical_value_is_quiet() {
        let batch = vec![
            TxDelta::new("properties", json!({ "tags": ["a", "b"] }), false),
            TxDelta::new("properties", json!({ "tags": ["a", "b"] }), true),
        ];
        assert!(!needs_resolve(&batch, "tags"));
    }

    #[test]
    fn test_quick_filters_change_triggers() {
        let batch = vec![
            TxDelta::new("properties", json!({ "quickFilters": "active" }), false),
            TxDelta::new("properties", json!({ "quickFilters": "active, done" }), true),
        ];
        assert!(needs_resolve(&batch, "tags"));
    }

    #[test]
    fn test_one_sided_property_addition_triggers() {
        let batch = vec![TxDelta::new("properties", json!({ "tags": ["a"] }), true)];
        assert!(needs_resolve(&batch, "tags"));
    }

    #[test]
    fn test_malformed_delta_ignored() {
        let batch = vec![
            TxDelta::new("properties", json!("not an object"), true),
            TxDelta::new("properties", json!(42), false),
        ];
        assert!(!needs_resolve(&batch, "tags"));
    }

    #[test]
    fn test_empty_batch_is_quiet() {
        assert!(!needs_resolve(&[], "tags"));
    }
}
