use serde::{Deserialize, Serialize};

/// Overlay configuration, read-only to the core.
///
/// Deserialized from the host's settings object; every field falls back to
/// its default when the host has no value for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayConfig {
    /// Property whose value defines the parent→child grouping relation.
    #[serde(default = "default_hierarchy_property")]
    pub hierarchy_property: String,
    /// Icon drawn in front of quick-filter group nodes.
    #[serde(default = "default_filter_icon")]
    pub filter_icon: String,
    /// Maximum number of tagged pages shown on each level.
    #[serde(default = "default_tagged_page_limit")]
    pub tagged_page_limit: usize,
    /// Locale for sorting, e.g. "zh-CN". Empty means the host's language.
    #[serde(default)]
    pub sorting_locale: String,
}

fn default_hierarchy_property() -> String {
    "tags".to_string()
}

fn default_filter_icon() -> String {
    "🔍".to_string()
}

fn default_tagged_page_limit() -> usize {
    30
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            hierarchy_property: default_hierarchy_property(),
            filter_icon: default_filter_icon(),
            tagged_page_limit: default_tagged_page_limit(),
            sorting_locale: String::new(),
        }
    }
}

impl OverlayConfig {
    /// Read the config out of the host's settings JSON. Missing or malformed
    /// settings yield the defaults rather than an error.
    pub fn from_settings(settings: &serde_json::Value) -> Self {
        serde_json::from_value(settings.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OverlayConfig::default();
        assert_eq!(config.hierarchy_property, "tags");
        assert_eq!(config.filter_icon, "🔍");
        assert_eq!(config.tagged_page_limit, 30);
        assert_eq!(config.sorting_locale, "");
    }

    #[test]
    fn test_partial_settings_fall_back() {
        let settings = serde_json::json!({ "taggedPageLimit": 5 });
        let config = OverlayConfig::from_settings(&settings);
        assert_eq!(config.tagged_page_limit, 5);
        assert_eq!(config.hierarchy_property, "tags");
    }

    #[test]
    fn test_malformed_settings_fall_back() {
        let config = OverlayConfig::from_settings(&serde_json::json!("nonsense"));
        assert_eq!(config.tagged_page_limit, 30);
    }
}
