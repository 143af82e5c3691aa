use serde::{Deserialize, Serialize};

/// Ordered set of lower-cased quick-filter names.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterSet(Vec<String>);

impl FilterSet {
    /// Lower-cases every name; duplicates keep their first position.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Vec::new();
        for name in names {
            let name = name.as_ref().to_lowercase();
            if !set.contains(&name) {
                set.push(name);
            }
        }
        Self(set)
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    /// The host's on-disk form: `{"a" true, "b" true}`.
    pub fn to_line_value(&self) -> String {
        let pairs: Vec<String> = self
            .0
            .iter()
            .map(|name| format!("{:?} true", name))
            .collect();
        format!("{{{}}}", pairs.join(", "))
    }
}

/// Rewrite the `filters::` line inside a block's text.
///
/// Any existing `filters:: …` line is removed (with the blank lines around
/// it), then a single fresh line is appended, matching the host's expected
/// one-line-per-block format.
pub fn rewrite_filters_line(content: &str, filters: &FilterSet) -> String {
    let mut lines: Vec<&str> = content
        .lines()
        .filter(|line| !line.starts_with("filters:: "))
        .collect();
    while matches!(lines.last(), Some(line) if line.trim().is_empty()) {
        lines.pop();
    }
    let mut out = lines.join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(&format!("filters:: {}", filters.to_line_value()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_lower_cased_in_order() {
        let set = FilterSet::new(["Active", "DONE", "active"]);
        assert_eq!(set.names(), ["active", "done"]);
    }

    #[test]
    fn test_line_value_format() {
        let set = FilterSet::new(["Active", "Done"]);
        assert_eq!(set.to_line_value(), "{\"active\" true, \"done\" true}");
    }

    #[test]
    fn test_empty_set_serializes_to_braces() {
        assert_eq!(FilterSet::default().to_line_value(), "{}");
    }

    #[test]
    fn test_rewrite_replaces_existing_line() {
        let content = "Some block text\nfilters:: {\"old\" true}\nmore text";
        let out = rewrite_filters_line(content, &FilterSet::new(["new"]));
        assert_eq!(
            out,
            "Some block text\nmore text\nfilters:: {\"new\" true}"
        );
    }

    #[test]
    fn test_rewrite_appends_when_absent() {
        let out = rewrite_filters_line("Some block text", &FilterSet::new(["a", "b"]));
        assert_eq!(out, "Some block text\nfilters:: {\"a\" true, \"b\" true}");
    }

    #[test]
    fn test_rewrite_drops_trailing_blank_lines() {
        let content = "text\nfilters:: {\"old\" true}\n\n";
        let out = rewrite_filters_line(content, &FilterSet::new(["a"]));
        assert_eq!(out, "text\nfilters:: {\"a\" true}");
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let set = FilterSet::new(["a"]);
        let once = rewrite_filters_line("text", &set);
        let twice = rewrite_filters_line(&once, &set);
        assert_eq!(once, twice);
    }
}
