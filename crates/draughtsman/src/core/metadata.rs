//! Metadata preamble handling
//!
//! Diagram texts may carry `%% key: value` metadata lines, either loose or
//! grouped into `%% @section name` ... `%% @end-section` blocks, plus plain
//! `%%` comments. None of these are structural syntax: every parser skips
//! them through the same filter, and the collected key/value pairs are
//! exposed to callers as [`DiagramMetadata`].

/// Collected `%% key: value` metadata pairs, in first-seen key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagramMetadata {
    entries: Vec<(String, String)>,
}

impl DiagramMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan an entire input for metadata pairs.
    ///
    /// Section markers themselves (`@section` / `@end-section`) are not
    /// recorded as pairs; the pairs inside a section are.
    pub fn scan(input: &str) -> Self {
        let mut metadata = Self::new();
        for line in input.lines() {
            let trimmed = line.trim();
            let Some(rest) = trimmed.strip_prefix("%%") else {
                continue;
            };
            let rest = rest.trim();
            if rest.starts_with('@') {
                continue;
            }
            if let Some((key, value)) = rest.split_once(':') {
                let key = key.trim();
                let value = value.trim();
                if !key.is_empty() && !value.is_empty() {
                    metadata.insert(key, value);
                }
            }
        }
        metadata
    }

    /// Insert a pair; a repeated key keeps its position but takes the new value.
    pub fn insert(&mut self, key: &str, value: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| k == key) {
            entry.1 = value.to_string();
        } else {
            self.entries.push((key.to_string(), value.to_string()));
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Line filter that hides metadata and comments from structural parsing.
///
/// The filter is stateful (it tracks whether the cursor is inside a
/// `@section` block), so each parse invocation must construct its own.
#[derive(Debug, Default)]
pub struct MetadataFilter {
    in_section: bool,
}

impl MetadataFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the given line must be skipped by structural parsing.
    pub fn should_skip(&mut self, line: &str) -> bool {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix("%%") {
            let rest = rest.trim();
            if rest.starts_with("@section") {
                self.in_section = true;
            } else if rest.starts_with("@end-section") {
                self.in_section = false;
            }
            // Every %% line is non-structural: metadata, marker, or comment.
            return true;
        }
        // Anything inside an open section is swallowed until the end marker.
        self.in_section
    }

    /// Blank out all skippable lines, preserving line numbering.
    ///
    /// Used by parsers that hand the whole text to a grammar rather than
    /// walking it line by line.
    pub fn strip(input: &str) -> String {
        let mut filter = Self::new();
        let mut out = String::with_capacity(input.len());
        for (idx, line) in input.lines().enumerate() {
            if idx > 0 {
                out.push('\n');
            }
            if !filter.should_skip(line) {
                out.push_str(line);
            }
        }
        out
    }
}
