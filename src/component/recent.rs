//! Bounded most-recently-used list of component names.

use serde::Serialize;

/// Maximum number of entries kept in the recent list.
pub const MAX_RECENT: usize = 5;

/// Ordered list of recently used components, most recent first.
///
/// Entries are unique under case-insensitive (ASCII) comparison and the list
/// never holds more than [`MAX_RECENT`] entries. Persisted in git config as a
/// single comma-joined value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecentList(Vec<String>);

impl RecentList {
    /// Parse the comma-joined stored form.
    ///
    /// Entries are trimmed and empty entries dropped. Duplicates and entries
    /// beyond the cap are discarded so the invariants hold even when the
    /// stored value was written by something else.
    pub fn parse(raw: &str) -> Self {
        let mut entries: Vec<String> = Vec::new();
        for part in raw.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            if entries.iter().any(|e| e.eq_ignore_ascii_case(part)) {
                continue;
            }
            entries.push(part.to_string());
            if entries.len() == MAX_RECENT {
                break;
            }
        }
        Self(entries)
    }

    /// Move `component` to the front of the list: any existing
    /// case-insensitive match is removed first, then the list is truncated
    /// to [`MAX_RECENT`] entries.
    pub fn promote(&mut self, component: &str) {
        let component = component.trim();
        if component.is_empty() {
            return;
        }
        self.0.retain(|e| !e.eq_ignore_ascii_case(component));
        self.0.insert(0, component.to_string());
        self.0.truncate(MAX_RECENT);
    }

    /// The comma-joined form stored in git config.
    pub fn to_config_value(&self) -> String {
        self.0.join(",")
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn entries(&self) -> &[String] {
        &self.0
    }

    pub fn into_entries(self) -> Vec<String> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
