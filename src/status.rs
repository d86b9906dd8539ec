//! Status line formatting and the structured status report.

use chrono::Utc;
use serde::Serialize;

/// Prefix shown before the component name in the status line.
pub const STATUS_PREFIX: &str = "</>";
/// Text shown when no component is set or the store is unreadable.
pub const NO_COMPONENT: &str = "No component changed";

/// Render the single-line status text: `</> api`, or
/// `</> No component changed` when nothing is set.
pub fn status_line(current: Option<&str>) -> String {
    match current {
        Some(component) => format!("{STATUS_PREFIX} {component}"),
        None => format!("{STATUS_PREFIX} {NO_COMPONENT}"),
    }
}

/// Structured status for `--json` output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    /// Current component name; `null` when unset.
    pub component: Option<String>,
    /// Recent components, most recent first (at most 5).
    pub recent: Vec<String>,
    /// Rendered status line, as the watch loop would print it.
    pub status_line: String,
    pub last_updated: String,
}

impl StatusReport {
    pub fn new(component: Option<String>, recent: Vec<String>) -> Self {
        let status_line = status_line(component.as_deref());
        Self {
            component,
            recent,
            status_line,
            last_updated: Utc::now().to_rfc3339(),
        }
    }
}
