// SPDX-License-Identifier: MIT
//! Git config store access.
//!
//! Reads and writes the component keys through the external `git` binary
//! (`git config --file <path> …`) and falls back to scanning / rewriting the
//! file directly when the tool is unavailable or fails. Both paths operate
//! on the same file, so a caller sees identical values either way.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use thiserror::Error;
use tracing::{debug, warn};

/// Config section the component keys live under.
pub const SECTION: &str = "variable";
/// Key holding the current component name.
pub const KEY_CURRENT: &str = "latest-component-changed";
/// Key holding the comma-joined recent-components list.
pub const KEY_RECENT: &str = "latest-components-recent-list";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("git config file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("key `{section}.{key}` is not set", section = SECTION)]
    KeyMissing { key: String },
    #[error("git invocation failed: {0}")]
    Tool(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Line-oriented git config store for the component keys.
///
/// `prefer_tool` selects the access order: with it set (the default), reads
/// and writes go through `git config` and only drop to direct file access
/// when the invocation fails; without it, the file is accessed directly.
#[derive(Debug, Clone)]
pub struct GitConfigStore {
    path: PathBuf,
    prefer_tool: bool,
}

impl GitConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            prefer_tool: true,
        }
    }

    pub fn with_prefer_tool(mut self, prefer_tool: bool) -> Self {
        self.prefer_tool = prefer_tool;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read `variable.<key>`, preferring the git tool.
    pub async fn get(&self, key: &str) -> Result<String, StoreError> {
        if self.prefer_tool {
            match self.get_via_tool(key).await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    debug!(key, %err, "git tool read failed, scanning config file directly");
                }
            }
        }
        self.get_from_file(key)
    }

    /// Write `variable.<key> = <value>`, preferring the git tool.
    pub async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.prefer_tool {
            match self.set_via_tool(key, value).await {
                Ok(()) => return Ok(()),
                Err(err) => {
                    warn!(key, %err, "git tool write failed, rewriting config file directly");
                }
            }
        }
        self.set_in_file(key, value)
    }

    // ─── Tool path ────────────────────────────────────────────────────────────

    async fn get_via_tool(&self, key: &str) -> Result<String, StoreError> {
        let output = tokio::process::Command::new("git")
            .arg("config")
            .arg("--file")
            .arg(&self.path)
            .arg("--get")
            .arg(format!("{SECTION}.{key}"))
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await
            .map_err(|e| StoreError::Tool(e.to_string()))?;

        if output.status.success() {
            let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if value.is_empty() {
                return Err(StoreError::KeyMissing {
                    key: key.to_string(),
                });
            }
            return Ok(value);
        }
        // `git config --get` exits 1 when the key is not set.
        match output.status.code() {
            Some(1) => Err(StoreError::KeyMissing {
                key: key.to_string(),
            }),
            code => Err(StoreError::Tool(format!(
                "git config --get exited with status {code:?}"
            ))),
        }
    }

    async fn set_via_tool(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let output = tokio::process::Command::new("git")
            .arg("config")
            .arg("--file")
            .arg(&self.path)
            .arg(format!("{SECTION}.{key}"))
            .arg(value)
            .output()
            .await
            .map_err(|e| StoreError::Tool(e.to_string()))?;

        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        Err(StoreError::Tool(if stderr.is_empty() {
            format!("git config exited with status {:?}", output.status.code())
        } else {
            stderr
        }))
    }

    // ─── File path ────────────────────────────────────────────────────────────

    /// Scan the file for `key = value` inside the `[variable]` section.
    /// Matching stops at the next section header.
    fn get_from_file(&self, key: &str) -> Result<String, StoreError> {
        if !self.path.exists() {
            return Err(StoreError::FileNotFound(self.path.clone()));
        }
        let contents = std::fs::read_to_string(&self.path)?;
        let header = format!("[{SECTION}]");

        let mut in_section = false;
        for line in contents.lines() {
            let line = line.trim();
            if line.eq_ignore_ascii_case(&header) {
                in_section = true;
                continue;
            }
            if in_section && line.starts_with('[') {
                break;
            }
            if !in_section {
                continue;
            }
            if let Some((name, value)) = line.split_once('=') {
                if name.trim().eq_ignore_ascii_case(key) {
                    let value = value.trim();
                    if !value.is_empty() {
                        return Ok(value.to_string());
                    }
                }
            }
        }
        Err(StoreError::KeyMissing {
            key: key.to_string(),
        })
    }

    /// Rewrite the file with `key = value` set, preserving every unrelated
    /// line. Replaces the key's line in place, appends to an existing
    /// `[variable]` section, or appends a new section (creating the file
    /// when missing).
    fn set_in_file(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };

        let mut lines: Vec<String> = contents.lines().map(str::to_string).collect();
        let header = format!("[{SECTION}]");

        let mut section_start = None;
        let mut section_end = lines.len();
        for (i, line) in lines.iter().enumerate() {
            let line = line.trim();
            if section_start.is_none() {
                if line.eq_ignore_ascii_case(&header) {
                    section_start = Some(i);
                }
            } else if line.starts_with('[') {
                section_end = i;
                break;
            }
        }

        // git itself writes keys indented with a tab.
        let entry = format!("\t{key} = {value}");
        match section_start {
            Some(start) => {
                let existing = lines[start + 1..section_end].iter().position(|line| {
                    line.trim()
                        .split_once('=')
                        .is_some_and(|(name, _)| name.trim().eq_ignore_ascii_case(key))
                });
                match existing {
                    Some(offset) => lines[start + 1 + offset] = entry,
                    None => lines.insert(section_end, entry),
                }
            }
            None => {
                lines.push(header);
                lines.push(entry);
            }
        }

        let mut out = lines.join("\n");
        out.push('\n');
        std::fs::write(&self.path, out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn file_store(dir: &TempDir) -> GitConfigStore {
        GitConfigStore::new(dir.path().join(".gitconfig")).with_prefer_tool(false)
    }

    #[test]
    fn test_get_from_file_reads_section() {
        let tmp = TempDir::new().unwrap();
        let store = file_store(&tmp);
        std::fs::write(
            store.path(),
            "[user]\n\tname = dev\n[variable]\n\tlatest-component-changed = api\n",
        )
        .unwrap();

        let value = store.get_from_file(KEY_CURRENT).unwrap();
        assert_eq!(value, "api");
    }

    #[test]
    fn test_get_from_file_stops_at_next_section() {
        let tmp = TempDir::new().unwrap();
        let store = file_store(&tmp);
        // The key appears after the [variable] section ends — must not match.
        std::fs::write(
            store.path(),
            "[variable]\n\tother = x\n[alias]\n\tlatest-component-changed = wrong\n",
        )
        .unwrap();

        assert!(matches!(
            store.get_from_file(KEY_CURRENT),
            Err(StoreError::KeyMissing { .. })
        ));
    }

    #[test]
    fn test_get_from_file_missing_file() {
        let tmp = TempDir::new().unwrap();
        let store = file_store(&tmp);
        assert!(matches!(
            store.get_from_file(KEY_CURRENT),
            Err(StoreError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_set_in_file_creates_file_and_section() {
        let tmp = TempDir::new().unwrap();
        let store = file_store(&tmp);

        store.set_in_file(KEY_CURRENT, "api").unwrap();

        let contents = std::fs::read_to_string(store.path()).unwrap();
        assert!(contents.contains("[variable]"));
        assert!(contents.contains("latest-component-changed = api"));
        assert_eq!(store.get_from_file(KEY_CURRENT).unwrap(), "api");
    }

    #[test]
    fn test_set_in_file_replaces_in_place() {
        let tmp = TempDir::new().unwrap();
        let store = file_store(&tmp);
        std::fs::write(
            store.path(),
            "[variable]\n\tlatest-component-changed = api\n\tlatest-components-recent-list = api\n",
        )
        .unwrap();

        store.set_in_file(KEY_CURRENT, "ui").unwrap();

        assert_eq!(store.get_from_file(KEY_CURRENT).unwrap(), "ui");
        assert_eq!(store.get_from_file(KEY_RECENT).unwrap(), "api");
    }

    #[test]
    fn test_set_in_file_preserves_other_sections() {
        let tmp = TempDir::new().unwrap();
        let store = file_store(&tmp);
        std::fs::write(
            store.path(),
            "[user]\n\tname = dev\n\temail = dev@example.com\n[alias]\n\tco = checkout\n",
        )
        .unwrap();

        store.set_in_file(KEY_CURRENT, "api").unwrap();

        let contents = std::fs::read_to_string(store.path()).unwrap();
        assert!(contents.contains("name = dev"));
        assert!(contents.contains("email = dev@example.com"));
        assert!(contents.contains("co = checkout"));
        assert_eq!(store.get_from_file(KEY_CURRENT).unwrap(), "api");
    }

    #[test]
    fn test_set_in_file_appends_to_existing_section_mid_file() {
        let tmp = TempDir::new().unwrap();
        let store = file_store(&tmp);
        std::fs::write(
            store.path(),
            "[variable]\n\tlatest-component-changed = api\n[alias]\n\tco = checkout\n",
        )
        .unwrap();

        store.set_in_file(KEY_RECENT, "api,ui").unwrap();

        assert_eq!(store.get_from_file(KEY_RECENT).unwrap(), "api,ui");
        let contents = std::fs::read_to_string(store.path()).unwrap();
        assert!(contents.contains("co = checkout"));
        // The new key must land inside [variable], before [alias].
        let variable_pos = contents.find("[variable]").unwrap();
        let recent_pos = contents.find("latest-components-recent-list").unwrap();
        let alias_pos = contents.find("[alias]").unwrap();
        assert!(variable_pos < recent_pos && recent_pos < alias_pos);
    }
}
