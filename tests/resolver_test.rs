// SPDX-License-Identifier: MIT
//! Integration tests for the component resolver against a temp gitconfig.

use compd::component::{ComponentResolver, GitConfigStore, RecentList, MAX_RECENT};
use compd::status::status_line;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper: resolver over a gitconfig inside `dir`, direct file access only
/// so the tests do not depend on a git binary being installed.
fn file_resolver(dir: &TempDir) -> ComponentResolver {
    let store = GitConfigStore::new(dir.path().join(".gitconfig")).with_prefer_tool(false);
    ComponentResolver::new(store)
}

fn git_available() -> bool {
    std::process::Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

#[tokio::test]
async fn test_current_is_none_when_store_empty() {
    let tmp = TempDir::new().unwrap();
    let resolver = file_resolver(&tmp);

    assert_eq!(resolver.current().await, None);
    assert_eq!(
        status_line(resolver.current().await.as_deref()),
        "</> No component changed"
    );
}

#[tokio::test]
async fn test_set_then_get_round_trips() {
    let tmp = TempDir::new().unwrap();
    let resolver = file_resolver(&tmp);

    resolver.set_current("api").await.unwrap();

    assert_eq!(resolver.current().await.as_deref(), Some("api"));
    assert_eq!(status_line(resolver.current().await.as_deref()), "</> api");
}

#[tokio::test]
async fn test_empty_set_is_a_noop() {
    let tmp = TempDir::new().unwrap();
    let resolver = file_resolver(&tmp);

    resolver.set_current("api").await.unwrap();
    let before = fs::read_to_string(tmp.path().join(".gitconfig")).unwrap();

    resolver.set_current("").await.unwrap();
    resolver.set_current("   ").await.unwrap();

    let after = fs::read_to_string(tmp.path().join(".gitconfig")).unwrap();
    assert_eq!(before, after, "blank selection must leave the store untouched");
    assert_eq!(resolver.current().await.as_deref(), Some("api"));
}

#[tokio::test]
async fn test_mru_promotion_example() {
    let tmp = TempDir::new().unwrap();
    let resolver = file_resolver(&tmp);

    resolver.set_current("api").await.unwrap();
    resolver.set_current("ui").await.unwrap();
    resolver.set_current("api").await.unwrap();

    assert_eq!(resolver.current().await.as_deref(), Some("api"));
    assert_eq!(resolver.recent().await.entries(), ["api", "ui"]);
}

#[tokio::test]
async fn test_recent_never_exceeds_cap_or_duplicates() {
    let tmp = TempDir::new().unwrap();
    let resolver = file_resolver(&tmp);

    for name in ["api", "ui", "API", "auth", "billing", "search", "Ui", "infra"] {
        resolver.set_current(name).await.unwrap();
    }

    let recent = resolver.recent().await;
    assert!(recent.len() <= MAX_RECENT);
    for (i, a) in recent.iter().enumerate() {
        for b in recent.iter().skip(i + 1) {
            assert!(
                !a.eq_ignore_ascii_case(b),
                "recent list holds case-insensitive duplicates: {a} / {b}"
            );
        }
    }
    // Most recent selection is always at the front.
    assert_eq!(recent.iter().next(), Some("infra"));
}

#[tokio::test]
async fn test_recent_falls_back_to_current() {
    let tmp = TempDir::new().unwrap();
    let resolver = file_resolver(&tmp);

    // Only the current key is present, as commit tooling would leave it.
    fs::write(
        tmp.path().join(".gitconfig"),
        "[variable]\n\tlatest-component-changed = api\n",
    )
    .unwrap();

    assert_eq!(resolver.recent().await.entries(), ["api"]);
}

#[tokio::test]
async fn test_writes_preserve_unrelated_config() {
    let tmp = TempDir::new().unwrap();
    let resolver = file_resolver(&tmp);

    fs::write(
        tmp.path().join(".gitconfig"),
        "[user]\n\tname = dev\n\temail = dev@example.com\n[alias]\n\tco = checkout\n",
    )
    .unwrap();

    resolver.set_current("api").await.unwrap();

    let contents = fs::read_to_string(tmp.path().join(".gitconfig")).unwrap();
    assert!(contents.contains("name = dev"));
    assert!(contents.contains("email = dev@example.com"));
    assert!(contents.contains("co = checkout"));
    assert_eq!(resolver.current().await.as_deref(), Some("api"));
}

#[tokio::test]
async fn test_recent_list_parse_is_defensive() {
    let tmp = TempDir::new().unwrap();
    let resolver = file_resolver(&tmp);

    // A hand-edited list with spacing, empties, and duplicates.
    fs::write(
        tmp.path().join(".gitconfig"),
        "[variable]\n\tlatest-components-recent-list = api , ui ,, API , auth\n",
    )
    .unwrap();

    assert_eq!(resolver.recent().await.entries(), ["api", "ui", "auth"]);
}

// ─── Tool-path parity (skipped when git is not installed) ─────────────────────

/// Values written through the git binary must read back identically through
/// the direct file scanner, and vice versa.
#[tokio::test]
async fn test_tool_and_file_paths_agree() {
    if !git_available() {
        eprintln!("git not installed — skipping tool parity test");
        return;
    }

    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join(".gitconfig");
    let tool = ComponentResolver::new(GitConfigStore::new(&path));
    let file = ComponentResolver::new(GitConfigStore::new(&path).with_prefer_tool(false));

    tool.set_current("api").await.unwrap();
    assert_eq!(file.current().await.as_deref(), Some("api"));
    assert_eq!(tool.current().await, file.current().await);

    file.set_current("ui").await.unwrap();
    assert_eq!(tool.current().await.as_deref(), Some("ui"));
    assert_eq!(tool.recent().await, file.recent().await);
    assert_eq!(tool.recent().await.entries(), ["ui", "api"]);
}

/// The tool path reads a file the scanner wrote, including the recent list.
#[tokio::test]
async fn test_tool_reads_scanner_written_list() {
    if !git_available() {
        eprintln!("git not installed — skipping tool parity test");
        return;
    }

    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join(".gitconfig");

    let file = ComponentResolver::new(GitConfigStore::new(&path).with_prefer_tool(false));
    for name in ["api", "ui", "auth"] {
        file.set_current(name).await.unwrap();
    }

    let tool = ComponentResolver::new(GitConfigStore::new(&path));
    let expected = RecentList::parse("auth,ui,api");
    assert_eq!(tool.recent().await, expected);
}

// ─── Store path sanity ────────────────────────────────────────────────────────

#[test]
fn test_store_exposes_configured_path() {
    let store = GitConfigStore::new("/tmp/some/.gitconfig");
    assert_eq!(store.path(), Path::new("/tmp/some/.gitconfig"));
}
