// SPDX-License-Identifier: MIT
//! doctor.rs — pre-flight diagnostic checks for `compd doctor`.
//!
//! Runs before anything touches the store, so it can catch environment
//! problems (no git on PATH, unreadable gitconfig) before they show up as a
//! permanently empty status line.

use crate::component::{GitConfigStore, RecentList, StoreError, KEY_CURRENT, KEY_RECENT};
use std::process::Command;

/// The result of a single diagnostic check.
pub struct CheckResult {
    pub name: &'static str,
    pub passed: bool,
    pub detail: String,
}

/// Run all diagnostic checks and return a list of results.
pub async fn run_doctor(store: &GitConfigStore) -> Vec<CheckResult> {
    vec![
        check_git_installed(),
        check_gitconfig_present(store),
        check_current_component(store).await,
        check_recent_list(store).await,
    ]
}

// ─── Individual checks ────────────────────────────────────────────────────────

/// Check 1: `git` is installed and on PATH.
fn check_git_installed() -> CheckResult {
    match Command::new("git").arg("--version").output() {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout)
                .lines()
                .next()
                .unwrap_or("unknown version")
                .trim()
                .to_string();
            CheckResult {
                name: "git installed",
                passed: true,
                detail: version,
            }
        }
        _ => CheckResult {
            name: "git installed",
            passed: false,
            detail: "not found in PATH (direct file access will be used)".to_string(),
        },
    }
}

/// Check 2: the gitconfig file exists and is readable.
fn check_gitconfig_present(store: &GitConfigStore) -> CheckResult {
    let path = store.path();
    match std::fs::read_to_string(path) {
        Ok(_) => CheckResult {
            name: "gitconfig readable",
            passed: true,
            detail: path.display().to_string(),
        },
        Err(e) => CheckResult {
            name: "gitconfig readable",
            passed: false,
            detail: format!("cannot read {}: {e}", path.display()),
        },
    }
}

/// Check 3: a current component is recorded.
async fn check_current_component(store: &GitConfigStore) -> CheckResult {
    match store.get(KEY_CURRENT).await {
        Ok(component) => CheckResult {
            name: "current component set",
            passed: true,
            detail: component,
        },
        Err(StoreError::KeyMissing { .. }) => CheckResult {
            name: "current component set",
            passed: false,
            detail: "no component recorded yet — run `compd use <component>`".to_string(),
        },
        Err(err) => CheckResult {
            name: "current component set",
            passed: false,
            detail: err.to_string(),
        },
    }
}

/// Check 4: the recent-components list parses cleanly.
async fn check_recent_list(store: &GitConfigStore) -> CheckResult {
    match store.get(KEY_RECENT).await {
        Ok(raw) => {
            let list = RecentList::parse(&raw);
            CheckResult {
                name: "recent list well-formed",
                passed: true,
                detail: format!(
                    "{} entr{}",
                    list.len(),
                    if list.len() == 1 { "y" } else { "ies" }
                ),
            }
        }
        // An absent list is a valid state, not a failure.
        Err(StoreError::KeyMissing { .. }) => CheckResult {
            name: "recent list well-formed",
            passed: true,
            detail: "empty".to_string(),
        },
        Err(err) => CheckResult {
            name: "recent list well-formed",
            passed: false,
            detail: err.to_string(),
        },
    }
}

// ─── Output ───────────────────────────────────────────────────────────────────

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

pub fn print_doctor_results(results: &[CheckResult]) {
    println!();
    println!("{BOLD}compd doctor — pre-flight checks{RESET}");
    println!("{}", "─".repeat(60));

    for r in results {
        let (symbol, color) = if r.passed { ("✓", GREEN) } else { ("✗", RED) };
        println!("  {color}{symbol}{RESET}  {:<28}  {}", r.name, r.detail);
    }

    println!("{}", "─".repeat(60));

    let failed = results.iter().filter(|r| !r.passed).count();
    if failed == 0 {
        println!("{GREEN}All checks passed.{RESET}");
    } else {
        println!("{RED}{failed} check(s) failed. See above for details.{RESET}");
    }
    println!();
}
