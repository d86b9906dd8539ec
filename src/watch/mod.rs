// SPDX-License-Identifier: MIT
//! Foreground watch loop and the passive gitconfig file watcher.

use crate::component::ComponentResolver;
use crate::status::status_line;
use anyhow::Result;
use notify_debouncer_full::{
    new_debouncer,
    notify::{RecursiveMode, Watcher},
    DebounceEventResult,
};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

type GitConfigWatcher = notify_debouncer_full::Debouncer<
    notify_debouncer_full::notify::RecommendedWatcher,
    notify_debouncer_full::FileIdMap,
>;

/// Start a debounced watcher on the gitconfig's parent directory.
///
/// The watcher only records that a change happened — the poll loop picks up
/// the new state on its next tick, so no synchronization is needed. Returns
/// `None` when the watcher cannot be created (non-fatal; polling alone is
/// sufficient).
pub fn start_watcher(config_path: &Path) -> Option<GitConfigWatcher> {
    let mut debouncer = match new_debouncer(
        Duration::from_millis(300),
        None,
        move |result: DebounceEventResult| match result {
            Ok(events) => {
                let relevant = events.iter().any(|e| {
                    use notify_debouncer_full::notify::EventKind;
                    matches!(e.event.kind, EventKind::Modify(_) | EventKind::Create(_))
                });
                if relevant {
                    debug!("gitconfig changed on disk; next poll tick re-reads it");
                }
            }
            Err(errors) => {
                for e in errors {
                    warn!(err = %e, "file watcher error");
                }
            }
        },
    ) {
        Ok(d) => d,
        Err(e) => {
            warn!("gitconfig watcher creation failed: {e} — polling only");
            return None;
        }
    };

    // Watch the parent directory since watching a non-existent file fails
    // on some platforms.
    let watch_path = config_path.parent().unwrap_or_else(|| Path::new("."));
    if let Err(e) = debouncer
        .watcher()
        .watch(watch_path, RecursiveMode::NonRecursive)
    {
        warn!("gitconfig watcher failed to start: {e} — polling only");
        return None;
    }

    info!(path = %config_path.display(), "gitconfig watcher started");
    Some(debouncer)
}

/// Run the foreground watch loop.
///
/// Emits the status line immediately, then re-reads the store every poll
/// interval and reprints only when the line changed. Runs until Ctrl-C.
pub async fn run_watch(resolver: ComponentResolver, poll_interval_ms: u64) -> Result<()> {
    // Hold the watcher for the lifetime of the loop; dropping it stops the watch.
    let _watcher = start_watcher(resolver.store().path());

    let mut interval = tokio::time::interval(Duration::from_millis(poll_interval_ms.max(100)));
    let mut last: Option<String> = None;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let line = status_line(resolver.current().await.as_deref());
                if last.as_deref() != Some(line.as_str()) {
                    println!("{line}");
                    last = Some(line);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                return Ok(());
            }
        }
    }
}
