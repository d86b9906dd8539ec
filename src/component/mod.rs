// SPDX-License-Identifier: MIT
//! Component identity resolution and persistence.
//!
//! The current component and its recent-components list live in the user's
//! git config under `[variable]`; commit tooling writes the current value,
//! this crate reads it and lets the user switch among recent entries.

pub mod recent;
pub mod store;

pub use recent::{RecentList, MAX_RECENT};
pub use store::{GitConfigStore, StoreError, KEY_CURRENT, KEY_RECENT, SECTION};

use tracing::{debug, info, warn};

/// Resolves and persists component state against a single git config store.
///
/// Every read failure is logged and mapped to the "no component" outcome —
/// the store being absent or unreadable is an expected state, and the next
/// poll naturally retries.
pub struct ComponentResolver {
    store: GitConfigStore,
}

impl ComponentResolver {
    pub fn new(store: GitConfigStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &GitConfigStore {
        &self.store
    }

    /// The current component, or `None` when unset or unreadable.
    pub async fn current(&self) -> Option<String> {
        match self.store.get(KEY_CURRENT).await {
            Ok(value) => Some(value),
            Err(err @ (StoreError::KeyMissing { .. } | StoreError::FileNotFound(_))) => {
                debug!(%err, "no current component");
                None
            }
            Err(err) => {
                warn!(%err, "could not read current component");
                None
            }
        }
    }

    /// The recent-components list, most recent first.
    ///
    /// When the stored list is empty, falls back to a singleton list holding
    /// the current component if one is set.
    pub async fn recent(&self) -> RecentList {
        let list = match self.store.get(KEY_RECENT).await {
            Ok(raw) => RecentList::parse(&raw),
            Err(err) => {
                debug!(%err, "no recent-components list");
                RecentList::default()
            }
        };
        if !list.is_empty() {
            return list;
        }
        let mut list = RecentList::default();
        if let Some(current) = self.current().await {
            list.promote(&current);
        }
        list
    }

    /// Persist `component` as current and promote it in the recent list.
    ///
    /// Empty or whitespace-only input is a no-op: the store is untouched.
    pub async fn set_current(&self, component: &str) -> Result<(), StoreError> {
        let component = component.trim();
        if component.is_empty() {
            debug!("ignoring empty component selection");
            return Ok(());
        }

        self.store.set(KEY_CURRENT, component).await?;

        let mut list = self.recent().await;
        list.promote(component);
        self.store.set(KEY_RECENT, &list.to_config_value()).await?;

        info!(component, "current component updated");
        Ok(())
    }
}
