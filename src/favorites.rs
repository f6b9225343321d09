use crate::error::StorageError;
use crate::model::RecipeId;
use crate::storage::{load_json_or_default, save_json, KeyValueStore};
use log::{debug, warn};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Recipe ids the user marked as favorite, persisted on every toggle
pub struct FavoriteSet {
    ids: BTreeSet<RecipeId>,
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl FavoriteSet {
    /// Rehydrate the set stored under `key`; a missing or corrupt value
    /// starts an empty set
    pub fn load(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let stored: Vec<RecipeId> = load_json_or_default(store.as_ref(), &key);
        debug!("Loaded {} favorites from '{}'", stored.len(), key);

        Self {
            ids: stored.into_iter().collect(),
            store,
            key,
        }
    }

    pub fn contains(&self, id: &RecipeId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Flip membership of `id` and persist the whole set.
    ///
    /// Returns whether `id` is a favorite afterwards. A failed write is
    /// logged and the in-memory set stays authoritative.
    pub fn toggle(&mut self, id: RecipeId) -> bool {
        let now_favorite = if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        };

        if let Err(e) = self.persist() {
            warn!("Could not persist favorites: {}", e);
        }
        now_favorite
    }

    /// Write the current set to storage
    pub fn persist(&self) -> Result<(), StorageError> {
        let ids: Vec<&RecipeId> = self.ids.iter().collect();
        save_json(self.store.as_ref(), &self.key, &ids)
    }
}

impl std::fmt::Debug for FavoriteSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoriteSet")
            .field("ids", &self.ids)
            .field("key", &self.key)
            .finish()
    }
}
