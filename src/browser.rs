use crate::config::{FeedConfig, RetryConfig};
use crate::error::FetchError;
use crate::favorites::FavoriteSet;
use crate::filter::{self, FilterCriteria, FilterPatch};
use crate::list_store::{PageOutcome, RecipeListStore};
use crate::model::{RecipeId, RecipeSummary};
use crate::pagination::{ListStatus, ObservationId, PaginationTrigger, VisibilityNotifier};
use crate::source::RecipeSource;
use crate::storage::{load_json_or_default, save_json, KeyValueStore};
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::time::sleep;

/// What the recipe grid should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewStatus {
    /// First page in flight, nothing to show yet
    InitialLoading,
    /// Nothing matches the current criteria
    Empty,
    /// Recipes shown, another page in flight
    LoadingMore,
    /// Recipes shown, idle
    Ready,
}

/// State owned by one recipe-browsing view.
///
/// Holds the loaded list, the filter criteria, the favorites and the
/// pagination trigger. All mutation goes through the methods below, which
/// persist criteria and favorites and keep the trigger attached to the last
/// displayed recipe.
pub struct RecipeBrowser<N: VisibilityNotifier> {
    source: Arc<dyn RecipeSource>,
    store: Arc<dyn KeyValueStore>,
    notifier: N,
    list: RecipeListStore,
    criteria: FilterCriteria,
    criteria_key: String,
    favorites: FavoriteSet,
    trigger: PaginationTrigger,
    retry: RetryConfig,
}

impl<N: VisibilityNotifier> RecipeBrowser<N> {
    /// Create the view state, rehydrating criteria and favorites from `store`
    pub fn mount(
        source: Arc<dyn RecipeSource>,
        store: Arc<dyn KeyValueStore>,
        notifier: N,
        config: &FeedConfig,
    ) -> Self {
        let criteria: FilterCriteria =
            load_json_or_default(store.as_ref(), &config.storage.criteria_key);
        let favorites = FavoriteSet::load(store.clone(), config.storage.favorites_key.clone());
        info!(
            "Mounted recipe browser on {} ({} favorites)",
            source.source_name(),
            favorites.len()
        );

        Self {
            source,
            store,
            notifier,
            list: RecipeListStore::new(config.source.page_size),
            criteria,
            criteria_key: config.storage.criteria_key.clone(),
            favorites,
            trigger: PaginationTrigger::new(),
            retry: config.retry.clone(),
        }
    }

    /// Mount and load the first page.
    ///
    /// A failed first page is recorded in [`last_error`](Self::last_error)
    /// rather than returned, so the view still opens.
    pub async fn open(
        source: Arc<dyn RecipeSource>,
        store: Arc<dyn KeyValueStore>,
        notifier: N,
        config: &FeedConfig,
    ) -> Self {
        let mut browser = Self::mount(source, store, notifier, config);
        if let Err(e) = browser.request_next_page().await {
            warn!("Initial recipe page failed: {}", e);
        }
        browser
    }

    /// Loaded recipes that pass the current criteria, in load order
    pub fn displayed(&self) -> Vec<&RecipeSummary> {
        filter::apply(self.list.items(), &self.criteria)
    }

    /// Every loaded recipe, unfiltered
    pub fn items(&self) -> &[RecipeSummary] {
        self.list.items()
    }

    pub fn is_loading(&self) -> bool {
        self.list.is_loading()
    }

    pub fn has_more(&self) -> bool {
        self.list.has_more()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.list.last_error()
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn favorites(&self) -> &FavoriteSet {
        &self.favorites
    }

    pub fn is_favorite(&self, id: &RecipeId) -> bool {
        self.favorites.contains(id)
    }

    /// Loaded recipes marked as favorite, in load order
    pub fn favorite_recipes(&self) -> Vec<&RecipeSummary> {
        self.list
            .items()
            .iter()
            .filter(|recipe| self.favorites.contains(&recipe.id))
            .collect()
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Recipe the pagination trigger is attached to
    pub fn observed_target(&self) -> Option<&RecipeId> {
        self.trigger.target()
    }

    pub fn status(&self) -> ViewStatus {
        let loading = self.list.is_loading();
        if loading && self.list.items().is_empty() {
            ViewStatus::InitialLoading
        } else if self.displayed().is_empty() {
            ViewStatus::Empty
        } else if loading {
            ViewStatus::LoadingMore
        } else {
            ViewStatus::Ready
        }
    }

    /// Fetch the next page.
    ///
    /// A failure is retried up to `retry.auto_attempts` extra times, waiting
    /// `retry.delay_ms * attempt` before each retry.
    pub async fn request_next_page(&mut self) -> Result<PageOutcome, FetchError> {
        let mut attempt: u32 = 0;
        let result = loop {
            match self.list.request_next_page(self.source.as_ref()).await {
                Err(e) if attempt < self.retry.auto_attempts => {
                    attempt += 1;
                    let delay = self.retry.delay_for(attempt);
                    warn!(
                        "Page {} failed (retry {}/{} in {:?}): {}",
                        self.list.page(),
                        attempt,
                        self.retry.auto_attempts,
                        delay,
                        e
                    );
                    sleep(delay).await;
                }
                other => break other,
            }
        };

        let target_before = self.trigger.target().cloned();
        self.rebind();
        // A load that leaves the same recipe last must still allow another
        // page once that recipe is reported visible again
        if matches!(result, Ok(PageOutcome::Appended { .. }))
            && self.trigger.target().is_some()
            && self.trigger.target() == target_before.as_ref()
        {
            self.trigger.rearm(&mut self.notifier);
        }
        result
    }

    /// Feed a visibility change from the notifier; loads the next page when
    /// the last displayed recipe scrolls into view
    pub async fn handle_visibility(
        &mut self,
        observation: ObservationId,
        visible: bool,
    ) -> Result<Option<PageOutcome>, FetchError> {
        if !self.trigger.on_visibility(observation, visible, self.list_status()) {
            return Ok(None);
        }
        debug!("Last recipe visible, requesting page {}", self.list.page());
        self.request_next_page().await.map(Some)
    }

    /// Flip a favorite; returns whether the recipe is a favorite afterwards
    pub fn toggle_favorite(&mut self, id: RecipeId) -> bool {
        self.favorites.toggle(id)
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.apply_filter_patch(FilterPatch {
            search_text: Some(text.into()),
            ..Default::default()
        });
    }

    pub fn apply_filter_patch(&mut self, patch: FilterPatch) {
        self.criteria.apply_patch(patch);
        self.criteria_changed();
    }

    pub fn clear_filters(&mut self) {
        self.criteria = FilterCriteria::default();
        self.criteria_changed();
    }

    /// Drop loaded recipes and start again from the first page
    pub fn reset(&mut self) {
        info!("Resetting recipe list");
        self.list.reset();
        self.rebind();
    }

    fn criteria_changed(&mut self) {
        if let Err(e) = save_json(self.store.as_ref(), &self.criteria_key, &self.criteria) {
            warn!("Could not persist filter criteria: {}", e);
        }
        self.rebind();
    }

    fn list_status(&self) -> ListStatus {
        ListStatus {
            has_more: self.list.has_more(),
            is_loading: self.list.is_loading(),
        }
    }

    fn rebind(&mut self) {
        let last = self.displayed().last().map(|recipe| recipe.id.clone());
        let status = self.list_status();
        self.trigger.bind(&mut self.notifier, last.as_ref(), status);
    }
}

impl<N: VisibilityNotifier> Drop for RecipeBrowser<N> {
    fn drop(&mut self) {
        self.trigger.disconnect(&mut self.notifier);
    }
}
