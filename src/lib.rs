pub mod browser;
pub mod config;
pub mod error;
pub mod favorites;
pub mod filter;
pub mod list_store;
pub mod model;
pub mod pagination;
pub mod source;
pub mod storage;

pub use browser::{RecipeBrowser, ViewStatus};
pub use crate::config::FeedConfig;
pub use error::{BrowseError, FetchError, StorageError};
pub use favorites::FavoriteSet;
pub use filter::{FilterCriteria, FilterPatch};
pub use list_store::{PageOutcome, RecipeListStore};
pub use model::{RecipeId, RecipeSummary};
pub use pagination::{ObservationId, PaginationTrigger, VisibilityNotifier};
pub use source::{PageRequest, RecipeSource, ScriptedSource, SpoonacularSource};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};

use std::sync::Arc;

/// Open a browser against the configured Spoonacular endpoint, with state
/// persisted to the configured JSON file.
///
/// # Example
/// ```no_run
/// # use recipe_feed::{open_browser, FeedConfig, ObservationId, RecipeId, VisibilityNotifier};
/// # struct Viewport;
/// # impl VisibilityNotifier for Viewport {
/// #     fn observe(&mut self, _: &RecipeId) -> ObservationId { ObservationId(0) }
/// #     fn disconnect(&mut self, _: ObservationId) {}
/// # }
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = FeedConfig::load()?;
/// let browser = open_browser(&config, Viewport).await?;
/// for recipe in browser.displayed() {
///     println!("{}", recipe.title);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn open_browser<N: VisibilityNotifier>(
    config: &FeedConfig,
    notifier: N,
) -> Result<RecipeBrowser<N>, BrowseError> {
    let source = Arc::new(SpoonacularSource::new(&config.source)?);
    let store = Arc::new(JsonFileStore::open(&config.storage.path)?);
    Ok(RecipeBrowser::open(source, store, notifier, config).await)
}
