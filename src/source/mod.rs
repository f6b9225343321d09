mod scripted;
mod spoonacular;

pub use scripted::ScriptedSource;
pub use spoonacular::SpoonacularSource;

use crate::error::FetchError;
use crate::model::RecipeSummary;
use async_trait::async_trait;

/// Position of one page in the search results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Recipes per page (the `number` query parameter)
    pub number: u32,
    /// Zero-based index of the first recipe (`(page - 1) * number`)
    pub offset: u32,
}

impl PageRequest {
    /// Request for the 1-based `page` with `number` recipes per page
    pub fn for_page(page: u32, number: u32) -> Self {
        Self {
            number,
            offset: page.saturating_sub(1).saturating_mul(number),
        }
    }
}

/// A paginated recipe search endpoint
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Get the source name (e.g., "spoonacular")
    fn source_name(&self) -> &str;

    /// Fetch one page of recipe summaries. An empty list means there are no
    /// more results.
    async fn fetch_page(&self, request: PageRequest) -> Result<Vec<RecipeSummary>, FetchError>;
}
