//! Deduplicated accumulation of paginated recipe results.
//!
//! A fetch is split into [`RecipeListStore::begin_fetch`], which checks the
//! preconditions and marks the store as loading, and
//! [`RecipeListStore::complete`], which applies the result. Between the two
//! the caller awaits the source without holding any borrow on the store.

use crate::error::FetchError;
use crate::model::{RecipeId, RecipeSummary};
use crate::source::{PageRequest, RecipeSource};
use log::{debug, info, warn};
use std::collections::HashSet;

/// Recipes requested per page unless configured otherwise
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Proof that a fetch was started; must be handed back to `complete`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTicket {
    pub page: u32,
    pub request: PageRequest,
    epoch: u64,
}

/// What a page completion did to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// Preconditions failed; nothing was requested
    Skipped,
    /// New recipes were appended and the page index advanced
    Appended { added: usize, duplicates: usize },
    /// The source returned an empty page; pagination has stopped
    Exhausted,
    /// The result belonged to a store that has since been reset
    Discarded,
}

/// Ordered, deduplicated recipe list plus pagination progress
#[derive(Debug)]
pub struct RecipeListStore {
    items: Vec<RecipeSummary>,
    seen: HashSet<RecipeId>,
    page: u32,
    page_size: u32,
    has_more: bool,
    is_loading: bool,
    last_error: Option<String>,
    epoch: u64,
}

impl Default for RecipeListStore {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl RecipeListStore {
    pub fn new(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new(),
            page: 1,
            page_size: page_size.max(1),
            has_more: true,
            is_loading: false,
            last_error: None,
            epoch: 0,
        }
    }

    pub fn items(&self) -> &[RecipeSummary] {
        &self.items
    }

    /// Next page index to request (1-based)
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Message of the most recent failed fetch, cleared by the next success
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Start fetching the next page.
    ///
    /// Returns `None` when a fetch is already in flight or the results are
    /// exhausted.
    pub fn begin_fetch(&mut self) -> Option<PageTicket> {
        if self.is_loading || !self.has_more {
            debug!(
                "Not requesting page {} (loading={}, has_more={})",
                self.page, self.is_loading, self.has_more
            );
            return None;
        }

        self.is_loading = true;
        Some(PageTicket {
            page: self.page,
            request: PageRequest::for_page(self.page, self.page_size),
            epoch: self.epoch,
        })
    }

    /// Apply the result of the fetch identified by `ticket`.
    ///
    /// A failure leaves `page`, `items` and `has_more` untouched so the same
    /// page can be requested again; the error is handed back to the caller.
    pub fn complete(
        &mut self,
        ticket: PageTicket,
        result: Result<Vec<RecipeSummary>, FetchError>,
    ) -> Result<PageOutcome, FetchError> {
        if ticket.epoch != self.epoch {
            debug!("Discarding stale result for page {}", ticket.page);
            return Ok(PageOutcome::Discarded);
        }
        self.is_loading = false;

        let recipes = match result {
            Ok(recipes) => recipes,
            Err(e) => {
                warn!("Fetching page {} failed: {}", ticket.page, e);
                self.last_error = Some(e.to_string());
                return Err(e);
            }
        };
        self.last_error = None;

        if recipes.is_empty() {
            info!("No recipes on page {}, pagination finished", ticket.page);
            self.has_more = false;
            return Ok(PageOutcome::Exhausted);
        }

        let received = recipes.len();
        let mut added = 0;
        for recipe in recipes {
            if self.seen.insert(recipe.id.clone()) {
                self.items.push(recipe);
                added += 1;
            }
        }
        self.page += 1;

        debug!(
            "Page {} merged: {} new, {} duplicates, {} total",
            ticket.page,
            added,
            received - added,
            self.items.len()
        );
        Ok(PageOutcome::Appended {
            added,
            duplicates: received - added,
        })
    }

    /// Fetch and merge the next page from `source`
    pub async fn request_next_page(
        &mut self,
        source: &dyn RecipeSource,
    ) -> Result<PageOutcome, FetchError> {
        let Some(ticket) = self.begin_fetch() else {
            return Ok(PageOutcome::Skipped);
        };
        let result = source.fetch_page(ticket.request).await;
        self.complete(ticket, result)
    }

    /// Drop all results and start over from page 1.
    ///
    /// Any fetch still in flight will be discarded when it completes.
    pub fn reset(&mut self) {
        self.items.clear();
        self.seen.clear();
        self.page = 1;
        self.has_more = true;
        self.is_loading = false;
        self.last_error = None;
        self.epoch += 1;
    }
}
