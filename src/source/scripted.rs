//! In-memory recipe source for tests and offline demos.

use crate::error::FetchError;
use crate::model::RecipeSummary;
use crate::source::{PageRequest, RecipeSource};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// A scripted response: either a page of recipes or a failure message
#[derive(Debug, Clone)]
enum Scripted {
    Page(Vec<RecipeSummary>),
    Failure(String),
}

/// A recipe source that replays queued responses in order.
///
/// Once the queue is drained every request returns an empty page, which
/// marks the end of the results. Every request is recorded so callers can
/// assert on offsets and request counts.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    responses: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<PageRequest>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful page
    pub fn with_page(self, recipes: Vec<RecipeSummary>) -> Self {
        self.push(Scripted::Page(recipes));
        self
    }

    /// Queue a transport failure
    pub fn with_failure(self, message: &str) -> Self {
        self.push(Scripted::Failure(message.to_string()));
        self
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    fn push(&self, response: Scripted) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.push_back(response);
        }
    }
}

#[async_trait]
impl RecipeSource for ScriptedSource {
    fn source_name(&self) -> &str {
        "scripted"
    }

    async fn fetch_page(&self, request: PageRequest) -> Result<Vec<RecipeSummary>, FetchError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }

        let next = self
            .responses
            .lock()
            .map_err(|_| FetchError::Config("scripted source lock poisoned".into()))?
            .pop_front();

        match next {
            Some(Scripted::Page(recipes)) => Ok(recipes),
            Some(Scripted::Failure(message)) => Err(FetchError::Status {
                status: 503,
                body: message,
            }),
            None => Ok(Vec::new()),
        }
    }
}
