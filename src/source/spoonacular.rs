use crate::config::SourceConfig;
use crate::error::FetchError;
use crate::model::{RecipeSummary, SearchPage};
use crate::source::{PageRequest, RecipeSource};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::time::Duration;

/// Client for the Spoonacular `complexSearch` endpoint
pub struct SpoonacularSource {
    client: Client,
    api_key: String,
    base_url: String,
}

impl SpoonacularSource {
    /// Create a new source from configuration
    pub fn new(config: &SourceConfig) -> Result<Self, FetchError> {
        // Try config first, then fall back to environment variable
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("SPOONACULAR_API_KEY").ok())
            .ok_or_else(|| {
                FetchError::Config("SPOONACULAR_API_KEY not found in config or environment".into())
            })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FetchError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(SpoonacularSource {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        SpoonacularSource {
            client: Client::new(),
            api_key,
            base_url,
        }
    }
}

#[async_trait]
impl RecipeSource for SpoonacularSource {
    fn source_name(&self) -> &str {
        "spoonacular"
    }

    async fn fetch_page(&self, request: PageRequest) -> Result<Vec<RecipeSummary>, FetchError> {
        debug!(
            "Requesting recipes number={} offset={}",
            request.number, request.offset
        );

        let response = self
            .client
            .get(format!("{}/recipes/complexSearch", self.base_url))
            .query(&[
                ("apiKey", self.api_key.clone()),
                ("number", request.number.to_string()),
                ("offset", request.offset.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let page: SearchPage = serde_json::from_str(&body)?;
        debug!(
            "Received {} recipes (total {:?})",
            page.results.len(),
            page.total_results
        );
        Ok(page.results)
    }
}
