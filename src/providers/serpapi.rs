//! SerpApi web search client

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::config::WebSearchConfig;
use crate::error::{Error, Result};

use super::web_search::WebSearchProvider;

/// SerpApi client (Google engine)
pub struct SerpApiClient {
    client: Client,
    config: WebSearchConfig,
}

impl SerpApiClient {
    /// Create a new client
    pub fn new(config: WebSearchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }
}

/// Pull organic-result snippets out of a SerpApi response, in rank order
fn parse_organic_snippets(body: &Value) -> Vec<String> {
    body.get("organic_results")
        .and_then(Value::as_array)
        .map(|results| {
            results
                .iter()
                .filter_map(|r| r.get("snippet").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl WebSearchProvider for SerpApiClient {
    async fn search(&self, query: &str) -> Result<Vec<String>> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| Error::WebSearch("SERPAPI_API_KEY is not set".to_string()))?;

        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[
                ("q", query),
                ("api_key", api_key),
                ("num", &self.config.result_count.to_string()),
                ("engine", &self.config.engine),
            ])
            .send()
            .await
            .map_err(|e| Error::WebSearch(format!("Search request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::WebSearch(format!(
                "Search failed: HTTP {} - {}",
                status, detail
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::WebSearch(format!("Failed to parse search response: {}", e)))?;

        Ok(parse_organic_snippets(&body))
    }

    fn name(&self) -> &str {
        "serpapi"
    }
}
