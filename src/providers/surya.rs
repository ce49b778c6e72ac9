//! HTTP client for a Surya-compatible layout/OCR inference service
//!
//! The service wraps the pretrained layout and recognition predictors and
//! exposes them as JSON endpoints:
//!
//! - `POST /layout` `{"image": <base64 png>}` →
//!   `{"bboxes": [{"bbox": [x1,y1,x2,y2], "label": "...", "confidence": ...}]}`
//! - `POST /ocr` `{"image": <base64 png>}` →
//!   `{"text_lines": [{"bbox": [x1,y1,x2,y2], "text": "..."}]}`
//!
//! Field names match what the predictors emit, so a thin sidecar can forward
//! model output unchanged.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::OcrConfig;
use crate::error::{Error, Result};
use crate::types::{LayoutBox, TextLine};

use super::ocr::OcrProvider;

/// Client for the layout/OCR inference service
pub struct SuryaClient {
    client: Client,
    config: OcrConfig,
}

#[derive(Serialize)]
struct ImageRequest {
    image: String,
}

#[derive(Deserialize)]
struct LayoutResponse {
    bboxes: Vec<LayoutBox>,
}

#[derive(Deserialize)]
struct OcrResponse {
    text_lines: Vec<TextLine>,
}

impl SuryaClient {
    /// Create a new client
    pub fn new(config: OcrConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    async fn post_image<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        png: &[u8],
    ) -> Result<T> {
        let url = format!("{}{}", self.config.base_url, endpoint);
        let request = ImageRequest {
            image: BASE64.encode(png),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Ocr(format!("Request to {} failed: {}", endpoint, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::Ocr(format!(
                "{} failed: HTTP {} - {}",
                endpoint, status, detail
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Ocr(format!("Failed to parse {} response: {}", endpoint, e)))
    }
}

#[async_trait]
impl OcrProvider for SuryaClient {
    async fn detect_layout(&self, png: &[u8]) -> Result<Vec<LayoutBox>> {
        let response: LayoutResponse = self.post_image("/layout", png).await?;
        Ok(response.bboxes)
    }

    async fn recognize(&self, png: &[u8]) -> Result<Vec<TextLine>> {
        let response: OcrResponse = self.post_image("/ocr", png).await?;
        Ok(response.text_lines)
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/health", self.config.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn name(&self) -> &str {
        "surya"
    }
}
