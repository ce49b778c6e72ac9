//! Qdrant vector store client over the REST API
//!
//! Uses a named dense vector with cosine distance. The routing score
//! threshold is passed to the search endpoint so filtering happens inside
//! the store.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::QdrantConfig;
use crate::error::{Error, Result};
use crate::types::{ChunkMetadata, DocumentChunk};

use super::vector_store::{VectorSearchResult, VectorStoreProvider};

/// Qdrant REST client
pub struct QdrantStore {
    client: Client,
    config: QdrantConfig,
}

#[derive(Serialize)]
struct UpsertRequest {
    points: Vec<Value>,
}

#[derive(Deserialize)]
struct SearchResponse {
    result: Vec<ScoredPoint>,
}

#[derive(Deserialize)]
struct ScoredPoint {
    id: Value,
    score: f32,
    #[serde(default)]
    payload: Option<Value>,
}

#[derive(Deserialize)]
struct CountResponse {
    result: CountResult,
}

#[derive(Deserialize)]
struct CountResult {
    count: usize,
}

impl QdrantStore {
    /// Create a new Qdrant client
    pub fn new(config: QdrantConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn collection_url(&self) -> String {
        format!("{}/collections/{}", self.config.url, self.config.collection)
    }

    /// Attach the API key header when configured
    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) => builder.header("api-key", key),
            None => builder,
        }
    }

    /// Build the point JSON for one chunk
    fn point_from_chunk(&self, chunk: &DocumentChunk) -> Value {
        json!({
            "id": chunk.id.to_string(),
            "vector": { (self.config.vector_name.clone()): chunk.embedding },
            "payload": {
                "content": chunk.content,
                "doc_id": chunk.metadata.doc_id.to_string(),
                "user_id": chunk.metadata.user_id,
                "filename": chunk.metadata.filename,
                "timestamp": chunk.metadata.timestamp.to_rfc3339(),
            }
        })
    }

    /// Map a scored point back to a search result
    fn result_from_point(point: ScoredPoint) -> VectorSearchResult {
        let payload = point.payload.unwrap_or(Value::Null);

        let content = payload
            .get("content")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let metadata = parse_metadata(&payload);

        let id = match point.id {
            Value::String(s) => s,
            other => other.to_string(),
        };

        VectorSearchResult {
            id,
            content,
            score: point.score,
            metadata,
        }
    }
}

/// Reconstruct chunk metadata from a point payload, if complete
fn parse_metadata(payload: &Value) -> Option<ChunkMetadata> {
    let doc_id = payload
        .get("doc_id")
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())?;
    let user_id = payload.get("user_id").and_then(Value::as_str)?.to_string();
    let filename = payload.get("filename").and_then(Value::as_str)?.to_string();
    let timestamp = payload
        .get("timestamp")
        .and_then(Value::as_str)
        .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())?
        .with_timezone(&chrono::Utc);

    Some(ChunkMetadata {
        doc_id,
        user_id,
        filename,
        timestamp,
    })
}

#[async_trait]
impl VectorStoreProvider for QdrantStore {
    async fn ensure_collection(&self) -> Result<()> {
        let response = self
            .request(self.client.get(self.collection_url()))
            .send()
            .await
            .map_err(|e| Error::VectorDb(format!("Collection lookup failed: {}", e)))?;

        if response.status().is_success() {
            return Ok(());
        }

        tracing::info!("Creating Qdrant collection '{}'", self.config.collection);

        let body = json!({
            "vectors": {
                (self.config.vector_name.clone()): {
                    "size": self.config.vector_size,
                    "distance": "Cosine",
                    "on_disk": true,
                }
            }
        });

        let response = self
            .request(self.client.put(self.collection_url()).json(&body))
            .send()
            .await
            .map_err(|e| Error::VectorDb(format!("Collection create failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::VectorDb(format!(
                "Collection create failed: HTTP {} - {}",
                status, detail
            )));
        }

        Ok(())
    }

    async fn upsert(&self, chunks: &[DocumentChunk]) -> Result<()> {
        for chunk in chunks {
            if chunk.embedding.is_empty() {
                return Err(Error::VectorDb(format!(
                    "Chunk {} has no embedding",
                    chunk.id
                )));
            }
        }

        let url = format!("{}/points?wait=true", self.collection_url());

        for batch in chunks.chunks(self.config.batch_size) {
            let request = UpsertRequest {
                points: batch.iter().map(|c| self.point_from_chunk(c)).collect(),
            };

            let response = self
                .request(self.client.put(&url).json(&request))
                .send()
                .await
                .map_err(|e| Error::VectorDb(format!("Upsert failed: {}", e)))?;

            if !response.status().is_success() {
                let status = response.status();
                let detail = response.text().await.unwrap_or_default();
                return Err(Error::VectorDb(format!(
                    "Upsert failed: HTTP {} - {}",
                    status, detail
                )));
            }
        }

        Ok(())
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
        score_threshold: Option<f32>,
    ) -> Result<Vec<VectorSearchResult>> {
        let url = format!("{}/points/search", self.collection_url());

        let mut body = json!({
            "vector": {
                "name": self.config.vector_name,
                "vector": query_embedding,
            },
            "limit": top_k,
            "with_payload": true,
        });
        if let Some(threshold) = score_threshold {
            body["score_threshold"] = json!(threshold);
        }

        let response = self
            .request(self.client.post(&url).json(&body))
            .send()
            .await
            .map_err(|e| Error::VectorDb(format!("Search failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::VectorDb(format!(
                "Search failed: HTTP {} - {}",
                status, detail
            )));
        }

        let search_response: SearchResponse = response
            .json()
            .await
            .map_err(|e| Error::VectorDb(format!("Failed to parse search response: {}", e)))?;

        Ok(search_response
            .result
            .into_iter()
            .map(Self::result_from_point)
            .collect())
    }

    async fn count(&self) -> Result<usize> {
        let url = format!("{}/points/count", self.collection_url());

        let response = self
            .request(self.client.post(&url).json(&json!({ "exact": false })))
            .send()
            .await
            .map_err(|e| Error::VectorDb(format!("Count failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::VectorDb(format!(
                "Count failed: HTTP {}",
                response.status()
            )));
        }

        let count_response: CountResponse = response
            .json()
            .await
            .map_err(|e| Error::VectorDb(format!("Failed to parse count response: {}", e)))?;

        Ok(count_response.result.count)
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/collections", self.config.url);

        match self.request(self.client.get(&url)).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn name(&self) -> &str {
        "qdrant"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn test_store() -> QdrantStore {
        QdrantStore::new(QdrantConfig::default()).unwrap()
    }

    #[test]
    fn point_carries_flat_metadata_payload() {
        let store = test_store();
        let metadata = ChunkMetadata::new(Uuid::new_v4(), "user-1", "report.pdf");
        let chunk = DocumentChunk::new("some page text", metadata.clone())
            .with_embedding(vec![0.1, 0.2, 0.3]);

        let point = store.point_from_chunk(&chunk);

        assert_eq!(point["id"], chunk.id.to_string());
        assert_eq!(point["vector"]["dense"][1], 0.2f32 as f64);
        assert_eq!(point["payload"]["content"], "some page text");
        assert_eq!(point["payload"]["doc_id"], metadata.doc_id.to_string());
        assert_eq!(point["payload"]["user_id"], "user-1");
        assert_eq!(point["payload"]["filename"], "report.pdf");
    }

    #[test]
    fn search_response_maps_to_results() {
        let raw = json!({
            "result": [
                {
                    "id": "b5f9a1d0-0000-0000-0000-000000000001",
                    "score": 0.83,
                    "payload": {
                        "content": "chunk text",
                        "doc_id": Uuid::new_v4().to_string(),
                        "user_id": "anonymous",
                        "filename": "doc.pdf",
                        "timestamp": chrono::Utc::now().to_rfc3339(),
                    }
                }
            ]
        });

        let response: SearchResponse = serde_json::from_value(raw).unwrap();
        let results: Vec<VectorSearchResult> = response
            .result
            .into_iter()
            .map(QdrantStore::result_from_point)
            .collect();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].content, "chunk text");
        assert!((results[0].score - 0.83).abs() < f32::EPSILON);
        let metadata = results[0].metadata.as_ref().unwrap();
        assert_eq!(metadata.filename, "doc.pdf");
    }

    #[test]
    fn missing_payload_fields_yield_no_metadata() {
        let payload = json!({ "content": "text only" });
        assert!(parse_metadata(&payload).is_none());
    }
}
