//! Query orchestration graph
//!
//! Five nodes wired into a linear flow with one conditional branch:
//!
//! ```text
//! START -> router -> (retrieval | web_search) -> generation -> evaluation -> END
//! ```
//!
//! Each node mutates the request-scoped [`WorkflowState`]; all real work is
//! delegated to the provider traits.

pub mod prompt;
pub mod state;

use std::sync::Arc;
use std::time::Instant;

use crate::config::RagConfig;
use crate::error::Result;
use crate::providers::{EmbeddingProvider, LlmProvider, VectorStoreProvider, WebSearchProvider};
use crate::types::{EvalResult, RetrievedDocument};

pub use prompt::PromptBuilder;
pub use state::{Route, WorkflowState};

/// Placeholder document content when web search returns nothing
const NO_WEB_RESULTS: &str = "No relevant web results found.";

/// The orchestration graph over shared provider handles.
///
/// Cheap to construct per request; the providers behind the `Arc`s are
/// process-wide.
pub struct AgentGraph {
    embedder: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStoreProvider>,
    llm: Arc<dyn LlmProvider>,
    web_search: Arc<dyn WebSearchProvider>,
    /// Similarity threshold applied by the store during routing
    score_threshold: f32,
    /// Chunks fetched by the retrieval node
    retrieval_top_k: usize,
    /// Snippets kept from a web search
    snippet_limit: usize,
    /// Temperature for answer generation (evaluation always runs at 0)
    temperature: f32,
}

impl AgentGraph {
    /// Build the graph from provider handles and configuration
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStoreProvider>,
        llm: Arc<dyn LlmProvider>,
        web_search: Arc<dyn WebSearchProvider>,
        config: &RagConfig,
    ) -> Self {
        Self {
            embedder,
            vector_store,
            llm,
            web_search,
            score_threshold: config.router.score_threshold,
            retrieval_top_k: config.router.retrieval_top_k,
            snippet_limit: config.web_search.snippet_limit,
            temperature: config.llm.temperature,
        }
    }

    /// Run the full graph for one query
    pub async fn run(&self, query: &str) -> Result<WorkflowState> {
        let start = Instant::now();
        let mut state = WorkflowState::new(query);

        self.router(&mut state).await?;

        match state.route {
            Some(Route::Db) => self.retrieval(&mut state).await?,
            _ => self.web_search(&mut state).await,
        }

        self.generation(&mut state).await?;
        self.evaluation(&mut state).await?;

        tracing::info!(
            "Graph run completed in {}ms (route: {})",
            start.elapsed().as_millis(),
            state.route.map(|r| r.as_str()).unwrap_or("?"),
        );

        Ok(state)
    }

    /// Router node: one k=1 probe against the index. Any hit routes to the
    /// local store, none routes to the web. Store failures propagate.
    async fn router(&self, state: &mut WorkflowState) -> Result<()> {
        let embedding = self.embedder.embed(&state.query).await?;

        let hits = self
            .vector_store
            .search(&embedding, 1, Some(self.score_threshold))
            .await?;

        let route = if hits.is_empty() { Route::Web } else { Route::Db };
        tracing::info!("Routing query to {} ({} probe hits)", route.as_str(), hits.len());

        state.query_embedding = Some(embedding);
        state.route = Some(route);
        Ok(())
    }

    /// Retrieval node: top-k similarity query, raw matches, no reranking
    async fn retrieval(&self, state: &mut WorkflowState) -> Result<()> {
        let embedding = match &state.query_embedding {
            Some(e) => e.clone(),
            None => self.embedder.embed(&state.query).await?,
        };

        let hits = self
            .vector_store
            .search(&embedding, self.retrieval_top_k, None)
            .await?;

        state.docs = hits
            .into_iter()
            .map(|hit| RetrievedDocument {
                content: hit.content,
                score: Some(hit.score),
                metadata: hit.metadata,
            })
            .collect();

        tracing::info!("Retrieved {} documents from the index", state.docs.len());
        Ok(())
    }

    /// Web search node: snippets joined into one document. Failures are
    /// swallowed into placeholder content instead of propagating, which
    /// degrades the generation input rather than failing the request.
    async fn web_search(&self, state: &mut WorkflowState) {
        let joined = match self.web_search.search(&state.query).await {
            Ok(snippets) => {
                let kept: Vec<String> =
                    snippets.into_iter().take(self.snippet_limit).collect();
                if kept.is_empty() {
                    NO_WEB_RESULTS.to_string()
                } else {
                    kept.join("\n")
                }
            }
            Err(e) => {
                tracing::warn!("Web search failed, degrading to placeholder: {}", e);
                format!("Web search failed: {}", e)
            }
        };

        state.docs = vec![RetrievedDocument::from_content(joined)];
    }

    /// Generation node: one chat completion over the numbered context
    async fn generation(&self, state: &mut WorkflowState) -> Result<()> {
        let prompt = PromptBuilder::build_answer_prompt(&state.query, &state.docs);
        let answer = self.llm.generate(&prompt, self.temperature).await?;
        state.answer = Some(answer.trim().to_string());
        Ok(())
    }

    /// Evaluation node: zero-temperature self-score, stored verbatim
    async fn evaluation(&self, state: &mut WorkflowState) -> Result<()> {
        let answer = state.answer.as_deref().unwrap_or_default();
        let prompt = PromptBuilder::build_eval_prompt(&state.query, &state.docs, answer);
        let response = self.llm.generate(&prompt, 0.0).await?;
        state.eval_result = Some(EvalResult::new(response));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    use crate::error::Error;
    use crate::providers::vector_store::VectorSearchResult;

    struct MockEmbedder;

    #[async_trait]
    impl EmbeddingProvider for MockEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![0.1; 384])
        }

        fn dimensions(&self) -> usize {
            384
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    /// Returns the configured hits for every search; records call arguments.
    struct MockVectorStore {
        hits: Vec<VectorSearchResult>,
        fail: bool,
        calls: Mutex<Vec<(usize, Option<f32>)>>,
    }

    impl MockVectorStore {
        fn with_hits(hits: Vec<VectorSearchResult>) -> Self {
            Self {
                hits,
                fail: false,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                hits: Vec::new(),
                fail: true,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl VectorStoreProvider for MockVectorStore {
        async fn ensure_collection(&self) -> Result<()> {
            Ok(())
        }

        async fn upsert(&self, _chunks: &[crate::types::DocumentChunk]) -> Result<()> {
            Ok(())
        }

        async fn search(
            &self,
            _query_embedding: &[f32],
            top_k: usize,
            score_threshold: Option<f32>,
        ) -> Result<Vec<VectorSearchResult>> {
            self.calls.lock().push((top_k, score_threshold));
            if self.fail {
                return Err(Error::VectorDb("store unavailable".to_string()));
            }
            Ok(self.hits.iter().take(top_k).cloned().collect())
        }

        async fn count(&self) -> Result<usize> {
            Ok(self.hits.len())
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(!self.fail)
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    /// Replies with a fixed answer for generation prompts and a fixed
    /// evaluation payload for evaluation prompts.
    struct MockLlm {
        answer: String,
        evaluation: String,
    }

    #[async_trait]
    impl LlmProvider for MockLlm {
        async fn generate(&self, prompt: &str, _temperature: f32) -> Result<String> {
            if prompt.starts_with("Evaluate the following RAG output.") {
                Ok(self.evaluation.clone())
            } else {
                Ok(self.answer.clone())
            }
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "mock"
        }

        fn model(&self) -> &str {
            "mock"
        }
    }

    struct MockWebSearch {
        snippets: Result<Vec<String>>,
    }

    #[async_trait]
    impl WebSearchProvider for MockWebSearch {
        async fn search(&self, _query: &str) -> Result<Vec<String>> {
            match &self.snippets {
                Ok(s) => Ok(s.clone()),
                Err(_) => Err(Error::WebSearch("api key rejected".to_string())),
            }
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    fn hit(content: &str, score: f32) -> VectorSearchResult {
        VectorSearchResult {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.to_string(),
            score,
            metadata: None,
        }
    }

    fn graph(
        store: MockVectorStore,
        llm: MockLlm,
        web: MockWebSearch,
    ) -> AgentGraph {
        AgentGraph::new(
            Arc::new(MockEmbedder),
            Arc::new(store),
            Arc::new(llm),
            Arc::new(web),
            &RagConfig::default(),
        )
    }

    fn default_llm() -> MockLlm {
        MockLlm {
            answer: "A grounded answer.".to_string(),
            evaluation: r#"{"faithfulness": "0.9", "relevance": "0.8", "comment": "ok"}"#
                .to_string(),
        }
    }

    fn no_web() -> MockWebSearch {
        MockWebSearch {
            snippets: Ok(Vec::new()),
        }
    }

    #[tokio::test]
    async fn any_hit_routes_to_db() {
        let graph = graph(
            MockVectorStore::with_hits(vec![hit("chunk one", 0.91), hit("chunk two", 0.80)]),
            default_llm(),
            no_web(),
        );

        let state = graph.run("what is in the report?").await.unwrap();
        assert_eq!(state.route, Some(Route::Db));
        assert_eq!(state.docs.len(), 2);
        assert_eq!(state.docs[0].content, "chunk one");
    }

    #[tokio::test]
    async fn low_score_hit_still_routes_to_db() {
        // The store applies the threshold; the graph only checks presence.
        let graph = graph(
            MockVectorStore::with_hits(vec![hit("barely related", 0.01)]),
            default_llm(),
            no_web(),
        );

        let state = graph.run("anything").await.unwrap();
        assert_eq!(state.route, Some(Route::Db));
    }

    #[tokio::test]
    async fn no_hits_routes_to_web() {
        let graph = graph(
            MockVectorStore::with_hits(Vec::new()),
            default_llm(),
            MockWebSearch {
                snippets: Ok(vec![
                    "snippet a".to_string(),
                    "snippet b".to_string(),
                    "snippet c".to_string(),
                    "snippet d".to_string(),
                ]),
            },
        );

        let state = graph.run("current weather in Paris").await.unwrap();
        assert_eq!(state.route, Some(Route::Web));
        // One wrapped document with the first 3 snippets
        assert_eq!(state.docs.len(), 1);
        assert_eq!(state.docs[0].content, "snippet a\nsnippet b\nsnippet c");
    }

    #[tokio::test]
    async fn empty_web_results_use_placeholder() {
        let graph = graph(MockVectorStore::with_hits(Vec::new()), default_llm(), no_web());

        let state = graph.run("obscure query").await.unwrap();
        assert_eq!(state.docs[0].content, NO_WEB_RESULTS);
    }

    #[tokio::test]
    async fn web_search_failure_is_swallowed_into_content() {
        let graph = graph(
            MockVectorStore::with_hits(Vec::new()),
            default_llm(),
            MockWebSearch {
                snippets: Err(Error::WebSearch("unused".to_string())),
            },
        );

        let state = graph.run("anything").await.unwrap();
        assert_eq!(state.route, Some(Route::Web));
        assert!(state.docs[0].content.starts_with("Web search failed:"));
        // Generation still runs over the degraded input
        assert_eq!(state.answer.as_deref(), Some("A grounded answer."));
    }

    #[tokio::test]
    async fn router_probes_k1_with_threshold_then_retrieves_k3() {
        let store = Arc::new(MockVectorStore::with_hits(vec![hit("chunk", 0.9)]));
        let graph = AgentGraph::new(
            Arc::new(MockEmbedder),
            Arc::clone(&store) as Arc<dyn VectorStoreProvider>,
            Arc::new(default_llm()),
            Arc::new(no_web()),
            &RagConfig::default(),
        );

        graph.run("q").await.unwrap();

        let calls = store.calls.lock().clone();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], (1, Some(0.5)));
        assert_eq!(calls[1], (3, None));
    }

    #[tokio::test]
    async fn answer_is_non_empty_and_trimmed() {
        let graph = graph(
            MockVectorStore::with_hits(vec![hit("context", 0.9)]),
            MockLlm {
                answer: "  The answer.  \n".to_string(),
                evaluation: "{}".to_string(),
            },
            no_web(),
        );

        let state = graph.run("q").await.unwrap();
        assert_eq!(state.answer.as_deref(), Some("The answer."));
    }

    #[tokio::test]
    async fn evaluation_is_stored_verbatim_even_when_malformed() {
        let graph = graph(
            MockVectorStore::with_hits(vec![hit("context", 0.9)]),
            MockLlm {
                answer: "answer".to_string(),
                evaluation: "faithfulness is pretty good I think".to_string(),
            },
            no_web(),
        );

        let state = graph.run("q").await.unwrap();
        assert_eq!(
            state.eval_result.as_ref().unwrap().raw(),
            "faithfulness is pretty good I think"
        );
    }

    #[tokio::test]
    async fn store_failure_propagates_from_router() {
        let graph = graph(MockVectorStore::failing(), default_llm(), no_web());

        let err = graph.run("q").await.unwrap_err();
        assert!(matches!(err, Error::VectorDb(_)));
    }
}
