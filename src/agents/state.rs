//! Request-scoped workflow state carried through the node graph

use serde::{Deserialize, Serialize};

use crate::types::{EvalResult, RetrievedDocument};

/// Routing decision made by the router node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    /// Answer from the local vector index
    Db,
    /// Fall back to live web search
    Web,
}

impl Route {
    /// Label used in logs and state dumps
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Db => "DB",
            Route::Web => "WEB",
        }
    }
}

/// Mutable state accumulated across one graph run.
///
/// Lives for a single request; each node reads what earlier nodes wrote and
/// appends its own result.
#[derive(Debug, Clone)]
pub struct WorkflowState {
    /// The user query
    pub query: String,
    /// Query embedding, computed once by the router and reused by retrieval
    pub query_embedding: Option<Vec<f32>>,
    /// Documents from retrieval or web search
    pub docs: Vec<RetrievedDocument>,
    /// Generated answer
    pub answer: Option<String>,
    /// Verbatim evaluation output
    pub eval_result: Option<EvalResult>,
    /// Routing decision
    pub route: Option<Route>,
}

impl WorkflowState {
    /// Fresh state for a query
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            query_embedding: None,
            docs: Vec::new(),
            answer: None,
            eval_result: None,
            route: None,
        }
    }
}
