//! Chat request types

use serde::{Deserialize, Serialize};

/// Message sent by the client over the chat socket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Free-text user query
    pub query: String,
}

impl ChatRequest {
    /// Create a new chat request
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}
