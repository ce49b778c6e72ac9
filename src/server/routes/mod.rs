//! API routes for the RAG server

pub mod chat;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Chat over WebSocket
        .route("/ws/chat", get(chat::chat_socket))
        // PDF ingestion - with larger body limit for file uploads
        .route(
            "/upload/pdf",
            post(upload::upload_pdf).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        // Info
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "agentic-rag",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Agentic RAG service with query routing and PDF ingestion",
        "endpoints": {
            "GET /api/v1/ws/chat": "WebSocket chat with routed retrieval and self-evaluation",
            "POST /api/v1/upload/pdf": "Upload a PDF for layout-aware ingestion",
            "GET /api/v1/info": "This document"
        }
    }))
}
