//! RAG server binary
//!
//! Run with: cargo run --bin agentic-rag-server

use agentic_rag::{config::RagConfig, server::RagServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agentic_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                    Agentic RAG Service                    ║
║        Routed Retrieval, Generation and Evaluation        ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    // Load configuration
    let config = RagConfig::load_or_default();

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {}", config.llm.embed_model);
    tracing::info!("  - Generation model: {}", config.llm.generate_model);
    tracing::info!("  - Vision model: {}", config.llm.vision_model);
    tracing::info!("  - Collection: {}", config.qdrant.collection);
    tracing::info!("  - Chunk size: {}", config.chunking.chunk_size);

    // Check Ollama
    tracing::info!("Checking Ollama at {}...", config.llm.base_url);
    let client = reqwest::Client::new();
    match client
        .get(format!("{}/api/tags", config.llm.base_url))
        .send()
        .await
    {
        Ok(resp) if resp.status().is_success() => {
            tracing::info!("Ollama is running");
        }
        _ => {
            tracing::warn!("Ollama not available at {}", config.llm.base_url);
            tracing::warn!("Please start Ollama:");
            tracing::warn!("  1. Start: ollama serve");
            tracing::warn!(
                "  2. Pull models: ollama pull all-minilm && ollama pull llama3.2:3b && ollama pull qwen2.5vl:3b"
            );
        }
    }

    // Check Qdrant
    tracing::info!("Checking Qdrant at {}...", config.qdrant.url);
    match client
        .get(format!("{}/collections", config.qdrant.url))
        .send()
        .await
    {
        Ok(resp) if resp.status().is_success() => {
            tracing::info!("Qdrant is running");
        }
        _ => {
            tracing::warn!("Qdrant not available at {}", config.qdrant.url);
            tracing::warn!("Queries will fall back to web search until it comes up");
        }
    }

    // Create and start server
    let server = RagServer::new(config)?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  GET  /api/v1/ws/chat    - WebSocket chat");
    println!("  POST /api/v1/upload/pdf - Upload a PDF");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
