//! WebSocket chat endpoint

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};

use crate::agents::AgentGraph;
use crate::server::state::AppState;
use crate::types::{ChatRequest, ChatResponse, EvalResult};

/// GET /api/v1/ws/chat - upgrade to the chat socket
pub async fn chat_socket(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Per-connection message loop.
///
/// Every inbound text frame gets exactly one reply frame. Failures are
/// reported in the reply payload; the connection only closes when the
/// client disconnects or the socket itself errors.
async fn handle_socket(socket: WebSocket, state: AppState) {
    tracing::info!("Chat socket connected");
    let (mut sender, mut receiver) = socket.split();
    let graph = state.graph();

    while let Some(message) = receiver.next().await {
        let message = match message {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!("Chat socket error: {}", e);
                break;
            }
        };

        let text = match message {
            Message::Text(text) => text,
            Message::Close(_) => break,
            // Pings are answered by axum automatically
            _ => continue,
        };

        let response = match serde_json::from_str::<ChatRequest>(&text) {
            Ok(request) => run_query(&graph, &request.query).await,
            Err(e) => {
                tracing::warn!("Malformed chat message: {}", e);
                ChatResponse::error("", format!("Invalid request: {}", e))
            }
        };

        let payload = match serde_json::to_string(&response) {
            Ok(p) => p,
            Err(e) => {
                tracing::error!("Failed to serialize chat response: {}", e);
                continue;
            }
        };

        if sender.send(Message::Text(payload)).await.is_err() {
            break;
        }
    }

    tracing::info!("Chat socket closed");
}

/// Run one query through the graph and shape the reply
pub async fn run_query(graph: &AgentGraph, query: &str) -> ChatResponse {
    match graph.run(query).await {
        Ok(state) => ChatResponse::success(
            state.answer.unwrap_or_default(),
            state
                .eval_result
                .unwrap_or_else(|| EvalResult::new("no evaluation")),
            state.query,
        ),
        Err(e) => {
            tracing::error!("Query failed: {}", e);
            ChatResponse::error(query, e)
        }
    }
}
