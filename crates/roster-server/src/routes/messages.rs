use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// One inbound chat message as delivered by the transport.
#[derive(Debug, Deserialize)]
pub struct MessageEnvelope {
    /// Conversation/channel id; pending confirmations are keyed by it.
    pub scope: String,
    #[serde(default)]
    pub author: Option<String>,
    pub content: String,
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

/// POST /api/messages: run one message through command dispatch.
///
/// Always answers `{ "reply": <text|null> }`; collaborator failures are
/// already turned into reply text by dispatch. `null` means the bot stays
/// silent (own message, or not a command).
pub async fn post_message(
    State(app): State<AppState>,
    body: Result<Json<MessageEnvelope>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Json(envelope) = body.map_err(|e| AppError::bad_request(e.body_text()))?;

    let scope = envelope.scope.trim().to_string();
    if scope.is_empty() {
        return Err(AppError::bad_request("scope is required"));
    }

    if app.is_own_message(envelope.author.as_deref()) {
        return Ok(Json(serde_json::json!({ "reply": null })));
    }

    let roster = app.roster.clone();
    let content = envelope.content;
    let reply = tokio::task::spawn_blocking(move || roster.handle(&scope, &content))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))?;

    Ok(Json(serde_json::json!({ "reply": reply })))
}
