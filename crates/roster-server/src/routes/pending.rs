use axum::{extract::State, Json};

use crate::state::AppState;

/// GET /api/pending: confirmations currently awaiting a `!yes`/`!no`.
pub async fn list_pending(State(app): State<AppState>) -> Json<serde_json::Value> {
    let pending = app.roster.gate().snapshot();
    Json(serde_json::json!(pending))
}
