use axum::Json;

/// GET /api/health: liveness of the bot itself (not the oracle).
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
