use axum::{extract::State, Json};

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/records: the full list in insertion order.
pub async fn list_records(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let roster = app.roster.clone();
    let records = tokio::task::spawn_blocking(move || roster.list())
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
    Ok(Json(serde_json::json!({ "records": records })))
}
