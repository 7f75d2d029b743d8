use crate::api::AppState;
use crate::error::AppError;
use axum::extract::State;
use axum::Json;
use serde_json::json;

/// Initialization status: applied migration names from the marker table.
pub async fn get_status(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let migrations = state.repo.applied_migrations().await?;
    Ok(Json(json!({
        "initialized": true,
        "migrations": migrations,
    })))
}
