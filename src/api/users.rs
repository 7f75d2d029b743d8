use crate::api::AppState;
use crate::domain::AccountType;
use crate::error::AppError;
use axum::extract::{Path, State};
use axum::Json;
use serde_json::json;

pub async fn get_user(
    State(state): State<AppState>,
    Path(login): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = state
        .repo
        .get_user(&login)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no such user: {}", login)))?;

    Ok(Json(json!({
        "login": user.login,
        "name": user.name,
        "account_type": user.account_type,
        "role": AccountType::from_level(user.account_type),
    })))
}
