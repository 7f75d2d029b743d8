use crate::api::AppState;
use crate::domain::Booking;
use crate::error::AppError;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct BookingsQuery {
    pub zid: i64,
    pub from: Option<i64>,
    pub to: Option<i64>,
}

pub async fn get_bookings(
    State(state): State<AppState>,
    Query(params): Query<BookingsQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    // Default window: the next 24 hours.
    let now = chrono::Utc::now().timestamp();
    let from = params.from.unwrap_or(now);
    let to = params.to.unwrap_or(from + 86_400);

    if from >= to {
        return Err(AppError::BadRequest(
            "from must be earlier than to".to_string(),
        ));
    }

    let bookings = state.repo.list_bookings(params.zid, from, to).await?;
    Ok(Json(bookings))
}
