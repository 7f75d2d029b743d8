use crate::api::AppState;
use crate::domain::{Seat, Zone, ZoneRole};
use crate::error::AppError;
use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

pub async fn get_zones(State(state): State<AppState>) -> Result<Json<Vec<Zone>>, AppError> {
    let zones = state.repo.list_zones().await?;
    Ok(Json(zones))
}

pub async fn get_zone_seats(
    State(state): State<AppState>,
    Path(zid): Path<i64>,
) -> Result<Json<Vec<Seat>>, AppError> {
    let seats = state.repo.list_seats(zid).await?;
    Ok(Json(seats))
}

#[derive(Debug, Serialize)]
pub struct ZoneMemberView {
    pub login: String,
    pub zid: i64,
    pub zone_role: i64,
    /// Named role, if the stored level is a known one.
    pub role: Option<ZoneRole>,
}

pub async fn get_zone_members(
    State(state): State<AppState>,
    Path(zid): Path<i64>,
) -> Result<Json<Vec<ZoneMemberView>>, AppError> {
    let members = state.repo.zone_members(zid).await?;
    let views = members
        .into_iter()
        .map(|m| ZoneMemberView {
            login: m.login,
            zid: m.zid,
            role: ZoneRole::from_level(m.zone_role),
            zone_role: m.zone_role,
        })
        .collect();
    Ok(Json(views))
}
