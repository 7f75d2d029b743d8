pub mod bookings;
pub mod health;
pub mod status;
pub mod users;
pub mod zones;

use crate::db::Repository;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
}

impl AppState {
    pub fn new(repo: Arc<Repository>) -> Self {
        Self { repo }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/status", get(status::get_status))
        .route("/v1/zones", get(zones::get_zones))
        .route("/v1/zones/:zid/seats", get(zones::get_zone_seats))
        .route("/v1/zones/:zid/members", get(zones::get_zone_members))
        .route("/v1/users/:login", get(users::get_user))
        .route("/v1/bookings", get(bookings::get_bookings))
        .layer(cors)
        .with_state(state)
}
