//! Row types for the business tables declared in `sql/init.sql`.
//!
//! The initializer only declares these tables; reads go through the
//! repository layer.

use serde::Serialize;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub login: String,
    pub name: String,
    pub account_type: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Zone {
    pub id: i64,
    pub zone_group: i64,
    pub name: String,
    /// Blob id of the zone's floor-plan image, if any.
    pub iid: Option<i64>,
    /// Whether the booking UI shows the time slider for this zone.
    pub show_slider: bool,
    /// Earliest bookable time of day, seconds from midnight.
    pub min_time: i64,
    /// Latest bookable time of day, seconds from midnight.
    pub max_time: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Seat {
    pub id: i64,
    pub zid: i64,
    pub name: String,
    pub x: i64,
    pub y: i64,
    pub enabled: bool,
}

/// A seat reservation for a half-open time window `[fromts, tots)` in Unix
/// seconds.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Booking {
    pub id: i64,
    pub login: String,
    pub sid: i64,
    pub fromts: i64,
    pub tots: i64,
}

/// A user's effective role in a zone, direct or inherited through a group.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ZoneMember {
    pub login: String,
    pub zid: i64,
    pub zone_role: i64,
}
