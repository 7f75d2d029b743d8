//! Repository layer for database operations.

use crate::db::init::MARKER_TABLE;
use crate::domain::{Booking, Seat, User, Zone, ZoneMember};
use sqlx::sqlite::SqlitePool;

/// Repository for read queries against the booking schema.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// All zones, ordered by name.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list_zones(&self) -> Result<Vec<Zone>, sqlx::Error> {
        sqlx::query_as::<_, Zone>(
            "SELECT id, zone_group, name, iid, show_slider, min_time, max_time \
             FROM zone ORDER BY name ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Enabled seats in a zone.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list_seats(&self, zid: i64) -> Result<Vec<Seat>, sqlx::Error> {
        sqlx::query_as::<_, Seat>(
            "SELECT id, zid, name, x, y, enabled FROM seat \
             WHERE zid = ? AND enabled = 1 ORDER BY name ASC, id ASC",
        )
        .bind(zid)
        .fetch_all(&self.pool)
        .await
    }

    /// Bookings in a zone overlapping the half-open window `[from_ts, to_ts)`.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list_bookings(
        &self,
        zid: i64,
        from_ts: i64,
        to_ts: i64,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            "SELECT b.id, b.login, b.sid, b.fromts, b.tots \
             FROM book b JOIN seat s ON s.id = b.sid \
             WHERE s.zid = ? AND b.fromts < ? AND b.tots > ? \
             ORDER BY b.fromts ASC, b.id ASC",
        )
        .bind(zid)
        .bind(to_ts)
        .bind(from_ts)
        .fetch_all(&self.pool)
        .await
    }

    /// Users with access to a zone and their effective role, direct or
    /// inherited through group membership. The lowest level wins.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn zone_members(&self, zid: i64) -> Result<Vec<ZoneMember>, sqlx::Error> {
        sqlx::query_as::<_, ZoneMember>(
            "SELECT login, zid, MIN(zone_role) AS zone_role \
             FROM user_to_zone_roles WHERE zid = ? \
             GROUP BY login, zid ORDER BY login ASC",
        )
        .bind(zid)
        .fetch_all(&self.pool)
        .await
    }

    /// Look up a user by login.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn get_user(&self, login: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT login, name, account_type FROM users WHERE login = ?")
            .bind(login)
            .fetch_optional(&self.pool)
            .await
    }

    /// Names of applied migrations from the marker table, in order.
    ///
    /// # Errors
    /// Returns an error if the query fails (including when the marker table
    /// does not exist).
    pub async fn applied_migrations(&self) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(&format!(
            "SELECT migration_name FROM {MARKER_TABLE} ORDER BY migration_name ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }
}
