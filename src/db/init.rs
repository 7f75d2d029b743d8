//! Database initialization and migrations.
//!
//! On startup the service ensures the schema exists and all migration scripts
//! have been applied. A marker table records applied migration names; its
//! presence is how an already-initialized database is detected. Transient
//! connection failures (e.g. the database file living on a volume that is not
//! mounted yet) are retried with a fixed delay.

use sqlx::sqlite::{SqliteConnection, SqlitePool, SqlitePoolOptions};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Table recording which migration scripts have been applied.
pub const MARKER_TABLE: &str = "db_initialized";

/// Connection and script configuration for [`init_db`].
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Path to the SQLite database file.
    pub database_path: String,
    /// Extra URI query arguments appended to the connection string.
    pub database_args: Option<String>,
    /// SQL scripts executed only on first-time setup (or with `force`).
    pub init_scripts: Vec<PathBuf>,
    /// SQL scripts executed on every startup, in order.
    pub migration_scripts: Vec<PathBuf>,
    /// Connect attempts before giving up; clamped to a minimum of 1.
    pub retries: u32,
    /// Fixed sleep between connect attempts.
    pub retry_delay: Duration,
}

#[derive(Debug, Error)]
pub enum InitError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("failed to read SQL script {path}: {source}")]
    Script {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl InitError {
    /// Connection-level failures are worth retrying; everything else is not.
    pub fn is_connection_error(&self) -> bool {
        match self {
            InitError::Db(err) => is_connection_error(err),
            InitError::Script { .. } => false,
        }
    }
}

fn is_connection_error(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed => true,
        // SQLITE_BUSY (5), SQLITE_LOCKED (6), SQLITE_CANTOPEN (14); mask off
        // the extended result code bits.
        sqlx::Error::Database(db) => db
            .code()
            .and_then(|code| code.parse::<i64>().ok())
            .is_some_and(|code| matches!(code & 0xff, 5 | 6 | 14)),
        _ => false,
    }
}

/// Connect to the database and bring the schema up to date.
///
/// With `force` set, init scripts are re-run and the marker table recreated
/// regardless of the current state. The whole connect-and-initialize sequence
/// is retried on connection-level failures, up to the configured count.
///
/// # Errors
/// Returns the last error once retries are exhausted, or immediately for
/// non-connection failures.
pub async fn init_db(opts: &InitOptions, force: bool) -> Result<SqlitePool, InitError> {
    let mut retries = opts.retries.max(1);

    loop {
        match try_init(opts, force).await {
            Ok(pool) => return Ok(pool),
            Err(err) if err.is_connection_error() => {
                retries -= 1;
                if retries == 0 {
                    tracing::error!("cannot connect to the database: {}", err);
                    return Err(err);
                }
                warn!(
                    "database connection error, waiting {} second(s): {}",
                    opts.retry_delay.as_secs_f64(),
                    err
                );
                tokio::time::sleep(opts.retry_delay).await;
                info!("retrying database initialization ({} attempt(s) left)", retries);
            }
            Err(err) => return Err(err),
        }
    }
}

async fn try_init(opts: &InitOptions, force: bool) -> Result<SqlitePool, InitError> {
    let pool = connect_pool(opts).await?;
    run_init(&pool, opts, force).await?;
    Ok(pool)
}

async fn connect_pool(opts: &InitOptions) -> Result<SqlitePool, sqlx::Error> {
    if let Some(parent) = Path::new(&opts.database_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).ok();
        }
    }

    let mut url = format!("sqlite:{}?mode=rwc", opts.database_path);
    if let Some(args) = opts.database_args.as_deref() {
        if !args.is_empty() {
            url.push('&');
            url.push_str(args);
        }
    }

    SqlitePoolOptions::new()
        .max_connections(5)
        .after_connect(|conn, _meta| Box::pin(async move { configure_pragmas_conn(conn).await }))
        .connect(&url)
        .await
}

/// Run the initialization sequence against a connected pool.
async fn run_init(pool: &SqlitePool, opts: &InitOptions, force: bool) -> Result<(), InitError> {
    if opts.init_scripts.is_empty() {
        warn!("no init scripts configured, skipping database initialization");
        return Ok(());
    }

    if !force {
        match check_and_migrate(pool, opts).await {
            // Marker table present: migrations have been applied, nothing else to do.
            Ok(true) => return Ok(()),
            // Marker table absent: fall through to first-time setup.
            Ok(false) => {}
            Err(err) if err.is_connection_error() => return Err(err),
            Err(err) => {
                // Any other database error while probing is taken to mean the
                // schema is already in place. This can mask real faults; see
                // DESIGN.md.
                warn!(
                    "database error while checking initialization state, \
                     assuming already initialized: {}",
                    err
                );
                return Ok(());
            }
        }
    }

    info!("initializing database (force={})", force);

    for script in &opts.init_scripts {
        execute_script(pool, script).await?;
    }

    // Recreate the marker table; init scripts may have dropped it (and always
    // drop it under force).
    sqlx::query(&format!("DROP TABLE IF EXISTS {MARKER_TABLE}"))
        .execute(pool)
        .await?;
    sqlx::query(&format!(
        "CREATE TABLE {MARKER_TABLE} (migration_name TEXT NOT NULL, \
         CONSTRAINT db_initialized_pk PRIMARY KEY (migration_name))"
    ))
    .execute(pool)
    .await?;

    apply_migrations(pool, opts).await?;

    info!("database initialized");
    Ok(())
}

/// Probe for the marker table. Returns `false` if the database has never been
/// initialized; otherwise upgrades a legacy marker table if needed, applies
/// all migration scripts and returns `true`.
async fn check_and_migrate(pool: &SqlitePool, opts: &InitOptions) -> Result<bool, InitError> {
    let (tables,): (i64,) = sqlx::query_as(
        "SELECT count(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
    )
    .bind(MARKER_TABLE)
    .fetch_one(pool)
    .await?;

    if tables == 0 {
        return Ok(false);
    }

    let (rows,): (i64,) = sqlx::query_as(&format!("SELECT count(*) FROM {MARKER_TABLE}"))
        .fetch_one(pool)
        .await?;

    // Legacy marker table: predates per-migration tracking. SQLite cannot add
    // a primary key via ALTER, so uniqueness comes from a unique index.
    if rows == 0 && !has_migration_name_column(pool).await? {
        info!("upgrading legacy marker table");
        sqlx::query(&format!(
            "ALTER TABLE {MARKER_TABLE} ADD COLUMN migration_name TEXT NOT NULL DEFAULT ''"
        ))
        .execute(pool)
        .await?;
        sqlx::query(&format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS db_initialized_pk \
             ON {MARKER_TABLE} (migration_name)"
        ))
        .execute(pool)
        .await?;
    }

    apply_migrations(pool, opts).await?;
    Ok(true)
}

async fn has_migration_name_column(pool: &SqlitePool) -> Result<bool, InitError> {
    let (count,): (i64,) = sqlx::query_as(
        "SELECT count(*) FROM pragma_table_info(?) WHERE name = 'migration_name'",
    )
    .bind(MARKER_TABLE)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

/// Apply every migration script in order and record it by file name.
///
/// Scripts are re-applied on every startup; they are expected to be written
/// idempotently. Recording uses `INSERT OR IGNORE` so names stay unique.
async fn apply_migrations(pool: &SqlitePool, opts: &InitOptions) -> Result<(), InitError> {
    for script in &opts.migration_scripts {
        info!("executing migration: {}", script.display());
        execute_script(pool, script).await?;

        let name = script
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| script.display().to_string());
        sqlx::query(&format!(
            "INSERT OR IGNORE INTO {MARKER_TABLE} (migration_name) VALUES (?)"
        ))
        .bind(name)
        .execute(pool)
        .await?;
    }
    Ok(())
}

/// Read a script as UTF-8 and execute it statement by statement.
async fn execute_script(pool: &SqlitePool, path: &Path) -> Result<(), InitError> {
    info!("executing SQL script: {}", path.display());

    let sql = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| InitError::Script {
            path: path.to_path_buf(),
            source,
        })?;

    for statement in sql.split(';') {
        let trimmed = statement.trim();
        if !trimmed.is_empty() {
            sqlx::query(trimmed).execute(pool).await?;
        }
    }
    Ok(())
}

/// Configure SQLite pragmas for reliability.
async fn configure_pragmas_conn(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    use sqlx::Row;

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&mut *conn)
        .await?;

    // journal_mode returns the actual mode set; must use fetch to get result
    let row = sqlx::query("PRAGMA journal_mode = WAL")
        .fetch_one(&mut *conn)
        .await?;
    let _journal_mode: String = row.get(0);

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&mut *conn)
        .await?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(&mut *conn)
        .await?;

    Ok(())
}
