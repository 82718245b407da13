pub mod models;
pub mod operations;
pub mod schema;
pub mod seed;

use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use log::{debug, info};

use crate::error::{Error, Result};

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConn = PooledConnection<ConnectionManager<SqliteConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub const DEFAULT_DATABASE_URL: &str = "workouts.db";

#[derive(Debug, Clone, Copy)]
struct ConnectionOptions {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA foreign_keys = ON; \
             PRAGMA journal_mode = WAL; \
             PRAGMA synchronous = NORMAL; \
             PRAGMA busy_timeout = {};",
            self.busy_timeout.as_millis()
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

pub fn default_pool_size() -> u32 {
    std::cmp::max(num_cpus::get(), 2) as u32
}

/// Opens a pool over the SQLite file at `database_url`, creating it if missing.
pub fn establish_pool(database_url: &str, max_size: u32) -> Result<DbPool> {
    debug!(
        "Opening database {} with up to {} connections",
        database_url, max_size
    );
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder()
        .max_size(max_size.max(1))
        .connection_customizer(Box::new(ConnectionOptions {
            busy_timeout: Duration::from_millis(5000),
        }))
        .build(manager)?;
    Ok(pool)
}

pub fn run_migrations(conn: &mut SqliteConnection) -> Result<()> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| Error::Migration(e.to_string()))?;

    if applied.is_empty() {
        debug!("No pending migrations");
    }
    for version in applied {
        info!("Applied migration {}", version);
    }
    Ok(())
}

/// Opens the pool and brings the schema up to date.
pub fn init_database(database_url: &str, max_size: u32) -> Result<DbPool> {
    let pool = establish_pool(database_url, max_size)?;
    let mut conn = pool.get()?;
    run_migrations(&mut conn)?;
    Ok(pool)
}

/// Runs `f` against a pooled connection on the blocking thread pool.
pub async fn interact<T, F>(pool: &DbPool, f: F) -> Result<T>
where
    F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut conn = pool.get()?;
        f(&mut conn)
    })
    .await?
}
