use anyhow::{Context, Result};
use r2d2_sqlite::SqliteConnectionManager;

pub type DbPool = r2d2::Pool<SqliteConnectionManager>;
pub type DbConn = r2d2::PooledConnection<SqliteConnectionManager>;

pub fn create_pool(database_path: &str) -> Result<DbPool> {
    build_pool(SqliteConnectionManager::file(database_path))
}

/// In-memory pool for tests; limited to one connection so every caller sees
/// the same database.
pub fn create_memory_pool() -> Result<DbPool> {
    r2d2::Pool::builder()
        .max_size(1)
        .build(SqliteConnectionManager::memory())
        .context("Failed to create in-memory database pool")
}

fn build_pool(manager: SqliteConnectionManager) -> Result<DbPool> {
    r2d2::Pool::builder()
        .build(manager)
        .context("Failed to create database connection pool")
}

pub fn get_connection(pool: &DbPool) -> Result<DbConn> {
    pool.get()
        .context("Failed to get database connection from pool")
}

/// Runs the closure inside a transaction; any error rolls the whole
/// batch back.
pub fn with_transaction<T>(
    conn: &mut DbConn,
    f: impl FnOnce(&mut DbConn) -> Result<T>,
) -> Result<T> {
    conn.execute_batch("BEGIN IMMEDIATE")
        .context("Failed to begin transaction")?;
    match f(conn) {
        Ok(value) => {
            conn.execute_batch("COMMIT")
                .context("Failed to commit transaction")?;
            Ok(value)
        }
        Err(err) => {
            let _ = conn.execute_batch("ROLLBACK");
            Err(err)
        }
    }
}
