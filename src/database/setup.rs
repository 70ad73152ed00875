use anyhow::{Context, Result};
use log::info;

use super::connection::DbConn;

const SCHEMA: &str = include_str!("schema.sql");

/// Drops and recreates every table. Destructive; used by seeding and tests.
pub fn reset_database(conn: &mut DbConn) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Failed to apply database schema")?;
    info!("Database schema applied");
    Ok(())
}
