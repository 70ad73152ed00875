use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use super::connection::DbConn;
use super::models::Run;

const RUN_COLUMNS: &str = "id, name, year, is_active, is_completed, champion_team_id, created_at";

/// Creates a run and makes it the single active one.
pub fn create_active_run(conn: &mut DbConn, name: &str, year: i64) -> Result<Run> {
    deactivate_all(conn)?;

    let sql = format!(
        "INSERT INTO runs (name, year, is_active, is_completed) \
         VALUES (?1, ?2, 1, 0) RETURNING {RUN_COLUMNS}"
    );

    conn.query_row(&sql, params![name, year], parse_run_row)
        .context("Failed to insert run")
}

fn parse_run_row(row: &rusqlite::Row) -> rusqlite::Result<Run> {
    Ok(Run {
        id: row.get(0)?,
        name: row.get(1)?,
        year: row.get(2)?,
        is_active: row.get(3)?,
        is_completed: row.get(4)?,
        champion_team_id: row.get(5)?,
        created_at: row.get(6)?,
    })
}

pub fn find_by_id(conn: &mut DbConn, id: i64) -> Result<Option<Run>> {
    let sql = format!("SELECT {RUN_COLUMNS} FROM runs WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_run_row)
        .optional()
        .context("Failed to query run by id")
}

pub fn find_active(conn: &mut DbConn) -> Result<Option<Run>> {
    let sql = format!("SELECT {RUN_COLUMNS} FROM runs WHERE is_active = 1");

    conn.query_row(&sql, [], parse_run_row)
        .optional()
        .context("Failed to query active run")
}

pub fn activate(conn: &mut DbConn, run_id: i64) -> Result<Run> {
    deactivate_all(conn)?;

    let sql = format!("UPDATE runs SET is_active = 1 WHERE id = ?1 RETURNING {RUN_COLUMNS}");

    conn.query_row(&sql, params![run_id], parse_run_row)
        .context("Failed to activate run")
}

fn deactivate_all(conn: &mut DbConn) -> Result<()> {
    conn.execute("UPDATE runs SET is_active = 0", [])
        .context("Failed to deactivate runs")?;
    Ok(())
}

pub fn mark_completed(conn: &mut DbConn, run_id: i64, champion_team_id: i64) -> Result<()> {
    let sql = "UPDATE runs SET is_completed = 1, champion_team_id = ?1 WHERE id = ?2";

    conn.execute(sql, params![champion_team_id, run_id])
        .context("Failed to mark run completed")?;
    Ok(())
}
