use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use super::connection::DbConn;
use super::models::Team;
use crate::domain::models::TeamType;

const TEAM_COLUMNS: &str =
    "id, name, city, abbreviation, conference, division, team_type, created_at";

pub fn insert_team(
    conn: &mut DbConn,
    name: &str,
    city: &str,
    abbreviation: &str,
    conference: Option<&str>,
    division: Option<&str>,
    team_type: TeamType,
) -> Result<Team> {
    let sql = format!(
        "INSERT INTO teams (name, city, abbreviation, conference, division, team_type) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING {TEAM_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![name, city, abbreviation, conference, division, team_type.as_str()],
        parse_team_row,
    )
    .context("Failed to insert team")
}

fn parse_team_row(row: &rusqlite::Row) -> rusqlite::Result<Team> {
    Ok(Team {
        id: row.get(0)?,
        name: row.get(1)?,
        city: row.get(2)?,
        abbreviation: row.get(3)?,
        conference: row.get(4)?,
        division: row.get(5)?,
        team_type: row.get(6)?,
        created_at: row.get(7)?,
    })
}

pub fn find_by_id(conn: &mut DbConn, id: i64) -> Result<Option<Team>> {
    let sql = format!("SELECT {TEAM_COLUMNS} FROM teams WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_team_row)
        .optional()
        .context("Failed to query team by id")
}

pub fn list_all(conn: &mut DbConn) -> Result<Vec<Team>> {
    let sql = format!("SELECT {TEAM_COLUMNS} FROM teams ORDER BY id");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_team_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// All teams eligible for bracket play (the free agent pool is excluded).
pub fn list_franchises(conn: &mut DbConn) -> Result<Vec<Team>> {
    let sql = format!("SELECT {TEAM_COLUMNS} FROM teams WHERE team_type = ?1 ORDER BY id");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![TeamType::Franchise.as_str()], parse_team_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn find_free_agent_pool(conn: &mut DbConn) -> Result<Option<Team>> {
    let sql = format!("SELECT {TEAM_COLUMNS} FROM teams WHERE team_type = ?1");

    conn.query_row(&sql, params![TeamType::FreeAgentPool.as_str()], parse_team_row)
        .optional()
        .context("Failed to query free agent pool")
}
