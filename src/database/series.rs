use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use super::connection::DbConn;
use super::models::{NewSeries, Series};

const SERIES_COLUMNS: &str = "id, run_id, round, series_number, conference, team1_id, \
     team2_id, team1_wins, team2_wins, winner_team_id, is_completed";

pub fn insert_series(conn: &mut DbConn, series: &NewSeries) -> Result<Series> {
    let sql = format!(
        "INSERT INTO series (run_id, round, series_number, conference, team1_id, team2_id) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING {SERIES_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            series.run_id,
            series.round,
            series.series_number,
            series.conference,
            series.team1_id,
            series.team2_id,
        ],
        parse_series_row,
    )
    .context("Failed to insert series")
}

fn parse_series_row(row: &rusqlite::Row) -> rusqlite::Result<Series> {
    Ok(Series {
        id: row.get(0)?,
        run_id: row.get(1)?,
        round: row.get(2)?,
        series_number: row.get(3)?,
        conference: row.get(4)?,
        team1_id: row.get(5)?,
        team2_id: row.get(6)?,
        team1_wins: row.get(7)?,
        team2_wins: row.get(8)?,
        winner_team_id: row.get(9)?,
        is_completed: row.get(10)?,
    })
}

pub fn find_by_id(conn: &mut DbConn, id: i64) -> Result<Option<Series>> {
    let sql = format!("SELECT {SERIES_COLUMNS} FROM series WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_series_row)
        .optional()
        .context("Failed to query series by id")
}

pub fn list_by_round(conn: &mut DbConn, run_id: i64, round: i64) -> Result<Vec<Series>> {
    let sql = format!(
        "SELECT {SERIES_COLUMNS} FROM series WHERE run_id = ?1 AND round = ?2 \
         ORDER BY series_number"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![run_id, round], parse_series_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn list_by_run(conn: &mut DbConn, run_id: i64) -> Result<Vec<Series>> {
    let sql = format!(
        "SELECT {SERIES_COLUMNS} FROM series WHERE run_id = ?1 \
         ORDER BY round, series_number"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![run_id], parse_series_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Writes win counters, completion flag and winner in one statement so a
/// series row never straddles two states.
pub fn update_state(
    conn: &mut DbConn,
    series_id: i64,
    team1_wins: i64,
    team2_wins: i64,
    winner_team_id: Option<i64>,
    is_completed: bool,
) -> Result<Series> {
    let sql = format!(
        "UPDATE series SET team1_wins = ?1, team2_wins = ?2, winner_team_id = ?3, \
         is_completed = ?4 WHERE id = ?5 RETURNING {SERIES_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![team1_wins, team2_wins, winner_team_id, is_completed, series_id],
        parse_series_row,
    )
    .context("Failed to update series state")
}

pub fn delete(conn: &mut DbConn, series_id: i64) -> Result<()> {
    conn.execute("DELETE FROM series WHERE id = ?1", params![series_id])
        .context("Failed to delete series")?;
    Ok(())
}
