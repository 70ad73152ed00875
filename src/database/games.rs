use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use super::connection::DbConn;
use super::models::{Game, NewGame};

const GAME_COLUMNS: &str = "id, run_id, series_id, game_number, home_team_id, away_team_id, \
     input_quarter, input_home_score, input_away_score, \
     home_q1, home_q2, home_q3, home_q4, away_q1, away_q2, away_q3, away_q4, \
     home_score, away_score, is_completed, played_at";

pub fn insert_game(conn: &mut DbConn, game: &NewGame) -> Result<Game> {
    let sql = format!(
        "INSERT INTO games (run_id, series_id, game_number, home_team_id, away_team_id, \
         input_quarter, input_home_score, input_away_score, \
         home_q1, home_q2, home_q3, home_q4, away_q1, away_q2, away_q3, away_q4, \
         home_score, away_score, is_completed) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, \
         ?17, ?18, 1) RETURNING {GAME_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            game.run_id,
            game.series_id,
            game.game_number,
            game.home_team_id,
            game.away_team_id,
            game.input_quarter,
            game.input_home_score,
            game.input_away_score,
            game.home_quarters[0],
            game.home_quarters[1],
            game.home_quarters[2],
            game.home_quarters[3],
            game.away_quarters[0],
            game.away_quarters[1],
            game.away_quarters[2],
            game.away_quarters[3],
            game.home_score,
            game.away_score,
        ],
        parse_game_row,
    )
    .context("Failed to insert game")
}

fn parse_game_row(row: &rusqlite::Row) -> rusqlite::Result<Game> {
    Ok(Game {
        id: row.get(0)?,
        run_id: row.get(1)?,
        series_id: row.get(2)?,
        game_number: row.get(3)?,
        home_team_id: row.get(4)?,
        away_team_id: row.get(5)?,
        input_quarter: row.get(6)?,
        input_home_score: row.get(7)?,
        input_away_score: row.get(8)?,
        home_quarters: [row.get(9)?, row.get(10)?, row.get(11)?, row.get(12)?],
        away_quarters: [row.get(13)?, row.get(14)?, row.get(15)?, row.get(16)?],
        home_score: row.get(17)?,
        away_score: row.get(18)?,
        is_completed: row.get(19)?,
        played_at: row.get(20)?,
    })
}

pub fn find_by_id(conn: &mut DbConn, id: i64) -> Result<Option<Game>> {
    let sql = format!("SELECT {GAME_COLUMNS} FROM games WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_game_row)
        .optional()
        .context("Failed to query game by id")
}

pub fn list_by_series(conn: &mut DbConn, series_id: i64) -> Result<Vec<Game>> {
    let sql = format!(
        "SELECT {GAME_COLUMNS} FROM games WHERE series_id = ?1 ORDER BY game_number"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![series_id], parse_game_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn count_by_series(conn: &mut DbConn, series_id: i64) -> Result<i64> {
    let sql = "SELECT COUNT(*) FROM games WHERE series_id = ?1";

    conn.query_row(sql, params![series_id], |row| row.get(0))
        .context("Failed to count games in series")
}

/// Games attached to a run but not to any series.
pub fn list_orphans_by_run(conn: &mut DbConn, run_id: i64) -> Result<Vec<Game>> {
    let sql = format!(
        "SELECT {GAME_COLUMNS} FROM games WHERE run_id = ?1 AND series_id IS NULL"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![run_id], parse_game_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn delete(conn: &mut DbConn, game_id: i64) -> Result<()> {
    conn.execute("DELETE FROM games WHERE id = ?1", params![game_id])
        .context("Failed to delete game")?;
    Ok(())
}
