use anyhow::{Context, Result};
use rusqlite::params;

use super::connection::DbConn;
use super::models::Play;

const PLAY_COLUMNS: &str = "id, game_id, quarter, game_time_secs, time_remaining, \
     event_kind, description, team_id, player_id, assist_player_id, \
     home_score, away_score, details";

pub fn insert_play(conn: &mut DbConn, play: &Play) -> Result<Play> {
    let sql = format!(
        "INSERT INTO play_by_play (game_id, quarter, game_time_secs, time_remaining, \
         event_kind, description, team_id, player_id, assist_player_id, \
         home_score, away_score, details) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12) \
         RETURNING {PLAY_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            play.game_id,
            play.quarter,
            play.game_time_secs,
            play.time_remaining,
            play.event_kind,
            play.description,
            play.team_id,
            play.player_id,
            play.assist_player_id,
            play.home_score,
            play.away_score,
            play.details,
        ],
        parse_play_row,
    )
    .context("Failed to insert play")
}

fn parse_play_row(row: &rusqlite::Row) -> rusqlite::Result<Play> {
    Ok(Play {
        id: row.get(0)?,
        game_id: row.get(1)?,
        quarter: row.get(2)?,
        game_time_secs: row.get(3)?,
        time_remaining: row.get(4)?,
        event_kind: row.get(5)?,
        description: row.get(6)?,
        team_id: row.get(7)?,
        player_id: row.get(8)?,
        assist_player_id: row.get(9)?,
        home_score: row.get(10)?,
        away_score: row.get(11)?,
        details: row.get(12)?,
    })
}

/// Plays in chronological order; ties broken by insertion order.
pub fn list_by_game(conn: &mut DbConn, game_id: i64) -> Result<Vec<Play>> {
    let sql = format!(
        "SELECT {PLAY_COLUMNS} FROM play_by_play WHERE game_id = ?1 \
         ORDER BY game_time_secs, id"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![game_id], parse_play_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn delete_by_game(conn: &mut DbConn, game_id: i64) -> Result<()> {
    conn.execute(
        "DELETE FROM play_by_play WHERE game_id = ?1",
        params![game_id],
    )
    .context("Failed to delete plays for game")?;
    Ok(())
}
