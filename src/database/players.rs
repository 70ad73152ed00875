use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use super::connection::DbConn;
use super::models::{NewPlayer, Player};

const PLAYER_COLUMNS: &str = "id, team_id, name, position, jersey_number, height_cm, \
     weight_kg, ppg, rpg, apg, spg, bpg, fg_pct, three_pt_pct, ft_pct, mpg";

pub fn insert_player(conn: &mut DbConn, player: &NewPlayer) -> Result<Player> {
    let sql = format!(
        "INSERT INTO players (team_id, name, position, jersey_number, height_cm, weight_kg, \
         ppg, rpg, apg, spg, bpg, fg_pct, three_pt_pct, ft_pct, mpg) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15) \
         RETURNING {PLAYER_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            player.team_id,
            player.name,
            player.position,
            player.jersey_number,
            player.height_cm,
            player.weight_kg,
            player.ppg,
            player.rpg,
            player.apg,
            player.spg,
            player.bpg,
            player.fg_pct,
            player.three_pt_pct,
            player.ft_pct,
            player.mpg,
        ],
        parse_player_row,
    )
    .context("Failed to insert player")
}

fn parse_player_row(row: &rusqlite::Row) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(0)?,
        team_id: row.get(1)?,
        name: row.get(2)?,
        position: row.get(3)?,
        jersey_number: row.get(4)?,
        height_cm: row.get(5)?,
        weight_kg: row.get(6)?,
        ppg: row.get(7)?,
        rpg: row.get(8)?,
        apg: row.get(9)?,
        spg: row.get(10)?,
        bpg: row.get(11)?,
        fg_pct: row.get(12)?,
        three_pt_pct: row.get(13)?,
        ft_pct: row.get(14)?,
        mpg: row.get(15)?,
    })
}

pub fn find_by_id(conn: &mut DbConn, id: i64) -> Result<Option<Player>> {
    let sql = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_player_row)
        .optional()
        .context("Failed to query player by id")
}

/// Roster of a team, best scorers first.
pub fn list_by_team(conn: &mut DbConn, team_id: i64) -> Result<Vec<Player>> {
    let sql = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE team_id = ?1 ORDER BY ppg DESC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![team_id], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Roster transactions (sign/release/trade) only ever move this pointer.
pub fn update_team(conn: &mut DbConn, player_id: i64, team_id: i64) -> Result<Player> {
    let sql = format!(
        "UPDATE players SET team_id = ?1 WHERE id = ?2 RETURNING {PLAYER_COLUMNS}"
    );

    conn.query_row(&sql, params![team_id, player_id], parse_player_row)
        .context("Failed to update player team")
}
