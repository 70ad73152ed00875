use anyhow::{Context, Result};
use rusqlite::params;

use super::connection::DbConn;
use super::models::StatLine;

const STAT_COLUMNS: &str = "id, game_id, player_id, team_id, minutes_played, points, \
     rebounds, offensive_rebounds, defensive_rebounds, assists, steals, blocks, \
     turnovers, fouls, fgm, fga, three_pm, three_pa, ftm, fta, \
     plus_minus, usage_rate, true_shooting_pct, effective_fg_pct, efficiency";

pub fn insert_stat_line(conn: &mut DbConn, line: &StatLine) -> Result<StatLine> {
    let sql = format!(
        "INSERT INTO player_game_stats (game_id, player_id, team_id, minutes_played, points, \
         rebounds, offensive_rebounds, defensive_rebounds, assists, steals, blocks, \
         turnovers, fouls, fgm, fga, three_pm, three_pa, ftm, fta, \
         plus_minus, usage_rate, true_shooting_pct, effective_fg_pct, efficiency) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, \
         ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24) RETURNING {STAT_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            line.game_id,
            line.player_id,
            line.team_id,
            line.minutes_played,
            line.points,
            line.rebounds,
            line.offensive_rebounds,
            line.defensive_rebounds,
            line.assists,
            line.steals,
            line.blocks,
            line.turnovers,
            line.fouls,
            line.fgm,
            line.fga,
            line.three_pm,
            line.three_pa,
            line.ftm,
            line.fta,
            line.plus_minus,
            line.usage_rate,
            line.true_shooting_pct,
            line.effective_fg_pct,
            line.efficiency,
        ],
        parse_stat_row,
    )
    .context("Failed to insert stat line")
}

fn parse_stat_row(row: &rusqlite::Row) -> rusqlite::Result<StatLine> {
    Ok(StatLine {
        id: row.get(0)?,
        game_id: row.get(1)?,
        player_id: row.get(2)?,
        team_id: row.get(3)?,
        minutes_played: row.get(4)?,
        points: row.get(5)?,
        rebounds: row.get(6)?,
        offensive_rebounds: row.get(7)?,
        defensive_rebounds: row.get(8)?,
        assists: row.get(9)?,
        steals: row.get(10)?,
        blocks: row.get(11)?,
        turnovers: row.get(12)?,
        fouls: row.get(13)?,
        fgm: row.get(14)?,
        fga: row.get(15)?,
        three_pm: row.get(16)?,
        three_pa: row.get(17)?,
        ftm: row.get(18)?,
        fta: row.get(19)?,
        plus_minus: row.get(20)?,
        usage_rate: row.get(21)?,
        true_shooting_pct: row.get(22)?,
        effective_fg_pct: row.get(23)?,
        efficiency: row.get(24)?,
    })
}

pub fn list_by_game(conn: &mut DbConn, game_id: i64) -> Result<Vec<StatLine>> {
    let sql = format!(
        "SELECT {STAT_COLUMNS} FROM player_game_stats WHERE game_id = ?1 ORDER BY points DESC"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![game_id], parse_stat_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn list_by_game_and_team(
    conn: &mut DbConn,
    game_id: i64,
    team_id: i64,
) -> Result<Vec<StatLine>> {
    let sql = format!(
        "SELECT {STAT_COLUMNS} FROM player_game_stats \
         WHERE game_id = ?1 AND team_id = ?2 ORDER BY points DESC"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![game_id, team_id], parse_stat_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn delete_by_game(conn: &mut DbConn, game_id: i64) -> Result<()> {
    conn.execute(
        "DELETE FROM player_game_stats WHERE game_id = ?1",
        params![game_id],
    )
    .context("Failed to delete stat lines for game")?;
    Ok(())
}
