use anyhow::Result;
use log::info;

use crate::database::models::Player;
use crate::database::{self, with_transaction, DbConn};
use crate::domain::models::TeamType;
use crate::errors::CoreError;

/// Moves a free agent onto a franchise roster.
pub fn sign_player(conn: &mut DbConn, player_id: i64, team_id: i64) -> Result<Player> {
    let player = find_player(conn, player_id)?;
    let team = database::teams::find_by_id(conn, team_id)?
        .ok_or_else(|| CoreError::not_found(format!("team {team_id} does not exist")))?;
    if team.team_type != TeamType::Franchise.as_str() {
        return Err(CoreError::validation("players can only be signed by a franchise").into());
    }

    let pool = database::teams::find_free_agent_pool(conn)?
        .ok_or_else(|| CoreError::precondition("league has no free agent pool"))?;
    if player.team_id != pool.id {
        return Err(CoreError::validation(format!(
            "{} is not a free agent",
            player.name
        ))
        .into());
    }

    let signed = database::players::update_team(conn, player_id, team_id)?;
    info!("Signed {} to {}", signed.name, team.full_name());
    Ok(signed)
}

/// Releases a rostered player back into the free agent pool.
pub fn release_player(conn: &mut DbConn, player_id: i64) -> Result<Player> {
    let player = find_player(conn, player_id)?;
    let pool = database::teams::find_free_agent_pool(conn)?
        .ok_or_else(|| CoreError::precondition("league has no free agent pool"))?;
    if player.team_id == pool.id {
        return Err(CoreError::validation(format!(
            "{} is already a free agent",
            player.name
        ))
        .into());
    }

    let released = database::players::update_team(conn, player_id, pool.id)?;
    info!("Released {} to the free agent pool", released.name);
    Ok(released)
}

/// Swaps two groups of players between their teams. Every player on each
/// side must currently belong to that side's team; the whole trade applies
/// atomically or not at all.
pub fn trade_players(
    conn: &mut DbConn,
    team1_player_ids: &[i64],
    team2_player_ids: &[i64],
) -> Result<(Vec<Player>, Vec<Player>)> {
    if team1_player_ids.is_empty() || team2_player_ids.is_empty() {
        return Err(CoreError::validation("both sides of a trade must send players").into());
    }

    let side1 = load_side(conn, team1_player_ids)?;
    let side2 = load_side(conn, team2_player_ids)?;

    let team1_id = same_team(&side1)?;
    let team2_id = same_team(&side2)?;
    if team1_id == team2_id {
        return Err(CoreError::validation("a team cannot trade with itself").into());
    }

    let traded = with_transaction(conn, |conn| {
        let mut to_team2 = Vec::with_capacity(side1.len());
        for player in &side1 {
            to_team2.push(database::players::update_team(conn, player.id, team2_id)?);
        }
        let mut to_team1 = Vec::with_capacity(side2.len());
        for player in &side2 {
            to_team1.push(database::players::update_team(conn, player.id, team1_id)?);
        }
        Ok((to_team1, to_team2))
    })?;

    info!(
        "Trade completed: {} players to team {team1_id}, {} to team {team2_id}",
        traded.0.len(),
        traded.1.len()
    );
    Ok(traded)
}

fn find_player(conn: &mut DbConn, player_id: i64) -> Result<Player> {
    database::players::find_by_id(conn, player_id)?
        .ok_or_else(|| CoreError::not_found(format!("player {player_id} does not exist")).into())
}

fn load_side(conn: &mut DbConn, player_ids: &[i64]) -> Result<Vec<Player>> {
    player_ids.iter().map(|id| find_player(conn, *id)).collect()
}

fn same_team(side: &[Player]) -> Result<i64> {
    let team_id = side[0].team_id;
    if side.iter().any(|p| p.team_id != team_id) {
        return Err(
            CoreError::validation("all players on one side must share a team").into(),
        );
    }
    Ok(team_id)
}
