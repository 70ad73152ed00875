use std::collections::HashMap;

use anyhow::Result;
use log::{debug, info};
use rand::Rng;

use crate::config::settings::AppConfig;
use crate::database::models::{Game, NewGame, Player, Series, StatLine, Team};
use crate::database::{self, with_transaction, DbConn};
use crate::domain::models::QuarterInput;
use crate::errors::CoreError;
use crate::simulation::{box_score, extrapolator, play_by_play};
use crate::tournament;

#[derive(Debug, Clone)]
pub struct SimulateGameRequest {
    pub run_id: i64,
    pub series_id: Option<i64>,
    pub input: QuarterInput,
}

/// Everything one simulation produced, for display or assertions.
#[derive(Debug)]
pub struct GameSummary {
    pub game: Game,
    pub home_team: Team,
    pub away_team: Team,
    pub stat_lines: Vec<StatLine>,
    pub play_count: usize,
    pub series_update: Option<tournament::SeriesUpdate>,
}

/// A dry run: the extrapolated scores without any rows written.
#[derive(Debug)]
pub struct GamePreview {
    pub home_team: Team,
    pub away_team: Team,
    pub home_quarters: [i64; 4],
    pub away_quarters: [i64; 4],
    pub home_score: i64,
    pub away_score: i64,
    pub winner_team_id: i64,
}

/// Runs the whole pipeline for one game: extrapolate the quarters, persist
/// the game with both box scores and the play-by-play feed, then record the
/// series result when the game belongs to one.
pub fn simulate_game(
    conn: &mut DbConn,
    request: &SimulateGameRequest,
    config: &AppConfig,
    rng: &mut impl Rng,
) -> Result<GameSummary> {
    let (home_team, away_team) = resolve_teams(conn, &request.input)?;
    let series = resolve_series(conn, request)?;

    let quarters = extrapolator::extrapolate(&request.input, &config.simulation, rng)?;

    let home_roster = playable_roster(conn, &home_team)?;
    let away_roster = playable_roster(conn, &away_team)?;

    let (game, stat_lines, play_count) = with_transaction(conn, |conn| {
        let game_number = match &series {
            Some(s) => Some(database::games::count_by_series(conn, s.id)? + 1),
            None => None,
        };
        let game = database::games::insert_game(
            conn,
            &NewGame {
                run_id: request.run_id,
                series_id: series.as_ref().map(|s| s.id),
                game_number,
                home_team_id: home_team.id,
                away_team_id: away_team.id,
                input_quarter: request.input.quarter,
                input_home_score: request.input.home_score,
                input_away_score: request.input.away_score,
                home_quarters: quarters.home,
                away_quarters: quarters.away,
                home_score: quarters.home_total(),
                away_score: quarters.away_total(),
            },
        )?;

        let home_lines = box_score::generate_team_box_score(
            game.id,
            home_team.id,
            &home_roster,
            game.home_score,
            game.away_score,
            &config.simulation,
            rng,
        )?;
        let away_lines = box_score::generate_team_box_score(
            game.id,
            away_team.id,
            &away_roster,
            game.away_score,
            game.home_score,
            &config.simulation,
            rng,
        )?;

        let mut stat_lines = Vec::with_capacity(home_lines.len() + away_lines.len());
        for line in home_lines.iter().chain(away_lines.iter()) {
            stat_lines.push(database::stats::insert_stat_line(conn, line)?);
        }

        let names = player_names(&home_roster, &away_roster);
        let plays = play_by_play::synthesize(
            &game,
            &home_lines,
            &away_lines,
            &names,
            &config.simulation,
            rng,
        );
        let play_count = plays.len();
        for play in &plays {
            database::plays::insert_play(conn, play)?;
        }

        Ok((game, stat_lines, play_count))
    })?;

    info!(
        "Simulated game {}: {} {} - {} {}",
        game.id,
        home_team.full_name(),
        game.home_score,
        game.away_score,
        away_team.full_name()
    );

    // Series bookkeeping runs after the game commit so a cascade failure
    // never loses the game itself.
    let series_update = match &series {
        Some(s) => Some(tournament::update_series_result(
            conn,
            s.id,
            game.winner_team_id(),
            &config.bracket,
            rng,
        )?),
        None => None,
    };

    Ok(GameSummary {
        game,
        home_team,
        away_team,
        stat_lines,
        play_count,
        series_update,
    })
}

/// Extrapolates without persisting anything.
pub fn preview_game(
    conn: &mut DbConn,
    input: &QuarterInput,
    config: &AppConfig,
    rng: &mut impl Rng,
) -> Result<GamePreview> {
    let (home_team, away_team) = resolve_teams(conn, input)?;
    let quarters = extrapolator::extrapolate(input, &config.simulation, rng)?;
    let (home_score, away_score) = (quarters.home_total(), quarters.away_total());

    debug!(
        "Previewed {} vs {}: {home_score}-{away_score}",
        home_team.abbreviation, away_team.abbreviation
    );
    Ok(GamePreview {
        winner_team_id: if home_score > away_score {
            home_team.id
        } else {
            away_team.id
        },
        home_team,
        away_team,
        home_quarters: quarters.home,
        away_quarters: quarters.away,
        home_score,
        away_score,
    })
}

/// Deletes a game with all its box scores and plays. When the game belongs
/// to a series, the win it contributed is taken back and the series
/// reopens, so a 4-3 series drops to 3-3 with no winner.
pub fn delete_game(conn: &mut DbConn, game_id: i64) -> Result<Game> {
    let game = database::games::find_by_id(conn, game_id)?
        .ok_or_else(|| CoreError::not_found(format!("game {game_id} does not exist")))?;

    with_transaction(conn, |conn| {
        if let Some(series_id) = game.series_id {
            if let Some(series) = database::series::find_by_id(conn, series_id)? {
                let reverted = tournament::revert_game_result(conn, &game, &series)?;
                info!(
                    "Reverted series {series_id} to {}-{}",
                    reverted.team1_wins, reverted.team2_wins
                );
            }
        }
        tournament::manager::delete_game_rows(conn, game.id)?;
        info!("Deleted game {game_id}");
        Ok(())
    })?;

    Ok(game)
}

fn resolve_teams(conn: &mut DbConn, input: &QuarterInput) -> Result<(Team, Team)> {
    extrapolator::validate(input)?;
    let home = database::teams::find_by_id(conn, input.home_team_id)?.ok_or_else(|| {
        CoreError::validation(format!("home team {} does not exist", input.home_team_id))
    })?;
    let away = database::teams::find_by_id(conn, input.away_team_id)?.ok_or_else(|| {
        CoreError::validation(format!("away team {} does not exist", input.away_team_id))
    })?;
    Ok((home, away))
}

fn resolve_series(
    conn: &mut DbConn,
    request: &SimulateGameRequest,
) -> Result<Option<Series>> {
    if database::runs::find_by_id(conn, request.run_id)?.is_none() {
        return Err(CoreError::not_found(format!("run {} does not exist", request.run_id)).into());
    }

    let Some(series_id) = request.series_id else {
        return Ok(None);
    };
    let series = database::series::find_by_id(conn, series_id)?
        .ok_or_else(|| CoreError::not_found(format!("series {series_id} does not exist")))?;

    if series.run_id != request.run_id {
        return Err(CoreError::validation(format!(
            "series {series_id} belongs to run {}, not run {}",
            series.run_id, request.run_id
        ))
        .into());
    }

    if series.is_completed {
        return Err(
            CoreError::invalid_transition(format!("series {series_id} is already decided")).into(),
        );
    }

    let on_series = [series.team1_id, series.team2_id];
    if !on_series.contains(&request.input.home_team_id)
        || !on_series.contains(&request.input.away_team_id)
    {
        return Err(CoreError::validation(format!(
            "series {series_id} is between teams {} and {}",
            series.team1_id, series.team2_id
        ))
        .into());
    }

    Ok(Some(series))
}

fn playable_roster(conn: &mut DbConn, team: &Team) -> Result<Vec<Player>> {
    let roster = database::players::list_by_team(conn, team.id)?;
    if roster.is_empty() {
        return Err(
            CoreError::validation(format!("{} has an empty roster", team.full_name())).into(),
        );
    }
    Ok(roster)
}

fn player_names(home: &[Player], away: &[Player]) -> HashMap<i64, String> {
    home.iter()
        .chain(away.iter())
        .map(|p| (p.id, p.name.clone()))
        .collect()
}
