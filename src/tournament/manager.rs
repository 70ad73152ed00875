use anyhow::{anyhow, Result};
use log::{debug, info, warn};
use rand::prelude::*;

use crate::config::settings::BracketSettings;
use crate::database::models::{Game, NewSeries, Series, Team};
use crate::database::{self, with_transaction, DbConn};
use crate::domain::models::Conference;
use crate::errors::CoreError;

/// Outcome of recording a series win: the updated series, any next-round
/// series the cascade created, and the champion if the finals just ended.
#[derive(Debug)]
pub struct SeriesUpdate {
    pub series: Series,
    pub next_round: Vec<Series>,
    pub champion_team_id: Option<i64>,
}

#[derive(Debug)]
pub struct ResetSummary {
    pub run_id: i64,
    pub series_deleted: usize,
    pub games_deleted: usize,
}

/// Seeds round 1 of a bracket for the given run: each conference is
/// shuffled and paired off within itself, so cross-conference matchups can
/// only happen in the finals.
pub fn create_bracket(
    conn: &mut DbConn,
    run_id: i64,
    settings: &BracketSettings,
    rng: &mut impl Rng,
) -> Result<Vec<Series>> {
    if database::runs::find_by_id(conn, run_id)?.is_none() {
        return Err(CoreError::not_found(format!("run {run_id} does not exist")).into());
    }
    if !database::series::list_by_run(conn, run_id)?.is_empty() {
        return Err(CoreError::invalid_transition(format!(
            "run {run_id} already has a bracket"
        ))
        .into());
    }

    let teams = database::teams::list_franchises(conn)?;
    if teams.len() < settings.bracket_size {
        return Err(CoreError::precondition(format!(
            "bracket needs {} teams, league has {}",
            settings.bracket_size,
            teams.len()
        ))
        .into());
    }

    let (east, west) = partition_by_conference(&teams, settings, rng)?;

    with_transaction(conn, |conn| {
        let mut created = Vec::with_capacity(settings.bracket_size / 2);
        created.extend(pair_round(conn, run_id, 1, 1, Conference::East, &east)?);
        created.extend(pair_round(
            conn,
            run_id,
            1,
            (settings.conference_size / 2 + 1) as i64,
            Conference::West,
            &west,
        )?);
        info!(
            "Created round 1 bracket for run {run_id}: {} series",
            created.len()
        );
        Ok(created)
    })
}

/// Splits the field into two shuffled conference pools. Teams without a
/// recognized conference label fill whichever pool runs short.
fn partition_by_conference(
    teams: &[Team],
    settings: &BracketSettings,
    rng: &mut impl Rng,
) -> Result<(Vec<i64>, Vec<i64>)> {
    let mut east = Vec::new();
    let mut west = Vec::new();
    let mut unaffiliated = Vec::new();

    for team in teams {
        match team.conference.as_deref().and_then(Conference::from_label) {
            Some(Conference::East) => east.push(team.id),
            Some(Conference::West) => west.push(team.id),
            None => unaffiliated.push(team.id),
        }
    }

    if !unaffiliated.is_empty() {
        warn!(
            "{} teams carry no conference label; filling shortfalls from them",
            unaffiliated.len()
        );
    }
    unaffiliated.shuffle(rng);
    while east.len() < settings.conference_size {
        match unaffiliated.pop() {
            Some(id) => east.push(id),
            None => break,
        }
    }
    while west.len() < settings.conference_size {
        match unaffiliated.pop() {
            Some(id) => west.push(id),
            None => break,
        }
    }

    if east.len() < settings.conference_size || west.len() < settings.conference_size {
        return Err(CoreError::precondition(format!(
            "need {} teams per conference, have {} East / {} West",
            settings.conference_size,
            east.len(),
            west.len()
        ))
        .into());
    }

    east.shuffle(rng);
    west.shuffle(rng);
    east.truncate(settings.conference_size);
    west.truncate(settings.conference_size);
    Ok((east, west))
}

fn pair_round(
    conn: &mut DbConn,
    run_id: i64,
    round: i64,
    first_series_number: i64,
    conference: Conference,
    team_ids: &[i64],
) -> Result<Vec<Series>> {
    let mut created = Vec::with_capacity(team_ids.len() / 2);
    for (i, pair) in team_ids.chunks(2).enumerate() {
        let [team1, team2] = pair else {
            return Err(anyhow!("odd number of teams in {} pairing", conference.as_str()));
        };
        created.push(database::series::insert_series(
            conn,
            &NewSeries {
                run_id,
                round,
                series_number: first_series_number + i as i64,
                conference: Some(conference.as_str().to_string()),
                team1_id: *team1,
                team2_id: *team2,
            },
        )?);
    }
    Ok(created)
}

/// Records one series win and cascades: clinching the fourth win completes
/// the series, completing a round creates the next one, and completing the
/// finals crowns the champion.
pub fn update_series_result(
    conn: &mut DbConn,
    series_id: i64,
    winning_team_id: i64,
    settings: &BracketSettings,
    rng: &mut impl Rng,
) -> Result<SeriesUpdate> {
    let series = database::series::find_by_id(conn, series_id)?
        .ok_or_else(|| CoreError::not_found(format!("series {series_id} does not exist")))?;

    if series.is_completed {
        return Err(CoreError::invalid_transition(format!(
            "series {series_id} is already decided"
        ))
        .into());
    }

    let (mut team1_wins, mut team2_wins) = (series.team1_wins, series.team2_wins);
    if winning_team_id == series.team1_id {
        team1_wins += 1;
    } else if winning_team_id == series.team2_id {
        team2_wins += 1;
    } else {
        return Err(CoreError::invalid_transition(format!(
            "team {winning_team_id} is not part of series {series_id}"
        ))
        .into());
    }

    let clinched = team1_wins >= settings.wins_to_clinch || team2_wins >= settings.wins_to_clinch;
    let winner = clinched.then_some(winning_team_id);
    let updated =
        database::series::update_state(conn, series_id, team1_wins, team2_wins, winner, clinched)?;
    debug!(
        "Series {series_id} now {team1_wins}-{team2_wins}{}",
        if clinched { " (decided)" } else { "" }
    );

    if !clinched {
        return Ok(SeriesUpdate {
            series: updated,
            next_round: Vec::new(),
            champion_team_id: None,
        });
    }

    // The cascade runs after the series write: a failure here leaves a
    // correctly decided series that `advance` can pick up again.
    let outcome = check_and_advance(conn, updated.run_id, updated.round, settings, rng)?;
    Ok(SeriesUpdate {
        series: updated,
        next_round: outcome.created,
        champion_team_id: outcome.champion_team_id,
    })
}

#[derive(Debug, Default)]
pub struct AdvanceOutcome {
    pub created: Vec<Series>,
    pub champion_team_id: Option<i64>,
}

/// Advances past `round` if every series in it is decided. Completing the
/// finals marks the run completed instead of creating another round.
pub fn check_and_advance(
    conn: &mut DbConn,
    run_id: i64,
    round: i64,
    settings: &BracketSettings,
    rng: &mut impl Rng,
) -> Result<AdvanceOutcome> {
    let current = database::series::list_by_round(conn, run_id, round)?;
    if current.is_empty() || current.iter().any(|s| !s.is_completed) {
        return Ok(AdvanceOutcome::default());
    }

    if round >= settings.final_round {
        let finals = &current[0];
        let champion = finals
            .winner_team_id
            .ok_or_else(|| anyhow!("decided finals series has no winner recorded"))?;
        database::runs::mark_completed(conn, run_id, champion)?;
        info!("Run {run_id} completed; champion is team {champion}");
        return Ok(AdvanceOutcome {
            created: Vec::new(),
            champion_team_id: Some(champion),
        });
    }

    if !database::series::list_by_round(conn, run_id, round + 1)?.is_empty() {
        debug!("Round {} for run {run_id} already exists", round + 1);
        return Ok(AdvanceOutcome::default());
    }

    let created = create_next_round(conn, run_id, round, settings, rng)?;
    Ok(AdvanceOutcome {
        created,
        champion_team_id: None,
    })
}

/// Pairs the winners of `round` into round + 1. Winners stay inside their
/// conference until the finals, where the two conference champions meet.
fn create_next_round(
    conn: &mut DbConn,
    run_id: i64,
    round: i64,
    settings: &BracketSettings,
    rng: &mut impl Rng,
) -> Result<Vec<Series>> {
    let completed: Vec<Series> = database::series::list_by_round(conn, run_id, round)?
        .into_iter()
        .filter(|s| s.is_completed)
        .collect();
    if completed.is_empty() {
        return Ok(Vec::new());
    }

    let winners_of = |conference: Conference| -> Vec<i64> {
        completed
            .iter()
            .filter(|s| s.conference.as_deref() == Some(conference.as_str()))
            .filter_map(|s| s.winner_team_id)
            .collect()
    };
    let mut east = winners_of(Conference::East);
    let mut west = winners_of(Conference::West);
    let next = round + 1;

    if next == settings.final_round {
        // Finals take exactly one champion per conference.
        if east.len() != 1 || west.len() != 1 {
            warn!(
                "Cannot seed finals for run {run_id}: {} East / {} West finalists",
                east.len(),
                west.len()
            );
            return Ok(Vec::new());
        }
        let finals = with_transaction(conn, |conn| {
            database::series::insert_series(
                conn,
                &NewSeries {
                    run_id,
                    round: next,
                    series_number: 1,
                    conference: None,
                    team1_id: east[0],
                    team2_id: west[0],
                },
            )
        })?;
        info!("Seeded the finals for run {run_id}");
        return Ok(vec![finals]);
    }

    east.shuffle(rng);
    west.shuffle(rng);
    let created = with_transaction(conn, |conn| {
        let mut created = Vec::with_capacity((east.len() + west.len()) / 2);
        created.extend(pair_round(conn, run_id, next, 1, Conference::East, &east)?);
        created.extend(pair_round(
            conn,
            run_id,
            next,
            (east.len() / 2 + 1) as i64,
            Conference::West,
            &west,
        )?);
        Ok(created)
    })?;
    info!(
        "Seeded round {next} for run {run_id}: {} series",
        created.len()
    );
    Ok(created)
}

/// Reverses the series effect of a deleted game: the winning side loses one
/// win (never below zero) and the series reopens.
pub fn revert_game_result(conn: &mut DbConn, game: &Game, series: &Series) -> Result<Series> {
    let winner = game.winner_team_id();
    let (mut team1_wins, mut team2_wins) = (series.team1_wins, series.team2_wins);
    if winner == series.team1_id {
        team1_wins = (team1_wins - 1).max(0);
    } else if winner == series.team2_id {
        team2_wins = (team2_wins - 1).max(0);
    }

    database::series::update_state(conn, series.id, team1_wins, team2_wins, None, false)
}

/// Deletes every series, game, box score and play of the run. Teams,
/// players and the run row itself survive.
pub fn reset_tournament(conn: &mut DbConn, run_id: i64) -> Result<ResetSummary> {
    if database::runs::find_by_id(conn, run_id)?.is_none() {
        return Err(CoreError::not_found(format!("run {run_id} does not exist")).into());
    }

    with_transaction(conn, |conn| {
        let mut games_deleted = 0usize;
        let series = database::series::list_by_run(conn, run_id)?;
        for s in &series {
            for game in database::games::list_by_series(conn, s.id)? {
                delete_game_rows(conn, game.id)?;
                games_deleted += 1;
            }
            database::series::delete(conn, s.id)?;
        }
        for game in database::games::list_orphans_by_run(conn, run_id)? {
            delete_game_rows(conn, game.id)?;
            games_deleted += 1;
        }

        info!(
            "Reset run {run_id}: removed {} series and {games_deleted} games",
            series.len()
        );
        Ok(ResetSummary {
            run_id,
            series_deleted: series.len(),
            games_deleted,
        })
    })
}

pub(crate) fn delete_game_rows(conn: &mut DbConn, game_id: i64) -> Result<()> {
    database::stats::delete_by_game(conn, game_id)?;
    database::plays::delete_by_game(conn, game_id)?;
    database::games::delete(conn, game_id)
}
