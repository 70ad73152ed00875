pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod services;
pub mod simulation;
pub mod tournament;

use std::collections::HashMap;

use anyhow::Result;
use chrono::Datelike;
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::cli::{Cli, Command};
use crate::config::settings::AppConfig;
use crate::database::models::Run;
use crate::database::DbConn;
use crate::domain::models::QuarterInput;
use crate::errors::CoreError;
use crate::services::games::SimulateGameRequest;
use crate::services::{games, roster, seeding};

const DEFAULT_DATABASE_PATH: &str = "courtside.db";

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

fn open_connection() -> Result<DbConn> {
    let path =
        std::env::var("DATABASE_PATH").unwrap_or_else(|_| DEFAULT_DATABASE_PATH.to_string());
    let pool = database::create_pool(&path)?;
    database::get_connection(&pool)
}

/// Explicit seeds give reproducible games; without one the OS entropy
/// source decides.
fn build_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Explicit run id wins; otherwise the single active run is used.
fn resolve_run(conn: &mut DbConn, run: Option<i64>) -> Result<Run> {
    match run {
        Some(id) => database::runs::find_by_id(conn, id)?
            .ok_or_else(|| CoreError::not_found(format!("run {id} does not exist")).into()),
        None => database::runs::find_active(conn)?
            .ok_or_else(|| CoreError::precondition("no active run; start one with `run`").into()),
    }
}

pub fn handle_seed(seed: Option<u64>) -> Result<()> {
    let mut conn = open_connection()?;
    let mut rng = build_rng(seed);
    let summary = seeding::seed_league(&mut conn, &mut rng)?;
    println!(
        "Seeded {} teams and {} players",
        summary.teams, summary.players
    );
    Ok(())
}

pub fn handle_run(name: Option<String>, year: Option<i64>, seed: Option<u64>) -> Result<()> {
    let mut conn = open_connection()?;
    let mut rng = build_rng(seed);
    let config = AppConfig::new();

    let year = year.unwrap_or_else(|| chrono::Utc::now().year() as i64);
    let name = name.unwrap_or_else(|| format!("Playoffs {year}"));

    let run = database::runs::create_active_run(&mut conn, &name, year)?;
    let series = tournament::create_bracket(&mut conn, run.id, &config.bracket, &mut rng)?;
    println!(
        "Started run {} ({}) with {} round 1 series",
        run.id,
        run.name,
        series.len()
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn handle_simulate(
    home_team: i64,
    away_team: i64,
    quarter: i64,
    home_score: i64,
    away_score: i64,
    series: Option<i64>,
    run: Option<i64>,
    seed: Option<u64>,
) -> Result<()> {
    let mut conn = open_connection()?;
    let mut rng = build_rng(seed);
    let config = AppConfig::new();
    let run = resolve_run(&mut conn, run)?;

    let request = SimulateGameRequest {
        run_id: run.id,
        series_id: series,
        input: QuarterInput {
            home_team_id: home_team,
            away_team_id: away_team,
            quarter,
            home_score,
            away_score,
        },
    };
    let summary = games::simulate_game(&mut conn, &request, &config, &mut rng)?;

    println!(
        "Game {}: {} {} - {} {}",
        summary.game.id,
        summary.home_team.full_name(),
        summary.game.home_score,
        summary.game.away_score,
        summary.away_team.full_name()
    );
    println!(
        "  quarters: {:?} / {:?}",
        summary.game.home_quarters, summary.game.away_quarters
    );
    println!(
        "  {} stat lines, {} plays",
        summary.stat_lines.len(),
        summary.play_count
    );
    if let Some(update) = &summary.series_update {
        println!(
            "  series {}: {}-{}{}",
            update.series.id,
            update.series.team1_wins,
            update.series.team2_wins,
            if update.series.is_completed {
                " (decided)"
            } else {
                ""
            }
        );
        if let Some(champion) = update.champion_team_id {
            let name = team_name(&mut conn, champion)?;
            println!("  champion: {name}");
        }
    }
    Ok(())
}

pub fn handle_preview(
    home_team: i64,
    away_team: i64,
    quarter: i64,
    home_score: i64,
    away_score: i64,
    seed: Option<u64>,
) -> Result<()> {
    let mut conn = open_connection()?;
    let mut rng = build_rng(seed);
    let config = AppConfig::new();

    let input = QuarterInput {
        home_team_id: home_team,
        away_team_id: away_team,
        quarter,
        home_score,
        away_score,
    };
    let preview = games::preview_game(&mut conn, &input, &config, &mut rng)?;

    println!(
        "Preview: {} {} - {} {}",
        preview.home_team.full_name(),
        preview.home_score,
        preview.away_score,
        preview.away_team.full_name()
    );
    println!(
        "  quarters: {:?} / {:?}",
        preview.home_quarters, preview.away_quarters
    );
    Ok(())
}

pub fn handle_delete(game_id: i64) -> Result<()> {
    let mut conn = open_connection()?;
    let game = games::delete_game(&mut conn, game_id)?;
    println!(
        "Deleted game {} ({} - {})",
        game.id, game.home_score, game.away_score
    );
    Ok(())
}

pub fn handle_advance(round: i64, run: Option<i64>, seed: Option<u64>) -> Result<()> {
    let mut conn = open_connection()?;
    let mut rng = build_rng(seed);
    let config = AppConfig::new();
    let run = resolve_run(&mut conn, run)?;

    let outcome = tournament::check_and_advance(&mut conn, run.id, round, &config.bracket, &mut rng)?;
    if let Some(champion) = outcome.champion_team_id {
        let name = team_name(&mut conn, champion)?;
        println!("Run {} complete; champion: {name}", run.id);
    } else if outcome.created.is_empty() {
        println!("Round {round} is not fully decided yet; nothing to advance");
    } else {
        println!(
            "Created round {} with {} series",
            round + 1,
            outcome.created.len()
        );
    }
    Ok(())
}

pub fn handle_reset(run: Option<i64>) -> Result<()> {
    let mut conn = open_connection()?;
    let run = resolve_run(&mut conn, run)?;
    let summary = tournament::reset_tournament(&mut conn, run.id)?;
    println!(
        "Reset run {}: removed {} series and {} games",
        summary.run_id, summary.series_deleted, summary.games_deleted
    );
    Ok(())
}

pub fn handle_overview(run: Option<i64>) -> Result<()> {
    let mut conn = open_connection()?;
    let run = resolve_run(&mut conn, run)?;
    let series = database::series::list_by_run(&mut conn, run.id)?;
    let names: HashMap<i64, String> = database::teams::list_all(&mut conn)?
        .into_iter()
        .map(|t| (t.id, t.full_name()))
        .collect();
    let name_of = |id: i64| names.get(&id).cloned().unwrap_or_else(|| format!("#{id}"));

    println!("Run {} - {} ({})", run.id, run.name, run.year);
    if run.is_completed {
        if let Some(champion) = run.champion_team_id {
            println!("Champion: {}", name_of(champion));
        }
    }

    let mut current_round = 0;
    for s in &series {
        if s.round != current_round {
            current_round = s.round;
            println!("Round {current_round}:");
        }
        let marker = match s.winner_team_id {
            Some(w) => format!(" -> {}", name_of(w)),
            None => String::new(),
        };
        println!(
            "  [{}] {} {} - {} {}{}",
            s.id,
            name_of(s.team1_id),
            s.team1_wins,
            s.team2_wins,
            name_of(s.team2_id),
            marker
        );
    }
    if series.is_empty() {
        println!("No bracket yet");
    }
    Ok(())
}

pub fn handle_activate(run_id: i64) -> Result<()> {
    let mut conn = open_connection()?;
    if database::runs::find_by_id(&mut conn, run_id)?.is_none() {
        return Err(CoreError::not_found(format!("run {run_id} does not exist")).into());
    }
    let run = database::runs::activate(&mut conn, run_id)?;
    println!("Run {} ({}) is now active", run.id, run.name);
    Ok(())
}

pub fn handle_sign(player: i64, team: i64) -> Result<()> {
    let mut conn = open_connection()?;
    let signed = roster::sign_player(&mut conn, player, team)?;
    println!("Signed {}", signed.name);
    Ok(())
}

pub fn handle_release(player: i64) -> Result<()> {
    let mut conn = open_connection()?;
    let released = roster::release_player(&mut conn, player)?;
    println!("Released {}", released.name);
    Ok(())
}

pub fn handle_trade(send: &[i64], receive: &[i64]) -> Result<()> {
    let mut conn = open_connection()?;
    let (to_team1, to_team2) = roster::trade_players(&mut conn, send, receive)?;
    println!(
        "Trade completed: {} players moved one way, {} the other",
        to_team2.len(),
        to_team1.len()
    );
    Ok(())
}

fn team_name(conn: &mut DbConn, team_id: i64) -> Result<String> {
    Ok(database::teams::find_by_id(conn, team_id)?
        .map(|t| t.full_name())
        .unwrap_or_else(|| format!("#{team_id}")))
}
