use anyhow::Result;

use courtside::cli::Command;
use courtside::{
    handle_activate, handle_advance, handle_delete, handle_overview, handle_preview,
    handle_release, handle_reset, handle_run, handle_seed, handle_sign, handle_simulate,
    handle_trade, interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Seed { seed } => handle_seed(*seed),
        Command::Run { name, year, seed } => handle_run(name.clone(), *year, *seed),
        Command::Simulate {
            home_team,
            away_team,
            quarter,
            home_score,
            away_score,
            series,
            run,
            seed,
        } => handle_simulate(
            *home_team,
            *away_team,
            *quarter,
            *home_score,
            *away_score,
            *series,
            *run,
            *seed,
        ),
        Command::Preview {
            home_team,
            away_team,
            quarter,
            home_score,
            away_score,
            seed,
        } => handle_preview(
            *home_team,
            *away_team,
            *quarter,
            *home_score,
            *away_score,
            *seed,
        ),
        Command::Delete { game_id } => handle_delete(*game_id),
        Command::Advance { round, run, seed } => handle_advance(*round, *run, *seed),
        Command::Reset { run } => handle_reset(*run),
        Command::Overview { run } => handle_overview(*run),
        Command::Activate { run_id } => handle_activate(*run_id),
        Command::Sign { player, team } => handle_sign(*player, *team),
        Command::Release { player } => handle_release(*player),
        Command::Trade { send, receive } => handle_trade(send, receive),
    }
}
