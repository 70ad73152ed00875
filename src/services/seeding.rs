use anyhow::Result;
use log::info;
use rand::prelude::*;

use crate::database::models::NewPlayer;
use crate::database::{self, setup, with_transaction, DbConn};
use crate::domain::models::TeamType;

const ROSTER_SIZE: usize = 12;
const POOL_SIZE: usize = 15;

/// (name, city, abbreviation, conference, division)
const FRANCHISES: [(&str, &str, &str, &str, &str); 32] = [
    ("Hawks", "Atlanta", "ATL", "East", "Southeast"),
    ("Celtics", "Boston", "BOS", "East", "Atlantic"),
    ("Nets", "Brooklyn", "BKN", "East", "Atlantic"),
    ("Hornets", "Charlotte", "CHA", "East", "Southeast"),
    ("Bulls", "Chicago", "CHI", "East", "Central"),
    ("Cavaliers", "Cleveland", "CLE", "East", "Central"),
    ("Pistons", "Detroit", "DET", "East", "Central"),
    ("Pacers", "Indiana", "IND", "East", "Central"),
    ("Heat", "Miami", "MIA", "East", "Southeast"),
    ("Bucks", "Milwaukee", "MIL", "East", "Central"),
    ("Knicks", "New York", "NYK", "East", "Atlantic"),
    ("Magic", "Orlando", "ORL", "East", "Southeast"),
    ("76ers", "Philadelphia", "PHI", "East", "Atlantic"),
    ("Raptors", "Toronto", "TOR", "East", "Atlantic"),
    ("Wizards", "Washington", "WAS", "East", "Southeast"),
    ("Pride", "Pittsburgh", "PIT", "East", "Atlantic"),
    ("Mavericks", "Dallas", "DAL", "West", "Southwest"),
    ("Nuggets", "Denver", "DEN", "West", "Northwest"),
    ("Warriors", "Golden State", "GSW", "West", "Pacific"),
    ("Rockets", "Houston", "HOU", "West", "Southwest"),
    ("Clippers", "Los Angeles", "LAC", "West", "Pacific"),
    ("Lakers", "Los Angeles", "LAL", "West", "Pacific"),
    ("Grizzlies", "Memphis", "MEM", "West", "Southwest"),
    ("Timberwolves", "Minnesota", "MIN", "West", "Northwest"),
    ("Pelicans", "New Orleans", "NOP", "West", "Southwest"),
    ("Thunder", "Oklahoma City", "OKC", "West", "Northwest"),
    ("Suns", "Phoenix", "PHX", "West", "Pacific"),
    ("Trail Blazers", "Portland", "POR", "West", "Northwest"),
    ("Kings", "Sacramento", "SAC", "West", "Pacific"),
    ("Spurs", "San Antonio", "SAS", "West", "Southwest"),
    ("Jazz", "Utah", "UTA", "West", "Northwest"),
    ("Stampede", "Seattle", "SEA", "West", "Pacific"),
];

const POSITIONS: [&str; 5] = ["PG", "SG", "SF", "PF", "C"];

const FIRST_NAMES: [&str; 24] = [
    "Marcus", "Jalen", "Darius", "Trey", "Malik", "Isaiah", "Devin", "Andre", "Chris", "Jordan",
    "Tyrese", "Kevon", "Luka", "Nikola", "Giannis", "Damian", "Zion", "Anthony", "Victor", "Paolo",
    "Desmond", "Cam", "Grant", "Austin",
];

const LAST_NAMES: [&str; 24] = [
    "Johnson", "Williams", "Carter", "Mitchell", "Brooks", "Turner", "Hayes", "Porter",
    "Bridges", "Murray", "Holiday", "Barnes", "Reaves", "Sengun", "Wagner", "Sharpe",
    "Thompson", "Jackson", "Edwards", "Banchero", "Maxey", "Suggs", "Daniels", "George",
];

#[derive(Debug)]
pub struct SeedSummary {
    pub teams: usize,
    pub players: usize,
}

/// Rebuilds the schema and seeds the 32-team league: two 16-team
/// conferences, a 12-man roster per franchise, and a 15-player free agent
/// pool. Rosters are drawn procedurally in tiers so each team gets a star,
/// a supporting core and a bench.
pub fn seed_league(conn: &mut DbConn, rng: &mut impl Rng) -> Result<SeedSummary> {
    setup::reset_database(conn)?;

    let summary = with_transaction(conn, |conn| {
        let mut players = 0usize;
        for (name, city, abbreviation, conference, division) in FRANCHISES {
            let team = database::teams::insert_team(
                conn,
                name,
                city,
                abbreviation,
                Some(conference),
                Some(division),
                TeamType::Franchise,
            )?;
            for tier in roster_tiers() {
                let player = generate_player(team.id, tier, rng);
                database::players::insert_player(conn, &player)?;
                players += 1;
            }
        }

        let pool = database::teams::insert_team(
            conn,
            "Free Agent Pool",
            "League",
            "FA",
            None,
            None,
            TeamType::FreeAgentPool,
        )?;
        for _ in 0..POOL_SIZE {
            // Free agents are fringe players, bench tier at best.
            let player = generate_player(pool.id, Tier::Bench, rng);
            database::players::insert_player(conn, &player)?;
            players += 1;
        }

        Ok(SeedSummary {
            teams: FRANCHISES.len() + 1,
            players,
        })
    })?;

    info!(
        "Seeded league: {} teams, {} players",
        summary.teams, summary.players
    );
    Ok(summary)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    Star,
    Starter,
    Rotation,
    Bench,
}

fn roster_tiers() -> [Tier; ROSTER_SIZE] {
    [
        Tier::Star,
        Tier::Starter,
        Tier::Starter,
        Tier::Rotation,
        Tier::Rotation,
        Tier::Rotation,
        Tier::Rotation,
        Tier::Bench,
        Tier::Bench,
        Tier::Bench,
        Tier::Bench,
        Tier::Bench,
    ]
}

fn generate_player(team_id: i64, tier: Tier, rng: &mut impl Rng) -> NewPlayer {
    let position = *POSITIONS.choose(rng).unwrap_or(&"SF");

    let (ppg_lo, ppg_hi, mpg_lo, mpg_hi) = match tier {
        Tier::Star => (24.0, 32.0, 34.0, 38.0),
        Tier::Starter => (16.0, 24.0, 30.0, 35.0),
        Tier::Rotation => (9.0, 16.0, 20.0, 30.0),
        Tier::Bench => (3.0, 9.0, 8.0, 20.0),
    };
    let scale = match tier {
        Tier::Star => 1.3,
        Tier::Starter => 1.1,
        Tier::Rotation => 0.9,
        Tier::Bench => 0.6,
    };

    // Bigs rebound and block, guards distribute.
    let (rpg_base, apg_base, bpg_base, height_lo, height_hi) = match position {
        "PG" => (3.0, 6.5, 0.2, 183, 193),
        "SG" => (3.5, 4.0, 0.3, 190, 200),
        "SF" => (5.0, 3.0, 0.5, 198, 206),
        "PF" => (7.0, 2.5, 0.9, 203, 211),
        _ => (9.0, 1.8, 1.4, 208, 221),
    };

    NewPlayer {
        team_id,
        name: format!(
            "{} {}",
            FIRST_NAMES.choose(rng).unwrap_or(&"Alex"),
            LAST_NAMES.choose(rng).unwrap_or(&"Smith")
        ),
        position: Some(position.to_string()),
        jersey_number: Some(rng.gen_range(0..=99)),
        height_cm: Some(rng.gen_range(height_lo..=height_hi)),
        weight_kg: Some(rng.gen_range(80..=120)),
        ppg: round1(rng.gen_range(ppg_lo..ppg_hi)),
        rpg: round1(rpg_base * scale * rng.gen_range(0.8..1.2)),
        apg: round1(apg_base * scale * rng.gen_range(0.8..1.2)),
        spg: round1(rng.gen_range(0.3..1.8) * scale),
        bpg: round1(bpg_base * scale * rng.gen_range(0.7..1.3)),
        fg_pct: round3(rng.gen_range(0.40..0.55)),
        three_pt_pct: round3(rng.gen_range(0.30..0.42)),
        ft_pct: round3(rng.gen_range(0.70..0.90)),
        mpg: round1(rng.gen_range(mpg_lo..mpg_hi)),
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}
