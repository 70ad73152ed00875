use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "courtside simulation engine")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Rebuild the database and seed the 32-team league
    Seed {
        /// RNG seed for reproducible rosters (optional)
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Start a new tournament run and seed its round 1 bracket
    Run {
        /// Run name (defaults to "Playoffs <year>")
        #[arg(long)]
        name: Option<String>,
        /// Season year (defaults to the current year)
        #[arg(long)]
        year: Option<i64>,
        /// RNG seed for reproducible pairings (optional)
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Simulate a full game from one observed quarter
    Simulate {
        /// Home team id
        home_team: i64,
        /// Away team id
        away_team: i64,
        /// Which quarter the scores are from (1-4)
        quarter: i64,
        /// Home score in that quarter
        home_score: i64,
        /// Away score in that quarter
        away_score: i64,
        /// Attach the game to a bracket series
        #[arg(long)]
        series: Option<i64>,
        /// Run to record the game under (defaults to the active run)
        #[arg(long)]
        run: Option<i64>,
        /// RNG seed for a reproducible game (optional)
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Extrapolate a game without saving anything
    Preview {
        /// Home team id
        home_team: i64,
        /// Away team id
        away_team: i64,
        /// Which quarter the scores are from (1-4)
        quarter: i64,
        /// Home score in that quarter
        home_score: i64,
        /// Away score in that quarter
        away_score: i64,
        /// RNG seed for a reproducible preview (optional)
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Delete a game and take back the series win it contributed
    Delete {
        /// Game id
        game_id: i64,
    },
    /// Create the next round once every series of a round is decided
    Advance {
        /// The completed round to advance past
        round: i64,
        /// Run to advance (defaults to the active run)
        #[arg(long)]
        run: Option<i64>,
        /// RNG seed for reproducible pairings (optional)
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Wipe all bracket series and games of a run
    Reset {
        /// Run to reset (defaults to the active run)
        #[arg(long)]
        run: Option<i64>,
    },
    /// Print the bracket state round by round
    Overview {
        /// Run to show (defaults to the active run)
        #[arg(long)]
        run: Option<i64>,
    },
    /// Make an existing run the active one
    Activate {
        /// Run id
        run_id: i64,
    },
    /// Sign a free agent to a franchise
    Sign {
        /// Player id
        player: i64,
        /// Team id
        team: i64,
    },
    /// Release a player into the free agent pool
    Release {
        /// Player id
        player: i64,
    },
    /// Trade players between two teams
    Trade {
        /// Player ids leaving team 1 (comma separated)
        #[arg(long, value_delimiter = ',', required = true)]
        send: Vec<i64>,
        /// Player ids leaving team 2 (comma separated)
        #[arg(long, value_delimiter = ',', required = true)]
        receive: Vec<i64>,
    },
}
