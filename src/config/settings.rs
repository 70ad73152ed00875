#[derive(Debug, Clone)]
pub struct SimulationSettings {
    /// League-average points per quarter used as the regression anchor.
    pub league_avg_quarter_points: f64,
    /// Input-quarter margin above which the quarter counts as a blowout.
    pub blowout_margin: i64,
    /// Observed-rate weight for blowout quarters (rest goes to the anchor).
    pub blowout_observed_weight: f64,
    /// Observed-rate weight for normal quarters.
    pub normal_observed_weight: f64,
    /// Plausible range for a generated quarter score, inclusive.
    pub quarter_score_min: i64,
    pub quarter_score_max: i64,
    /// Margin added on top of the deficit when correcting the winner.
    pub correction_margin_min: i64,
    pub correction_margin_max: i64,
    /// Bench rotation size drawn per team.
    pub rotation_min: usize,
    pub rotation_max: usize,
    /// Possessions per quarter drawn for play-by-play synthesis.
    pub possessions_min: usize,
    pub possessions_max: usize,
    /// Possession duration band in seconds.
    pub possession_secs_min: i64,
    pub possession_secs_max: i64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            // ~110 points per game across four quarters
            league_avg_quarter_points: 27.5,
            blowout_margin: 10,
            blowout_observed_weight: 0.4,
            normal_observed_weight: 0.7,
            quarter_score_min: 18,
            quarter_score_max: 35,
            correction_margin_min: 3,
            correction_margin_max: 8,
            rotation_min: 8,
            rotation_max: 10,
            possessions_min: 22,
            possessions_max: 28,
            possession_secs_min: 14,
            possession_secs_max: 30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BracketSettings {
    /// Teams required before a bracket can be created.
    pub bracket_size: usize,
    /// Teams drawn per conference for round 1.
    pub conference_size: usize,
    /// Wins needed to clinch a best-of-seven series.
    pub wins_to_clinch: i64,
    /// The finals round; completing it crowns the champion.
    pub final_round: i64,
}

impl Default for BracketSettings {
    fn default() -> Self {
        Self {
            bracket_size: 32,
            conference_size: 16,
            wins_to_clinch: 4,
            final_round: 5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub simulation: SimulationSettings,
    pub bracket: BracketSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            simulation: SimulationSettings::default(),
            bracket: BracketSettings::default(),
        }
    }
}
