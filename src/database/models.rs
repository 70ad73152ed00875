use chrono::NaiveDateTime;

#[derive(Debug, Clone)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub abbreviation: String,
    pub conference: Option<String>,
    pub division: Option<String>,
    pub team_type: String,
    pub created_at: Option<NaiveDateTime>,
}

impl Team {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.city, self.name)
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub id: i64,
    pub team_id: i64,
    pub name: String,
    pub position: Option<String>,
    pub jersey_number: Option<i64>,
    pub height_cm: Option<i64>,
    pub weight_kg: Option<i64>,
    pub ppg: f64,
    pub rpg: f64,
    pub apg: f64,
    pub spg: f64,
    pub bpg: f64,
    pub fg_pct: f64,
    pub three_pt_pct: f64,
    pub ft_pct: f64,
    pub mpg: f64,
}

/// Insert payload for a player; the row id is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewPlayer {
    pub team_id: i64,
    pub name: String,
    pub position: Option<String>,
    pub jersey_number: Option<i64>,
    pub height_cm: Option<i64>,
    pub weight_kg: Option<i64>,
    pub ppg: f64,
    pub rpg: f64,
    pub apg: f64,
    pub spg: f64,
    pub bpg: f64,
    pub fg_pct: f64,
    pub three_pt_pct: f64,
    pub ft_pct: f64,
    pub mpg: f64,
}

#[derive(Debug, Clone)]
pub struct Run {
    pub id: i64,
    pub name: String,
    pub year: i64,
    pub is_active: bool,
    pub is_completed: bool,
    pub champion_team_id: Option<i64>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct Series {
    pub id: i64,
    pub run_id: i64,
    pub round: i64,
    pub series_number: i64,
    pub conference: Option<String>,
    pub team1_id: i64,
    pub team2_id: i64,
    pub team1_wins: i64,
    pub team2_wins: i64,
    pub winner_team_id: Option<i64>,
    pub is_completed: bool,
}

#[derive(Debug, Clone)]
pub struct NewSeries {
    pub run_id: i64,
    pub round: i64,
    pub series_number: i64,
    pub conference: Option<String>,
    pub team1_id: i64,
    pub team2_id: i64,
}

#[derive(Debug, Clone)]
pub struct Game {
    pub id: i64,
    pub run_id: i64,
    pub series_id: Option<i64>,
    pub game_number: Option<i64>,
    pub home_team_id: i64,
    pub away_team_id: i64,
    pub input_quarter: i64,
    pub input_home_score: i64,
    pub input_away_score: i64,
    pub home_quarters: [i64; 4],
    pub away_quarters: [i64; 4],
    pub home_score: i64,
    pub away_score: i64,
    pub is_completed: bool,
    pub played_at: Option<NaiveDateTime>,
}

impl Game {
    pub fn winner_team_id(&self) -> i64 {
        if self.home_score > self.away_score {
            self.home_team_id
        } else {
            self.away_team_id
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewGame {
    pub run_id: i64,
    pub series_id: Option<i64>,
    pub game_number: Option<i64>,
    pub home_team_id: i64,
    pub away_team_id: i64,
    pub input_quarter: i64,
    pub input_home_score: i64,
    pub input_away_score: i64,
    pub home_quarters: [i64; 4],
    pub away_quarters: [i64; 4],
    pub home_score: i64,
    pub away_score: i64,
}

/// One generated box-score row. `id` is zero until inserted.
#[derive(Debug, Clone)]
pub struct StatLine {
    pub id: i64,
    pub game_id: i64,
    pub player_id: i64,
    pub team_id: i64,
    pub minutes_played: f64,
    pub points: i64,
    pub rebounds: i64,
    pub offensive_rebounds: i64,
    pub defensive_rebounds: i64,
    pub assists: i64,
    pub steals: i64,
    pub blocks: i64,
    pub turnovers: i64,
    pub fouls: i64,
    pub fgm: i64,
    pub fga: i64,
    pub three_pm: i64,
    pub three_pa: i64,
    pub ftm: i64,
    pub fta: i64,
    pub plus_minus: i64,
    pub usage_rate: f64,
    pub true_shooting_pct: f64,
    pub effective_fg_pct: f64,
    pub efficiency: f64,
}

/// One play-by-play row. `id` is zero until inserted.
#[derive(Debug, Clone)]
pub struct Play {
    pub id: i64,
    pub game_id: i64,
    pub quarter: i64,
    pub game_time_secs: i64,
    pub time_remaining: String,
    pub event_kind: String,
    pub description: String,
    pub team_id: Option<i64>,
    pub player_id: Option<i64>,
    pub assist_player_id: Option<i64>,
    pub home_score: i64,
    pub away_score: i64,
    pub details: Option<String>,
}
