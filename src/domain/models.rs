use serde::{Deserialize, Serialize};

/// Conference labels for bracket partitioning. The free agent pool carries
/// no conference at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Conference {
    East,
    West,
}

impl Conference {
    pub fn as_str(&self) -> &'static str {
        match self {
            Conference::East => "East",
            Conference::West => "West",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "East" => Some(Conference::East),
            "West" => Some(Conference::West),
            _ => None,
        }
    }
}

/// Distinguishes ordinary rosters from the unlimited-membership pool of
/// unaffiliated players.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamType {
    Franchise,
    FreeAgentPool,
}

impl TeamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TeamType::Franchise => "franchise",
            TeamType::FreeAgentPool => "free_agent_pool",
        }
    }
}

/// The single quarter of real input a game is extrapolated from.
#[derive(Debug, Clone, Copy)]
pub struct QuarterInput {
    pub home_team_id: i64,
    pub away_team_id: i64,
    pub quarter: i64,
    pub home_score: i64,
    pub away_score: i64,
}

/// Four generated quarter scores per side, input quarter included verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratedQuarters {
    pub home: [i64; 4],
    pub away: [i64; 4],
}

impl GeneratedQuarters {
    pub fn home_total(&self) -> i64 {
        self.home.iter().sum()
    }

    pub fn away_total(&self) -> i64 {
        self.away.iter().sum()
    }
}

/// Discrete play-by-play event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    MadeShot,
    MissedShot,
    Rebound,
    Turnover,
    Foul,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::MadeShot => "made_shot",
            EventKind::MissedShot => "missed_shot",
            EventKind::Rebound => "rebound",
            EventKind::Turnover => "turnover",
            EventKind::Foul => "foul",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotType {
    #[serde(rename = "2PT")]
    TwoPoint,
    #[serde(rename = "3PT")]
    ThreePoint,
}

impl ShotType {
    pub fn points(&self) -> i64 {
        match self {
            ShotType::TwoPoint => 2,
            ShotType::ThreePoint => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShotType::TwoPoint => "2PT",
            ShotType::ThreePoint => "3PT",
        }
    }
}

/// Structured payload attached to a play-by-play row; shape depends on the
/// event kind. Serialized into the `details` JSON column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlayDetails {
    Shot {
        shot_type: ShotType,
        made: bool,
        points: i64,
    },
    Rebound {
        offensive: bool,
    },
    Turnover {
        turnover_type: String,
    },
    Foul {
        foul_type: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conference_labels_round_trip() {
        for conference in [Conference::East, Conference::West] {
            assert_eq!(Conference::from_label(conference.as_str()), Some(conference));
        }
        assert_eq!(Conference::from_label("Atlantic"), None);
        assert_eq!(Conference::from_label("east"), None);
    }
}
