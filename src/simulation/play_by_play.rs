use std::collections::HashMap;

use rand::distributions::WeightedIndex;
use rand::prelude::*;

use crate::config::settings::SimulationSettings;
use crate::database::models::{Game, Play, StatLine};
use crate::domain::models::{EventKind, PlayDetails, ShotType};

const QUARTER_SECS: i64 = 720;

/// Synthesizes a narrative play-by-play feed for a finished game.
///
/// Possessions are split between the sides in proportion to their quarter
/// scores, shuffled, and walked with a running clock. The feed is a
/// plausible story of the game, not an exact reconstruction: the running
/// score tracks made shots only and is not forced to land on the final
/// score.
pub fn synthesize(
    game: &Game,
    home_stats: &[StatLine],
    away_stats: &[StatLine],
    names: &HashMap<i64, String>,
    settings: &SimulationSettings,
    rng: &mut impl Rng,
) -> Vec<Play> {
    let mut plays = Vec::new();
    let mut home_running = 0i64;
    let mut away_running = 0i64;

    for quarter in 1..=4 {
        let q = (quarter - 1) as usize;
        let home_q = game.home_quarters[q];
        let away_q = game.away_quarters[q];

        let possessions = rng.gen_range(settings.possessions_min..=settings.possessions_max);
        let home_share = home_q as f64 / (home_q + away_q + 1) as f64;
        let home_possessions = (possessions as f64 * home_share) as usize;

        let mut order: Vec<bool> = Vec::with_capacity(possessions);
        order.extend(std::iter::repeat(true).take(home_possessions));
        order.extend(std::iter::repeat(false).take(possessions - home_possessions));
        order.shuffle(rng);

        let mut elapsed = 0i64;
        for home_has_ball in order {
            elapsed = (elapsed
                + rng.gen_range(settings.possession_secs_min..=settings.possession_secs_max))
            .min(QUARTER_SECS);
            let game_time = (quarter as i64 - 1) * QUARTER_SECS + elapsed;

            let (offense, defense) = if home_has_ball {
                (home_stats, away_stats)
            } else {
                (away_stats, home_stats)
            };

            let mut possession = run_possession(
                quarter as i64,
                game_time,
                game.id,
                offense,
                defense,
                names,
                rng,
            );

            for play in &possession.plays {
                if let Some(points) = play_points(play) {
                    if home_has_ball {
                        home_running += points;
                    } else {
                        away_running += points;
                    }
                }
            }
            for play in &mut possession.plays {
                play.home_score = home_running;
                play.away_score = away_running;
            }
            plays.append(&mut possession.plays);
        }
    }

    plays
}

struct Possession {
    plays: Vec<Play>,
}

fn run_possession(
    quarter: i64,
    game_time: i64,
    game_id: i64,
    offense: &[StatLine],
    defense: &[StatLine],
    names: &HashMap<i64, String>,
    rng: &mut impl Rng,
) -> Possession {
    let mut plays = Vec::new();
    let shooter = pick_by_minutes(offense, rng);
    let shooter_name = display_name(names, shooter.player_id);

    let roll: f64 = rng.gen();
    if roll < 0.48 {
        // Made shot, twos twice as likely as threes.
        let shot_type = if rng.gen_range(0..3) < 2 {
            ShotType::TwoPoint
        } else {
            ShotType::ThreePoint
        };

        let assist = (rng.gen::<f64>() < 0.55)
            .then(|| pick_teammate(offense, shooter.player_id, rng))
            .flatten();

        let description = match assist {
            Some(helper) => format!(
                "{} makes {} ({} assists)",
                shooter_name,
                shot_type.label(),
                display_name(names, helper.player_id)
            ),
            None => format!("{} makes {}", shooter_name, shot_type.label()),
        };

        plays.push(base_play(
            game_id,
            quarter,
            game_time,
            EventKind::MadeShot,
            description,
            Some(shooter.team_id),
            Some(shooter.player_id),
            assist.map(|a| a.player_id),
            PlayDetails::Shot {
                shot_type,
                made: true,
                points: shot_type.points(),
            },
        ));

        if rng.gen::<f64>() < 0.15 {
            let fouler = pick_by_minutes(defense, rng);
            plays.push(base_play(
                game_id,
                quarter,
                clamp_to_quarter(game_time + 1, quarter),
                EventKind::Foul,
                format!("Shooting foul on {}", display_name(names, fouler.player_id)),
                Some(fouler.team_id),
                Some(fouler.player_id),
                None,
                PlayDetails::Foul {
                    foul_type: "shooting".to_string(),
                },
            ));
        }
    } else if roll < 0.94 {
        let shot_type = if rng.gen_bool(0.5) {
            ShotType::TwoPoint
        } else {
            ShotType::ThreePoint
        };

        plays.push(base_play(
            game_id,
            quarter,
            game_time,
            EventKind::MissedShot,
            format!("{} misses {}", shooter_name, shot_type.label()),
            Some(shooter.team_id),
            Some(shooter.player_id),
            None,
            PlayDetails::Shot {
                shot_type,
                made: false,
                points: 0,
            },
        ));

        let offensive_board = rng.gen::<f64>() < 0.30;
        let rebounder = if offensive_board {
            pick_by_minutes(offense, rng)
        } else {
            pick_by_minutes(defense, rng)
        };
        let flavor = if offensive_board {
            "offensive"
        } else {
            "defensive"
        };
        plays.push(base_play(
            game_id,
            quarter,
            clamp_to_quarter(game_time + 1, quarter),
            EventKind::Rebound,
            format!(
                "{} grabs the {flavor} rebound",
                display_name(names, rebounder.player_id)
            ),
            Some(rebounder.team_id),
            Some(rebounder.player_id),
            None,
            PlayDetails::Rebound {
                offensive: offensive_board,
            },
        ));
    } else {
        plays.push(base_play(
            game_id,
            quarter,
            game_time,
            EventKind::Turnover,
            format!("{} turns it over (bad pass)", shooter_name),
            Some(shooter.team_id),
            Some(shooter.player_id),
            None,
            PlayDetails::Turnover {
                turnover_type: "bad pass".to_string(),
            },
        ));
    }

    Possession { plays }
}

/// Heavier-minute players shoulder more of the possessions. Falls back to a
/// uniform pick when every listed minute is zero.
fn pick_by_minutes<'a>(stats: &'a [StatLine], rng: &mut impl Rng) -> &'a StatLine {
    let weights: Vec<f64> = stats.iter().map(|s| s.minutes_played.max(0.0)).collect();
    match WeightedIndex::new(&weights) {
        Ok(dist) => &stats[dist.sample(rng)],
        Err(_) => stats.choose(rng).expect("roster stats are never empty"),
    }
}

fn pick_teammate<'a>(
    stats: &'a [StatLine],
    shooter_id: i64,
    rng: &mut impl Rng,
) -> Option<&'a StatLine> {
    let teammates: Vec<&StatLine> = stats.iter().filter(|s| s.player_id != shooter_id).collect();
    teammates.choose(rng).copied()
}

fn display_name(names: &HashMap<i64, String>, player_id: i64) -> String {
    names
        .get(&player_id)
        .cloned()
        .unwrap_or_else(|| format!("Player #{player_id}"))
}

fn clamp_to_quarter(game_time: i64, quarter: i64) -> i64 {
    game_time.min(quarter * QUARTER_SECS)
}

#[allow(clippy::too_many_arguments)]
fn base_play(
    game_id: i64,
    quarter: i64,
    game_time: i64,
    kind: EventKind,
    description: String,
    team_id: Option<i64>,
    player_id: Option<i64>,
    assist_player_id: Option<i64>,
    details: PlayDetails,
) -> Play {
    Play {
        id: 0,
        game_id,
        quarter,
        game_time_secs: game_time,
        time_remaining: format_clock(game_time, quarter),
        event_kind: kind.as_str().to_string(),
        description,
        team_id,
        player_id,
        assist_player_id,
        home_score: 0,
        away_score: 0,
        details: serde_json::to_string(&details).ok(),
    }
}

fn play_points(play: &Play) -> Option<i64> {
    if play.event_kind != EventKind::MadeShot.as_str() {
        return None;
    }
    let details: PlayDetails = serde_json::from_str(play.details.as_deref()?).ok()?;
    match details {
        PlayDetails::Shot { made: true, points, .. } => Some(points),
        _ => None,
    }
}

/// MM:SS left on the quarter clock at the given absolute game time.
fn format_clock(game_time: i64, quarter: i64) -> String {
    let into_quarter = game_time - (quarter - 1) * QUARTER_SECS;
    let remaining = (QUARTER_SECS - into_quarter).max(0);
    format!("{:02}:{:02}", remaining / 60, remaining % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn stat_line(player_id: i64, team_id: i64, minutes: f64) -> StatLine {
        StatLine {
            id: 0,
            game_id: 1,
            player_id,
            team_id,
            minutes_played: minutes,
            points: 10,
            rebounds: 4,
            offensive_rebounds: 1,
            defensive_rebounds: 3,
            assists: 3,
            steals: 1,
            blocks: 0,
            turnovers: 2,
            fouls: 2,
            fgm: 4,
            fga: 9,
            three_pm: 1,
            three_pa: 3,
            ftm: 1,
            fta: 2,
            plus_minus: 3,
            usage_rate: 20.0,
            true_shooting_pct: 0.55,
            effective_fg_pct: 0.5,
            efficiency: 12.0,
        }
    }

    fn fixture() -> (Game, Vec<StatLine>, Vec<StatLine>, HashMap<i64, String>) {
        let game = Game {
            id: 1,
            run_id: 1,
            series_id: None,
            game_number: None,
            home_team_id: 10,
            away_team_id: 20,
            input_quarter: 1,
            input_home_score: 28,
            input_away_score: 24,
            home_quarters: [28, 26, 30, 25],
            away_quarters: [24, 27, 22, 28],
            home_score: 109,
            away_score: 101,
            is_completed: true,
            played_at: None,
        };
        let home: Vec<StatLine> = (1..=9).map(|i| stat_line(i, 10, 40.0 - i as f64)).collect();
        let away: Vec<StatLine> = (11..=19).map(|i| stat_line(i, 20, 40.0 - i as f64)).collect();
        let mut names = HashMap::new();
        for line in home.iter().chain(away.iter()) {
            names.insert(line.player_id, format!("Player {}", line.player_id));
        }
        (game, home, away, names)
    }

    #[test]
    fn feed_is_chronologically_ordered() {
        let settings = SimulationSettings::default();
        let (game, home, away, names) = fixture();
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let plays = synthesize(&game, &home, &away, &names, &settings, &mut rng);
            assert!(!plays.is_empty());
            for pair in plays.windows(2) {
                assert!(
                    pair[0].game_time_secs <= pair[1].game_time_secs,
                    "seed {seed}: feed out of order"
                );
            }
            for play in &plays {
                assert!((0..=2880).contains(&play.game_time_secs), "seed {seed}");
                assert!((1..=4).contains(&play.quarter));
            }
        }
    }

    #[test]
    fn possession_counts_stay_in_band() {
        let settings = SimulationSettings::default();
        let (game, home, away, names) = fixture();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let plays = synthesize(&game, &home, &away, &names, &settings, &mut rng);
        for quarter in 1..=4 {
            // Each possession yields one primary event; rebounds and fouls
            // are secondary events attached to it.
            let primary = plays
                .iter()
                .filter(|p| {
                    p.quarter == quarter
                        && (p.event_kind == "made_shot"
                            || p.event_kind == "missed_shot"
                            || p.event_kind == "turnover")
                })
                .count();
            assert!(
                (22..=28).contains(&primary),
                "quarter {quarter}: {primary} possessions"
            );
        }
    }

    #[test]
    fn running_score_is_monotone_and_moves_on_made_shots_only() {
        let settings = SimulationSettings::default();
        let (game, home, away, names) = fixture();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let plays = synthesize(&game, &home, &away, &names, &settings, &mut rng);

        let (mut prev_home, mut prev_away) = (0i64, 0i64);
        for play in &plays {
            assert!(play.home_score >= prev_home);
            assert!(play.away_score >= prev_away);
            if play.event_kind != "made_shot" {
                // Secondary events carry the score forward unchanged unless
                // they share a possession with a made shot.
                assert!(play.home_score - prev_home <= 3);
                assert!(play.away_score - prev_away <= 3);
            }
            prev_home = play.home_score;
            prev_away = play.away_score;
        }
        assert!(prev_home > 0);
        assert!(prev_away > 0);
    }

    #[test]
    fn missed_shots_are_followed_by_a_rebound() {
        let settings = SimulationSettings::default();
        let (game, home, away, names) = fixture();
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        let plays = synthesize(&game, &home, &away, &names, &settings, &mut rng);

        let mut misses = 0;
        for (i, play) in plays.iter().enumerate() {
            if play.event_kind == "missed_shot" {
                misses += 1;
                let next = &plays[i + 1];
                assert_eq!(next.event_kind, "rebound");
                let details: PlayDetails =
                    serde_json::from_str(next.details.as_deref().unwrap()).unwrap();
                match details {
                    PlayDetails::Rebound { offensive } => {
                        if offensive {
                            assert_eq!(next.team_id, play.team_id);
                        } else {
                            assert_ne!(next.team_id, play.team_id);
                        }
                    }
                    other => panic!("expected rebound details, got {other:?}"),
                }
            }
        }
        assert!(misses > 0);
    }

    #[test]
    fn clock_strings_match_game_time() {
        let settings = SimulationSettings::default();
        let (game, home, away, names) = fixture();
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let plays = synthesize(&game, &home, &away, &names, &settings, &mut rng);
        for play in &plays {
            let into_quarter = play.game_time_secs - (play.quarter - 1) * 720;
            let remaining = 720 - into_quarter;
            assert_eq!(
                play.time_remaining,
                format!("{:02}:{:02}", remaining / 60, remaining % 60)
            );
        }
    }
}
