use log::debug;
use rand::Rng;

use crate::config::settings::SimulationSettings;
use crate::database::models::{Player, StatLine};
use crate::errors::CoreError;

const GAME_MINUTES: f64 = 48.0;

/// Generates the box score for one side of a game.
///
/// The top scorers by season PPG form the rotation, each gets a share of
/// the team score proportional to their PPG, and shot attempts are derived
/// backwards from the made-shot mix so the usual accounting identities hold:
/// points = 3*3PM + 2*2PM + FTM, FGM <= FGA, and so on.
pub fn generate_team_box_score(
    game_id: i64,
    team_id: i64,
    roster: &[Player],
    team_score: i64,
    opponent_score: i64,
    settings: &SimulationSettings,
    rng: &mut impl Rng,
) -> Result<Vec<StatLine>, CoreError> {
    if roster.is_empty() {
        return Err(CoreError::validation(format!(
            "team {team_id} has no players to build a box score from"
        )));
    }

    let mut rotation: Vec<&Player> = roster.iter().collect();
    rotation.sort_by(|a, b| b.ppg.partial_cmp(&a.ppg).unwrap_or(std::cmp::Ordering::Equal));
    let rotation_size = rng
        .gen_range(settings.rotation_min..=settings.rotation_max)
        .min(rotation.len());
    rotation.truncate(rotation_size);

    let targets = team_targets(team_score, rng);
    debug!("Team {team_id} aggregate targets: {targets:?}");

    let total_ppg: f64 = rotation.iter().map(|p| p.ppg).sum();

    let mut lines = Vec::with_capacity(rotation.len());
    for player in &rotation {
        let share = if total_ppg > 0.0 {
            player.ppg / total_ppg
        } else {
            1.0 / rotation.len() as f64
        };
        lines.push(generate_stat_line(
            game_id,
            team_id,
            player,
            team_score,
            opponent_score,
            share,
            rng,
        ));
    }

    let total_points: i64 = lines.iter().map(|l| l.points).sum();
    debug!(
        "Box score for team {team_id}: {} players, {total_points} player points \
         against a {team_score} team score",
        lines.len()
    );

    Ok(lines)
}

/// Team-level stat targets anchored to the final score. Player rows are
/// drawn independently, so these act as a sanity reference rather than a
/// constraint the rows are fitted to.
#[derive(Debug)]
struct TeamTargets {
    rebounds: i64,
    assists: i64,
    steals: i64,
    blocks: i64,
    turnovers: i64,
    field_goal_attempts: i64,
    three_point_attempts: i64,
}

fn team_targets(team_score: i64, rng: &mut impl Rng) -> TeamTargets {
    let score = team_score as f64;
    TeamTargets {
        rebounds: rng.gen_range(38..=52),
        assists: (score * rng.gen_range(0.18..0.25)) as i64,
        steals: rng.gen_range(5..=12),
        blocks: rng.gen_range(3..=8),
        turnovers: rng.gen_range(10..=18),
        field_goal_attempts: (score * rng.gen_range(1.8..2.2)) as i64,
        three_point_attempts: rng.gen_range(25..=45),
    }
}

fn generate_stat_line(
    game_id: i64,
    team_id: i64,
    player: &Player,
    team_score: i64,
    opponent_score: i64,
    share: f64,
    rng: &mut impl Rng,
) -> StatLine {
    let target_points = (team_score as f64 * share * rng.gen_range(0.7..1.3)).max(0.0) as i64;
    let minutes = (player.mpg * rng.gen_range(0.85..1.15)).min(GAME_MINUTES);

    // Percentages are clamped to sane floors before dividing, so a zero or
    // tiny season percentage cannot explode the attempt counts.
    let fg_pct = player.fg_pct.clamp(0.38, 1.0);
    let three_pct = player.three_pt_pct.clamp(0.30, 1.0);
    let ft_pct = player.ft_pct.clamp(0.70, 1.0);

    let three_pm = (target_points as f64 * rng.gen_range(0.15..0.35) / 3.0) as i64;
    let three_pa = ((three_pm as f64 / three_pct) as i64).max(three_pm);

    let mut remaining = target_points - three_pm * 3;
    let ftm = ((remaining as f64 * rng.gen_range(0.15..0.25)) as i64).max(0);
    let fta = ((ftm as f64 / ft_pct) as i64).max(ftm);
    remaining -= ftm;

    let fgm_two = (remaining / 2).max(0);
    let fgm = fgm_two + three_pm;
    let fga = ((fgm as f64 / fg_pct) as i64).max(fga_floor(fgm, three_pa));

    // Recompute points from the made-shot mix so the identity holds exactly
    // even after the integer truncations above.
    let points = three_pm * 3 + fgm_two * 2 + ftm;

    let rebounds = (player.rpg * rng.gen_range(0.7..1.3)).max(0.0) as i64;
    let offensive_rebounds = rebounds / 3;
    let defensive_rebounds = rebounds - offensive_rebounds;
    let assists = (player.apg * rng.gen_range(0.7..1.3)).max(0.0) as i64;
    let steals = (player.spg * rng.gen_range(0.5..1.5)).max(0.0) as i64;
    let blocks = (player.bpg * rng.gen_range(0.5..1.5)).max(0.0) as i64;
    let turnovers = (assists as f64 * rng.gen_range(0.3..0.6)) as i64;
    let fouls = rng.gen_range(0..=5);

    let true_shooting_pct = shooting_denominator(fga, fta)
        .map(|d| points as f64 / d)
        .unwrap_or(0.0);
    let effective_fg_pct = if fga > 0 {
        (fgm as f64 + 0.5 * three_pm as f64) / fga as f64
    } else {
        0.0
    };

    let score_diff = (team_score - opponent_score) as f64;
    let plus_minus = (score_diff * (minutes / GAME_MINUTES) * rng.gen_range(0.8..1.2)) as i64;

    let usage_rate = if minutes > 0.0 {
        (fga as f64 + 0.44 * fta as f64 + turnovers as f64) * GAME_MINUTES / minutes
    } else {
        0.0
    };

    let efficiency = if minutes > 0.0 {
        let raw = points + rebounds + assists + steals + blocks
            - (fga - fgm)
            - (fta - ftm)
            - turnovers;
        ((raw as f64 / minutes) * 10.0).max(0.0)
    } else {
        0.0
    };

    StatLine {
        id: 0,
        game_id,
        player_id: player.id,
        team_id,
        minutes_played: minutes,
        points,
        rebounds,
        offensive_rebounds,
        defensive_rebounds,
        assists,
        steals,
        blocks,
        turnovers,
        fouls,
        fgm,
        fga,
        three_pm,
        three_pa,
        ftm,
        fta,
        plus_minus,
        usage_rate,
        true_shooting_pct,
        effective_fg_pct,
        efficiency,
    }
}

/// Attempts can never drop below makes, and two-point attempts are implied
/// by total attempts minus three-point attempts.
fn fga_floor(fgm: i64, three_pa: i64) -> i64 {
    fgm.max(three_pa)
}

fn shooting_denominator(fga: i64, fta: i64) -> Option<f64> {
    let d = 2.0 * (fga as f64 + 0.44 * fta as f64);
    (d > 0.0).then_some(d)
}
