use rand::Rng;

use crate::config::settings::SimulationSettings;
use crate::domain::models::{GeneratedQuarters, QuarterInput};
use crate::errors::CoreError;

const QUARTER_MINUTES: f64 = 12.0;

/// Expands one observed quarter into four quarter scores per side.
///
/// The observed quarter is kept verbatim; the other three are sampled from
/// the side's per-minute rate blended toward the league average, then
/// clamped to a plausible range. Extreme input quarters are regressed harder
/// so a 30-4 quarter does not extrapolate into a 120-16 game. Whatever the
/// samples produce, the side that led the input quarter ends up leading the
/// final score.
pub fn extrapolate(
    input: &QuarterInput,
    settings: &SimulationSettings,
    rng: &mut impl Rng,
) -> Result<GeneratedQuarters, CoreError> {
    validate(input)?;

    let home_rate = input.home_score as f64 / QUARTER_MINUTES;
    let away_rate = input.away_score as f64 / QUARTER_MINUTES;
    let league_rate = settings.league_avg_quarter_points / QUARTER_MINUTES;

    let is_blowout = (input.home_score - input.away_score).abs() > settings.blowout_margin;
    let observed_weight = if is_blowout {
        settings.blowout_observed_weight
    } else {
        settings.normal_observed_weight
    };

    let home_adjusted = blend(home_rate, league_rate, observed_weight);
    let away_adjusted = blend(away_rate, league_rate, observed_weight);

    let input_idx = (input.quarter - 1) as usize;
    let mut quarters = GeneratedQuarters {
        home: [0; 4],
        away: [0; 4],
    };
    quarters.home[input_idx] = input.home_score;
    quarters.away[input_idx] = input.away_score;

    for q in 0..4 {
        if q == input_idx {
            continue;
        }
        quarters.home[q] = sample_quarter(home_adjusted, q, settings, rng);
        quarters.away[q] = sample_quarter(away_adjusted, q, settings, rng);
    }

    enforce_input_winner(input, &mut quarters, settings, rng);

    Ok(quarters)
}

pub fn validate(input: &QuarterInput) -> Result<(), CoreError> {
    if !(1..=4).contains(&input.quarter) {
        return Err(CoreError::validation(format!(
            "quarter number must be 1-4, got {}",
            input.quarter
        )));
    }
    if input.home_score < 0 || input.away_score < 0 {
        return Err(CoreError::validation("quarter scores must be non-negative"));
    }
    if input.home_team_id == input.away_team_id {
        return Err(CoreError::validation("a team cannot play itself"));
    }
    Ok(())
}

fn blend(observed: f64, league: f64, observed_weight: f64) -> f64 {
    observed * observed_weight + league * (1.0 - observed_weight)
}

fn sample_quarter(
    rate: f64,
    quarter_idx: usize,
    settings: &SimulationSettings,
    rng: &mut impl Rng,
) -> i64 {
    let mut variance = rng.gen_range(0.85..1.15);

    // Quarter-position effects: slow openings, hot third quarters, volatile
    // fourth quarters.
    variance *= match quarter_idx {
        0 => rng.gen_range(0.92..1.05),
        1 => rng.gen_range(0.95..1.10),
        2 => rng.gen_range(1.00..1.15),
        _ => rng.gen_range(0.90..1.20),
    };

    let score = (rate * QUARTER_MINUTES * variance) as i64;
    score.clamp(settings.quarter_score_min, settings.quarter_score_max)
}

/// The input quarter is ground truth: its leader must also win the game.
/// When the sampled quarters disagree, the deficit plus a small margin is
/// pushed into that side's fourth quarter.
fn enforce_input_winner(
    input: &QuarterInput,
    quarters: &mut GeneratedQuarters,
    settings: &SimulationSettings,
    rng: &mut impl Rng,
) {
    let home_total = quarters.home_total();
    let away_total = quarters.away_total();
    let home_should_win = input.home_score > input.away_score;

    let margin = rng.gen_range(settings.correction_margin_min..=settings.correction_margin_max);
    if home_should_win && home_total <= away_total {
        quarters.home[3] += (away_total - home_total) + margin;
    } else if !home_should_win && away_total <= home_total {
        quarters.away[3] += (home_total - away_total) + margin;
    }
}
