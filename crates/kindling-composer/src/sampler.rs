//! Weighted sampling with per-dimension cooldowns.

use chrono::NaiveDate;
use kindling_core::KindlingError;
use kindling_history::{HistoryColumn, HistoryWindow};
use rand::Rng;
use tracing::debug;

/// Whether a value last used on `last_used` is still cooling down on `date`.
pub fn is_cooling_down(last_used: Option<NaiveDate>, date: NaiveDate, cooldown_days: u32) -> bool {
    match last_used {
        Some(last) => (date - last).num_days() < i64::from(cooldown_days),
        None => false,
    }
}

/// Cumulative-weight draw over the positive-weight options, in order.
///
/// Returns `None` if no option has a positive weight.
pub fn weighted_choice<'a, T, R: Rng + ?Sized>(rng: &mut R, options: &'a [(T, f64)]) -> Option<&'a T> {
    let total: f64 = options
        .iter()
        .map(|(_, w)| *w)
        .filter(|w| *w > 0.0)
        .sum();
    if total <= 0.0 {
        return None;
    }

    let r = rng.gen::<f64>() * total;
    let mut upto = 0.0;
    let mut last = None;
    for (item, weight) in options.iter().filter(|(_, w)| *w > 0.0) {
        upto += weight;
        if upto >= r {
            return Some(item);
        }
        last = Some(item);
    }
    // Float rounding can leave `upto` a hair under `r`.
    last
}

/// Draw one key from `pool`, zeroing keys used within `cooldown_days` of `date`.
///
/// If the cooldown zeroes every key, it is waived for this draw and the
/// configured weights are used as-is.
pub fn sample_with_cooldown<'a, R: Rng + ?Sized>(
    rng: &mut R,
    pool: &[(&'a str, f64)],
    column: HistoryColumn,
    cooldown_days: u32,
    date: NaiveDate,
    window: &HistoryWindow,
) -> Result<&'a str, KindlingError> {
    let cooled: Vec<(&'a str, f64)> = pool
        .iter()
        .map(|&(key, weight)| {
            if is_cooling_down(window.last_used(column, key), date, cooldown_days) {
                (key, 0.0)
            } else {
                (key, weight)
            }
        })
        .collect();

    let weights = if cooled.iter().all(|(_, w)| *w <= 0.0) {
        debug!("every {column} is cooling down on {date}; ignoring cooldown");
        pool
    } else {
        cooled.as_slice()
    };

    weighted_choice(rng, weights)
        .copied()
        .ok_or_else(|| KindlingError::Config(format!("no {column} has a positive weight")))
}
