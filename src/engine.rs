// src/engine.rs
//
// Pure reward rules. Everything here is computed from its inputs only; the
// tracker module gathers those inputs from the database and persists results.

use crate::constants::*;
use crate::models::{Front, TaskLog, XpAward};
use log::debug;

// --- Reward Calculator ---

/// XP/coins for a task.
///
/// `front` is the task's front if it exists, `catalog_base_xp` the base XP of
/// its piece type if the catalog knows it. Missing entries degrade to neutral
/// multipliers and a minutes-derived base instead of failing.
pub fn compute_award(task: &TaskLog, front: Option<&Front>, catalog_base_xp: Option<f64>) -> XpAward {
    if !task.status.is_resolved() {
        return XpAward::ZERO;
    }

    let base_xp = catalog_base_xp.unwrap_or_else(|| fallback_base_xp(task.minutes));
    let (tier_mult, diff_mult) = match front {
        Some(f) => (f.tiers.get(task.tier), f.difficulties.get(task.difficulty)),
        None => (NEUTRAL_MULTIPLIER, NEUTRAL_MULTIPLIER),
    };

    let mut total_xp = base_xp * tier_mult * diff_mult;
    if task.status.is_penalized() {
        total_xp = -total_xp * PENALTY_FACTOR;
    }
    let xp = round_to_tenth(total_xp);

    debug!(
        "[XP Input] Base: {:.1}, Tier x{:.2}, Diff x{:.2}, Status: {} => {:.1}",
        base_xp, tier_mult, diff_mult, task.status, xp
    );

    XpAward {
        xp,
        coins: xp * COINS_PER_XP,
    }
}

/// Base XP for ad-hoc tasks: minutes rounded down to a multiple of ten.
pub fn fallback_base_xp(minutes: i64) -> f64 {
    (minutes.div_euclid(FALLBACK_XP_BUCKET_MINUTES) * FALLBACK_XP_BUCKET_MINUTES) as f64
}

/// One decimal, exact halves to the even digit (-1.25 -> -1.2).
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

// --- Bonus Engine ---

/// Coins granted when the overall level rises.
///
/// The bonus equals the threshold of the level that was just left. A task that
/// jumps several levels still earns a single bonus based on `old_level`.
pub fn levelup_bonus(old_level: u32, new_level: u32, old_level_threshold: Option<i64>) -> Option<f64> {
    if new_level <= old_level {
        return None;
    }
    old_level_threshold.map(|t| t as f64)
}
