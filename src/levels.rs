// src/levels.rs

use crate::constants::*;
use crate::models::LevelSummary;

/// Ordered level -> cumulative XP table. Level N's threshold is the minimum XP to be level N,
/// except level 1 whose floor is 0.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelCurve {
    thresholds: Vec<(u32, i64)>,
}

/// Geometric progression: level 1 = 100, each next level x1.5, rounded half-to-even.
pub fn generate_thresholds() -> Vec<(u32, i64)> {
    let mut thresholds = Vec::with_capacity(LEVEL_MAX as usize);
    let mut current = LEVEL_BASE_THRESHOLD;
    thresholds.push((LEVEL_FLOOR, current));
    for level in (LEVEL_FLOOR + 1)..=LEVEL_MAX {
        current = (current as f64 * LEVEL_GROWTH_FACTOR).round_ties_even() as i64;
        thresholds.push((level, current));
    }
    thresholds
}

impl LevelCurve {
    pub fn new(mut thresholds: Vec<(u32, i64)>) -> Self {
        thresholds.sort_by_key(|&(level, _)| level);
        LevelCurve { thresholds }
    }

    pub fn generated() -> Self {
        LevelCurve::new(generate_thresholds())
    }

    pub fn threshold(&self, level: u32) -> Option<i64> {
        self.thresholds
            .iter()
            .find(|&&(l, _)| l == level)
            .map(|&(_, xp)| xp)
    }

    /// Largest level whose threshold is <= xp; 1 when below every threshold.
    pub fn level_for(&self, xp: f64) -> u32 {
        self.thresholds
            .iter()
            .rev()
            .find(|&&(_, threshold)| threshold as f64 <= xp)
            .map(|&(level, _)| level)
            .unwrap_or(LEVEL_FLOOR)
    }

    /// Threshold of `level + 1`, or the unreachable sentinel past the end of the table.
    pub fn next_threshold(&self, level: u32) -> i64 {
        level
            .checked_add(1)
            .and_then(|next| self.threshold(next))
            .unwrap_or(UNREACHABLE_THRESHOLD)
    }

    /// XP at which the progress bar of `level` starts.
    pub fn floor_for(&self, level: u32) -> i64 {
        if level <= LEVEL_FLOOR {
            0
        } else {
            self.threshold(level).unwrap_or(0)
        }
    }

    /// Fraction of the way from `level`'s floor to the next threshold, clamped to 0..=1.
    pub fn progress(&self, xp: f64, level: u32) -> f64 {
        let current = self.floor_for(level);
        let next = self.next_threshold(level);
        if next <= current {
            return 0.0;
        }
        ((xp - current as f64) / (next - current) as f64).clamp(0.0, 1.0)
    }

    pub fn summarize(&self, xp: f64) -> LevelSummary {
        let level = self.level_for(xp);
        LevelSummary {
            xp,
            level,
            progress_fraction: self.progress(xp, level),
            current_threshold: self.floor_for(level),
            next_threshold: self.next_threshold(level),
        }
    }
}
