// src/constants.rs

// --- Tier Multipliers (defaults for new fronts) ---
pub const TIER_MULTIPLIER_DAILY: f64 = 1.0;
pub const TIER_MULTIPLIER_WEEKLY: f64 = 1.2;
pub const TIER_MULTIPLIER_SPRINT: f64 = 1.5;
pub const TIER_MULTIPLIER_CAMPAIGN: f64 = 2.0;

// --- Difficulty Multipliers (levels 1..=5) ---
pub const DIFFICULTY_MULTIPLIERS: [f64; 5] = [0.5, 1.0, 1.5, 2.0, 3.0];
pub const DIFFICULTY_MIN: u8 = 1;
pub const DIFFICULTY_MAX: u8 = 5;
pub const DIFFICULTY_DEFAULT: u8 = 2;

// Applied when the front is unknown
pub const NEUTRAL_MULTIPLIER: f64 = 1.0;

// --- Reward Rules ---
pub const PENALTY_FACTOR: f64 = 0.5; // Failed/Skipped cost half of a Done
pub const FALLBACK_XP_BUCKET_MINUTES: i64 = 10;
pub const COINS_PER_XP: f64 = 1.0;

// --- Level Curve ---
pub const LEVEL_BASE_THRESHOLD: i64 = 100;
pub const LEVEL_GROWTH_FACTOR: f64 = 1.5;
pub const LEVEL_MAX: u32 = 50;
pub const LEVEL_FLOOR: u32 = 1;
pub const UNREACHABLE_THRESHOLD: i64 = 999_999;

// --- Ledger ---
pub const LEVELUP_SOURCE: &str = "levelup";
pub const LEVELUP_BONUS_FALLBACK: f64 = 100.0; // Preview when the table has no row

// --- Front Defaults ---
pub const FRONT_COEF_DEFAULT: f64 = 1.0;
pub const FRONT_WEIGHT_DEFAULT: f64 = 1.0;

// --- Read Limits ---
pub const HISTORY_LIMIT: i64 = 20;
pub const PURCHASE_HISTORY_LIMIT: i64 = 50;
pub const WEEKLY_AVERAGE_DAYS: i64 = 7;
