// src/models.rs

use crate::constants::*;
use crate::error::TrackerError;
use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// --- Enumerations ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    Daily,
    Weekly,
    Sprint,
    Campaign,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Daily, Tier::Weekly, Tier::Sprint, Tier::Campaign];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Daily => "Daily",
            Tier::Weekly => "Weekly",
            Tier::Sprint => "Sprint",
            Tier::Campaign => "Campaign",
        }
    }
}

impl FromStr for Tier {
    type Err = TrackerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Daily" => Ok(Tier::Daily),
            "Weekly" => Ok(Tier::Weekly),
            "Sprint" => Ok(Tier::Sprint),
            "Campaign" => Ok(Tier::Campaign),
            other => Err(TrackerError::InvalidTier(other.to_string())),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a logged task. `Pending` is an unresolved state and earns nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Done,
    Failed,
    Skipped,
    Pending,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Done => "Done",
            TaskStatus::Failed => "Failed",
            TaskStatus::Skipped => "Skipped",
            TaskStatus::Pending => "Pending",
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, TaskStatus::Done | TaskStatus::Failed | TaskStatus::Skipped)
    }

    pub fn is_penalized(&self) -> bool {
        matches!(self, TaskStatus::Failed | TaskStatus::Skipped)
    }
}

impl FromStr for TaskStatus {
    type Err = TrackerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Done" => Ok(TaskStatus::Done),
            "Failed" => Ok(TaskStatus::Failed),
            "Skipped" => Ok(TaskStatus::Skipped),
            "Pending" => Ok(TaskStatus::Pending),
            other => Err(TrackerError::InvalidStatus(other.to_string())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Difficulty level, always within 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    pub fn new(value: u8) -> Result<Self, TrackerError> {
        if (DIFFICULTY_MIN..=DIFFICULTY_MAX).contains(&value) {
            Ok(Difficulty(value))
        } else {
            Err(TrackerError::InvalidDifficulty(value))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    fn index(&self) -> usize {
        (self.0 - DIFFICULTY_MIN) as usize
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty(DIFFICULTY_DEFAULT)
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = TrackerError;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Difficulty::new(value)
    }
}

impl From<Difficulty> for u8 {
    fn from(d: Difficulty) -> u8 {
        d.0
    }
}

// --- SQL mapping ---

impl ToSql for Tier {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Tier {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for TaskStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TaskStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for Difficulty {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(i64::from(self.0)))
    }
}

impl FromSql for Difficulty {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let raw = value.as_i64()?;
        u8::try_from(raw)
            .ok()
            .and_then(|v| Difficulty::new(v).ok())
            .ok_or(FromSqlError::OutOfRange(raw))
    }
}

// --- Multiplier Tables ---

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierMultipliers {
    pub daily: f64,
    pub weekly: f64,
    pub sprint: f64,
    pub campaign: f64,
}

impl TierMultipliers {
    pub fn get(&self, tier: Tier) -> f64 {
        match tier {
            Tier::Daily => self.daily,
            Tier::Weekly => self.weekly,
            Tier::Sprint => self.sprint,
            Tier::Campaign => self.campaign,
        }
    }
}

impl Default for TierMultipliers {
    fn default() -> Self {
        TierMultipliers {
            daily: TIER_MULTIPLIER_DAILY,
            weekly: TIER_MULTIPLIER_WEEKLY,
            sprint: TIER_MULTIPLIER_SPRINT,
            campaign: TIER_MULTIPLIER_CAMPAIGN,
        }
    }
}

/// One multiplier per difficulty level, index 0 is difficulty 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyMultipliers(pub [f64; 5]);

impl DifficultyMultipliers {
    pub fn get(&self, difficulty: Difficulty) -> f64 {
        self.0[difficulty.index()]
    }
}

impl Default for DifficultyMultipliers {
    fn default() -> Self {
        DifficultyMultipliers(DIFFICULTY_MULTIPLIERS)
    }
}

// --- Catalog Models ---

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Front {
    pub id: i64,
    pub code: String,
    pub name: String,
    /// Stored and editable, not used by any computation.
    pub coef: f64,
    pub weight: f64,
    pub tiers: TierMultipliers,
    pub difficulties: DifficultyMultipliers,
}

#[derive(Deserialize, Debug, Clone)]
pub struct NewFront {
    pub code: String,
    pub name: String,
    #[serde(default = "default_coef")]
    pub coef: f64,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub tiers: TierMultipliers,
    #[serde(default)]
    pub difficulties: DifficultyMultipliers,
}

impl NewFront {
    pub fn new(code: &str, name: &str) -> Self {
        NewFront {
            code: code.to_string(),
            name: name.to_string(),
            coef: FRONT_COEF_DEFAULT,
            weight: FRONT_WEIGHT_DEFAULT,
            tiers: TierMultipliers::default(),
            difficulties: DifficultyMultipliers::default(),
        }
    }
}

fn default_coef() -> f64 {
    FRONT_COEF_DEFAULT
}

fn default_weight() -> f64 {
    FRONT_WEIGHT_DEFAULT
}

#[derive(Deserialize, Debug, Clone)]
pub struct FrontUpdate {
    pub name: String,
    pub coef: f64,
    pub weight: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PieceType {
    pub id: i64,
    pub front_code: String,
    pub code: String,
    pub name: String,
    pub tier: Tier,
    pub base_xp: f64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct NewPieceType {
    pub front_code: String,
    pub code: String,
    pub name: String,
    pub tier: Tier,
    pub base_xp: f64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PieceTypeUpdate {
    pub name: String,
    pub tier: Tier,
    pub base_xp: f64,
}

// --- Event Models ---

/// A task-completion request coming from the presentation layer.
#[derive(Deserialize, Debug, Clone)]
pub struct TaskLog {
    pub date: NaiveDate,
    pub front_code: String,
    pub tier: Tier,
    pub piece_type: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub minutes: i64,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub status: TaskStatus,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LoggedTask {
    pub id: i64,
    pub date: NaiveDate,
    pub front_code: String,
    pub tier: Tier,
    pub piece_type: String,
    pub note: String,
    pub minutes: i64,
    pub difficulty: Difficulty,
    pub status: TaskStatus,
    pub total_xp: f64,
    pub coins_earned: f64,
}

/// XP and coins frozen onto a task at logging time.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct XpAward {
    pub xp: f64,
    pub coins: f64,
}

impl XpAward {
    pub const ZERO: XpAward = XpAward { xp: 0.0, coins: 0.0 };
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CoinLedgerEntry {
    pub id: i64,
    pub date: NaiveDate,
    pub source: String,
    pub amount: f64,
    pub description: Option<String>,
}

// --- Shop Models ---

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Reward {
    pub id: i64,
    pub name: String,
    pub cost_coins: i64,
    pub image_path: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct NewReward {
    pub name: String,
    pub cost_coins: i64,
    #[serde(default)]
    pub image_path: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PurchaseRecord {
    pub date: NaiveDate,
    pub reward_name: String,
    pub coins_spent: i64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum PurchaseOutcome {
    Completed { purchase_id: i64, new_balance: f64 },
    Declined { balance: f64, cost: i64 },
}

// --- Read Views ---

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LevelSummary {
    pub xp: f64,
    pub level: u32,
    /// Progress toward the next level, within 0.0..=1.0.
    pub progress_fraction: f64,
    pub current_threshold: i64,
    pub next_threshold: i64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FrontSummary {
    pub code: String,
    pub name: String,
    #[serde(flatten)]
    pub summary: LevelSummary,
    pub levelup_bonus_preview: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FrontStanding {
    pub code: String,
    pub name: String,
    pub xp: f64,
    pub level: u32,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LogOutcome {
    pub task_id: i64,
    pub xp_delta: f64,
    pub coins_delta: f64,
    pub leveled_up: bool,
    pub bonus_amount: f64,
    pub new_level: u32,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub id: i64,
    pub date: NaiveDate,
    pub piece_name: Option<String>,
    pub status: TaskStatus,
    pub total_xp: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct XpShare {
    pub piece_name: String,
    pub xp: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub overall: LevelSummary,
    pub balance: f64,
    pub today_xp: f64,
    pub week_average_xp: f64,
    pub fronts: Vec<FrontStanding>,
}

// Used for seeding
#[derive(Deserialize)]
pub struct SeedCatalog {
    pub fronts: Vec<NewFront>,
    pub piece_types: Vec<NewPieceType>,
    pub rewards: Vec<NewReward>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_rejects_out_of_range() {
        assert!(Difficulty::new(0).is_err());
        assert!(Difficulty::new(6).is_err());
        assert_eq!(Difficulty::new(5).unwrap().value(), 5);
        assert_eq!(Difficulty::default().value(), 2);
    }

    #[test]
    fn multiplier_lookup_follows_enum() {
        let tiers = TierMultipliers::default();
        assert_eq!(tiers.get(Tier::Daily), 1.0);
        assert_eq!(tiers.get(Tier::Campaign), 2.0);

        let diffs = DifficultyMultipliers::default();
        assert_eq!(diffs.get(Difficulty::new(1).unwrap()), 0.5);
        assert_eq!(diffs.get(Difficulty::new(5).unwrap()), 3.0);
    }

    #[test]
    fn tier_and_status_parse() {
        assert_eq!("Sprint".parse::<Tier>().unwrap(), Tier::Sprint);
        assert!("Monthly".parse::<Tier>().is_err());
        for tier in Tier::ALL {
            assert_eq!(tier.as_str().parse::<Tier>().unwrap(), tier);
        }
        assert_eq!("Skipped".parse::<TaskStatus>().unwrap(), TaskStatus::Skipped);
        assert!(!TaskStatus::Pending.is_resolved());
        assert!(TaskStatus::Failed.is_penalized());
    }

    #[test]
    fn task_log_deserializes_with_defaults() {
        let log: TaskLog = serde_json::from_str(
            r#"{"date":"2026-10-16","front_code":"sport","tier":"Daily",
                "piece_type":"SportStrength","status":"Done"}"#,
        )
        .unwrap();
        assert_eq!(log.difficulty.value(), 2);
        assert_eq!(log.minutes, 0);
        assert!(serde_json::from_str::<Difficulty>("9").is_err());
    }
}
