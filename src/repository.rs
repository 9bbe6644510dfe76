// src/repository.rs

use crate::levels::LevelCurve;
use crate::models::{
    CoinLedgerEntry, DifficultyMultipliers, Front, FrontUpdate, HistoryEntry, LoggedTask,
    NewFront, NewPieceType, NewReward, PieceType, PieceTypeUpdate, PurchaseRecord, Reward,
    TaskLog, Tier, TierMultipliers, XpAward, XpShare,
};
use chrono::NaiveDate;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Result, Row};

// --- Fronts ---

const FRONT_COLUMNS: &str = "id, code, name, coef, weight,
    tier_daily, tier_weekly, tier_sprint, tier_campaign,
    diff_1, diff_2, diff_3, diff_4, diff_5";

fn front_from_row(row: &Row) -> Result<Front> {
    Ok(Front {
        id: row.get(0)?,
        code: row.get(1)?,
        name: row.get(2)?,
        coef: row.get(3)?,
        weight: row.get(4)?,
        tiers: TierMultipliers {
            daily: row.get(5)?,
            weekly: row.get(6)?,
            sprint: row.get(7)?,
            campaign: row.get(8)?,
        },
        difficulties: DifficultyMultipliers([
            row.get(9)?,
            row.get(10)?,
            row.get(11)?,
            row.get(12)?,
            row.get(13)?,
        ]),
    })
}

/// Fetches a front with its multiplier tables.
pub fn get_front(conn: &Connection, code: &str) -> Result<Option<Front>> {
    conn.query_row(
        &format!("SELECT {} FROM fronts WHERE code = ?", FRONT_COLUMNS),
        [code],
        front_from_row,
    )
    .optional()
}

pub fn list_fronts(conn: &Connection) -> Result<Vec<Front>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM fronts ORDER BY name",
        FRONT_COLUMNS
    ))?;
    let fronts = stmt
        .query_map([], front_from_row)?
        .collect::<Result<Vec<Front>>>()?;
    Ok(fronts)
}

pub fn insert_front(conn: &Connection, front: &NewFront) -> Result<i64> {
    let d = front.difficulties.0;
    conn.execute(
        "INSERT INTO fronts (code, name, coef, weight,
            tier_daily, tier_weekly, tier_sprint, tier_campaign,
            diff_1, diff_2, diff_3, diff_4, diff_5)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            front.code,
            front.name,
            front.coef,
            front.weight,
            front.tiers.daily,
            front.tiers.weekly,
            front.tiers.sprint,
            front.tiers.campaign,
            d[0],
            d[1],
            d[2],
            d[3],
            d[4]
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_front_settings(conn: &Connection, code: &str, update: &FrontUpdate) -> Result<usize> {
    conn.execute(
        "UPDATE fronts SET name = ?, coef = ?, weight = ? WHERE code = ?",
        params![update.name, update.coef, update.weight, code],
    )
}

pub fn update_multipliers(
    conn: &Connection,
    code: &str,
    tiers: &TierMultipliers,
    difficulties: &DifficultyMultipliers,
) -> Result<usize> {
    let d = difficulties.0;
    conn.execute(
        "UPDATE fronts SET tier_daily = ?, tier_weekly = ?, tier_sprint = ?, tier_campaign = ?,
            diff_1 = ?, diff_2 = ?, diff_3 = ?, diff_4 = ?, diff_5 = ?
         WHERE code = ?",
        params![
            tiers.daily,
            tiers.weekly,
            tiers.sprint,
            tiers.campaign,
            d[0],
            d[1],
            d[2],
            d[3],
            d[4],
            code
        ],
    )
}

pub fn delete_front(conn: &Connection, code: &str) -> Result<usize> {
    conn.execute("DELETE FROM fronts WHERE code = ?", [code])
}

// --- Piece Types ---

fn piece_type_from_row(row: &Row) -> Result<PieceType> {
    Ok(PieceType {
        id: row.get(0)?,
        front_code: row.get(1)?,
        code: row.get(2)?,
        name: row.get(3)?,
        tier: row.get(4)?,
        base_xp: row.get(5)?,
    })
}

/// Base XP of a piece type within a front's catalog, if the catalog has it.
pub fn get_base_xp(conn: &Connection, front_code: &str, code: &str) -> Result<Option<f64>> {
    conn.query_row(
        "SELECT base_xp FROM piece_types WHERE front_code = ? AND code = ?",
        [front_code, code],
        |row| row.get(0),
    )
    .optional()
}

/// Piece types of one front and tier, cheapest first.
pub fn list_piece_types(conn: &Connection, front_code: &str, tier: Tier) -> Result<Vec<PieceType>> {
    let mut stmt = conn.prepare(
        "SELECT id, front_code, code, name, tier, base_xp
         FROM piece_types
         WHERE front_code = ? AND tier = ?
         ORDER BY base_xp, name",
    )?;
    let pieces = stmt
        .query_map(params![front_code, tier], piece_type_from_row)?
        .collect::<Result<Vec<PieceType>>>()?;
    Ok(pieces)
}

pub fn insert_piece_type(conn: &Connection, piece: &NewPieceType) -> Result<i64> {
    conn.execute(
        "INSERT INTO piece_types (front_code, code, name, tier, base_xp) VALUES (?, ?, ?, ?, ?)",
        params![piece.front_code, piece.code, piece.name, piece.tier, piece.base_xp],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_piece_type(conn: &Connection, code: &str, update: &PieceTypeUpdate) -> Result<usize> {
    conn.execute(
        "UPDATE piece_types SET name = ?, tier = ?, base_xp = ? WHERE code = ?",
        params![update.name, update.tier, update.base_xp, code],
    )
}

pub fn delete_piece_type(conn: &Connection, code: &str) -> Result<usize> {
    conn.execute("DELETE FROM piece_types WHERE code = ?", [code])
}

pub fn delete_piece_types_for_front(conn: &Connection, front_code: &str) -> Result<usize> {
    conn.execute("DELETE FROM piece_types WHERE front_code = ?", [front_code])
}

// --- Logged Tasks ---

/// Records a task with its XP/coins frozen at logging time.
pub fn insert_task(conn: &Connection, task: &TaskLog, award: &XpAward) -> Result<i64> {
    conn.execute(
        "INSERT INTO tasks (date, front_code, tier, piece_type, note, minutes, difficulty, status, total_xp, coins_earned)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            task.date,
            task.front_code,
            task.tier,
            task.piece_type,
            task.note,
            task.minutes,
            task.difficulty,
            task.status,
            award.xp,
            award.coins
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_task(conn: &Connection, id: i64) -> Result<Option<LoggedTask>> {
    conn.query_row(
        "SELECT id, date, front_code, tier, piece_type, note, minutes, difficulty, status, total_xp, coins_earned
         FROM tasks WHERE id = ?",
        [id],
        |row| {
            Ok(LoggedTask {
                id: row.get(0)?,
                date: row.get(1)?,
                front_code: row.get(2)?,
                tier: row.get(3)?,
                piece_type: row.get(4)?,
                note: row.get(5)?,
                minutes: row.get(6)?,
                difficulty: row.get(7)?,
                status: row.get(8)?,
                total_xp: row.get(9)?,
                coins_earned: row.get(10)?,
            })
        },
    )
    .optional()
}

pub fn delete_task(conn: &Connection, id: i64) -> Result<usize> {
    conn.execute("DELETE FROM tasks WHERE id = ?", [id])
}

pub fn delete_tasks_for_front(conn: &Connection, front_code: &str) -> Result<usize> {
    conn.execute("DELETE FROM tasks WHERE front_code = ?", [front_code])
}

/// Latest tasks of a front, newest first. The piece name is absent once its catalog entry is gone.
pub fn task_history(conn: &Connection, front_code: &str, limit: i64) -> Result<Vec<HistoryEntry>> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.date, pt.name, t.status, t.total_xp
         FROM tasks t
         LEFT JOIN piece_types pt ON t.piece_type = pt.code
         WHERE t.front_code = ?
         ORDER BY t.date DESC, t.id DESC
         LIMIT ?",
    )?;
    let history = stmt
        .query_map(params![front_code, limit], |row| {
            Ok(HistoryEntry {
                id: row.get(0)?,
                date: row.get(1)?,
                piece_name: row.get(2)?,
                status: row.get(3)?,
                total_xp: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<HistoryEntry>>>()?;
    Ok(history)
}

/// XP earned per piece type of a front, positive totals only, largest first.
pub fn xp_distribution(conn: &Connection, front_code: &str) -> Result<Vec<XpShare>> {
    let mut stmt = conn.prepare(
        "SELECT pt.name, SUM(t.total_xp) AS total
         FROM tasks t
         JOIN piece_types pt ON t.piece_type = pt.code
         WHERE t.front_code = ?
         GROUP BY pt.code
         HAVING total > 0
         ORDER BY total DESC",
    )?;
    let shares = stmt
        .query_map([front_code], |row| {
            Ok(XpShare {
                piece_name: row.get(0)?,
                xp: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<XpShare>>>()?;
    Ok(shares)
}

// --- XP Aggregates ---

/// Sum over fronts of weight * XP logged in that front.
pub fn overall_weighted_xp(conn: &Connection) -> Result<f64> {
    conn.query_row(
        "SELECT COALESCE(SUM(t.total_xp * f.weight), 0.0)
         FROM tasks t JOIN fronts f ON t.front_code = f.code",
        [],
        |row| row.get(0),
    )
}

/// Unweighted XP logged in one front.
pub fn front_xp(conn: &Connection, front_code: &str) -> Result<f64> {
    conn.query_row(
        "SELECT COALESCE(SUM(total_xp), 0.0) FROM tasks WHERE front_code = ?",
        [front_code],
        |row| row.get(0),
    )
}

pub fn weighted_xp_on(conn: &Connection, date: NaiveDate) -> Result<f64> {
    conn.query_row(
        "SELECT COALESCE(SUM(t.total_xp * f.weight), 0.0)
         FROM tasks t JOIN fronts f ON t.front_code = f.code
         WHERE t.date = ?",
        [date],
        |row| row.get(0),
    )
}

/// Average of per-day weighted XP over the days that have tasks in `from..=to`.
pub fn average_daily_weighted_xp(conn: &Connection, from: NaiveDate, to: NaiveDate) -> Result<f64> {
    let avg: Option<f64> = conn.query_row(
        "SELECT AVG(daily_xp) FROM (
            SELECT SUM(t.total_xp * f.weight) AS daily_xp
            FROM tasks t
            JOIN fronts f ON t.front_code = f.code
            WHERE t.date >= ? AND t.date <= ?
            GROUP BY t.date
         )",
        params![from, to],
        |row| row.get(0),
    )?;
    Ok(avg.unwrap_or(0.0))
}

/// (code, name, unweighted XP) for every front, most XP first.
pub fn front_xp_totals(conn: &Connection) -> Result<Vec<(String, String, f64)>> {
    let mut stmt = conn.prepare(
        "SELECT f.code, f.name, COALESCE(SUM(t.total_xp), 0.0) AS total
         FROM fronts f
         LEFT JOIN tasks t ON f.code = t.front_code
         GROUP BY f.code
         ORDER BY total DESC, f.name",
    )?;
    let totals = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
        .collect::<Result<Vec<_>>>()?;
    Ok(totals)
}

// --- Coin Ledger ---

pub fn insert_ledger_entry(
    conn: &Connection,
    date: NaiveDate,
    source: &str,
    amount: f64,
    description: &str,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO coins_log (date, source, amount, description) VALUES (?, ?, ?, ?)",
        params![date, source, amount, description],
    )?;
    debug!("[DB] Ledger append: {} {:+.1}", source, amount);
    Ok(conn.last_insert_rowid())
}

pub fn ledger_entries(conn: &Connection, source: &str) -> Result<Vec<CoinLedgerEntry>> {
    let mut stmt = conn.prepare(
        "SELECT id, date, source, amount, description FROM coins_log WHERE source = ? ORDER BY id",
    )?;
    let entries = stmt
        .query_map([source], |row| {
            Ok(CoinLedgerEntry {
                id: row.get(0)?,
                date: row.get(1)?,
                source: row.get(2)?,
                amount: row.get(3)?,
                description: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<CoinLedgerEntry>>>()?;
    Ok(entries)
}

/// Earned coins + ledger credits - spent coins. Empty tables count as zero.
pub fn coin_balance(conn: &Connection) -> Result<f64> {
    let earned: f64 = conn.query_row(
        "SELECT COALESCE(SUM(coins_earned), 0.0) FROM tasks",
        [],
        |r| r.get(0),
    )?;
    let bonuses: f64 = conn.query_row(
        "SELECT COALESCE(SUM(amount), 0.0) FROM coins_log",
        [],
        |r| r.get(0),
    )?;
    let spent: f64 = conn.query_row(
        "SELECT COALESCE(SUM(coins_spent), 0) FROM purchases",
        [],
        |r| r.get(0),
    )?;
    debug!(
        "[DB] Balance: earned {:.1} + bonuses {:.1} - spent {:.1}",
        earned, bonuses, spent
    );
    Ok(earned + bonuses - spent)
}

// --- Level Thresholds ---

pub fn load_level_curve(conn: &Connection) -> Result<LevelCurve> {
    let mut stmt = conn.prepare("SELECT level, xp_threshold FROM level_thresholds ORDER BY level")?;
    let thresholds = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<(u32, i64)>>>()?;
    Ok(LevelCurve::new(thresholds))
}

// --- Rewards & Purchases ---

fn reward_from_row(row: &Row) -> Result<Reward> {
    Ok(Reward {
        id: row.get(0)?,
        name: row.get(1)?,
        cost_coins: row.get(2)?,
        image_path: row.get(3)?,
    })
}

pub fn list_rewards(conn: &Connection) -> Result<Vec<Reward>> {
    let mut stmt =
        conn.prepare("SELECT id, name, cost_coins, image_path FROM rewards ORDER BY cost_coins, name")?;
    let rewards = stmt
        .query_map([], reward_from_row)?
        .collect::<Result<Vec<Reward>>>()?;
    Ok(rewards)
}

pub fn get_reward(conn: &Connection, id: i64) -> Result<Option<Reward>> {
    conn.query_row(
        "SELECT id, name, cost_coins, image_path FROM rewards WHERE id = ?",
        [id],
        reward_from_row,
    )
    .optional()
}

pub fn insert_reward(conn: &Connection, reward: &NewReward) -> Result<i64> {
    conn.execute(
        "INSERT INTO rewards (name, cost_coins, image_path) VALUES (?, ?, ?)",
        params![reward.name, reward.cost_coins, reward.image_path],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_reward(conn: &Connection, id: i64, reward: &NewReward) -> Result<usize> {
    conn.execute(
        "UPDATE rewards SET name = ?, cost_coins = ?, image_path = ? WHERE id = ?",
        params![reward.name, reward.cost_coins, reward.image_path, id],
    )
}

pub fn delete_reward(conn: &Connection, id: i64) -> Result<usize> {
    conn.execute("DELETE FROM rewards WHERE id = ?", [id])
}

pub fn insert_purchase(conn: &Connection, date: NaiveDate, reward_id: i64, coins_spent: i64) -> Result<i64> {
    conn.execute(
        "INSERT INTO purchases (date, reward_id, coins_spent) VALUES (?, ?, ?)",
        params![date, reward_id, coins_spent],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn purchase_history(conn: &Connection, limit: i64) -> Result<Vec<PurchaseRecord>> {
    let mut stmt = conn.prepare(
        "SELECT p.date, r.name, p.coins_spent
         FROM purchases p
         JOIN rewards r ON p.reward_id = r.id
         ORDER BY p.id DESC
         LIMIT ?",
    )?;
    let records = stmt
        .query_map([limit], |row| {
            Ok(PurchaseRecord {
                date: row.get(0)?,
                reward_name: row.get(1)?,
                coins_spent: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<PurchaseRecord>>>()?;
    Ok(records)
}

// --- User Preferences ---

pub fn get_pref(conn: &Connection, key: &str) -> Result<Option<String>> {
    conn.query_row("SELECT value FROM user_prefs WHERE key = ?", [key], |row| row.get(0))
        .optional()
}

pub fn set_pref(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO user_prefs (key, value) VALUES (?, ?)",
        params![key, value],
    )?;
    Ok(())
}
