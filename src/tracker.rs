// src/tracker.rs

use crate::constants::*;
use crate::engine;
use crate::error::{Result, TrackerError};
use crate::models::{
    Dashboard, FrontStanding, FrontSummary, HistoryEntry, LevelSummary, LogOutcome, TaskLog,
    XpShare,
};
use crate::repository;
use chrono::{Duration, NaiveDate};
use log::{debug, info, warn};
use rusqlite::Connection;

// --- Public Interface ---

/// Logs a task and grants a level-up bonus when the overall level rises.
///
/// The task row and the bonus row are written in one transaction: either both
/// land or neither does.
pub fn log_task(conn: &Connection, log: &TaskLog) -> Result<LogOutcome> {
    info!(
        "Logging {} '{}' on front '{}' ({}, difficulty {})",
        log.status,
        log.piece_type,
        log.front_code,
        log.tier,
        log.difficulty.value()
    );

    let tx = conn.unchecked_transaction()?;
    let curve = repository::load_level_curve(&tx)?;

    // 1. Level before the insert
    let old_level = curve.level_for(repository::overall_weighted_xp(&tx)?);

    // 2. Reward
    let front = repository::get_front(&tx, &log.front_code)?;
    if front.is_none() {
        warn!("Unknown front '{}', using neutral multipliers", log.front_code);
    }
    let base_xp = repository::get_base_xp(&tx, &log.front_code, &log.piece_type)?;
    if base_xp.is_none() {
        warn!(
            "Piece type '{}' not in catalog, deriving base XP from {} minutes",
            log.piece_type, log.minutes
        );
    }
    let award = engine::compute_award(log, front.as_ref(), base_xp);

    // 3. Append
    let task_id = repository::insert_task(&tx, log, &award)?;

    // 4. Level after the insert, bonus on the way up
    let new_level = curve.level_for(repository::overall_weighted_xp(&tx)?);
    let bonus = engine::levelup_bonus(old_level, new_level, curve.threshold(old_level));
    if let Some(amount) = bonus {
        repository::insert_ledger_entry(
            &tx,
            log.date,
            LEVELUP_SOURCE,
            amount,
            &format!("Bonus for reaching level {}", new_level),
        )?;
        info!(
            "[Level Up] {} -> {}, bonus +{:.0} coins",
            old_level, new_level, amount
        );
    }

    tx.commit()?;

    info!(
        "[XP Result] Task {}: {:+.1} XP, {:+.1} coins, level {}",
        task_id, award.xp, award.coins, new_level
    );

    Ok(LogOutcome {
        task_id,
        xp_delta: award.xp,
        coins_delta: award.coins,
        leveled_up: new_level > old_level,
        bonus_amount: bonus.unwrap_or(0.0),
        new_level,
    })
}

/// Removes a logged task; its frozen XP/coins drop out of every aggregate.
pub fn delete_logged_task(conn: &Connection, task_id: i64) -> Result<()> {
    let removed = repository::delete_task(conn, task_id)?;
    if removed == 0 {
        return Err(TrackerError::not_found("Task", task_id));
    }
    info!("Deleted task {}", task_id);
    Ok(())
}

pub fn get_overall_summary(conn: &Connection) -> Result<LevelSummary> {
    let curve = repository::load_level_curve(conn)?;
    let xp = repository::overall_weighted_xp(conn)?;
    let summary = curve.summarize(xp);
    debug!(
        "[Overall] XP {:.1}, level {}, next {}",
        summary.xp, summary.level, summary.next_threshold
    );
    Ok(summary)
}

/// Level view of one front. Uses the front's unweighted XP.
pub fn get_front_summary(conn: &Connection, front_code: &str) -> Result<FrontSummary> {
    let front = repository::get_front(conn, front_code)?
        .ok_or_else(|| TrackerError::not_found("Front", front_code))?;
    let curve = repository::load_level_curve(conn)?;
    let xp = repository::front_xp(conn, front_code)?;
    let summary = curve.summarize(xp);

    // Bonus the next level-up would pay: the threshold of the current level
    let levelup_bonus_preview = curve
        .threshold(summary.level)
        .map(|t| t as f64)
        .unwrap_or(LEVELUP_BONUS_FALLBACK);

    debug!(
        "[Front {}] XP {:.1}, level {}, progress {:.1}%",
        front_code,
        xp,
        summary.level,
        summary.progress_fraction * 100.0
    );

    Ok(FrontSummary {
        code: front.code,
        name: front.name,
        summary,
        levelup_bonus_preview,
    })
}

pub fn get_balance(conn: &Connection) -> Result<f64> {
    Ok(repository::coin_balance(conn)?)
}

pub fn front_standings(conn: &Connection) -> Result<Vec<FrontStanding>> {
    let curve = repository::load_level_curve(conn)?;
    let standings = repository::front_xp_totals(conn)?
        .into_iter()
        .map(|(code, name, xp)| FrontStanding {
            code,
            name,
            xp,
            level: curve.level_for(xp),
        })
        .collect();
    Ok(standings)
}

pub fn front_history(conn: &Connection, front_code: &str) -> Result<Vec<HistoryEntry>> {
    Ok(repository::task_history(conn, front_code, HISTORY_LIMIT)?)
}

pub fn front_xp_distribution(conn: &Connection, front_code: &str) -> Result<Vec<XpShare>> {
    Ok(repository::xp_distribution(conn, front_code)?)
}

/// Everything the home screen shows, as of `today`.
pub fn get_dashboard(conn: &Connection, today: NaiveDate) -> Result<Dashboard> {
    let week_ago = today - Duration::days(WEEKLY_AVERAGE_DAYS);
    Ok(Dashboard {
        overall: get_overall_summary(conn)?,
        balance: get_balance(conn)?,
        today_xp: repository::weighted_xp_on(conn, today)?,
        week_average_xp: repository::average_daily_weighted_xp(conn, week_ago, today)?,
        fronts: front_standings(conn)?,
    })
}
