// src/shop.rs

use crate::constants::PURCHASE_HISTORY_LIMIT;
use crate::error::{Result, TrackerError};
use crate::models::{NewReward, PurchaseOutcome, PurchaseRecord, Reward};
use crate::repository;
use chrono::NaiveDate;
use log::{info, warn};
use rusqlite::Connection;

pub fn list_rewards(conn: &Connection) -> Result<Vec<Reward>> {
    Ok(repository::list_rewards(conn)?)
}

pub fn add_reward(conn: &Connection, reward: &NewReward) -> Result<i64> {
    let id = repository::insert_reward(conn, reward)?;
    info!("Added reward {} '{}' for {} coins", id, reward.name, reward.cost_coins);
    Ok(id)
}

pub fn update_reward(conn: &Connection, reward_id: i64, reward: &NewReward) -> Result<()> {
    let changed = repository::update_reward(conn, reward_id, reward)?;
    if changed == 0 {
        return Err(TrackerError::not_found("Reward", reward_id));
    }
    info!("Reward {} now '{}' for {} coins", reward_id, reward.name, reward.cost_coins);
    Ok(())
}

/// Removes a reward from the catalog. Past purchases still count against the balance.
pub fn delete_reward(conn: &Connection, reward_id: i64) -> Result<()> {
    let removed = repository::delete_reward(conn, reward_id)?;
    if removed == 0 {
        return Err(TrackerError::not_found("Reward", reward_id));
    }
    info!("Deleted reward {}", reward_id);
    Ok(())
}

/// Buys a reward at its current price. A short balance declines the purchase instead of failing.
pub fn purchase(conn: &Connection, reward_id: i64, date: NaiveDate) -> Result<PurchaseOutcome> {
    let tx = conn.unchecked_transaction()?;
    let reward = repository::get_reward(&tx, reward_id)?
        .ok_or_else(|| TrackerError::not_found("Reward", reward_id))?;
    let balance = repository::coin_balance(&tx)?;

    if balance < reward.cost_coins as f64 {
        warn!(
            "Purchase of '{}' declined: balance {:.0} < cost {}",
            reward.name, balance, reward.cost_coins
        );
        return Ok(PurchaseOutcome::Declined {
            balance,
            cost: reward.cost_coins,
        });
    }

    let purchase_id = repository::insert_purchase(&tx, date, reward.id, reward.cost_coins)?;
    let new_balance = repository::coin_balance(&tx)?;
    tx.commit()?;

    info!(
        "Purchased '{}' for {} coins, balance {:.0}",
        reward.name, reward.cost_coins, new_balance
    );
    Ok(PurchaseOutcome::Completed {
        purchase_id,
        new_balance,
    })
}

pub fn purchase_history(conn: &Connection) -> Result<Vec<PurchaseRecord>> {
    Ok(repository::purchase_history(conn, PURCHASE_HISTORY_LIMIT)?)
}
