// src/settings.rs

use crate::error::{map_unique_violation, Result, TrackerError};
use crate::models::{
    Difficulty, DifficultyMultipliers, Front, FrontUpdate, NewFront, NewPieceType, PieceType,
    PieceTypeUpdate, Tier, TierMultipliers,
};
use crate::repository;
use log::{debug, info, warn};
use rusqlite::Connection;

// --- Fronts ---

pub fn list_fronts(conn: &Connection) -> Result<Vec<Front>> {
    Ok(repository::list_fronts(conn)?)
}

pub fn add_front(conn: &Connection, front: &NewFront) -> Result<i64> {
    let id = repository::insert_front(conn, front)
        .map_err(|e| map_unique_violation(e, "Front", &front.code))?;
    info!("Added front '{}' ({})", front.code, front.name);
    Ok(id)
}

pub fn update_front(conn: &Connection, front_code: &str, update: &FrontUpdate) -> Result<()> {
    let changed = repository::update_front_settings(conn, front_code, update)?;
    if changed == 0 {
        return Err(TrackerError::not_found("Front", front_code));
    }
    info!(
        "Front '{}' updated: name '{}', coef {:.2}, weight {:.2}",
        front_code, update.name, update.coef, update.weight
    );
    Ok(())
}

/// Replaces a front's tier and difficulty multiplier tables. Already logged tasks keep their XP.
pub fn update_front_multipliers(
    conn: &Connection,
    front_code: &str,
    tiers: &TierMultipliers,
    difficulties: &DifficultyMultipliers,
) -> Result<()> {
    let changed = repository::update_multipliers(conn, front_code, tiers, difficulties)?;
    if changed == 0 {
        return Err(TrackerError::not_found("Front", front_code));
    }
    debug!(
        "Multipliers for '{}': tiers {:?}, difficulties {:?}",
        front_code, tiers, difficulties.0
    );
    info!("Multipliers updated for front '{}'", front_code);
    Ok(())
}

/// Deletes a front together with its piece types and logged tasks.
pub fn delete_front(conn: &Connection, front_code: &str) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    let removed = repository::delete_front(&tx, front_code)?;
    if removed == 0 {
        return Err(TrackerError::not_found("Front", front_code));
    }
    let pieces = repository::delete_piece_types_for_front(&tx, front_code)?;
    let tasks = repository::delete_tasks_for_front(&tx, front_code)?;
    tx.commit()?;

    warn!(
        "Deleted front '{}' with {} piece types and {} tasks",
        front_code, pieces, tasks
    );
    Ok(())
}

// --- Piece Types ---

pub fn list_piece_types(conn: &Connection, front_code: &str, tier: Tier) -> Result<Vec<PieceType>> {
    Ok(repository::list_piece_types(conn, front_code, tier)?)
}

pub fn add_piece_type(conn: &Connection, piece: &NewPieceType) -> Result<i64> {
    if repository::get_front(conn, &piece.front_code)?.is_none() {
        return Err(TrackerError::not_found("Front", &piece.front_code));
    }
    let id = repository::insert_piece_type(conn, piece)
        .map_err(|e| map_unique_violation(e, "Piece type", &piece.code))?;
    info!(
        "Added piece type '{}' to '{}' ({}, {:.0} XP)",
        piece.code, piece.front_code, piece.tier, piece.base_xp
    );
    Ok(id)
}

pub fn update_piece_type(conn: &Connection, code: &str, update: &PieceTypeUpdate) -> Result<()> {
    let changed = repository::update_piece_type(conn, code, update)?;
    if changed == 0 {
        return Err(TrackerError::not_found("Piece type", code));
    }
    info!("Piece type '{}' now {} at {:.0} XP", code, update.tier, update.base_xp);
    Ok(())
}

pub fn delete_piece_type(conn: &Connection, code: &str) -> Result<()> {
    let removed = repository::delete_piece_type(conn, code)?;
    if removed == 0 {
        return Err(TrackerError::not_found("Piece type", code));
    }
    info!("Deleted piece type '{}'", code);
    Ok(())
}

// --- Preferences ---

fn difficulty_key(front_code: &str) -> String {
    format!("{}_diff", front_code)
}

/// Last difficulty picked on a front, 2 when nothing usable is stored.
pub fn last_difficulty(conn: &Connection, front_code: &str) -> Result<Difficulty> {
    let stored = repository::get_pref(conn, &difficulty_key(front_code))?;
    let difficulty = stored
        .and_then(|v| v.parse::<u8>().ok())
        .and_then(|v| Difficulty::new(v).ok())
        .unwrap_or_default();
    debug!("Last difficulty for '{}': {}", front_code, difficulty.value());
    Ok(difficulty)
}

pub fn remember_difficulty(conn: &Connection, front_code: &str, difficulty: Difficulty) -> Result<()> {
    repository::set_pref(conn, &difficulty_key(front_code), &difficulty.value().to_string())?;
    Ok(())
}
