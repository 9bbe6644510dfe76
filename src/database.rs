// src/database.rs

use crate::error::Result;
use crate::levels::generate_thresholds;
use crate::models::SeedCatalog;
use log::{debug, info};
use rusqlite::{params, Connection};
use std::fs;
use std::path::Path;

/// Opens (creating if needed) the database file and brings the schema up to date.
pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    info!("Database path: {:?}", path);
    let conn = Connection::open(path)?;
    init_db(&conn)?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    debug!("init_db: Checking database schema...");

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS fronts (
            id INTEGER PRIMARY KEY,
            code TEXT UNIQUE NOT NULL,
            name TEXT NOT NULL,
            coef REAL NOT NULL DEFAULT 1.0,
            weight REAL NOT NULL DEFAULT 1.0,
            tier_daily REAL NOT NULL DEFAULT 1.0,
            tier_weekly REAL NOT NULL DEFAULT 1.2,
            tier_sprint REAL NOT NULL DEFAULT 1.5,
            tier_campaign REAL NOT NULL DEFAULT 2.0,
            diff_1 REAL NOT NULL DEFAULT 0.5,
            diff_2 REAL NOT NULL DEFAULT 1.0,
            diff_3 REAL NOT NULL DEFAULT 1.5,
            diff_4 REAL NOT NULL DEFAULT 2.0,
            diff_5 REAL NOT NULL DEFAULT 3.0
        );
        CREATE TABLE IF NOT EXISTS piece_types (
            id INTEGER PRIMARY KEY,
            front_code TEXT NOT NULL,
            code TEXT UNIQUE NOT NULL,
            name TEXT NOT NULL,
            tier TEXT NOT NULL CHECK (tier IN ('Daily','Weekly','Sprint','Campaign')),
            base_xp REAL NOT NULL
        );
        CREATE TABLE IF NOT EXISTS tasks (
            id INTEGER PRIMARY KEY,
            date TEXT NOT NULL,
            front_code TEXT NOT NULL,
            tier TEXT NOT NULL,
            piece_type TEXT NOT NULL,
            note TEXT NOT NULL DEFAULT '',
            minutes INTEGER NOT NULL DEFAULT 0,
            difficulty INTEGER NOT NULL DEFAULT 2 CHECK (difficulty BETWEEN 1 AND 5),
            status TEXT NOT NULL,
            total_xp REAL NOT NULL DEFAULT 0,
            coins_earned REAL NOT NULL DEFAULT 0
        );
        CREATE INDEX IF NOT EXISTS idx_tasks_front ON tasks(front_code);
        CREATE INDEX IF NOT EXISTS idx_tasks_date ON tasks(date);
        CREATE TABLE IF NOT EXISTS level_thresholds (
            level INTEGER PRIMARY KEY,
            xp_threshold INTEGER NOT NULL
        );
        CREATE TABLE IF NOT EXISTS rewards (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            cost_coins INTEGER NOT NULL,
            image_path TEXT
        );
        CREATE TABLE IF NOT EXISTS purchases (
            id INTEGER PRIMARY KEY,
            date TEXT NOT NULL,
            reward_id INTEGER NOT NULL,
            coins_spent INTEGER NOT NULL
        );
        CREATE TABLE IF NOT EXISTS coins_log (
            id INTEGER PRIMARY KEY,
            date TEXT NOT NULL,
            source TEXT NOT NULL,
            amount REAL NOT NULL,
            description TEXT
        );
        CREATE TABLE IF NOT EXISTS user_prefs (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        ",
    )?;

    let count: i64 = conn.query_row("SELECT count(*) FROM fronts", [], |row| row.get(0))?;
    if count == 0 {
        info!("init_db: Fronts table empty. Seeding data...");
        seed_data(conn)?;
    }

    Ok(())
}

fn seed_data(conn: &Connection) -> Result<()> {
    let data = include_str!("data/seed_catalog.json");
    let catalog: SeedCatalog = serde_json::from_str(data)?;

    let tx = conn.unchecked_transaction()?;

    // 1. Fronts
    let mut f_stmt = tx.prepare(
        "INSERT OR IGNORE INTO fronts (code, name, coef, weight,
            tier_daily, tier_weekly, tier_sprint, tier_campaign,
            diff_1, diff_2, diff_3, diff_4, diff_5)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )?;
    for f in &catalog.fronts {
        let d = f.difficulties.0;
        f_stmt.execute(params![
            f.code,
            f.name,
            f.coef,
            f.weight,
            f.tiers.daily,
            f.tiers.weekly,
            f.tiers.sprint,
            f.tiers.campaign,
            d[0],
            d[1],
            d[2],
            d[3],
            d[4]
        ])?;
    }
    drop(f_stmt);

    // 2. Piece types
    let mut p_stmt = tx.prepare(
        "INSERT OR IGNORE INTO piece_types (front_code, code, name, tier, base_xp) VALUES (?, ?, ?, ?, ?)",
    )?;
    for p in &catalog.piece_types {
        p_stmt.execute(params![p.front_code, p.code, p.name, p.tier, p.base_xp])?;
    }
    drop(p_stmt);

    // 3. Level thresholds
    let mut t_stmt =
        tx.prepare("INSERT OR REPLACE INTO level_thresholds (level, xp_threshold) VALUES (?, ?)")?;
    for (level, threshold) in generate_thresholds() {
        t_stmt.execute(params![level, threshold])?;
    }
    drop(t_stmt);

    // 4. Rewards (only on a fresh shop)
    let rewards: i64 = tx.query_row("SELECT count(*) FROM rewards", [], |row| row.get(0))?;
    if rewards == 0 {
        let mut r_stmt =
            tx.prepare("INSERT INTO rewards (name, cost_coins, image_path) VALUES (?, ?, ?)")?;
        for r in &catalog.rewards {
            r_stmt.execute(params![r.name, r.cost_coins, r.image_path])?;
        }
    }

    tx.commit()?;
    info!(
        "Seeded {} fronts, {} piece types, {} rewards",
        catalog.fronts.len(),
        catalog.piece_types.len(),
        catalog.rewards.len()
    );
    Ok(())
}
