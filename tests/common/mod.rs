// tests/common/mod.rs
#![allow(dead_code)]

use chrono::NaiveDate;
use gamify_lib::database;
use gamify_lib::models::{Difficulty, TaskLog, TaskStatus, Tier};
use rusqlite::Connection;

/// In-memory database with schema and seed catalog.
pub fn seeded_db() -> Connection {
    let conn = Connection::open_in_memory().expect("open in-memory db");
    database::init_db(&conn).expect("init db");
    conn
}

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, d).expect("valid date")
}

pub fn task(front: &str, piece: &str, tier: Tier, difficulty: u8, status: TaskStatus) -> TaskLog {
    TaskLog {
        date: day(16),
        front_code: front.to_string(),
        tier,
        piece_type: piece.to_string(),
        note: String::new(),
        minutes: 0,
        difficulty: Difficulty::new(difficulty).expect("valid difficulty"),
        status,
    }
}

/// A Done Daily task outside the catalog: its base XP comes from the minutes.
pub fn adhoc(front: &str, minutes: i64) -> TaskLog {
    TaskLog {
        minutes,
        ..task(front, "AdHoc", Tier::Daily, 2, TaskStatus::Done)
    }
}

pub fn count(conn: &Connection, sql: &str) -> i64 {
    conn.query_row(sql, [], |row| row.get(0)).expect("count query")
}
