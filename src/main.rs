// src/main.rs

use chrono::Local;
use gamify_lib::config::TrackerConfig;
use gamify_lib::{database, tracker};
use log::{error, info};
use std::process::ExitCode;

fn run(config: &TrackerConfig) -> gamify_lib::Result<()> {
    let conn = database::open_db(&config.db_path)?;
    let dashboard = tracker::get_dashboard(&conn, Local::now().date_naive())?;

    info!(
        "Level {} ({:.0} XP, {:.1}% to next), balance {:.0} coins",
        dashboard.overall.level,
        dashboard.overall.xp,
        dashboard.overall.progress_fraction * 100.0,
        dashboard.balance
    );
    println!("{}", serde_json::to_string_pretty(&dashboard)?);
    Ok(())
}

fn main() -> ExitCode {
    let config = TrackerConfig::from_env();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_filter))
        .init();

    info!("Starting Life Gamification Tracker...");
    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
