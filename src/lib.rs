// src/lib.rs

pub mod config;
pub mod constants;
pub mod database;
pub mod engine;
pub mod error;
pub mod levels;
pub mod models;
pub mod repository;
pub mod settings;
pub mod shop;
pub mod tracker;

pub use error::{Result, TrackerError};
