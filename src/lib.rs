// src/lib.rs

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod router;
pub mod services;

pub use config::{AppConfig, AppState};
pub use router::build_router;
