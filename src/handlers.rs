pub mod auth;
pub mod billing;
pub mod dashboard;
pub mod documents;
pub mod export;
pub mod fields;
pub mod generate;
pub mod health;
pub mod stripe;
