pub mod auth;
pub mod billing;
pub mod document;
pub mod generation;
