pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod observability;
pub mod scenario;
pub mod state;
pub mod store;
