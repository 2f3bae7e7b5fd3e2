// src/lib.rs

pub mod chat;
pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod models;
pub mod placeholder;
pub mod results;
pub mod routes;
pub mod session;
pub mod state;
pub mod store;
pub mod utils;

// Re-export specific items for convenience if needed
pub use routes::create_router;
