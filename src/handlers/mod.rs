// src/handlers/mod.rs

pub mod admin;
pub mod assessment;
pub mod auth;
pub mod billing;
pub mod chat;
pub mod results;
