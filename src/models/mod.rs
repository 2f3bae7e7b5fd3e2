// src/models/mod.rs

pub mod billing;
pub mod chat;
pub mod question;
pub mod result;
pub mod user;
