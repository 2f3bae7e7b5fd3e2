// src/utils/mod.rs

pub mod captcha;
pub mod html;
