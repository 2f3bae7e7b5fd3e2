// src/config.rs

use std::env;

use dotenvy::dotenv;
use url::Url;

#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the JSON store file.
    pub store_path: String,

    /// Listening address, e.g. "0.0.0.0:3000".
    pub bind_addr: String,

    /// Base URL of the placeholder REST API behind the admin panel.
    pub placeholder_api_base: Url,

    pub rust_log: String,

    /// Whether the background chat simulator runs.
    pub chat_simulator: bool,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let store_path =
            env::var("SKILLEND_STORE").unwrap_or_else(|_| "data/store.json".to_string());

        let bind_addr = env::var("SKILLEND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let placeholder_api_base = env::var("PLACEHOLDER_API_BASE")
            .unwrap_or_else(|_| "https://jsonplaceholder.typicode.com".to_string())
            .parse()
            .expect("PLACEHOLDER_API_BASE must be a valid URL");

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let chat_simulator = env::var("CHAT_SIMULATOR")
            .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
            .unwrap_or(true);

        Self {
            store_path,
            bind_addr,
            placeholder_api_base,
            rust_log,
            chat_simulator,
        }
    }
}
