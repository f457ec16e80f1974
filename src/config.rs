//! Process configuration, loaded once from the environment.
//!
//! All keys are read with the `DOORMAN_` prefix (a `.env` file is honored
//! via dotenvy before the first access). `CONFIG` is resolved lazily so the
//! binary and the test suite can share the same defaults.

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// SQLite connection string, e.g. `sqlite:doorman.sqlite`.
    pub database_url: String,
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Symmetric signing key for bearer tokens. Required at startup and
    /// must be at least 32 bytes; never regenerated at runtime.
    pub token_secret: String,
    /// Token lifetime in days.
    pub token_ttl_days: i64,
    /// Default tracing filter when RUST_LOG is not set.
    pub loglevel: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:doorman.sqlite".to_string(),
            bind_addr: "0.0.0.0:8000".to_string(),
            token_secret: String::new(),
            token_ttl_days: 30,
            loglevel: "info".to_string(),
        }
    }
}

pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Figment::from(Serialized::defaults(Config::default()))
        .merge(Env::prefixed("DOORMAN_"))
        .extract()
        .expect("FATAL: invalid DOORMAN_* environment configuration")
});
