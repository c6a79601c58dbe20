//! Runtime configuration from the environment.

use std::{env, fmt::Display, str::FromStr};
use tracing::{info, warn};

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_FALLBACK_ASSET: &str = "https://media.istockphoto.com/id/1681388313/vector/cute-baby-panda-cartoon-on-white-background.jpg?s=612x612&w=0&k=20&c=qFrzn8TqONiSfwevvkYhys1z80NAmDfw3o-HRdwX0d8=";
pub const DEFAULT_TOP_N: usize = 3;
pub const DEFAULT_STORE_BUFFER: usize = 32;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the matching service (`MATCH_API_URL`).
    pub api_url: String,
    /// Image shown for candidates without a resolved picture (`MATCH_FALLBACK_ASSET`).
    pub fallback_asset: String,
    /// How many filtered candidates count as top matches (`MATCH_TOP_N`).
    pub top_n: usize,
    /// Store mailbox capacity (`MATCH_STORE_BUFFER`).
    pub store_buffer: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            fallback_asset: DEFAULT_FALLBACK_ASSET.to_string(),
            top_n: DEFAULT_TOP_N,
            store_buffer: DEFAULT_STORE_BUFFER,
        }
    }
}

impl Config {
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from `lookup`; unset or invalid keys take their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let store_buffer = try_load(&lookup, "MATCH_STORE_BUFFER", defaults.store_buffer);
        Self {
            api_url: try_load(&lookup, "MATCH_API_URL", defaults.api_url),
            fallback_asset: try_load(&lookup, "MATCH_FALLBACK_ASSET", defaults.fallback_asset),
            top_n: try_load(&lookup, "MATCH_TOP_N", defaults.top_n),
            // mpsc::channel panics on zero capacity
            store_buffer: if store_buffer == 0 { DEFAULT_STORE_BUFFER } else { store_buffer },
        }
    }
}

fn try_load<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Some(raw) = lookup(key) else {
        info!("{key} not set, using default: {default}");
        return default;
    };
    raw.trim().parse().unwrap_or_else(|e| {
        warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
        default
    })
}
