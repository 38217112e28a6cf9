use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use crate::services::prices::SelectionStrategy;
use crate::services::resilience::{
    DEFAULT_FAILURE_THRESHOLD, DEFAULT_MAX_CONCURRENT_CALLS, DEFAULT_OPEN_DURATION,
    ResilienceConfig,
};

/// Runtime settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub database_url: String,
    pub address: String,
    pub port: u16,
    pub selection: SelectionStrategy,
    pub resilience: ResilienceConfig,
}

impl ServerConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_concurrent_calls: usize = parse_or(
            &var,
            "LOOKUP_MAX_CONCURRENT",
            DEFAULT_MAX_CONCURRENT_CALLS,
        );
        let open_seconds: u64 = parse_or(
            &var,
            "BREAKER_OPEN_SECONDS",
            DEFAULT_OPEN_DURATION.as_secs(),
        );

        Self {
            database_url: var("DATABASE_URL").unwrap_or("app.db".to_string()),
            address: var("ADDRESS").unwrap_or("127.0.0.1".to_string()),
            port: parse_or(&var, "PORT", 8080),
            selection: parse_or(&var, "PRICE_SELECTION", SelectionStrategy::default()),
            resilience: ResilienceConfig {
                max_concurrent_calls: max_concurrent_calls.max(1),
                failure_threshold: parse_or(
                    &var,
                    "BREAKER_FAILURE_THRESHOLD",
                    DEFAULT_FAILURE_THRESHOLD,
                ),
                open_duration: Duration::from_secs(open_seconds),
            },
        }
    }
}

fn parse_or<F, T>(var: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match var(key) {
        Some(raw) => match raw.parse::<T>() {
            Ok(value) => value,
            Err(err) => {
                log::warn!("Ignoring invalid {key}={raw}: {err}");
                default
            }
        },
        None => default,
    }
}
