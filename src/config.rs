use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{AppError, AppResult};

pub const DEFAULT_FARE_API_URL: &str = "https://taxifare.lewagon.ai/predict";

#[derive(Clone, Debug)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub fare_api_url: String,
    pub fare_api_timeout: Duration,
    pub rate_limit_replenish_secs: u64,
    pub rate_limit_burst: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 3000,
            fare_api_url: DEFAULT_FARE_API_URL.to_string(),
            fare_api_timeout: Duration::from_secs(10),
            rate_limit_replenish_secs: 1,
            rate_limit_burst: 30,
        }
    }
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source,
    /// falling back to the defaults for anything unset.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let fare_api_timeout_secs: u64 = parse_var(
            &lookup,
            "FARE_API_TIMEOUT_SECS",
            defaults.fare_api_timeout.as_secs(),
        )?;
        if fare_api_timeout_secs == 0 {
            return Err(AppError::Config(
                "FARE_API_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            server_host: lookup("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse_var(&lookup, "SERVER_PORT", defaults.server_port)?,
            fare_api_url: lookup("FARE_API_URL").unwrap_or(defaults.fare_api_url),
            fare_api_timeout: Duration::from_secs(fare_api_timeout_secs),
            rate_limit_replenish_secs: parse_var(
                &lookup,
                "RATE_LIMIT_REPLENISH_SECS",
                defaults.rate_limit_replenish_secs,
            )?,
            rate_limit_burst: parse_var(&lookup, "RATE_LIMIT_BURST", defaults.rate_limit_burst)?,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> AppResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} must be a number, got {:?}", key, raw))),
        None => Ok(default),
    }
}
