use crate::leave::DEFAULT_ANNUAL_LEAVE_DAYS;
use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    /// Absent means the in-memory backend is used.
    pub database_url: Option<String>,
    /// JSON array of employees loaded into the in-memory directory.
    pub employees_file: Option<String>,
    pub api_prefix: String,

    pub annual_leave_days: i64,

    // Rate limiting
    pub rate_api_per_min: u32,

    // Employee lookup cache
    pub directory_cache_capacity: u64,
    pub directory_cache_ttl_secs: u64,

    pub log_dir: String,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            server_addr: text("SERVER_ADDR", "127.0.0.1:8080"),
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            employees_file: lookup("EMPLOYEES_FILE"),
            api_prefix: text("API_PREFIX", "/api"),

            annual_leave_days: parse_or(&lookup, "ANNUAL_LEAVE_DAYS", DEFAULT_ANNUAL_LEAVE_DAYS)?,

            rate_api_per_min: parse_or(&lookup, "RATE_API_PER_MIN", 1000)?,

            directory_cache_capacity: parse_or(&lookup, "DIRECTORY_CACHE_CAPACITY", 10_000)?,
            directory_cache_ttl_secs: parse_or(&lookup, "DIRECTORY_CACHE_TTL_SECS", 3600)?, // 1h

            log_dir: text("LOG_DIR", "logs"),
            log_level: text("LOG_LEVEL", "info"),
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        None => Ok(default),
    }
}
