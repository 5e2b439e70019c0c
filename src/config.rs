use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::core::moderation::{FilterConfig, OffensivePolicy};

/// Which key-value backend the site persists to.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageBackend {
    /// Process memory only (default, good for local development)
    Memory,
    /// The JSON flat file alone
    File,
    /// Managed Redis-over-REST store, falling back to the flat file
    Rest { url: String, token: String },
    /// Local SQLite database, falling back to the flat file
    Sqlite { path: String },
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Flat file used as the fallback (or only) store
    pub fallback_file: PathBuf,
}

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded at startup via dotenv; every value has a default
/// except the REST credentials, which are only required for that backend.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub port: u16,
    pub storage: StorageConfig,
    /// Guestbook entries and newsletter signups per client per hour
    pub submissions_per_hour: u32,
    /// Whiteboard strokes per client per hour
    pub whiteboard_strokes_per_hour: u32,
    pub max_tracked_clients: usize,
    pub sweep_interval: Duration,
    pub offensive_policy: OffensivePolicy,
    pub filter: FilterConfig,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from any name -> value lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let backend = match get("STORAGE_BACKEND")
            .unwrap_or_else(|| "memory".to_string())
            .trim()
            .to_lowercase()
            .as_str()
        {
            "memory" => StorageBackend::Memory,
            "file" => StorageBackend::File,
            "sqlite" => StorageBackend::Sqlite {
                path: get("SQLITE_PATH").unwrap_or_else(|| "data/site.db".to_string()),
            },
            "rest" => {
                let (Some(url), Some(token)) = (get("KV_REST_API_URL"), get("KV_REST_API_TOKEN"))
                else {
                    bail!(
                        "STORAGE_BACKEND=rest needs KV_REST_API_URL and KV_REST_API_TOKEN.\n\
                         Add them to your .env file."
                    );
                };
                StorageBackend::Rest { url, token }
            }
            other => bail!("Unknown STORAGE_BACKEND '{}' (expected memory, file, sqlite or rest)", other),
        };

        let offensive_policy = match get("OFFENSIVE_POLICY") {
            Some(value) => value.parse::<OffensivePolicy>()?,
            None => OffensivePolicy::default(),
        };

        Ok(Self {
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&get, "PORT", 3000)?,
            storage: StorageConfig {
                backend,
                fallback_file: get("FALLBACK_DATA_FILE")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("data/site_data.json")),
            },
            submissions_per_hour: parse_or(&get, "SUBMISSIONS_PER_HOUR", 5)?,
            whiteboard_strokes_per_hour: parse_or(&get, "WHITEBOARD_STROKES_PER_HOUR", 300)?,
            max_tracked_clients: parse_or(&get, "MAX_TRACKED_CLIENTS", 10_000)?,
            sweep_interval: Duration::from_secs(parse_or(&get, "RATE_LIMIT_SWEEP_SECS", 300)?),
            offensive_policy,
            filter: FilterConfig {
                extra_terms: split_list(get("MODERATION_EXTRA_TERMS")),
                allowed_domains: split_list(get("ALLOWED_LINK_DOMAINS")),
                ..FilterConfig::default()
            },
        })
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(name) {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: '{}'", name, value)),
        None => Ok(default),
    }
}

fn split_list(value: Option<String>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}
