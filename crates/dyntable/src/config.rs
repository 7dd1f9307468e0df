use crate::{db::PoolConfig, Result};

use chrono::FixedOffset;
use serde::Deserialize;
use std::{str::FromStr, time::Duration};

const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";
const DEFAULT_STATEMENT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Engine configuration.
///
/// Every field has a default, so a partial document deserializes.
/// Durations are given in milliseconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// URL of the managed store.
    pub database_url: String,

    pub pool: PoolConfig,

    /// Upper bound on any single statement.
    #[serde(rename = "statement_timeout_ms", with = "millis")]
    pub statement_timeout: Duration,

    /// Upper bound on opening a connection to an external data source.
    #[serde(rename = "connect_timeout_ms", with = "millis")]
    pub connect_timeout: Duration,

    /// Offset from UTC of the reference timezone. Record timestamps are
    /// stored in this timezone and "today" is computed in it.
    pub utc_offset_seconds: i32,

    /// Environment variable holding the credential encryption key.
    pub encryption_key_env: String,
}

impl Config {
    /// Builds a configuration from `DYNTABLE_*` environment variables,
    /// falling back to the defaults for unset ones.
    pub fn from_env() -> Result<Config> {
        let mut config = Config::default();

        if let Some(url) = var("DYNTABLE_DATABASE_URL") {
            config.database_url = url;
        }

        if let Some(max_size) = parse_var("DYNTABLE_POOL_MAX_SIZE")? {
            config.pool.max_size = max_size;
        }

        if let Some(ms) = parse_var("DYNTABLE_POOL_WAIT_TIMEOUT_MS")? {
            config.pool.wait_timeout = Some(Duration::from_millis(ms));
        }

        if let Some(ms) = parse_var("DYNTABLE_STATEMENT_TIMEOUT_MS")? {
            config.statement_timeout = Duration::from_millis(ms);
        }

        if let Some(ms) = parse_var("DYNTABLE_CONNECT_TIMEOUT_MS")? {
            config.connect_timeout = Duration::from_millis(ms);
        }

        if let Some(offset) = parse_var("DYNTABLE_UTC_OFFSET_SECONDS")? {
            config.utc_offset_seconds = offset;
        }

        if let Some(name) = var("DYNTABLE_ENCRYPTION_KEY_ENV") {
            config.encryption_key_env = name;
        }

        config.validate()?;
        Ok(config)
    }

    /// Installs the process-wide credential key from the variable named by
    /// `encryption_key_env`.
    pub fn init_cipher(&self) -> Result<()> {
        crate::cipher::init_from_env_var(&self.encryption_key_env)
    }

    /// The reference timezone.
    pub fn utc_offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_seconds).ok_or_else(|| {
            crate::Error::validation(format!(
                "utc offset of {} seconds is out of range",
                self.utc_offset_seconds
            ))
        })
    }

    pub(crate) fn validate(&self) -> Result<()> {
        self.utc_offset()?;

        if self.pool.max_size == 0 {
            return Err(crate::Error::validation("pool max_size must be at least 1"));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            pool: PoolConfig::default(),
            statement_timeout: DEFAULT_STATEMENT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            utc_offset_seconds: 0,
            encryption_key_env: crate::cipher::KEY_ENV.to_string(),
        }
    }
}

fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    var(name)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|err| crate::Error::validation(format!("invalid {name}: {err}")))
        })
        .transpose()
}

pub(crate) mod millis {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }

    pub(crate) mod option {
        use serde::{Deserialize, Deserializer};
        use std::time::Duration;

        pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
        where
            D: Deserializer<'de>,
        {
            Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
        }
    }
}
