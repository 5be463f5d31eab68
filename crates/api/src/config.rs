//! Runtime configuration, read once from the environment at startup.

use std::net::SocketAddr;
use std::str::FromStr;

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("DATABASE_URL must be set when USE_PERSISTENT_STORES=true")]
    MissingDatabaseUrl,
}

/// Where users and courses live.
#[derive(Clone, PartialEq, Eq)]
pub enum Persistence {
    /// Process-local store; contents vanish on restart (dev/test).
    InMemory,
    Postgres {
        database_url: String,
        max_connections: u32,
        run_migrations: bool,
    },
}

impl core::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Persistence::InMemory => f.write_str("InMemory"),
            Persistence::Postgres {
                max_connections,
                run_migrations,
                ..
            } => f
                .debug_struct("Postgres")
                .field("database_url", &"<redacted>")
                .field("max_connections", max_connections)
                .field("run_migrations", run_migrations)
                .finish(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub persistence: Persistence,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (the environment in production, a map in tests).
    ///
    /// Unparseable values fall back to their defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let default_addr = SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT));
        let bind_addr = parse_or(&lookup, "BIND_ADDR", default_addr);

        let use_persistent = parse_or(&lookup, "USE_PERSISTENT_STORES", false);
        let persistence = if use_persistent {
            let database_url = lookup("DATABASE_URL")
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::MissingDatabaseUrl)?;
            Persistence::Postgres {
                database_url,
                max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS),
                run_migrations: parse_or(&lookup, "RUN_MIGRATIONS", true),
            }
        } else {
            Persistence::InMemory
        };

        Ok(Self {
            bind_addr,
            persistence,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + core::fmt::Debug,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, ?default, "unparseable configuration value; using default");
            default
        }),
    }
}
