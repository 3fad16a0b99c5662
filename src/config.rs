use std::path::PathBuf;

use sqlx::postgres::PgConnectOptions;

use crate::util::env;

pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Connection parameters for the target store, resolved once at startup and
/// passed explicitly to the loader (no process-wide state).
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
}

impl DbConfig {
    /// Resolve from the standard libpq-style env vars (with `.env` support).
    pub fn from_env() -> Self {
        Self {
            host: env::env_or("PGHOST", "localhost"),
            port: env::env_parse("PGPORT", 5432),
            dbname: env::env_or("PGDATABASE", "Gymshark_ETL"),
            user: env::env_or("PGUSER", "postgres"),
            password: env::env_opt("PGPASSWORD").unwrap_or_default(),
        }
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.dbname)
            .username(&self.user)
            .password(&self.password)
    }
}

/// Everything one pipeline run needs.
#[derive(Debug, Clone)]
pub struct EtlConfig {
    pub db: DbConfig,
    pub source_path: PathBuf,
    pub batch_size: usize,
    /// Load normalized rows as-is, skipping the quality filter.
    pub skip_clean: bool,
}
