use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
}

/// Tuning knobs for the PostgreSQL connection pool. The connection string
/// itself stays out of the config file; it is read from `DATABASE_URL`.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Upper bound on pooled connections.
    pub max_connections: u32,
    /// How long to wait for a free connection before failing, in seconds.
    pub acquire_timeout_secs: u64,
}
