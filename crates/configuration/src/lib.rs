//! # Chainfolio Configuration
//!
//! Typed application settings, loaded through the `config` crate from an
//! optional `config.toml` plus `CHAINFOLIO_*` environment overrides. Every
//! knob has a sensible default, so a bare environment still produces a
//! usable configuration.

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{DatabaseSettings, Settings};

/// Loads the application configuration.
///
/// Sources, in ascending precedence: built-in defaults, a `config.toml`
/// file in the working directory (optional), then environment variables of
/// the form `CHAINFOLIO_DATABASE__MAX_CONNECTIONS`.
pub fn load_settings() -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .set_default("database.max_connections", 10u32)?
        .set_default("database.acquire_timeout_secs", 5u64)?
        .add_source(config::File::with_name("config").required(false))
        .add_source(config::Environment::with_prefix("CHAINFOLIO").separator("__"))
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?;

    Ok(settings)
}
