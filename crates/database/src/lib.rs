//! # Chainfolio Database Crate
//!
//! This crate acts as a high-level, application-specific interface to the
//! PostgreSQL database holding the raw on-chain data: the daily quote
//! series, the per-address inbound/outbound transaction views, and the
//! precomputed daily summary table.
//!
//! ## Architectural Principles
//!
//! - **Layer 3 Adapter:** This crate is an adapter that encapsulates all
//!   database-specific logic. It exposes the analytics crate's provider
//!   traits, hiding the underlying SQL and schema details from the engine.
//! - **Asynchronous & Pooled:** All operations are asynchronous, and it uses
//!   a connection pool (`PgPool`) for high-performance, concurrent access.
//! - **Read-Only Collaborator:** The analytics engine never writes; every
//!   query here is a fetch, and failures propagate to the caller unmodified.
//!
//! ## Public API
//!
//! - `connect`: The async function to establish the database connection pool.
//! - `run_migrations`: A utility to apply database migrations, ensuring the
//!   schema is up-to-date.
//! - `DbRepository`: The main struct that holds the connection pool and
//!   implements `TransactionSource`, `PriceSeriesProvider`, and
//!   `SummaryProvider`.
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations};
pub use error::DbError;
pub use repository::DbRepository;
