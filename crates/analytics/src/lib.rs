//! # Chainfolio Analytics Engine
//!
//! This crate reconstructs per-address daily ledgers from raw transaction
//! streams and derives financial performance metrics from them. It acts as
//! the "unbiased judge" of an address's trading history.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   external systems. It depends only on `core-types` (Layer 0); databases
//!   and other data sources reach it exclusively through the provider traits
//!   in [`providers`].
//! - **Stateless Calculation:** `LedgerBuilder` and `AnalyticsEngine` are
//!   stateless calculators. They take fully-materialized input series and
//!   produce result structs, which makes them deterministic and easy to test.
//!   The [`service::AddressAnalytics`] orchestrator is likewise stateless;
//!   its collaborators are injected per construction site, never held in a
//!   process-wide singleton.
//!
//! ## Public API
//!
//! - `LedgerBuilder`: merges inbound/outbound transactions with a price
//!   series into a daily cash/position ledger.
//! - `AnalyticsEngine`: computes return-based metrics over a ledger and the
//!   buy-and-hold benchmark over a price series.
//! - `AddressAnalytics`: the dependency-injected service tying fetch,
//!   reconstruction, and metrics together.
//! - `AddressFilter` / `rank_addresses`: the summary-table ranking endpoint.
//! - `AnalyticsError`: the specific error types that can be returned from
//!   this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod ledger;
pub mod providers;
pub mod ranking;
pub mod report;
pub mod service;

// Re-export the key components to create a clean, public-facing API.
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use ledger::LedgerBuilder;
pub use providers::{MemorySource, PriceSeriesProvider, SummaryProvider, TransactionSource};
pub use ranking::{rank_addresses, AddressFilter};
pub use report::{AddressMetrics, BenchmarkMetrics, DailyLedgerRow, LedgerMetrics};
pub use service::AddressAnalytics;
