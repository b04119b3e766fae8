//! # Chainfolio Core Types
//!
//! This crate defines the foundational data structures shared by every other
//! crate in the workspace.
//!
//! ## Architectural Principles
//!
//! - **Layer 0:** This crate sits at the bottom of the dependency graph. It
//!   knows nothing about databases, services, or the analytics engine; it only
//!   describes the shape of the data flowing between them.
//! - **Plain Data:** Every type here is a plain, serializable record. Raw
//!   on-chain amounts are kept in the smallest asset unit (satoshis, `i64`)
//!   and USD values in `f64`, matching the upstream data feeds.

pub mod structs;

// Re-export the core types to provide a clean public API.
pub use structs::{AddressSummaryRow, BalancePoint, PricePoint, TransactionRecord, ASSET_SCALE};
