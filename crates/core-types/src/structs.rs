use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Number of smallest asset units per whole coin (satoshis per BTC).
pub const ASSET_SCALE: f64 = 100_000_000.0;

/// A single raw transaction touching an address.
///
/// Records arrive in two disjoint streams per address: *inbound* (the address
/// gained the asset) and *outbound* (the address gave the asset up and
/// received a USD-denominated settlement). The record itself is identical in
/// both streams; the stream it came from determines how the ledger builder
/// signs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct TransactionRecord {
    /// Transaction timestamp (UTC). Truncated to a calendar date during
    /// ledger construction.
    pub timestamp: DateTime<Utc>,
    /// The address the record belongs to.
    pub address: String,
    /// Signed asset movement in smallest units (satoshis).
    pub asset_amount: i64,
    /// USD-equivalent amount. Absent values contribute zero.
    pub usd_amount: Option<f64>,
}

/// One day of the reference asset's daily closing price series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PricePoint {
    pub date: NaiveDate,
    /// Closing price in USD, strictly positive.
    pub close: f64,
}

/// One day of an address's reconstructed asset balance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalancePoint {
    pub date: NaiveDate,
    /// Cumulative asset position in smallest units at end of day.
    pub cum_asset: i64,
}

/// A precomputed per-address daily summary used by the ranking endpoint.
///
/// These aggregates are produced by an upstream batch job, not reconstructed
/// by this system; the ranking logic only filters and orders them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AddressSummaryRow {
    pub address: String,
    /// Realized profit for the address as of the summary date, in USD.
    pub realized_profit: f64,
    /// Largest asset position ever held, in smallest units.
    pub peak_holdings: i64,
    /// Current asset position, in smallest units.
    pub current_holdings: i64,
    /// Number of outbound transactions observed for the address.
    pub outbound_count: i64,
    /// Timestamp of the first inbound transaction.
    pub first_inbound: DateTime<Utc>,
}
