use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One calendar-date row of an address's reconstructed ledger.
///
/// Rows are produced by `LedgerBuilder::build` in strict ascending date
/// order, one per date in the (truncated) price series, and are frozen once
/// returns have been computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLedgerRow {
    pub date: NaiveDate,
    /// Closing price of the reference asset that day.
    pub close: f64,
    /// Net asset movement that day, smallest units, post-correction.
    pub delta_asset: i64,
    /// Net USD movement that day, post-correction.
    pub delta_usd: f64,
    /// Running asset position. Never negative after correction.
    pub cum_asset: i64,
    /// Running cash position.
    pub cum_usd: f64,
    /// cum_usd + cum_asset * close / ASSET_SCALE.
    pub portfolio_value_usd: f64,
    /// Fractional day-over-day change of the offset portfolio value.
    /// `None` on the first row, where no prior day exists.
    pub period_return: Option<f64>,
    /// ln(1 + period_return). `None` on the first row.
    pub log_return: Option<f64>,
    /// Fraction of the peak-ever position held at end of day.
    pub exposure_fraction: f64,
}

/// Return-based metrics derived from one address ledger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LedgerMetrics {
    /// exp(sum of log returns) - 1.
    pub profit_pct: f64,
    /// Daily mean return over sample standard deviation, risk-free rate 0.
    /// NaN when the return series has fewer than two points or no variance.
    pub sharpe_ratio: f64,
    /// Maximum peak-to-trough decline of the cumulative return curve,
    /// expressed as a non-positive fraction.
    pub drawdown: f64,
    /// Mean exposure fraction across all ledger rows.
    pub exposure: f64,
    /// Rows where the position exceeded one whole asset unit.
    pub count_days_in_market: usize,
}

/// Buy-and-hold metrics for the reference asset over a date range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkMetrics {
    pub sharpe: f64,
    pub drawdown: f64,
    pub profit_pct: f64,
}

/// The full result of analyzing one address: its own metrics, the
/// buy-and-hold benchmark over the same date range, and the underlying
/// day-by-day ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressMetrics {
    pub address: String,
    pub profit_pct: f64,
    pub sharpe_ratio: f64,
    pub drawdown: f64,
    pub exposure: f64,
    pub count_days_in_market: usize,
    pub benchmark_profit: f64,
    pub benchmark_sharpe: f64,
    pub benchmark_drawdown: f64,
    pub ledger: Vec<DailyLedgerRow>,
}
