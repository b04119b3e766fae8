//! Data-provider abstractions for the analytics service.
//!
//! The engine is purely functional over fully-materialized inputs; these
//! traits describe the read-only collaborators that supply those inputs.
//! Fetches are assumed to complete before any computation begins, and
//! failures propagate unmodified — retry and backoff, where desired, belong
//! to the implementations, never to the engine.

use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::{AddressSummaryRow, PricePoint, TransactionRecord};

/// Supplies the two disjoint per-address transaction streams.
///
/// Implementations must return records with a well-defined UTC timestamp and
/// a present `asset_amount`; `usd_amount` may be absent and is treated as a
/// zero contribution.
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// All transactions in which the address gained the asset.
    async fn fetch_inbound(&self, address: &str) -> anyhow::Result<Vec<TransactionRecord>>;

    /// All transactions in which the address gave the asset up for USD.
    async fn fetch_outbound(&self, address: &str) -> anyhow::Result<Vec<TransactionRecord>>;
}

/// Supplies the reference asset's daily closing price series.
///
/// The returned series must be ascending by date with no duplicate dates and
/// no gaps over the requested range; the engine does not fill gaps.
#[async_trait]
pub trait PriceSeriesProvider: Send + Sync {
    async fn fetch_daily_prices(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> anyhow::Result<Vec<PricePoint>>;
}

/// Supplies the precomputed per-address daily summary table backing the
/// ranking endpoint.
#[async_trait]
pub trait SummaryProvider: Send + Sync {
    async fn fetch_daily_summary(&self, date: NaiveDate) -> anyhow::Result<Vec<AddressSummaryRow>>;
}

/// An in-memory provider backed by predefined data, for tests and local
/// experiments. Implements all three provider traits.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    inbound: Vec<TransactionRecord>,
    outbound: Vec<TransactionRecord>,
    prices: Vec<PricePoint>,
    summaries: Vec<(NaiveDate, AddressSummaryRow)>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add inbound transactions.
    pub fn with_inbound(mut self, records: Vec<TransactionRecord>) -> Self {
        self.inbound.extend(records);
        self
    }

    /// Add outbound transactions.
    pub fn with_outbound(mut self, records: Vec<TransactionRecord>) -> Self {
        self.outbound.extend(records);
        self
    }

    /// Set the daily price series.
    pub fn with_prices(mut self, prices: Vec<PricePoint>) -> Self {
        self.prices.extend(prices);
        self
    }

    /// Add a summary row for a given date.
    pub fn with_summary(mut self, date: NaiveDate, row: AddressSummaryRow) -> Self {
        self.summaries.push((date, row));
        self
    }
}

#[async_trait]
impl TransactionSource for MemorySource {
    async fn fetch_inbound(&self, address: &str) -> anyhow::Result<Vec<TransactionRecord>> {
        Ok(self
            .inbound
            .iter()
            .filter(|tx| tx.address == address)
            .cloned()
            .collect())
    }

    async fn fetch_outbound(&self, address: &str) -> anyhow::Result<Vec<TransactionRecord>> {
        Ok(self
            .outbound
            .iter()
            .filter(|tx| tx.address == address)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PriceSeriesProvider for MemorySource {
    async fn fetch_daily_prices(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> anyhow::Result<Vec<PricePoint>> {
        Ok(self
            .prices
            .iter()
            .filter(|p| start.is_none_or(|s| p.date >= s) && end.is_none_or(|e| p.date <= e))
            .copied()
            .collect())
    }
}

#[async_trait]
impl SummaryProvider for MemorySource {
    async fn fetch_daily_summary(&self, date: NaiveDate) -> anyhow::Result<Vec<AddressSummaryRow>> {
        Ok(self
            .summaries
            .iter()
            .filter(|(d, _)| *d == date)
            .map(|(_, row)| row.clone())
            .collect())
    }
}
