use chrono::NaiveDate;
use core_types::{BalancePoint, PricePoint};

use crate::engine::AnalyticsEngine;
use crate::error::AnalyticsError;
use crate::ledger::LedgerBuilder;
use crate::providers::{PriceSeriesProvider, SummaryProvider, TransactionSource};
use crate::ranking::{rank_addresses, AddressFilter};
use crate::report::{AddressMetrics, BenchmarkMetrics};

/// The address-analysis service: fetches an address's transaction streams
/// and the price series from the injected providers, reconstructs the daily
/// ledger, and derives performance metrics plus the buy-and-hold benchmark.
///
/// The service is stateless; one instance can serve any number of addresses,
/// and computations for different addresses are independent, so callers may
/// freely run them in parallel.
pub struct AddressAnalytics<T, P, S> {
    transactions: T,
    prices: P,
    summaries: S,
    builder: LedgerBuilder,
    engine: AnalyticsEngine,
}

impl<T, P, S> AddressAnalytics<T, P, S>
where
    T: TransactionSource,
    P: PriceSeriesProvider,
    S: SummaryProvider,
{
    pub fn new(transactions: T, prices: P, summaries: S) -> Self {
        Self {
            transactions,
            prices,
            summaries,
            builder: LedgerBuilder::new(),
            engine: AnalyticsEngine::new(),
        }
    }

    /// Full analysis of one address: ledger, metrics, and the benchmark over
    /// the same date window the ledger covers.
    pub async fn address_metrics(&self, address: &str) -> Result<AddressMetrics, AnalyticsError> {
        let inbound = self.transactions.fetch_inbound(address).await?;
        let outbound = self.transactions.fetch_outbound(address).await?;
        let prices = self.prices.fetch_daily_prices(None, None).await?;

        let ledger = self.builder.build(&inbound, &outbound, &prices)?;
        let metrics = self.engine.compute(&ledger);

        // The ledger rows carry the truncated price window; the benchmark
        // holds over exactly that range.
        let window: Vec<PricePoint> = ledger
            .iter()
            .map(|row| PricePoint {
                date: row.date,
                close: row.close,
            })
            .collect();
        let benchmark = self.engine.compute_benchmark(&window);

        tracing::info!(
            address,
            profit_pct = metrics.profit_pct,
            sharpe = metrics.sharpe_ratio,
            drawdown = metrics.drawdown,
            "calculated address metrics"
        );

        Ok(AddressMetrics {
            address: address.to_string(),
            profit_pct: metrics.profit_pct,
            sharpe_ratio: metrics.sharpe_ratio,
            drawdown: metrics.drawdown,
            exposure: metrics.exposure,
            count_days_in_market: metrics.count_days_in_market,
            benchmark_profit: benchmark.profit_pct,
            benchmark_sharpe: benchmark.sharpe,
            benchmark_drawdown: benchmark.drawdown,
            ledger,
        })
    }

    /// Day-by-day asset balance history for one address. Shares the ledger
    /// reconstruction with [`Self::address_metrics`], including the
    /// empty-outbound precondition.
    pub async fn address_balance(&self, address: &str) -> Result<Vec<BalancePoint>, AnalyticsError> {
        let inbound = self.transactions.fetch_inbound(address).await?;
        let outbound = self.transactions.fetch_outbound(address).await?;
        let prices = self.prices.fetch_daily_prices(None, None).await?;

        let ledger = self.builder.build(&inbound, &outbound, &prices)?;

        tracing::info!(address, days = ledger.len(), "calculated address balance history");

        Ok(ledger
            .into_iter()
            .map(|row| BalancePoint {
                date: row.date,
                cum_asset: row.cum_asset,
            })
            .collect())
    }

    /// Buy-and-hold benchmark over the requested price range (the whole
    /// available series when no bounds are given).
    pub async fn benchmark(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<BenchmarkMetrics, AnalyticsError> {
        let prices = self.prices.fetch_daily_prices(start, end).await?;
        Ok(self.engine.compute_benchmark(&prices))
    }

    /// Addresses from the daily summary table passing `filter`, ordered by
    /// realized profit descending.
    pub async fn top_addresses(
        &self,
        date: NaiveDate,
        filter: &AddressFilter,
    ) -> Result<Vec<String>, AnalyticsError> {
        let rows = self.summaries.fetch_daily_summary(date).await?;
        let ranked = rank_addresses(rows, filter);
        tracing::info!(%date, matched = ranked.len(), "ranked addresses by realized profit");
        Ok(ranked)
    }
}
