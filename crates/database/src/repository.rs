use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::PgPool;

use analytics::{PriceSeriesProvider, SummaryProvider, TransactionSource};
use core_types::{AddressSummaryRow, PricePoint, TransactionRecord};

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic,
/// and implements the analytics crate's provider traits so the engine never
/// sees a connection pool.
///
/// Queries are runtime-checked (`sqlx::query_as` without the compile-time
/// macros) so the crate builds without a live database.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_transactions(
        &self,
        table: &str,
        address: &str,
    ) -> Result<Vec<TransactionRecord>, sqlx::Error> {
        // Table name comes from the two fixed call sites below, never from
        // user input.
        let query = format!(
            r#"
            SELECT t_time AS timestamp, address, t_value AS asset_amount, t_usdvalue AS usd_amount
            FROM {table}
            WHERE address = $1
            "#
        );

        let records = sqlx::query_as::<_, TransactionRecord>(&query)
            .bind(address)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(address, table, count = records.len(), "fetched transactions");
        Ok(records)
    }
}

#[async_trait]
impl TransactionSource for DbRepository {
    async fn fetch_inbound(&self, address: &str) -> anyhow::Result<Vec<TransactionRecord>> {
        Ok(self.fetch_transactions("inbound_transactions", address).await?)
    }

    async fn fetch_outbound(&self, address: &str) -> anyhow::Result<Vec<TransactionRecord>> {
        Ok(self.fetch_transactions("outbound_transactions", address).await?)
    }
}

#[async_trait]
impl PriceSeriesProvider for DbRepository {
    /// Fetches the daily quote series, ascending by date. The table carries
    /// one row per date, so the ordering contract of the provider holds by
    /// construction.
    async fn fetch_daily_prices(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> anyhow::Result<Vec<PricePoint>> {
        let prices = sqlx::query_as::<_, PricePoint>(
            r#"
            SELECT date_ AS date, close_ AS close
            FROM quotes
            WHERE date_ >= $1 AND date_ <= $2
            ORDER BY date_ ASC
            "#,
        )
        // Wide-open defaults matching the full extent of the quotes table.
        .bind(start.unwrap_or_else(|| NaiveDate::from_ymd_opt(1900, 1, 1).unwrap()))
        .bind(end.unwrap_or_else(|| NaiveDate::from_ymd_opt(9999, 12, 31).unwrap()))
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(count = prices.len(), "fetched daily quotes");
        Ok(prices)
    }
}

#[async_trait]
impl SummaryProvider for DbRepository {
    async fn fetch_daily_summary(&self, date: NaiveDate) -> anyhow::Result<Vec<AddressSummaryRow>> {
        let rows = sqlx::query_as::<_, AddressSummaryRow>(
            r#"
            SELECT address, realized_profit, peak_holdings, current_holdings,
                   outbound_count, first_inbound
            FROM address_daily_summary
            WHERE date_ = $1
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(%date, count = rows.len(), "fetched daily summary");
        Ok(rows)
    }
}
