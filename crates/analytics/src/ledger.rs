use std::collections::BTreeMap;

use chrono::NaiveDate;
use core_types::{ASSET_SCALE, PricePoint, TransactionRecord};

use crate::error::AnalyticsError;
use crate::report::DailyLedgerRow;

/// Position threshold for a day to count as "in the market": one whole coin,
/// in smallest units. The comparison is strict.
pub const DAYS_IN_MARKET_THRESHOLD: i64 = 100_000_000;

/// A stateless builder that merges an address's inbound and outbound
/// transaction streams with a daily price series into a single daily-grained
/// cash/position ledger.
///
/// The two streams share one signed convention after merging: inbound asset
/// amounts are flipped (acquiring the asset is a debit against
/// available-to-spend accounting) and outbound USD amounts are flipped
/// (the USD settlement is cash entering the position).
#[derive(Debug, Default)]
pub struct LedgerBuilder {}

impl LedgerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconstructs the daily ledger for one address.
    ///
    /// The ledger is anchored at the earliest outbound date: an address with
    /// no outbound transaction has no realized activity and cannot be
    /// benchmarked against a start date, so `outbound` must be non-empty.
    /// Every priced date from that anchor onward yields exactly one row, in
    /// strict ascending date order.
    ///
    /// The whole series is materialized before returns are computed: the
    /// non-negativity correction is a forward-dependent fixup over the full
    /// cumulative series and cannot be evaluated streamingly.
    pub fn build(
        &self,
        inbound: &[TransactionRecord],
        outbound: &[TransactionRecord],
        prices: &[PricePoint],
    ) -> Result<Vec<DailyLedgerRow>, AnalyticsError> {
        let first_outbound = outbound
            .iter()
            .map(|tx| tx.timestamp.date_naive())
            .min()
            .ok_or(AnalyticsError::EmptyOutbound)?;

        let deltas = Self::daily_deltas(inbound, outbound);

        // Left-join the per-date deltas onto the truncated price series:
        // every priced date gets a row, missing deltas fill to zero. Deltas
        // on dates outside the priced window are dropped, as in any left join.
        let mut rows: Vec<DailyLedgerRow> = prices
            .iter()
            .filter(|p| p.date >= first_outbound)
            .map(|p| {
                let (delta_asset, delta_usd) = deltas.get(&p.date).copied().unwrap_or((0, 0.0));
                DailyLedgerRow {
                    date: p.date,
                    close: p.close,
                    delta_asset,
                    delta_usd,
                    cum_asset: 0,
                    cum_usd: 0.0,
                    portfolio_value_usd: 0.0,
                    period_return: None,
                    log_return: None,
                    exposure_fraction: 0.0,
                }
            })
            .collect();

        if rows.is_empty() {
            return Ok(rows);
        }

        Self::apply_correction(&mut rows);
        Self::accumulate(&mut rows);
        Self::compute_returns(&mut rows);
        Self::normalize_nans(&mut rows);

        Ok(rows)
    }

    /// Groups both streams by calendar date, summing asset and USD deltas
    /// under the merged sign convention. Order within a day is irrelevant
    /// because the sums are commutative.
    fn daily_deltas(
        inbound: &[TransactionRecord],
        outbound: &[TransactionRecord],
    ) -> BTreeMap<NaiveDate, (i64, f64)> {
        let mut deltas: BTreeMap<NaiveDate, (i64, f64)> = BTreeMap::new();
        for tx in inbound {
            let entry = deltas.entry(tx.timestamp.date_naive()).or_insert((0, 0.0));
            entry.0 -= tx.asset_amount;
            entry.1 += tx.usd_amount.unwrap_or(0.0);
        }
        for tx in outbound {
            let entry = deltas.entry(tx.timestamp.date_naive()).or_insert((0, 0.0));
            entry.0 += tx.asset_amount;
            entry.1 -= tx.usd_amount.unwrap_or(0.0);
        }
        deltas
    }

    /// Protection against spending asset the address never held: any day
    /// whose first-pass cumulative position is negative has both of its
    /// deltas treated as if they never happened. The condition is evaluated
    /// against the uncorrected running total for every row, so a zeroed day
    /// never un-marks a later one.
    fn apply_correction(rows: &mut [DailyLedgerRow]) {
        let mut cum_asset: i64 = 0;
        for row in rows.iter_mut() {
            cum_asset += row.delta_asset;
            if cum_asset < 0 {
                row.delta_asset = 0;
                row.delta_usd = 0.0;
            }
        }
    }

    /// Second cumulative pass over the corrected deltas, in ascending date
    /// order, plus the per-day portfolio valuation.
    fn accumulate(rows: &mut [DailyLedgerRow]) {
        let mut cum_asset: i64 = 0;
        let mut cum_usd: f64 = 0.0;
        for row in rows.iter_mut() {
            cum_asset += row.delta_asset;
            cum_usd += row.delta_usd;
            row.cum_asset = cum_asset;
            row.cum_usd = cum_usd;
            row.portfolio_value_usd = cum_usd + cum_asset as f64 * row.close / ASSET_SCALE;
        }
    }

    /// Period returns, log returns, and exposure fractions.
    ///
    /// Returns are taken over the portfolio value shifted by the peak capital
    /// ever committed (the largest negative cash position), which keeps the
    /// percentage change well-defined when the raw value crosses zero. The
    /// first row has no prior day and its returns stay `None`.
    fn compute_returns(rows: &mut [DailyLedgerRow]) {
        let initial_value = rows
            .iter()
            .map(|r| r.cum_usd)
            .fold(f64::INFINITY, f64::min)
            .abs();
        let max_position = rows.iter().map(|r| r.cum_asset.abs()).max().unwrap_or(0) as f64;

        let mut prev = rows[0].portfolio_value_usd + initial_value;
        for row in rows.iter_mut().skip(1) {
            let current = row.portfolio_value_usd + initial_value;
            let period_return = current / prev - 1.0;
            row.period_return = Some(period_return);
            row.log_return = Some((1.0 + period_return).ln());
            prev = current;
        }

        for row in rows.iter_mut() {
            row.exposure_fraction = row.cum_asset as f64 / max_position;
        }
    }

    /// NaN values from degenerate series (0/0 returns, a zero peak position)
    /// are normalized to zero at the boundary of ledger construction. The
    /// `None` first-row returns are left untouched; they mean "no prior day",
    /// not "not a number".
    fn normalize_nans(rows: &mut [DailyLedgerRow]) {
        for row in rows.iter_mut() {
            if row.period_return.is_some_and(f64::is_nan) {
                row.period_return = Some(0.0);
            }
            if row.log_return.is_some_and(f64::is_nan) {
                row.log_return = Some(0.0);
            }
            if row.exposure_fraction.is_nan() {
                row.exposure_fraction = 0.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    const ADDRESS: &str = "bc1qtestaddress123";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tx(y: i32, m: u32, d: u32, hour: u32, asset_amount: i64, usd: Option<f64>) -> TransactionRecord {
        TransactionRecord {
            timestamp: Utc.with_ymd_and_hms(y, m, d, hour, 0, 0).unwrap(),
            address: ADDRESS.to_string(),
            asset_amount,
            usd_amount: usd,
        }
    }

    /// Five days of quotes, 2020-01-01 through 2020-01-05.
    fn sample_prices() -> Vec<PricePoint> {
        [7000.0, 7100.0, 7200.0, 7150.0, 7300.0]
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint {
                date: date(2020, 1, 1 + i as u32),
                close,
            })
            .collect()
    }

    fn sample_inbound() -> Vec<TransactionRecord> {
        vec![
            tx(2020, 1, 2, 10, 100_000_000, Some(7100.0)),
            tx(2020, 1, 3, 11, 50_000_000, Some(3600.0)),
        ]
    }

    fn sample_outbound() -> Vec<TransactionRecord> {
        vec![
            tx(2020, 1, 4, 12, 30_000_000, Some(2145.0)),
            tx(2020, 1, 5, 13, 20_000_000, Some(1460.0)),
        ]
    }

    fn approx(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "expected {b}, got {a}");
    }

    #[test]
    fn ledger_starts_at_first_outbound_date() {
        let rows = LedgerBuilder::new()
            .build(&sample_inbound(), &sample_outbound(), &sample_prices())
            .unwrap();

        // Quotes before 2020-01-04 are cut; the earlier inbound days with
        // them.
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, date(2020, 1, 4));
        assert_eq!(rows[1].date, date(2020, 1, 5));
    }

    #[test]
    fn ledger_matches_hand_computation() {
        let rows = LedgerBuilder::new()
            .build(&sample_inbound(), &sample_outbound(), &sample_prices())
            .unwrap();

        // 2020-01-04: +0.3 BTC sold for $2145 (cash leg negated).
        assert_eq!(rows[0].cum_asset, 30_000_000);
        approx(rows[0].cum_usd, -2145.0);
        // value = -2145 + 0.3 * 7150 = 0
        approx(rows[0].portfolio_value_usd, 0.0);
        assert_eq!(rows[0].period_return, None);
        assert_eq!(rows[0].log_return, None);

        // 2020-01-05: +0.2 BTC sold for $1460.
        assert_eq!(rows[1].cum_asset, 50_000_000);
        approx(rows[1].cum_usd, -3605.0);
        // value = -3605 + 0.5 * 7300 = 45
        approx(rows[1].portfolio_value_usd, 45.0);

        // initial_value = |-3605|; return = (45 + 3605) / (0 + 3605) - 1.
        let expected = 3650.0 / 3605.0 - 1.0;
        approx(rows[1].period_return.unwrap(), expected);
        approx(rows[1].log_return.unwrap(), (1.0 + expected).ln());

        // max position 0.5 BTC.
        approx(rows[0].exposure_fraction, 0.6);
        approx(rows[1].exposure_fraction, 1.0);
    }

    #[test]
    fn shuffling_within_a_day_does_not_change_the_ledger() {
        let outbound = vec![tx(2020, 1, 2, 9, 10_000_000, Some(710.0))];
        let inbound_a = vec![
            tx(2020, 1, 3, 10, 40_000_000, Some(2880.0)),
            tx(2020, 1, 3, 15, 20_000_000, Some(1440.0)),
        ];
        let inbound_b: Vec<_> = inbound_a.iter().rev().cloned().collect();

        let builder = LedgerBuilder::new();
        let rows_a = builder.build(&inbound_a, &outbound, &sample_prices()).unwrap();
        let rows_b = builder.build(&inbound_b, &outbound, &sample_prices()).unwrap();

        assert_eq!(rows_a, rows_b);
    }

    #[test]
    fn cumulative_series_depends_on_ascending_day_order() {
        let outbound = vec![
            tx(2020, 1, 1, 9, 50_000_000, Some(3500.0)),
            tx(2020, 1, 2, 9, 20_000_000, Some(1420.0)),
        ];
        let rows = LedgerBuilder::new()
            .build(&[], &outbound, &sample_prices())
            .unwrap();

        let forward: Vec<i64> = rows.iter().map(|r| r.cum_asset).collect();

        // Accumulating the same per-day deltas in descending date order
        // yields a different series: cumulative totals are order-dependent
        // across days even though sums within a day are not.
        let mut wrong: Vec<i64> = Vec::new();
        let mut cum = 0;
        for row in rows.iter().rev() {
            cum += row.delta_asset;
            wrong.push(cum);
        }
        wrong.reverse();

        assert_eq!(forward, vec![50_000_000, 70_000_000, 70_000_000, 70_000_000, 70_000_000]);
        assert_ne!(forward, wrong);
    }

    #[test]
    fn position_never_negative_after_correction() {
        // Day 1 sells 0.1 BTC, day 2 receives 1 BTC (a debit under the
        // merged sign convention), pushing the running position to -0.9 BTC.
        let outbound = vec![tx(2020, 1, 1, 9, 10_000_000, Some(700.0))];
        let inbound = vec![tx(2020, 1, 2, 10, 100_000_000, Some(7100.0))];

        let rows = LedgerBuilder::new()
            .build(&inbound, &outbound, &sample_prices())
            .unwrap();

        assert!(rows.iter().all(|r| r.cum_asset >= 0));
        // The offending day is flattened entirely.
        assert_eq!(rows[1].delta_asset, 0);
        approx(rows[1].delta_usd, 0.0);
        // Both legs of the zeroed day are discarded, including its USD
        // inflow, and the correction cascades downstream only.
        approx(rows[1].cum_usd, rows[0].cum_usd);
        assert_eq!(rows[4].cum_asset, 10_000_000);
    }

    #[test]
    fn signed_magnitude_outbound_flattens_the_ledger() {
        // Outbound carrying a signed-magnitude (negative) asset amount: the
        // position would go negative immediately, so the day zeroes out and
        // the ledger stays flat at zero.
        let inbound = vec![tx(2020, 1, 2, 10, 100_000_000, Some(7100.0))];
        let outbound = vec![tx(2020, 1, 4, 12, -30_000_000, Some(2145.0))];

        let rows = LedgerBuilder::new()
            .build(&inbound, &outbound, &sample_prices())
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.cum_asset >= 0));
        assert!(rows.iter().all(|r| r.cum_asset == 0));
        assert!(
            rows.iter()
                .filter(|r| r.cum_asset > DAYS_IN_MARKET_THRESHOLD)
                .count()
                == 0
        );
        // Degenerate 0/0 exposure and returns normalize to zero.
        approx(rows[0].exposure_fraction, 0.0);
        approx(rows[1].exposure_fraction, 0.0);
        approx(rows[1].period_return.unwrap(), 0.0);
    }

    #[test]
    fn single_outbound_and_no_inbound_does_not_panic() {
        let outbound = vec![tx(2020, 1, 4, 12, -30_000_000, Some(2145.0))];

        let rows = LedgerBuilder::new().build(&[], &outbound, &sample_prices()).unwrap();

        assert!(rows.iter().all(|r| r.cum_asset == 0));
        assert!(rows.iter().all(|r| r.exposure_fraction == 0.0));
    }

    #[test]
    fn empty_outbound_is_a_structural_error() {
        let err = LedgerBuilder::new()
            .build(&sample_inbound(), &[], &sample_prices())
            .unwrap_err();
        assert!(matches!(err, AnalyticsError::EmptyOutbound));
    }

    #[test]
    fn missing_usd_amount_contributes_zero() {
        let outbound = vec![tx(2020, 1, 1, 9, 10_000_000, None)];
        let rows = LedgerBuilder::new().build(&[], &outbound, &sample_prices()).unwrap();

        approx(rows[0].cum_usd, 0.0);
        assert_eq!(rows[0].cum_asset, 10_000_000);
    }

    #[test]
    fn price_window_ending_before_first_outbound_yields_empty_ledger() {
        let outbound = vec![tx(2020, 2, 1, 9, 10_000_000, Some(700.0))];
        let rows = LedgerBuilder::new().build(&[], &outbound, &sample_prices()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn rebuilding_from_identical_inputs_is_deterministic() {
        let builder = LedgerBuilder::new();
        let rows_a = builder
            .build(&sample_inbound(), &sample_outbound(), &sample_prices())
            .unwrap();
        let rows_b = builder
            .build(&sample_inbound(), &sample_outbound(), &sample_prices())
            .unwrap();

        // Bitwise-identical, including every derived float.
        assert_eq!(rows_a, rows_b);
    }
}
