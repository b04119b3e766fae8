use core_types::PricePoint;

use crate::ledger::DAYS_IN_MARKET_THRESHOLD;
use crate::report::{BenchmarkMetrics, DailyLedgerRow, LedgerMetrics};

/// A stateless calculator for deriving performance metrics from a
/// reconstructed ledger, and buy-and-hold benchmark metrics from a raw
/// price series.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the return-based metrics for one address ledger.
    ///
    /// Profit is log-compounded: summing log returns and exponentiating once
    /// avoids floating-point drift over long series and degrades to exactly
    /// -100% on a total wipeout. An undefined Sharpe (fewer than two return
    /// points, or zero variance) is reported as NaN rather than fabricated
    /// as zero; "insufficient data" is a meaningful answer here.
    pub fn compute(&self, ledger: &[DailyLedgerRow]) -> LedgerMetrics {
        let returns: Vec<f64> = ledger.iter().filter_map(|r| r.period_return).collect();
        let log_sum: f64 = ledger.iter().filter_map(|r| r.log_return).sum();

        let exposure = if ledger.is_empty() {
            0.0
        } else {
            ledger.iter().map(|r| r.exposure_fraction).sum::<f64>() / ledger.len() as f64
        };

        LedgerMetrics {
            profit_pct: log_sum.exp() - 1.0,
            sharpe_ratio: sharpe(&returns),
            drawdown: max_drawdown(&returns),
            exposure,
            count_days_in_market: ledger
                .iter()
                .filter(|r| r.cum_asset > DAYS_IN_MARKET_THRESHOLD)
                .count(),
        }
    }

    /// Computes the same risk/return metrics for a naive buy-and-hold of the
    /// reference asset over the supplied price range, treating the raw price
    /// series itself as the portfolio value.
    ///
    /// Benchmark profit is simple, not log-compounded: a pure price series
    /// has no realized-transaction discontinuities to protect against.
    pub fn compute_benchmark(&self, prices: &[PricePoint]) -> BenchmarkMetrics {
        let returns: Vec<f64> = prices
            .windows(2)
            .map(|w| w[1].close / w[0].close - 1.0)
            .collect();

        let profit_pct = match (prices.first(), prices.last()) {
            (Some(first), Some(last)) => last.close / first.close - 1.0,
            _ => 0.0,
        };

        BenchmarkMetrics {
            sharpe: sharpe(&returns),
            drawdown: max_drawdown(&returns),
            profit_pct,
        }
    }
}

/// Daily Sharpe ratio with the risk-free rate fixed at zero: mean return
/// over sample standard deviation, no annualization. NaN when the series is
/// too short or has no variance.
fn sharpe(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return f64::NAN;
    }
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean) * (r - mean)).sum::<f64>() / (n - 1.0);
    if variance == 0.0 {
        return f64::NAN;
    }
    mean / variance.sqrt()
}

/// Maximum peak-to-trough fractional decline of the cumulative-return curve,
/// as a non-positive fraction (0 for a series that never declines).
fn max_drawdown(returns: &[f64]) -> f64 {
    let mut cumulative = 1.0;
    let mut peak = 1.0;
    let mut max_dd: f64 = 0.0;
    for r in returns {
        cumulative *= 1.0 + r;
        if cumulative > peak {
            peak = cumulative;
        }
        let dd = cumulative / peak - 1.0;
        if dd < max_dd {
            max_dd = dd;
        }
    }
    max_dd
}
