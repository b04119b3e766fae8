use chrono::NaiveDate;
use core_types::AddressSummaryRow;
use serde::{Deserialize, Serialize};

/// A composable set of predicates over the per-address daily summary table.
///
/// Every field is optional and independent; supplied filters combine with
/// logical AND, and an all-`None` filter is the identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressFilter {
    /// Keep addresses whose realized profit strictly exceeds this.
    pub min_realized_profit: Option<f64>,
    /// Keep addresses whose peak holdings strictly exceed this.
    pub min_peak_holdings: Option<i64>,
    /// Keep addresses still holding strictly more than this fraction of
    /// their peak position.
    pub min_current_to_peak_ratio: Option<f64>,
    /// Keep addresses with at least this many outbound transactions.
    pub min_outbound_count: Option<i64>,
    /// Keep addresses whose first inbound transaction is strictly after
    /// this date.
    pub first_inbound_after: Option<NaiveDate>,
}

impl AddressFilter {
    fn matches(&self, row: &AddressSummaryRow) -> bool {
        self.min_realized_profit
            .is_none_or(|min| row.realized_profit > min)
            && self.min_peak_holdings.is_none_or(|min| row.peak_holdings > min)
            && self
                .min_current_to_peak_ratio
                .is_none_or(|min| row.current_holdings as f64 > row.peak_holdings as f64 * min)
            && self
                .min_outbound_count
                .is_none_or(|min| row.outbound_count >= min)
            && self
                .first_inbound_after
                .is_none_or(|after| row.first_inbound.date_naive() > after)
    }
}

/// Filters the summary rows and returns the surviving addresses ordered by
/// realized profit, highest first.
pub fn rank_addresses(mut rows: Vec<AddressSummaryRow>, filter: &AddressFilter) -> Vec<String> {
    rows.retain(|row| filter.matches(row));
    rows.sort_by(|a, b| b.realized_profit.total_cmp(&a.realized_profit));
    rows.into_iter().map(|row| row.address).collect()
}
