// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Aggregations behind every dashboard section. All functions are pure and
//! total over validated records: an empty slice gives empty or zero output.
//!
//! Group ordering is never left to a hash map. Groups keep first-appearance
//! order until an explicit sort, and every sort names its tie-break.

use crate::geo::GeoTable;
use crate::models::{
    CityShare, KpiSummary, MonthlySeasonality, MonthlyTotal, PurchaseRecord, RepurchaseRow,
    ShareKey, ShareMetric, ShareRow, YearlyTotal, month_abbrev,
};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Groups in order of first appearance.
struct Groups<'a, V> {
    index: HashMap<&'a str, usize>,
    entries: Vec<(&'a str, V)>,
}

impl<'a, V: Default> Groups<'a, V> {
    fn new() -> Self {
        Groups {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    fn entry(&mut self, key: &'a str) -> &mut V {
        let next = self.entries.len();
        let i = *self.index.entry(key).or_insert(next);
        if i == next {
            self.entries.push((key, V::default()));
        }
        &mut self.entries[i].1
    }
}

/// Money sums saturate at `Decimal::MAX` instead of panicking.
fn total<'a>(amounts: impl IntoIterator<Item = &'a Decimal>) -> Decimal {
    amounts
        .into_iter()
        .fold(Decimal::ZERO, |acc, d| acc.saturating_add(*d))
}

pub fn kpi_summary(records: &[PurchaseRecord], target_year: i32) -> KpiSummary {
    let total_spent = total(records.iter().map(|r| &r.total_owed));
    let target = total(
        records
            .iter()
            .filter(|r| r.year == target_year)
            .map(|r| &r.total_owed),
    );
    KpiSummary {
        total_spending: total_spent.round_dp(0),
        total_items: records.iter().map(|r| u64::from(r.quantity)).sum(),
        record_count: records.len(),
        target_year,
        target_year_spending: target.round_dp(0),
    }
}

/// Percent change from `prev` to `cur`; undefined when `prev` is zero or the
/// change does not fit in a `Decimal`.
pub fn pct_change(prev: Decimal, cur: Decimal) -> Option<Decimal> {
    if prev.is_zero() {
        return None;
    }
    cur.checked_sub(prev)?.checked_div(prev)?.checked_mul(HUNDRED)
}

pub fn yearly_trend(records: &[PurchaseRecord]) -> Vec<YearlyTotal> {
    let mut by_year: BTreeMap<i32, (Decimal, u64)> = BTreeMap::new();
    for r in records {
        let e = by_year.entry(r.year).or_default();
        e.0 = e.0.saturating_add(r.total_owed);
        e.1 += u64::from(r.quantity);
    }

    let mut out: Vec<YearlyTotal> = Vec::with_capacity(by_year.len());
    let mut prev: Option<Decimal> = None;
    for (year, (spent, items)) in by_year {
        let total_spending = spent.round_dp(2);
        let yoy_pct = prev.and_then(|p| pct_change(p, total_spending));
        out.push(YearlyTotal {
            year,
            total_spending,
            total_items: items,
            yoy_pct,
        });
        prev = Some(total_spending);
    }
    out
}

/// `part / whole` as a percentage rounded to one decimal; zero when `whole` is.
pub fn percentage_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    part.checked_div(whole)
        .and_then(|f| f.checked_mul(HUNDRED))
        .map(|p| p.round_dp(1))
        .unwrap_or(Decimal::ZERO)
}

pub fn share_of_total(
    records: &[PurchaseRecord],
    key: ShareKey,
    metric: ShareMetric,
) -> Vec<ShareRow> {
    let mut groups: Groups<'_, Decimal> = Groups::new();
    for r in records {
        let v = groups.entry(key.of(r));
        *v = v.saturating_add(match metric {
            ShareMetric::Spend => r.total_owed,
            ShareMetric::Orders => Decimal::ONE,
        });
    }

    let grand = total(groups.entries.iter().map(|(_, v)| v));
    let mut rows: Vec<ShareRow> = groups
        .entries
        .into_iter()
        .map(|(k, value)| ShareRow {
            key: k.to_string(),
            value,
            percentage: percentage_of(value, grand),
        })
        .collect();
    // stable: equal values keep first-appearance order
    rows.sort_by(|a, b| b.value.cmp(&a.value));
    rows
}

pub fn city_shares(records: &[PurchaseRecord], geo: &GeoTable) -> Vec<CityShare> {
    share_of_total(records, ShareKey::City, ShareMetric::Spend)
        .into_iter()
        .map(|share| {
            let coords = match geo.lookup(&share.key) {
                Ok(p) => Some(p),
                Err(miss) => {
                    debug!(city = %miss.city, "City missing from geocoding table");
                    None
                }
            };
            CityShare { share, coords }
        })
        .collect()
}

/// Rows that can be placed on a map.
pub fn mapped(rows: &[CityShare]) -> impl Iterator<Item = &CityShare> {
    rows.iter().filter(|c| c.coords.is_some())
}

pub fn top_by_value(records: &[PurchaseRecord], n: usize) -> Vec<&PurchaseRecord> {
    let mut sorted: Vec<&PurchaseRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.total_owed.cmp(&a.total_owed));
    sorted.truncate(n);
    sorted
}

/// Grouping is on the raw product name, so names differing only in
/// formatting count as separate products.
pub fn top_repurchased(
    records: &[PurchaseRecord],
    n: usize,
    excluded_website: &str,
) -> Vec<RepurchaseRow> {
    let mut groups: Groups<'_, (usize, Decimal)> = Groups::new();
    for r in records.iter().filter(|r| r.website != excluded_website) {
        let e = groups.entry(&r.product_name);
        e.0 += 1;
        e.1 = e.1.saturating_add(r.total_owed);
    }

    let mut rows: Vec<RepurchaseRow> = groups
        .entries
        .into_iter()
        .map(|(name, (count, spent))| RepurchaseRow {
            product_name: name.to_string(),
            times_purchased: count,
            total_spent: spent,
        })
        .collect();
    rows.sort_by(|a, b| b.times_purchased.cmp(&a.times_purchased));
    rows.truncate(n);
    rows
}

pub fn monthly_seasonality(records: &[PurchaseRecord]) -> MonthlySeasonality {
    let mut by_month: BTreeMap<u32, (Decimal, u64)> = BTreeMap::new();
    for r in records {
        let e = by_month.entry(r.month).or_default();
        e.0 = e.0.saturating_add(r.total_owed);
        e.1 += u64::from(r.quantity);
    }

    let chronological: Vec<MonthlyTotal> = by_month
        .into_iter()
        .map(|(month, (spent, items))| {
            let total_owed = spent.round_dp(2);
            let avg_per_item = total_owed
                .checked_div(Decimal::from(items))
                .map(|a| a.round_dp(2));
            MonthlyTotal {
                month,
                month_name: month_abbrev(month).unwrap_or_default().to_string(),
                total_owed,
                items_purchased: items,
                avg_per_item,
            }
        })
        .collect();

    let mut ranked = chronological.clone();
    // stable over the calendar order, so ties fall back to ascending month
    ranked.sort_by(|a, b| b.total_owed.cmp(&a.total_owed));

    MonthlySeasonality {
        chronological,
        ranked,
    }
}
