// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Turns engine output into display-ready tables. Formatting only: row order
//! and numeric values are whatever the engine produced.

use crate::engine;
use crate::models::{
    CityShare, KpiSummary, MonthOrder, MonthlySeasonality, PurchaseRecord, RepurchaseRow,
    ShareMetric, ShareRow, YearlyTotal,
};
use crate::utils::{fmt_money, format_currency, truncate_name};
use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeMap, SerializeStruct, Serializer};

pub const DEFAULT_DELIMITERS: &str = ",.|";

/// Display settings shared by every section.
#[derive(Debug, Clone)]
pub struct Formatting {
    pub currency_symbol: String,
    pub truncate_delimiters: String,
}

impl Default for Formatting {
    fn default() -> Self {
        Formatting {
            currency_symbol: "$".to_string(),
            truncate_delimiters: DEFAULT_DELIMITERS.to_string(),
        }
    }
}

/// Rows of display strings under fixed column labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedReport {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub notes: Vec<String>,
}

impl DerivedReport {
    fn new(title: impl Into<String>, columns: &[&str]) -> Self {
        DerivedReport {
            title: title.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
            notes: Vec::new(),
        }
    }

    fn push(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == label)
    }

    /// Value at `row` under column `label`.
    pub fn cell(&self, row: usize, label: &str) -> Option<&str> {
        let c = self.column(label)?;
        self.rows.get(row)?.get(c).map(String::as_str)
    }

    pub fn row_objects(&self) -> Vec<RowObject<'_>> {
        self.rows
            .iter()
            .map(|r| RowObject {
                columns: &self.columns,
                values: r,
            })
            .collect()
    }
}

/// One row serialised as a JSON object in column order.
pub struct RowObject<'a> {
    columns: &'a [String],
    values: &'a [String],
}

impl Serialize for RowObject<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (k, v) in self.columns.iter().zip(self.values) {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl Serialize for DerivedReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut st = serializer.serialize_struct("DerivedReport", 4)?;
        st.serialize_field("title", &self.title)?;
        st.serialize_field("columns", &self.columns)?;
        st.serialize_field("rows", &self.row_objects())?;
        st.serialize_field("notes", &self.notes)?;
        st.end()
    }
}

fn pct_label(p: Decimal) -> String {
    format!("{:.1}%", p.round_dp(1))
}

pub fn kpi_report(kpi: &KpiSummary, fmt: &Formatting) -> DerivedReport {
    let mut r = DerivedReport::new("KPI Overview", &["Metric", "Value"]);
    r.push(vec![
        "Total Lifetime Spending".into(),
        fmt_money(kpi.total_spending, &fmt.currency_symbol, 0),
    ]);
    r.push(vec![
        "Total Items Purchased".into(),
        kpi.total_items.to_string(),
    ]);
    r.push(vec![
        format!("Total Spending in {}", kpi.target_year),
        fmt_money(kpi.target_year_spending, &fmt.currency_symbol, 0),
    ]);
    r.push(vec!["Orders Recorded".into(), kpi.record_count.to_string()]);
    r
}

/// `yoy_labels_from` is the first year whose YoY label is shown; `None`
/// shows every defined one. Undefined YoY is always blank, never `0%`.
pub fn annual_report(
    years: &[YearlyTotal],
    yoy_labels_from: Option<i32>,
    fmt: &Formatting,
) -> DerivedReport {
    let mut r = DerivedReport::new(
        "Annual Spending with YoY % Change",
        &["Year", "Total Spending", "Items", "YoY %"],
    );
    for y in years {
        let shown = yoy_labels_from.is_none_or(|from| y.year >= from);
        let yoy = match y.yoy_pct {
            Some(p) if shown => pct_label(p),
            _ => String::new(),
        };
        r.push(vec![
            y.year.to_string(),
            fmt_money(y.total_spending, &fmt.currency_symbol, 2),
            y.total_items.to_string(),
            yoy,
        ]);
    }
    r
}

pub fn share_report(
    title: &str,
    key_label: &str,
    rows: &[ShareRow],
    metric: ShareMetric,
    fmt: &Formatting,
) -> DerivedReport {
    let value_label = match metric {
        ShareMetric::Spend => "Total Spent",
        ShareMetric::Orders => "Orders",
    };
    let mut r = DerivedReport::new(title, &[key_label, value_label, "Percentage"]);
    for s in rows {
        let value = match metric {
            ShareMetric::Spend => fmt_money(s.value, &fmt.currency_symbol, 2),
            ShareMetric::Orders => s.value.normalize().to_string(),
        };
        r.push(vec![s.key.clone(), value, pct_label(s.percentage)]);
    }
    r
}

/// With `map_only`, cities without coordinates are dropped from the rows.
/// Either way they are listed in the notes.
pub fn city_report(rows: &[CityShare], map_only: bool, fmt: &Formatting) -> DerivedReport {
    let mut r = DerivedReport::new(
        "Spending Percentage per City",
        &["City", "Total Spend", "Percentage", "Latitude", "Longitude"],
    );
    r.notes = rows
        .iter()
        .filter(|c| c.coords.is_none())
        .map(|c| format!("No coordinates for '{}'", c.share.key))
        .collect();
    let shown: Vec<&CityShare> = if map_only {
        engine::mapped(rows).collect()
    } else {
        rows.iter().collect()
    };
    for c in shown {
        let (lat, lon) = match c.coords {
            Some(p) => (format!("{:.4}", p.lat), format!("{:.4}", p.lon)),
            None => (String::new(), String::new()),
        };
        r.push(vec![
            c.share.key.clone(),
            fmt_money(c.share.value, &fmt.currency_symbol, 0),
            pct_label(c.share.percentage),
            lat,
            lon,
        ]);
    }
    r
}

pub fn expensive_report(top: &[&PurchaseRecord], fmt: &Formatting) -> DerivedReport {
    let mut r = DerivedReport::new(
        format!("{} Most Expensive Purchases", top.len()),
        &["Product", "Total Spent ($)", "Website", "Month", "Year"],
    );
    for p in top {
        r.push(vec![
            truncate_name(&p.product_name, &fmt.truncate_delimiters).to_string(),
            format_currency(p.total_owed, 2),
            p.website.clone(),
            p.month.to_string(),
            p.year.to_string(),
        ]);
    }
    r
}

pub fn repurchase_report(rows: &[RepurchaseRow], fmt: &Formatting) -> DerivedReport {
    let mut r = DerivedReport::new(
        format!("{} Most Repurchased Items", rows.len()),
        &["Product", "Times Purchased", "Total Spent ($)"],
    );
    for row in rows {
        r.push(vec![
            truncate_name(&row.product_name, &fmt.truncate_delimiters).to_string(),
            row.times_purchased.to_string(),
            format_currency(row.total_spent, 2),
        ]);
    }
    r
}

pub fn monthly_report(season: &MonthlySeasonality, order: MonthOrder) -> DerivedReport {
    let rows = match order {
        MonthOrder::Calendar => &season.chronological,
        MonthOrder::Spend => &season.ranked,
    };
    let mut r = DerivedReport::new(
        "Monthly Spending Overview Across All Years",
        &["Month", "Total Spent ($)", "Items Purchased", "Avg Item Value ($)"],
    );
    for m in rows {
        r.push(vec![
            m.month_name.clone(),
            format_currency(m.total_owed, 2),
            m.items_purchased.to_string(),
            m.avg_per_item
                .map(|a| format_currency(a, 2))
                .unwrap_or_default(),
        ]);
    }
    r
}
