// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::geo::GeoPoint;
use anyhow::anyhow;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One ordered line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub product_name: String,
    pub quantity: u32,
    pub total_owed: Decimal,
    pub website: String,
    pub shipping_city: String,
    pub year: i32,
    pub month: u32, // 1..=12
    pub month_name: String,
}

/// Abbreviated English month label, `None` outside 1..=12.
pub fn month_abbrev(month: u32) -> Option<&'static str> {
    let m = chrono::Month::try_from(u8::try_from(month).ok()?).ok()?;
    Some(&m.name()[..3])
}

/// The dashboard's section selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    KpiOverview,
    AnnualSpending,
    SpendingPerWebsite,
    SpendingPerCity,
    TopExpensivePurchases,
    TopRepurchasedItems,
    MonthlySpending,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::KpiOverview,
        Section::AnnualSpending,
        Section::SpendingPerWebsite,
        Section::SpendingPerCity,
        Section::TopExpensivePurchases,
        Section::TopRepurchasedItems,
        Section::MonthlySpending,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Section::KpiOverview => "kpi",
            Section::AnnualSpending => "annual",
            Section::SpendingPerWebsite => "websites",
            Section::SpendingPerCity => "cities",
            Section::TopExpensivePurchases => "expensive",
            Section::TopRepurchasedItems => "repurchased",
            Section::MonthlySpending => "monthly",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Section::KpiOverview => "KPI Overview",
            Section::AnnualSpending => "Annual Spending with YoY % Change",
            Section::SpendingPerWebsite => "Spending per Website",
            Section::SpendingPerCity => "Spending Percentage per City",
            Section::TopExpensivePurchases => "Most Expensive Purchases",
            Section::TopRepurchasedItems => "Most Repurchased Items",
            Section::MonthlySpending => "Monthly Spending Overview Across All Years",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for Section {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Section::ALL
            .into_iter()
            .find(|sec| sec.slug().eq_ignore_ascii_case(s) || sec.title().eq_ignore_ascii_case(s))
            .ok_or_else(|| anyhow!("Unknown section '{}'", s))
    }
}

/// Which categorical column a share-of-total groups on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareKey {
    Website,
    City,
}

impl ShareKey {
    pub fn of(self, r: &PurchaseRecord) -> &str {
        match self {
            ShareKey::Website => &r.website,
            ShareKey::City => &r.shipping_city,
        }
    }
}

/// What a share-of-total sums per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareMetric {
    #[default]
    Spend,
    Orders,
}

impl FromStr for ShareMetric {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "spend" => Ok(ShareMetric::Spend),
            "orders" => Ok(ShareMetric::Orders),
            other => Err(anyhow!("Unknown share metric '{}' (use spend|orders)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSummary {
    pub total_spending: Decimal,
    pub total_items: u64,
    pub record_count: usize,
    pub target_year: i32,
    pub target_year_spending: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyTotal {
    pub year: i32,
    pub total_spending: Decimal,
    pub total_items: u64,
    /// Absent for the first year and whenever the previous year summed to zero.
    pub yoy_pct: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShareRow {
    pub key: String,
    pub value: Decimal,
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityShare {
    pub share: ShareRow,
    pub coords: Option<GeoPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepurchaseRow {
    pub product_name: String,
    pub times_purchased: usize,
    pub total_spent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    pub month: u32,
    pub month_name: String,
    pub total_owed: Decimal,
    pub items_purchased: u64,
    pub avg_per_item: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySeasonality {
    pub chronological: Vec<MonthlyTotal>,
    pub ranked: Vec<MonthlyTotal>,
}

/// Row order for the monthly view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonthOrder {
    #[default]
    Calendar,
    Spend,
}

impl FromStr for MonthOrder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "calendar" => Ok(MonthOrder::Calendar),
            "spend" => Ok(MonthOrder::Spend),
            other => Err(anyhow!("Unknown month order '{}' (use calendar|spend)", other)),
        }
    }
}
