// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use orderlens::engine;
use orderlens::geo::GeoTable;
use orderlens::models::{PurchaseRecord, ShareKey, ShareMetric, month_abbrev};
use rust_decimal::Decimal;

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn rec(name: &str, total: &str, website: &str, city: &str, year: i32, month: u32, qty: u32) -> PurchaseRecord {
    PurchaseRecord {
        product_name: name.into(),
        quantity: qty,
        total_owed: d(total),
        website: website.into(),
        shipping_city: city.into(),
        year,
        month,
        month_name: month_abbrev(month).unwrap().into(),
    }
}

fn sample() -> Vec<PurchaseRecord> {
    vec![
        rec("Diapers, size 3", "45.99", "Amazon.com", "San Jose", 2021, 11, 2),
        rec("Coffee beans", "18.40", "Amazon.com", "San Jose", 2022, 1, 1),
        rec("Stylo | bleu", "3.20", "Amazon.fr", "France", 2019, 7, 4),
        rec("Bananas", "2.10", "Whole Foods Market", "Portland", 2022, 11, 6),
        rec("Diapers, size 3", "47.99", "Amazon.com", "San Jose", 2022, 11, 2),
        rec("Laptop stand", "129.00", "Amazon.com", "Chicago", 2023, 3, 1),
        rec("Coffee beans", "18.40", "Amazon.com", "Atlantis", 2023, 1, 1),
    ]
}

#[test]
fn kpi_totals_match_raw_sums() {
    let records = sample();
    let kpi = engine::kpi_summary(&records, 2022);

    let raw_total: Decimal = records.iter().map(|r| r.total_owed).sum();
    assert_eq!(kpi.total_spending, raw_total.round_dp(0));
    assert_eq!(kpi.total_spending, d("265"));
    assert_eq!(kpi.total_items, 17);
    assert_eq!(kpi.record_count, 7);
    // 18.40 + 2.10 + 47.99 = 68.49
    assert_eq!(kpi.target_year_spending, d("68"));
}

#[test]
fn kpi_on_empty_set_is_zero() {
    let kpi = engine::kpi_summary(&[], 2025);
    assert!(kpi.total_spending.is_zero());
    assert_eq!(kpi.total_items, 0);
    assert!(kpi.target_year_spending.is_zero());
}

#[test]
fn yearly_trend_is_ascending_with_undefined_first_yoy() {
    let records = vec![
        rec("a", "120", "Amazon.com", "San Jose", 2021, 1, 1),
        rec("b", "100", "Amazon.com", "San Jose", 2019, 1, 1),
        rec("c", "150", "Amazon.com", "San Jose", 2020, 1, 2),
    ];
    let years = engine::yearly_trend(&records);
    let order: Vec<i32> = years.iter().map(|y| y.year).collect();
    assert_eq!(order, vec![2019, 2020, 2021]);

    assert_eq!(years[0].yoy_pct, None);
    assert_eq!(years[1].yoy_pct, Some(d("50")));
    assert_eq!(years[2].yoy_pct, Some(d("-20")));
    assert_eq!(years[1].total_items, 2);
}

#[test]
fn yoy_follows_formula_on_rounded_totals() {
    let records = sample();
    let years = engine::yearly_trend(&records);
    for pair in years.windows(2) {
        let (prev, cur) = (&pair[0], &pair[1]);
        let expected = (cur.total_spending - prev.total_spending) / prev.total_spending
            * Decimal::ONE_HUNDRED;
        let got = cur.yoy_pct.unwrap();
        assert!((got - expected).abs() < d("0.0001"));
    }
}

#[test]
fn yoy_after_zero_year_is_undefined() {
    let records = vec![
        rec("free sample", "0", "Amazon.com", "San Jose", 2019, 1, 1),
        rec("a", "10", "Amazon.com", "San Jose", 2020, 1, 1),
    ];
    let years = engine::yearly_trend(&records);
    assert_eq!(years[1].yoy_pct, None);
}

#[test]
fn yoy_that_overflows_is_undefined() {
    let records = vec![
        rec("a", "0.01", "Amazon.com", "San Jose", 2020, 1, 1),
        rec("b", "1000000000000000000000000000", "Amazon.com", "San Jose", 2021, 1, 1),
    ];
    let years = engine::yearly_trend(&records);
    assert_eq!(years.len(), 2);
    assert_eq!(years[1].yoy_pct, None);
    assert_eq!(engine::pct_change(d("0.01"), Decimal::MAX), None);
}

#[test]
fn huge_totals_saturate_instead_of_panicking() {
    let mut big = rec("a", "1", "Amazon.com", "San Jose", 2020, 1, 1);
    big.total_owed = Decimal::MAX;
    let records = vec![big.clone(), big];

    let kpi = engine::kpi_summary(&records, 2020);
    assert_eq!(kpi.total_spending, Decimal::MAX);
    assert_eq!(engine::yearly_trend(&records)[0].total_spending, Decimal::MAX);

    let shares = engine::share_of_total(&records, ShareKey::Website, ShareMetric::Spend);
    assert_eq!(shares[0].value, Decimal::MAX);
    assert_eq!(shares[0].percentage, d("100"));

    let season = engine::monthly_seasonality(&records);
    assert_eq!(season.chronological[0].items_purchased, 2);
    assert!(season.chronological[0].avg_per_item.is_some());
}

#[test]
fn website_shares_sum_to_hundred_and_sort_by_spend() {
    let rows = engine::share_of_total(&sample(), ShareKey::Website, ShareMetric::Spend);
    let keys: Vec<&str> = rows.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["Amazon.com", "Amazon.fr", "Whole Foods Market"]);

    let sum: Decimal = rows.iter().map(|r| r.percentage).sum();
    let tolerance = d("0.1") * Decimal::from(rows.len());
    assert!((sum - Decimal::ONE_HUNDRED).abs() <= tolerance);
}

#[test]
fn equal_thirds_stay_within_rounding_tolerance() {
    let records = vec![
        rec("a", "10", "A", "X", 2020, 1, 1),
        rec("b", "10", "B", "X", 2020, 1, 1),
        rec("c", "10", "C", "X", 2020, 1, 1),
    ];
    let rows = engine::share_of_total(&records, ShareKey::Website, ShareMetric::Spend);
    assert!(rows.iter().all(|r| r.percentage == d("33.3")));
    // ties keep first appearance
    let keys: Vec<&str> = rows.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["A", "B", "C"]);
}

#[test]
fn order_metric_counts_rows() {
    let rows = engine::share_of_total(&sample(), ShareKey::Website, ShareMetric::Orders);
    assert_eq!(rows[0].key, "Amazon.com");
    assert_eq!(rows[0].value, Decimal::from(5));
    assert_eq!(rows[0].percentage, d("71.4"));
}

#[test]
fn city_shares_keep_lookup_misses_out_of_the_map_only() {
    let rows = engine::city_shares(&sample(), &GeoTable::default());
    assert_eq!(rows.len(), 5);
    let atlantis = rows.iter().find(|c| c.share.key == "Atlantis").unwrap();
    assert!(atlantis.coords.is_none());

    let mapped: Vec<&str> = engine::mapped(&rows).map(|c| c.share.key.as_str()).collect();
    assert_eq!(mapped.len(), 4);
    assert!(!mapped.contains(&"Atlantis"));

    let san_jose = rows.iter().find(|c| c.share.key == "San Jose").unwrap();
    assert_eq!(san_jose.coords.unwrap().lat, 37.3382);
}

#[test]
fn top_by_value_returns_min_n_len_descending() {
    let records = sample();
    let top = engine::top_by_value(&records, 5);
    assert_eq!(top.len(), 5);
    assert_eq!(top[0].product_name, "Laptop stand");
    assert!(top.windows(2).all(|w| w[0].total_owed >= w[1].total_owed));

    assert_eq!(engine::top_by_value(&records[..3], 5).len(), 3);
    assert!(engine::top_by_value(&[], 5).is_empty());
}

#[test]
fn repurchase_excludes_grocery_vendor() {
    let records = vec![
        rec("A", "10", "Amazon.com", "San Jose", 2022, 1, 1),
        rec("A", "10", "Amazon.com", "San Jose", 2022, 2, 1),
        rec("B", "5", "Whole Foods Market", "San Jose", 2022, 2, 1),
    ];
    let rows = engine::top_repurchased(&records, 5, "Whole Foods Market");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].product_name, "A");
    assert_eq!(rows[0].times_purchased, 2);
    assert_eq!(rows[0].total_spent, d("20"));
}

#[test]
fn repurchase_groups_on_raw_name_and_ranks_by_count() {
    let mut records = sample();
    records.push(rec("Coffee beans", "18.40", "Amazon.com", "San Jose", 2024, 5, 1));
    records.push(rec("Coffee beans.", "18.40", "Amazon.com", "San Jose", 2024, 6, 1));
    let rows = engine::top_repurchased(&records, 2, "Whole Foods Market");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].product_name, "Coffee beans");
    assert_eq!(rows[0].times_purchased, 3);
    assert_eq!(rows[1].product_name, "Diapers, size 3");
    assert_eq!(rows[1].times_purchased, 2);
}

#[test]
fn monthly_seasonality_ranks_busy_month_first() {
    let records = vec![
        rec("a", "10", "Amazon.com", "San Jose", 2020, 1, 1),
        rec("b", "20", "Amazon.com", "San Jose", 2021, 1, 1),
        rec("c", "25", "Amazon.com", "San Jose", 2020, 11, 2),
        rec("d", "25", "Amazon.com", "San Jose", 2021, 11, 2),
        rec("e", "25", "Amazon.com", "San Jose", 2022, 11, 2),
    ];
    let season = engine::monthly_seasonality(&records);

    let cal: Vec<u32> = season.chronological.iter().map(|m| m.month).collect();
    assert_eq!(cal, vec![1, 11]);
    let ranked: Vec<u32> = season.ranked.iter().map(|m| m.month).collect();
    assert_eq!(ranked, vec![11, 1]);

    let nov = &season.ranked[0];
    assert_eq!(nov.month_name, "Nov");
    assert_eq!(nov.total_owed, d("75"));
    assert_eq!(nov.items_purchased, 6);
    assert_eq!(nov.avg_per_item, Some(d("12.50")));
    assert_eq!(season.chronological[0].avg_per_item, Some(d("15")));
}

#[test]
fn monthly_ties_fall_back_to_calendar_order() {
    let records = vec![
        rec("a", "10", "Amazon.com", "San Jose", 2020, 9, 1),
        rec("b", "10", "Amazon.com", "San Jose", 2020, 2, 1),
    ];
    let season = engine::monthly_seasonality(&records);
    let ranked: Vec<u32> = season.ranked.iter().map(|m| m.month).collect();
    assert_eq!(ranked, vec![2, 9]);
}

#[test]
fn reports_are_idempotent() {
    let records = sample();
    assert_eq!(engine::yearly_trend(&records), engine::yearly_trend(&records));
    assert_eq!(
        engine::monthly_seasonality(&records),
        engine::monthly_seasonality(&records)
    );
    assert_eq!(
        engine::top_repurchased(&records, 5, "Whole Foods Market"),
        engine::top_repurchased(&records, 5, "Whole Foods Market")
    );
}

#[test]
fn empty_input_gives_empty_reports() {
    assert!(engine::yearly_trend(&[]).is_empty());
    assert!(engine::share_of_total(&[], ShareKey::City, ShareMetric::Spend).is_empty());
    assert!(engine::top_repurchased(&[], 5, "Whole Foods Market").is_empty());
    let season = engine::monthly_seasonality(&[]);
    assert!(season.chronological.is_empty() && season.ranked.is_empty());
}
