// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Config;
use crate::models::month_abbrev;
use crate::store::RecordStore;
use crate::utils::{pretty_table, truncate_name};
use anyhow::Result;
use std::collections::{BTreeMap, BTreeSet};

/// Data-quality findings as `(issue, detail)` pairs.
pub fn findings(store: &RecordStore, cfg: &Config) -> Vec<(String, String)> {
    let records = store.records();
    let mut rows = Vec::new();

    // 1) Cities the geocoding table cannot place
    let mut misses: BTreeMap<&str, usize> = BTreeMap::new();
    for r in records {
        if cfg.cities.lookup(&r.shipping_city).is_err() {
            *misses.entry(r.shipping_city.as_str()).or_insert(0) += 1;
        }
    }
    for (city, n) in misses {
        rows.push(("city_not_geocoded".into(), format!("'{}' ({} records)", city, n)));
    }

    // 2) month_name column disagreeing with month
    let mut drift: BTreeSet<(u32, &str)> = BTreeSet::new();
    for r in records {
        if month_abbrev(r.month).is_some_and(|m| !m.eq_ignore_ascii_case(&r.month_name)) {
            drift.insert((r.month, r.month_name.as_str()));
        }
    }
    for (month, name) in drift {
        rows.push(("month_name_mismatch".into(), format!("month {} labelled '{}'", month, name)));
    }

    // 3) Distinct raw names that display identically once truncated
    let mut shown: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for r in records {
        let short = truncate_name(&r.product_name, &cfg.truncate_delimiters);
        shown.entry(short).or_default().insert(r.product_name.as_str());
    }
    for (short, raw) in shown {
        if raw.len() > 1 {
            rows.push((
                "ambiguous_display_name".into(),
                format!("'{}' covers {} distinct products", short, raw.len()),
            ));
        }
    }

    // 4) Configured KPI year outside the data
    if let Some(year) = cfg.kpi_year.filter(|y| !store.years().contains(y)) {
        let latest = store
            .latest_year()
            .map(|y| y.to_string())
            .unwrap_or_else(|| "none".into());
        rows.push((
            "kpi_year_without_data".into(),
            format!("kpi_year {} has no records (latest is {})", year, latest),
        ));
    }

    if cfg.cities.is_empty() {
        rows.push(("empty_geocoding_table".into(), "no cities configured".into()));
    }

    rows
}

pub fn handle(store: &RecordStore, cfg: &Config) -> Result<()> {
    if store.is_empty() {
        println!("doctor: no purchase records loaded");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = findings(store, cfg)
        .into_iter()
        .map(|(issue, detail)| vec![issue, detail])
        .collect();
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
