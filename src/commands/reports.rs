// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::assembler::{self, DerivedReport};
use crate::config::Config;
use crate::engine;
use crate::models::{MonthOrder, PurchaseRecord, Section, ShareKey, ShareMetric};
use crate::store::RecordStore;
use crate::utils::{bar_chart, maybe_print_json, pretty_table};
use anyhow::{Context, Result};
use chrono::Datelike;
use regex::Regex;
use rust_decimal::Decimal;
use std::borrow::Cow;
use tracing::{debug, info};

pub const NO_DATA: &str = "No data available for this section.";

fn flag(sub: &clap::ArgMatches, id: &str) -> bool {
    sub.try_get_one::<bool>(id)
        .ok()
        .flatten()
        .copied()
        .unwrap_or(false)
}

/// Knobs a section may take from the command line; unset fields fall back to
/// the config.
#[derive(Debug, Clone, Default)]
pub struct SectionOptions {
    pub year: Option<i32>,
    pub top: Option<usize>,
    pub exclude_website: Option<String>,
    pub yoy_from: Option<i32>,
    pub metric: ShareMetric,
    pub map_only: bool,
    pub order: MonthOrder,
}

impl SectionOptions {
    pub fn from_matches(sub: &clap::ArgMatches) -> Result<Self> {
        // Not every section defines every argument; absent ones read as unset.
        let get_i32 = |id: &str| sub.try_get_one::<i32>(id).ok().flatten().copied();
        let get_str = |id: &str| sub.try_get_one::<String>(id).ok().flatten().cloned();

        Ok(SectionOptions {
            year: get_i32("year"),
            top: sub.try_get_one::<usize>("top").ok().flatten().copied(),
            exclude_website: get_str("exclude-website").map(|s| s.trim().to_string()),
            yoy_from: get_i32("yoy-from"),
            metric: get_str("by")
                .map(|s| s.parse::<ShareMetric>())
                .transpose()?
                .unwrap_or_default(),
            map_only: flag(sub, "map"),
            order: get_str("order")
                .map(|s| s.parse::<MonthOrder>())
                .transpose()?
                .unwrap_or_default(),
        })
    }
}

/// Record pre-filter. An empty filter borrows the store untouched.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub from_year: Option<i32>,
    pub to_year: Option<i32>,
    pub website: Option<String>,
    pub product: Option<Regex>,
}

impl RecordFilter {
    pub fn from_matches(sub: &clap::ArgMatches) -> Result<Self> {
        let product = match sub.try_get_one::<String>("product").ok().flatten() {
            Some(p) => Some(
                Regex::new(p.trim()).with_context(|| format!("Invalid regex pattern '{}'", p))?,
            ),
            None => None,
        };
        Ok(RecordFilter {
            from_year: sub.try_get_one::<i32>("from-year").ok().flatten().copied(),
            to_year: sub.try_get_one::<i32>("to-year").ok().flatten().copied(),
            website: sub
                .try_get_one::<String>("website")
                .ok()
                .flatten()
                .map(|s| s.trim().to_string()),
            product,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.from_year.is_none()
            && self.to_year.is_none()
            && self.website.is_none()
            && self.product.is_none()
    }

    pub fn matches(&self, r: &PurchaseRecord) -> bool {
        self.from_year.is_none_or(|y| r.year >= y)
            && self.to_year.is_none_or(|y| r.year <= y)
            && self.website.as_deref().is_none_or(|w| r.website == w)
            && self
                .product
                .as_ref()
                .is_none_or(|re| re.is_match(&r.product_name))
    }

    pub fn apply<'a>(&self, records: &'a [PurchaseRecord]) -> Cow<'a, [PurchaseRecord]> {
        if self.is_empty() {
            return Cow::Borrowed(records);
        }
        let kept: Vec<PurchaseRecord> = records
            .iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect();
        debug!(kept = kept.len(), total = records.len(), "Applied record filter");
        Cow::Owned(kept)
    }
}

/// KPI year: explicit, then config, then the latest year present, then today.
pub fn kpi_year(records: &[PurchaseRecord], cfg: &Config, explicit: Option<i32>) -> i32 {
    explicit
        .or(cfg.kpi_year)
        .or_else(|| records.iter().map(|r| r.year).max())
        .unwrap_or_else(|| chrono::Local::now().year())
}

/// Computes and assembles one section from `records`.
pub fn build_section(
    section: Section,
    records: &[PurchaseRecord],
    cfg: &Config,
    opts: &SectionOptions,
) -> DerivedReport {
    let fmt = cfg.formatting();
    let top = opts.top.unwrap_or(cfg.top_n);
    match section {
        Section::KpiOverview => {
            let year = kpi_year(records, cfg, opts.year);
            assembler::kpi_report(&engine::kpi_summary(records, year), &fmt)
        }
        Section::AnnualSpending => assembler::annual_report(
            &engine::yearly_trend(records),
            opts.yoy_from.or(cfg.yoy_labels_from),
            &fmt,
        ),
        Section::SpendingPerWebsite => assembler::share_report(
            Section::SpendingPerWebsite.title(),
            "Website",
            &engine::share_of_total(records, ShareKey::Website, opts.metric),
            opts.metric,
            &fmt,
        ),
        Section::SpendingPerCity => assembler::city_report(
            &engine::city_shares(records, &cfg.cities),
            opts.map_only,
            &fmt,
        ),
        Section::TopExpensivePurchases => {
            assembler::expensive_report(&engine::top_by_value(records, top), &fmt)
        }
        Section::TopRepurchasedItems => {
            let excluded = opts
                .exclude_website
                .as_deref()
                .unwrap_or(&cfg.excluded_repurchase_website);
            assembler::repurchase_report(&engine::top_repurchased(records, top, excluded), &fmt)
        }
        Section::MonthlySpending => {
            assembler::monthly_report(&engine::monthly_seasonality(records), opts.order)
        }
    }
}

/// Bars for the sections that have a chart view. Values come from the
/// engine, labels from the assembled report so both stay in the same order.
pub fn chart_bars(
    section: Section,
    records: &[PurchaseRecord],
    report: &DerivedReport,
    opts: &SectionOptions,
) -> Option<Vec<(String, Decimal, String)>> {
    let values: Vec<Decimal> = match section {
        Section::AnnualSpending => engine::yearly_trend(records)
            .into_iter()
            .map(|y| y.total_spending)
            .collect(),
        Section::SpendingPerWebsite => {
            engine::share_of_total(records, ShareKey::Website, opts.metric)
                .into_iter()
                .map(|s| s.value)
                .collect()
        }
        Section::MonthlySpending => {
            let season = engine::monthly_seasonality(records);
            let rows = match opts.order {
                MonthOrder::Calendar => season.chronological,
                MonthOrder::Spend => season.ranked,
            };
            rows.into_iter().map(|m| m.total_owed).collect()
        }
        _ => return None,
    };
    let bars = report
        .rows
        .iter()
        .zip(values)
        .map(|(row, v)| {
            let shown = row[1..]
                .iter()
                .filter(|c| !c.is_empty())
                .cloned()
                .collect::<Vec<_>>()
                .join("  ");
            (row[0].clone(), v, shown)
        })
        .collect();
    Some(bars)
}

/// Prints a report as JSON, JSON lines, chart or table.
pub fn emit(
    report: &DerivedReport,
    json_flag: bool,
    jsonl_flag: bool,
    bars: Option<Vec<(String, Decimal, String)>>,
) -> Result<()> {
    if json_flag {
        maybe_print_json(true, false, report)?;
        return Ok(());
    }
    if maybe_print_json(false, jsonl_flag, &report.row_objects())? {
        return Ok(());
    }
    println!("== {} ==", report.title);
    if report.is_empty() {
        println!("{}", NO_DATA);
        return Ok(());
    }
    match bars {
        Some(bars) => {
            let value_header = report.columns.get(1).map(String::as_str).unwrap_or("");
            println!("{}", bar_chart(&report.columns[0], value_header, &bars));
        }
        None => {
            let headers: Vec<&str> = report.columns.iter().map(String::as_str).collect();
            println!("{}", pretty_table(&headers, report.rows.clone()));
        }
    }
    for note in &report.notes {
        println!("note: {}", note);
    }
    Ok(())
}

pub fn handle(store: &RecordStore, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    let (name, sub) = match m.subcommand() {
        Some(s) => s,
        None => return Ok(()),
    };
    let section: Section = name.parse()?;
    let opts = SectionOptions::from_matches(sub)?;
    let filter = RecordFilter::from_matches(sub)?;
    let records = filter.apply(store.records());
    info!(section = section.slug(), records = records.len(), "Computing report");

    let report = build_section(section, &records, cfg, &opts);
    let bars = if flag(sub, "chart") {
        chart_bars(section, &records, &report, &opts)
    } else {
        None
    };
    emit(&report, sub.get_flag("json"), sub.get_flag("jsonl"), bars)
}
