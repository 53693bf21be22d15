// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use orderlens::commands::doctor;
use orderlens::commands::reports::{
    self, RecordFilter, SectionOptions, build_section, chart_bars, kpi_year,
};
use orderlens::config::Config;
use orderlens::geo::GeoPoint;
use orderlens::models::{MonthOrder, Section, ShareMetric};
use orderlens::store::RecordStore;
use orderlens::cli;

fn store() -> RecordStore {
    let csv = "product_name,quantity,total_owed,website,shipping_city,year,month,month_name\n\
               Paper towels,1,20.00,Amazon.com,San Jose,2021,11,Nov\n\
               Paper towels,1,22.00,Amazon.com,San Jose,2022,11,Nov\n\
               Paper towels,1,24.00,Amazon.com,Seattle,2023,10,Oct\n\
               Kale,3,6.00,Whole Foods Market,San Jose,2023,1,Jan\n\
               Kale,3,6.00,Whole Foods Market,San Jose,2023,2,Feb\n\
               Kale,3,6.00,Whole Foods Market,San Jose,2023,3,Mar\n\
               Cahier,2,5.00,Amazon.fr,France,2020,9,Sept\n";
    RecordStore::from_reader(csv.as_bytes()).unwrap()
}

fn report_matches(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["orderlens", "report"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("report", m)) => m.clone(),
        _ => panic!("report command not parsed"),
    }
}

fn section_sub(m: &clap::ArgMatches) -> &clap::ArgMatches {
    m.subcommand().map(|(_, s)| s).unwrap()
}

#[test]
fn section_parses_from_slug_or_title() {
    assert_eq!("cities".parse::<Section>().unwrap(), Section::SpendingPerCity);
    assert_eq!(
        "spending per website".parse::<Section>().unwrap(),
        Section::SpendingPerWebsite
    );
    assert!("pie".parse::<Section>().is_err());
}

#[test]
fn filter_args_restrict_the_record_set() {
    let m = report_matches(&["annual", "--from-year", "2022", "--website", " Amazon.com "]);
    let filter = RecordFilter::from_matches(section_sub(&m)).unwrap();
    let s = store();
    let kept = filter.apply(s.records());
    assert_eq!(kept.len(), 2);
    assert!(kept.iter().all(|r| r.year >= 2022 && r.website == "Amazon.com"));

    let none = RecordFilter::default();
    assert_eq!(none.apply(s.records()).len(), s.len());
}

#[test]
fn product_filter_rejects_invalid_regex() {
    let m = report_matches(&["expensive", "--product", " (?P< "]);
    let err = reports::handle(&store(), &Config::default(), &m).unwrap_err();
    assert!(err.to_string().contains("Invalid regex pattern"));
}

#[test]
fn options_read_section_specific_flags() {
    let m = report_matches(&["websites", "--by", "orders"]);
    let opts = SectionOptions::from_matches(section_sub(&m)).unwrap();
    assert_eq!(opts.metric, ShareMetric::Orders);
    assert_eq!(opts.top, None);

    let m = report_matches(&["monthly", "--order", "spend"]);
    let opts = SectionOptions::from_matches(section_sub(&m)).unwrap();
    assert_eq!(opts.order, MonthOrder::Spend);

    let s = store();
    let r = build_section(Section::MonthlySpending, s.records(), &Config::default(), &opts);
    assert_eq!(r.cell(0, "Month"), Some("Nov"));
    assert_eq!(r.cell(1, "Month"), Some("Oct"));
}

#[test]
fn repurchase_respects_top_and_excluded_vendor() {
    let s = store();
    let cfg = Config::default();

    let r = build_section(Section::TopRepurchasedItems, s.records(), &cfg, &SectionOptions::default());
    assert_eq!(r.rows.len(), 2);
    assert_eq!(r.cell(0, "Product"), Some("Paper towels"));
    assert_eq!(r.cell(0, "Times Purchased"), Some("3"));

    let m = report_matches(&["repurchased", "--top", "1", "--exclude-website", "Amazon.com"]);
    let opts = SectionOptions::from_matches(section_sub(&m)).unwrap();
    let r = build_section(Section::TopRepurchasedItems, s.records(), &cfg, &opts);
    assert_eq!(r.rows.len(), 1);
    assert_eq!(r.cell(0, "Product"), Some("Kale"));
}

#[test]
fn yoy_cutoff_comes_from_flag_then_config() {
    let s = store();
    let cfg = Config {
        yoy_labels_from: Some(2023),
        ..Config::default()
    };
    let r = build_section(Section::AnnualSpending, s.records(), &cfg, &SectionOptions::default());
    assert_eq!(r.cell(2, "Year"), Some("2022"));
    assert_eq!(r.cell(2, "YoY %"), Some(""));
    assert_eq!(r.cell(3, "YoY %"), Some("90.9%"));

    let opts = SectionOptions {
        yoy_from: Some(2021),
        ..SectionOptions::default()
    };
    let r = build_section(Section::AnnualSpending, s.records(), &cfg, &opts);
    assert_eq!(r.cell(1, "YoY %"), Some("300.0%"));
    assert_eq!(r.cell(0, "YoY %"), Some(""));
}

#[test]
fn kpi_year_prefers_flag_then_config_then_data() {
    let s = store();
    let mut cfg = Config::default();
    assert_eq!(kpi_year(s.records(), &cfg, None), 2023);
    cfg.kpi_year = Some(2021);
    assert_eq!(kpi_year(s.records(), &cfg, None), 2021);
    assert_eq!(kpi_year(s.records(), &cfg, Some(2020)), 2020);
}

#[test]
fn chart_bars_follow_report_rows() {
    let s = store();
    let opts = SectionOptions::default();
    let cfg = Config::default();
    let r = build_section(Section::AnnualSpending, s.records(), &cfg, &opts);
    let bars = chart_bars(Section::AnnualSpending, s.records(), &r, &opts).unwrap();
    assert_eq!(bars.len(), r.rows.len());
    assert_eq!(bars[0].0, "2020");
    assert_eq!(bars[3].1, "42".parse().unwrap());

    let r = build_section(Section::SpendingPerCity, s.records(), &cfg, &opts);
    assert!(chart_bars(Section::SpendingPerCity, s.records(), &r, &opts).is_none());
}

#[test]
fn empty_store_reports_without_error() {
    let empty = RecordStore::default();
    let m = report_matches(&["monthly"]);
    reports::handle(&empty, &Config::default(), &m).unwrap();

    let r = build_section(Section::AnnualSpending, empty.records(), &Config::default(), &SectionOptions::default());
    assert!(r.is_empty());
}

#[test]
fn doctor_flags_lookup_misses_and_label_drift() {
    let s = store();
    let found = doctor::findings(&s, &Config::default());
    assert!(found.contains(&(
        "city_not_geocoded".to_string(),
        "'Seattle' (1 records)".to_string()
    )));
    assert!(found.contains(&(
        "month_name_mismatch".to_string(),
        "month 9 labelled 'Sept'".to_string()
    )));
    assert!(!found.iter().any(|(issue, _)| issue == "ambiguous_display_name"));
    assert!(!found.iter().any(|(issue, _)| issue == "kpi_year_without_data"));
}

#[test]
fn doctor_flags_kpi_year_outside_the_data() {
    let s = store();
    let cfg = Config {
        kpi_year: Some(2030),
        ..Config::default()
    };
    let found = doctor::findings(&s, &cfg);
    assert!(found.contains(&(
        "kpi_year_without_data".to_string(),
        "kpi_year 2030 has no records (latest is 2023)".to_string()
    )));

    let cfg = Config {
        kpi_year: Some(2021),
        cities: std::iter::empty::<(String, GeoPoint)>().collect(),
        ..Config::default()
    };
    let found = doctor::findings(&s, &cfg);
    assert!(!found.iter().any(|(issue, _)| issue == "kpi_year_without_data"));
    assert!(found.contains(&(
        "empty_geocoding_table".to_string(),
        "no cities configured".to_string()
    )));
}
