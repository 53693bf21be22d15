// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Section;
use clap::{Arg, ArgAction, Command, value_parser};

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print the report as pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per row"),
    ]
}

/// Pre-filters applied to the record set before aggregating.
fn filter_args() -> [Arg; 4] {
    [
        Arg::new("from-year")
            .long("from-year")
            .value_parser(value_parser!(i32))
            .help("Only records from this year on"),
        Arg::new("to-year")
            .long("to-year")
            .value_parser(value_parser!(i32))
            .help("Only records up to and including this year"),
        Arg::new("website")
            .long("website")
            .help("Only records from this website"),
        Arg::new("product")
            .long("product")
            .help("Only records whose product name matches this regex"),
    ]
}

fn top_arg() -> Arg {
    Arg::new("top")
        .long("top")
        .short('n')
        .value_parser(value_parser!(usize))
        .help("Number of rows to keep (default from config, 5)")
}

fn chart_arg() -> Arg {
    Arg::new("chart")
        .long("chart")
        .action(ArgAction::SetTrue)
        .help("Render a text bar chart instead of a table")
}

fn section_slugs() -> [&'static str; 7] {
    Section::ALL.map(|s| s.slug())
}

pub fn build_cli() -> Command {
    Command::new("orderlens")
        .version(clap::crate_version!())
        .about("Purchase-history analytics: KPIs, yearly trend, vendor and city shares, seasonality")
        .arg(
            Arg::new("data")
                .long("data")
                .short('d')
                .global(true)
                .help("Purchase export CSV (default: config data_path, then the data dir)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .help("Config file (default: platform config dir)"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::Count)
                .global(true)
                .help("More logging (-v info, -vv debug)"),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .action(ArgAction::SetTrue)
                .global(true)
                .conflicts_with("verbose")
                .help("Only log errors"),
        )
        .subcommand(
            Command::new("report")
                .about("Compute one dashboard section")
                .subcommand_required(true)
                .subcommand(
                    Command::new("kpi")
                        .about("Lifetime spending, items purchased, spending in a year")
                        .arg(
                            Arg::new("year")
                                .long("year")
                                .value_parser(value_parser!(i32))
                                .help("Target year (default: config kpi_year, then latest year)"),
                        )
                        .args(json_args())
                        .args(filter_args()),
                )
                .subcommand(
                    Command::new("annual")
                        .about("Yearly totals with year-over-year change")
                        .arg(
                            Arg::new("yoy-from")
                                .long("yoy-from")
                                .value_parser(value_parser!(i32))
                                .help("First year to label with YoY % (default: every defined year)"),
                        )
                        .arg(chart_arg())
                        .args(json_args())
                        .args(filter_args()),
                )
                .subcommand(
                    Command::new("websites")
                        .about("Share of total per website")
                        .arg(
                            Arg::new("by")
                                .long("by")
                                .value_parser(["spend", "orders"])
                                .default_value("spend")
                                .help("Share of spend or share of orders"),
                        )
                        .arg(chart_arg())
                        .args(json_args())
                        .args(filter_args()),
                )
                .subcommand(
                    Command::new("cities")
                        .about("Share of spend per shipping city, with coordinates")
                        .arg(
                            Arg::new("map")
                                .long("map")
                                .action(ArgAction::SetTrue)
                                .help("Only cities with known coordinates"),
                        )
                        .args(json_args())
                        .args(filter_args()),
                )
                .subcommand(
                    Command::new("expensive")
                        .about("Most expensive single purchases")
                        .arg(top_arg())
                        .args(json_args())
                        .args(filter_args()),
                )
                .subcommand(
                    Command::new("repurchased")
                        .about("Most frequently repurchased products")
                        .arg(top_arg())
                        .arg(
                            Arg::new("exclude-website")
                                .long("exclude-website")
                                .help("Vendor left out (default from config, Whole Foods Market)"),
                        )
                        .args(json_args())
                        .args(filter_args()),
                )
                .subcommand(
                    Command::new("monthly")
                        .about("Spending per calendar month across all years")
                        .arg(
                            Arg::new("order")
                                .long("order")
                                .value_parser(["calendar", "spend"])
                                .default_value("calendar")
                                .help("Chronological or ranked by spend"),
                        )
                        .arg(chart_arg())
                        .args(json_args())
                        .args(filter_args()),
                ),
        )
        .subcommand(
            Command::new("dashboard")
                .about("KPI header followed by one section")
                .arg(
                    Arg::new("section")
                        .long("section")
                        .short('s')
                        .value_parser(section_slugs())
                        .default_value("kpi"),
                )
                .arg(
                    Arg::new("year")
                        .long("year")
                        .value_parser(value_parser!(i32)),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Write a section to CSV or JSON")
                .arg(
                    Arg::new("section")
                        .long("section")
                        .short('s')
                        .required(true)
                        .value_parser(section_slugs()),
                )
                .arg(Arg::new("format").long("format").default_value("csv"))
                .arg(Arg::new("out").long("out").short('o').required(true)),
        )
        .subcommand(Command::new("doctor").about("Check the data for lookup misses and label drift"))
        .subcommand(
            Command::new("config")
                .about("Inspect or create the config file")
                .subcommand_required(true)
                .subcommand(Command::new("show").about("Print the effective config as JSON"))
                .subcommand(
                    Command::new("init")
                        .about("Write the default config file")
                        .arg(
                            Arg::new("force")
                                .long("force")
                                .action(ArgAction::SetTrue),
                        ),
                ),
        )
}
