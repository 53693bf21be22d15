// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::assembler::DerivedReport;
use crate::commands::reports::{SectionOptions, build_section};
use crate::config::Config;
use crate::models::Section;
use crate::store::RecordStore;
use anyhow::{Context, Result, bail};
use std::path::Path;

pub fn handle(store: &RecordStore, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let section: Section = sub.get_one::<String>("section").unwrap().parse()?;
    let fmt = sub.get_one::<String>("format").unwrap().trim().to_lowercase();
    let out = Path::new(sub.get_one::<String>("out").unwrap().trim());

    let report = build_section(section, store.records(), cfg, &SectionOptions::default());
    match fmt.as_str() {
        "csv" => write_csv(&report, out)?,
        "json" => std::fs::write(out, serde_json::to_string_pretty(&report)?)
            .with_context(|| format!("Write {}", out.display()))?,
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
    println!("Exported {} to {}", section.title(), out.display());
    Ok(())
}

pub fn write_csv(report: &DerivedReport, out: &Path) -> Result<()> {
    let mut wtr =
        csv::Writer::from_path(out).with_context(|| format!("Create {}", out.display()))?;
    wtr.write_record(&report.columns)?;
    for row in &report.rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}
