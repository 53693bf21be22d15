// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::reports::{SectionOptions, build_section, emit};
use crate::config::Config;
use crate::models::Section;
use crate::store::RecordStore;
use anyhow::Result;
use tracing::info;

/// KPI header, then the selected section.
pub fn handle(store: &RecordStore, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let section: Section = sub
        .get_one::<String>("section")
        .map(String::as_str)
        .unwrap_or("kpi")
        .parse()?;
    let opts = SectionOptions {
        year: sub.get_one::<i32>("year").copied(),
        ..SectionOptions::default()
    };
    info!(section = section.slug(), "Rendering dashboard");

    let kpi = build_section(Section::KpiOverview, store.records(), cfg, &opts);
    emit(&kpi, false, false, None)?;
    if section != Section::KpiOverview {
        println!();
        let report = build_section(section, store.records(), cfg, &opts);
        emit(&report, false, false, None)?;
    }
    Ok(())
}
