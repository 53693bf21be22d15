// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{Config, default_config_path};
use anyhow::Result;
use std::path::PathBuf;

pub fn handle(cfg: &Config, config_path: Option<&str>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            println!("{}", serde_json::to_string_pretty(cfg)?);
        }
        Some(("init", sub)) => {
            let path = match config_path.map(str::trim).filter(|p| !p.is_empty()) {
                Some(p) => PathBuf::from(p),
                None => default_config_path()?,
            };
            Config::default().save(&path, sub.get_flag("force"))?;
            println!("Wrote default config to {}", path.display());
        }
        _ => {}
    }
    Ok(())
}
