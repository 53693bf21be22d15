// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Analysis settings, read from `config.json` in the platform config dir or
//! from an explicit `--config` path. Every field is optional in the file.

use crate::assembler::{DEFAULT_DELIMITERS, Formatting};
use crate::geo::GeoTable;
use crate::store::{default_data_path, project_dirs};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const CONFIG_JSON: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_path: Option<PathBuf>,
    pub currency_symbol: String,
    /// KPI year; falls back to the latest year in the data.
    pub kpi_year: Option<i32>,
    pub top_n: usize,
    /// Vendor left out of the repurchase ranking (grocery delivery).
    pub excluded_repurchase_website: String,
    pub truncate_delimiters: String,
    /// First year that gets a YoY label in the annual view.
    pub yoy_labels_from: Option<i32>,
    pub cities: GeoTable,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_path: None,
            currency_symbol: "$".to_string(),
            kpi_year: None,
            top_n: 5,
            excluded_repurchase_website: "Whole Foods Market".to_string(),
            truncate_delimiters: DEFAULT_DELIMITERS.to_string(),
            yoy_labels_from: None,
            cities: GeoTable::default(),
        }
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    let proj = project_dirs()?;
    Ok(proj.config_dir().join(CONFIG_JSON))
}

impl Config {
    /// An explicit path must exist; the default location may be absent, in
    /// which case built-in defaults apply.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => {
                if !p.is_file() {
                    bail!("Config file {} does not exist", p.display());
                }
                p.to_path_buf()
            }
            None => {
                let p = default_config_path()?;
                if !p.is_file() {
                    debug!(path = %p.display(), "No config file, using defaults");
                    return Ok(Config::default());
                }
                p
            }
        };
        Self::from_file(&path)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Read config {}", path.display()))?;
        let cfg: Config = serde_json::from_str(&text)
            .with_context(|| format!("Parse config {}", path.display()))?;
        debug!(path = %path.display(), "Loaded config");
        Ok(cfg)
    }

    /// Writes this config as pretty JSON, refusing to clobber unless `force`.
    pub fn save(&self, path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            bail!("{} already exists (use --force to overwrite)", path.display());
        }
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Create config dir {}", dir.display()))?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("Write config {}", path.display()))?;
        Ok(())
    }

    /// `--data` beats the config file, which beats the platform data dir.
    pub fn resolve_data_path(&self, cli: Option<&str>) -> Result<PathBuf> {
        if let Some(p) = cli.map(str::trim).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(p));
        }
        match &self.data_path {
            Some(p) => Ok(p.clone()),
            None => default_data_path(),
        }
    }

    pub fn formatting(&self) -> Formatting {
        Formatting {
            currency_symbol: self.currency_symbol.clone(),
            truncate_delimiters: self.truncate_delimiters.clone(),
        }
    }
}
