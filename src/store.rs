// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The record store: every purchase line loaded once at startup and never
//! mutated afterwards. Reports borrow it through `records()`.

use crate::error::LoadError;
use crate::models::{PurchaseRecord, month_abbrev};
use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Orderlens", "orderlens"));

const DEFAULT_DATA_FILE: &str = "purchases.csv";

pub(crate) fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")
}

/// Where the purchase export is read from when nothing else names a file.
pub fn default_data_path() -> Result<PathBuf> {
    let proj = project_dirs()?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join(DEFAULT_DATA_FILE))
}

/// Header column positions, resolved by name.
struct Columns {
    product_name: usize,
    quantity: usize,
    total_owed: usize,
    website: usize,
    shipping_city: usize,
    year: usize,
    month: usize,
    month_name: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self, LoadError> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let need = |name: &'static str| find(name).ok_or(LoadError::MissingColumn(name));
        Ok(Columns {
            product_name: need("product_name")?,
            quantity: need("quantity")?,
            total_owed: need("total_owed")?,
            website: need("website")?,
            shipping_city: need("shipping_city")?,
            year: need("year")?,
            month: need("month")?,
            month_name: find("month_name"),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<PurchaseRecord>,
}

impl RecordStore {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self::from_reader(file)?;
        info!(path = %path.display(), records = store.len(), "Loaded purchase records");
        Ok(store)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);
        let headers = rdr.headers()?;
        if headers.iter().all(str::is_empty) {
            debug!("Purchase file has no header, treating it as empty");
            return Ok(RecordStore::default());
        }
        let cols = Columns::resolve(headers)?;

        let mut records = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let rec = result?;
            let line = rec
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(idx + 2);
            records.push(parse_row(&rec, &cols, line)?);
        }
        Ok(RecordStore { records })
    }

    /// Builds a store from records constructed elsewhere, enforcing the same
    /// invariants as a file load.
    pub fn from_records(records: Vec<PurchaseRecord>) -> Result<Self, LoadError> {
        for (idx, r) in records.iter().enumerate() {
            let line = idx + 1;
            if r.quantity == 0 {
                return Err(invalid(line, "quantity", "0", "must be at least 1"));
            }
            if let Err(reason) = check_amount(r.total_owed) {
                return Err(invalid(line, "total_owed", &r.total_owed.to_string(), &reason));
            }
            if !(1..=12).contains(&r.month) {
                return Err(invalid(
                    line,
                    "month",
                    &r.month.to_string(),
                    "must be between 1 and 12",
                ));
            }
        }
        Ok(RecordStore { records })
    }

    pub fn records(&self) -> &[PurchaseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct years, ascending.
    pub fn years(&self) -> Vec<i32> {
        let mut ys: Vec<i32> = self.records.iter().map(|r| r.year).collect();
        ys.sort_unstable();
        ys.dedup();
        ys
    }

    pub fn latest_year(&self) -> Option<i32> {
        self.records.iter().map(|r| r.year).max()
    }
}

fn invalid(line: usize, field: &'static str, value: &str, reason: &str) -> LoadError {
    LoadError::InvalidField {
        line,
        field,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_row(rec: &StringRecord, cols: &Columns, line: usize) -> Result<PurchaseRecord, LoadError> {
    let get = |idx: usize| rec.get(idx).unwrap_or("");

    let quantity_raw = get(cols.quantity);
    let quantity: u32 = quantity_raw
        .parse()
        .map_err(|e: std::num::ParseIntError| invalid(line, "quantity", quantity_raw, &e.to_string()))?;
    if quantity == 0 {
        return Err(invalid(line, "quantity", quantity_raw, "must be at least 1"));
    }

    let owed_raw = get(cols.total_owed);
    let total_owed = parse_amount(owed_raw)
        .map_err(|reason| invalid(line, "total_owed", owed_raw, &reason))?;

    let year_raw = get(cols.year);
    let year: i32 = year_raw
        .parse()
        .map_err(|e: std::num::ParseIntError| invalid(line, "year", year_raw, &e.to_string()))?;

    let month_raw = get(cols.month);
    let month: u32 = month_raw
        .parse()
        .map_err(|e: std::num::ParseIntError| invalid(line, "month", month_raw, &e.to_string()))?;
    let derived = month_abbrev(month)
        .ok_or_else(|| invalid(line, "month", month_raw, "must be between 1 and 12"))?;

    let month_name = match cols.month_name.map(get).filter(|s| !s.is_empty()) {
        Some(name) => name.to_string(),
        None => {
            debug!(line, month, "Derived month_name from month");
            derived.to_string()
        }
    };

    Ok(PurchaseRecord {
        product_name: get(cols.product_name).to_string(),
        quantity,
        total_owed,
        website: get(cols.website).to_string(),
        shipping_city: get(cols.shipping_city).to_string(),
        year,
        month,
        month_name,
    })
}

/// Largest single line-item amount accepted (10^15). Keeps every aggregate
/// far from the `Decimal` range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2764472320, 232830, 0, false, 0);

fn check_amount(d: Decimal) -> Result<(), String> {
    if d.is_sign_negative() && !d.is_zero() {
        return Err("must be non-negative".to_string());
    }
    if d > MAX_AMOUNT {
        return Err(format!("exceeds the maximum of {}", MAX_AMOUNT));
    }
    Ok(())
}

/// Accepts `12.5`, `$12.50` and `$1,234.50`; rejects negatives.
fn parse_amount(raw: &str) -> Result<Decimal, String> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    let d = crate::utils::parse_decimal(&cleaned).map_err(|e| e.to_string())?;
    check_amount(d)?;
    Ok(d)
}
