// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;
use thiserror::Error;

/// Raised once while building the record store. Fatal: no report can be
/// computed without a valid store.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Cannot read purchase file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Required column '{0}' missing from header")]
    MissingColumn(&'static str),
    #[error("Line {line}: invalid {field} '{value}': {reason}")]
    InvalidField {
        line: usize,
        field: &'static str,
        value: String,
        reason: String,
    },
}

/// A city absent from the geocoding table. Non-fatal: the row only drops out
/// of geographic output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("No coordinates known for city '{city}'")]
pub struct LookupMiss {
    pub city: String,
}
