// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::LookupMiss;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// City name to coordinates. Read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeoTable(BTreeMap<String, GeoPoint>);

impl Default for GeoTable {
    fn default() -> Self {
        [
            ("San Jose", 37.3382, -121.8863),
            ("Portland", 45.5152, -122.6784),
            ("Los Angeles", 34.0522, -118.2437),
            ("France", 48.8566, 2.3522),
            ("Chicago", 41.8781, -87.6298),
            ("Milwaukee", 43.0389, -87.9065),
        ]
        .into_iter()
        .map(|(city, lat, lon)| (city.to_string(), GeoPoint { lat, lon }))
        .collect()
    }
}

impl FromIterator<(String, GeoPoint)> for GeoTable {
    fn from_iter<I: IntoIterator<Item = (String, GeoPoint)>>(iter: I) -> Self {
        GeoTable(iter.into_iter().collect())
    }
}

impl GeoTable {
    /// Exact, case-sensitive match on the trimmed city name.
    pub fn lookup(&self, city: &str) -> Result<GeoPoint, LookupMiss> {
        let city = city.trim();
        self.0.get(city).copied().ok_or_else(|| LookupMiss {
            city: city.to_string(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
