// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use comfy_table::{Cell, CellAlignment, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Installs the stderr tracing subscriber. `RUST_LOG` wins over `verbosity`
/// (-1 quiet, 0 default, 1 info, 2+ debug).
pub fn init_tracing(verbosity: i8) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt};

        let level = match verbosity {
            i8::MIN..=-1 => "error",
            0 => "warn",
            1 => "info",
            _ => "debug",
        };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("orderlens={}", level)));

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Fixed `dp` decimals with thousands separators: `1234.5` -> `1,234.50`.
pub fn format_currency(d: Decimal, dp: u32) -> String {
    let rounded = d.round_dp(dp);
    let plain = format!("{:.*}", dp as usize, rounded);
    let (sign, digits) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain.as_str()),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_zero() { "" } else { sign };
    match frac_part {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

pub fn fmt_money(d: Decimal, symbol: &str, dp: u32) -> String {
    let s = format_currency(d, dp);
    match s.strip_prefix('-') {
        Some(rest) => format!("-{}{}", symbol, rest),
        None => format!("{}{}", symbol, s),
    }
}

/// The name up to (not including) the first delimiter character; the whole
/// name when no delimiter occurs.
pub fn truncate_name<'a>(name: &'a str, delimiters: &str) -> &'a str {
    match name.find(|c: char| delimiters.contains(c)) {
        Some(idx) => &name[..idx],
        None => name,
    }
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

const BAR_WIDTH: usize = 40;

/// Horizontal bar chart: one row per label, bar length proportional to the
/// largest value.
pub fn bar_chart(label_header: &str, value_header: &str, bars: &[(String, Decimal, String)]) -> Table {
    let max = bars
        .iter()
        .map(|(_, v, _)| *v)
        .max()
        .unwrap_or(Decimal::ZERO);

    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(vec![
        Cell::new(label_header),
        Cell::new(""),
        Cell::new(value_header),
    ]);
    for (label, value, shown) in bars {
        let len = if max > Decimal::ZERO && *value > Decimal::ZERO {
            (*value / max * Decimal::from(BAR_WIDTH))
                .round()
                .to_usize()
                .unwrap_or(0)
                .max(1)
        } else {
            0
        };
        t.add_row(vec![
            Cell::new(label),
            Cell::new("█".repeat(len)),
            Cell::new(shown).set_alignment(CellAlignment::Right),
        ]);
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
