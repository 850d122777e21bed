//! # Interval Reports
//!
//! Formatting of interval sets for humans and for other programs:
//!
//! - [`text_report`]: one line per interval,
//!   `x = [min, max] (central -neg +pos) @0.68CL, [unit], method`,
//! - [`key_value_report`]: a Python dictionary literal keyed by confidence level,
//! - [`json_report`]: the same records as JSON.
//!
//! All of them print bounds with the number of decimals chosen by [`Rounder`].
//! The engine itself never formats anything.

use super::cl_interval::ClInterval;
use super::config::ReportConfig;
use super::set::ClIntervalSet;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Number of decimals needed to show `value` with `sigdigits` significant
/// digits, at most 10. Zero needs one decimal.
///
/// The count is taken twice, the second time on the value rounded to the
/// first count, so that 9.97 at two significant digits gives "10" rather
/// than "10.0".
pub fn calc_nsubdigits(value: f64, sigdigits: u32) -> usize {
    if value == 0.0 {
        return 1;
    }
    let count = shifts_to_significance(value, sigdigits);
    let rounded: f64 = format!("{:.*}", count, value).parse().unwrap_or(value);
    if rounded == 0.0 {
        return 1;
    }
    shifts_to_significance(rounded, sigdigits)
}

fn shifts_to_significance(mut value: f64, sigdigits: u32) -> usize {
    let limit = 10f64.powi(sigdigits as i32 - 1);
    let mut count = 0;
    while value.abs() < limit && count < 10 {
        value *= 10.0;
        count += 1;
    }
    count
}

/// Round `value` to `digits` decimals.
pub fn round_to(value: f64, digits: usize) -> f64 {
    format!("{:.*}", digits, value).parse().unwrap_or(value)
}

/// Rounds an interval consistently: bounds and central value are rounded to
/// the same number of decimals, and the errors are computed from the rounded
/// values so that `central - neg` reproduces the printed lower bound.
#[derive(Debug, Clone, Copy)]
pub struct Rounder {
    min: f64,
    max: f64,
    central: f64,
    digits: usize,
}

impl Rounder {
    /// With `fixed_digits` unset, the number of decimals is the larger one
    /// needed to show either error with two significant digits.
    pub fn new(min: f64, max: f64, central: f64, fixed_digits: Option<usize>) -> Self {
        let digits = fixed_digits.unwrap_or_else(|| {
            calc_nsubdigits((central - min).abs(), 2).max(calc_nsubdigits((central - max).abs(), 2))
        });
        Self {
            min,
            max,
            central,
            digits,
        }
    }

    pub fn digits(&self) -> usize {
        self.digits
    }

    pub fn min(&self) -> f64 {
        round_to(self.min, self.digits)
    }

    pub fn max(&self) -> f64 {
        round_to(self.max, self.digits)
    }

    pub fn central(&self) -> f64 {
        round_to(self.central, self.digits)
    }

    pub fn neg_error(&self) -> f64 {
        (self.central() - self.min()).abs()
    }

    pub fn pos_error(&self) -> f64 {
        (self.central() - self.max()).abs()
    }
}

/// One printed interval, rounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalRecord {
    pub var: String,
    pub min: f64,
    pub max: f64,
    pub central: f64,
    pub neg: f64,
    pub pos: f64,
    pub cl: f64,
    pub unit: String,
    pub method: String,
    pub closed: bool,
    /// Decimals the values were rounded to.
    pub digits: usize,
}

impl IntervalRecord {
    pub fn new(cli: &ClInterval, config: &ReportConfig) -> Self {
        let (min, max, central, unit) = if config.degrees {
            (
                cli.min.to_degrees(),
                cli.max.to_degrees(),
                cli.central.to_degrees(),
                "Deg".to_string(),
            )
        } else {
            (cli.min, cli.max, cli.central, config.unit.clone())
        };
        let rounder = Rounder::new(min, max, central, config.digits);
        Self {
            var: config.var.clone(),
            min: rounder.min(),
            max: rounder.max(),
            central: rounder.central(),
            neg: rounder.neg_error(),
            pos: rounder.pos_error(),
            cl: cli.confidence_level(),
            unit,
            method: config.method.clone(),
            closed: cli.is_closed(),
            digits: rounder.digits(),
        }
    }
}

/// Format a single interval as a report line, without a trailing newline.
pub fn interval_line(cli: &ClInterval, config: &ReportConfig) -> String {
    let r = IntervalRecord::new(cli, config);
    let d = r.digits;
    let mut line = format!(
        "{} = [{:7.*}, {:7.*}] ({:7.*} -{:7.*} +{:7.*}) @{:3.2}CL",
        r.var, d, r.min, d, r.max, d, r.central, d, r.neg, d, r.pos, r.cl
    );
    if !r.unit.is_empty() {
        let _ = write!(line, ", [{}]", r.unit);
    }
    if !r.closed {
        line.push_str(" (not closed)");
    }
    let _ = write!(line, ", {}", r.method);
    if config.verbose {
        let _ = write!(
            line,
            ", central: {}, interval: [{}, {}], p(central): {}",
            cli.central_method, cli.min_method, cli.max_method, cli.pvalue_at_central
        );
    }
    line
}

/// Text report of all intervals of all sets, one line each.
pub fn text_report(sets: &[ClIntervalSet], config: &ReportConfig) -> String {
    let mut out = String::new();
    for cli in sets.iter().flatten() {
        out.push_str(&interval_line(cli, config));
        out.push('\n');
    }
    out
}

/// Python module defining an `intervals` dictionary that maps each
/// confidence level (two decimals) to the list of its interval records.
/// Levels without intervals are left out.
pub fn key_value_report(sets: &[ClIntervalSet], config: &ReportConfig) -> String {
    let mut out = String::from("# Confidence Intervals\nintervals = {\n");
    let mut first_level = true;
    for set in sets.iter().filter(|s| !s.is_empty()) {
        if !first_level {
            out.push_str("  ],\n");
        }
        first_level = false;
        let _ = writeln!(out, "  '{:.2}' : [", set.confidence_level());
        for cli in set {
            let r = IntervalRecord::new(cli, config);
            let d = r.digits;
            let _ = writeln!(
                out,
                "    {{'var':'{}', 'min':'{:.*}', 'max':'{:.*}', 'central':'{:.*}', \
                 'neg':'{:.*}', 'pos':'{:.*}', 'cl':'{:.2}', 'unit':'{}', 'method':'{}'}},",
                r.var, d, r.min, d, r.max, d, r.central, d, r.neg, d, r.pos, r.cl, r.unit, r.method
            );
        }
    }
    if !first_level {
        out.push_str("  ]\n");
    }
    out.push_str("}\n");
    out
}

/// Interval records grouped by confidence level (two decimals).
pub fn records_by_level(
    sets: &[ClIntervalSet],
    config: &ReportConfig,
) -> BTreeMap<String, Vec<IntervalRecord>> {
    let mut map: BTreeMap<String, Vec<IntervalRecord>> = BTreeMap::new();
    for set in sets {
        let key = format!("{:.2}", set.confidence_level());
        let records = map.entry(key).or_default();
        records.extend(set.iter().map(|cli| IntervalRecord::new(cli, config)));
    }
    map
}

/// JSON object mapping each confidence level to its interval records.
pub fn json_report(sets: &[ClIntervalSet], config: &ReportConfig) -> Result<String> {
    Ok(serde_json::to_string_pretty(&records_by_level(sets, config))?)
}
