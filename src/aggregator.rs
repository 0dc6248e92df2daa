use crate::period::{Period, PeriodValues};
use crate::schema::CellValue;
use log::debug;
use serde_json::Value;
use std::collections::BTreeMap;

pub const DEFAULT_AVERAGE_DECIMALS: u32 = 2;

/// Converts an arbitrary cell input to a number. Never fails: anything that
/// is not a finite number (or a string parsing to one) becomes 0.
pub fn coerce_numeric(value: &CellValue) -> f64 {
    match value {
        CellValue::Number(n) if n.is_finite() => *n,
        CellValue::Text(s) => coerce_str(s),
        CellValue::Other(v) => coerce_json(v),
        CellValue::Number(n) => fallback(&n.to_string()),
    }
}

/// Same rule as [`coerce_numeric`], applied to a raw JSON value.
pub fn coerce_json(value: &Value) -> f64 {
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.is_finite() => f,
            _ => fallback(&n.to_string()),
        },
        Value::String(s) => coerce_str(s),
        other => fallback(&other.to_string()),
    }
}

fn coerce_str(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(f) if f.is_finite() => f,
        _ => fallback(raw),
    }
}

fn fallback(raw: &str) -> f64 {
    debug!("NumericCoercionFallback: treating {:?} as 0", raw);
    0.0
}

/// Reads the twelve period fields out of a raw source map. Missing keys are 0.
pub fn coerce_period_fields(raw: &BTreeMap<String, Value>) -> PeriodValues {
    let mut values = PeriodValues::default();
    for period in Period::ALL {
        if let Some(v) = raw.get(period.name()) {
            values[period] = coerce_json(v);
        }
    }
    values
}

pub fn compute_total(values: &PeriodValues, fields: &[Period]) -> f64 {
    fields.iter().map(|&p| values[p]).sum()
}

pub fn compute_average(total: f64, count: usize) -> f64 {
    compute_average_with(total, count, DEFAULT_AVERAGE_DECIMALS)
}

pub fn compute_average_with(total: f64, count: usize, decimals: u32) -> f64 {
    if count == 0 {
        return 0.0;
    }
    round_to(total / count as f64, decimals)
}

/// Rounds half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
