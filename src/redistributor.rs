use crate::error::{RollupError, Result};
use crate::period::{Period, PeriodValues};

/// Per-field values produced by [`redistribute`], in caller order.
pub type Allocation = Vec<(Period, f64)>;

/// Splits `new_total` across `fields` using floor division.
///
/// Every field receives `floor(new_total / n)`; the remainder
/// `new_total - base * n` goes entirely to the first field. With floor
/// semantics the remainder is never negative, so a total of `-5` over twelve
/// fields yields `-1` everywhere and `6` on the first field.
pub fn redistribute(new_total: f64, fields: &[Period]) -> Result<Allocation> {
    if fields.is_empty() {
        return Err(RollupError::InvalidArity);
    }

    let n = fields.len() as f64;
    let base = (new_total / n).floor();
    let remainder = new_total - base * n;

    Ok(fields
        .iter()
        .enumerate()
        .map(|(i, &period)| {
            let value = if i == 0 { base + remainder } else { base };
            (period, value)
        })
        .collect())
}

pub fn apply_allocation(values: &mut PeriodValues, allocation: &[(Period, f64)]) {
    for &(period, value) in allocation {
        values[period] = value;
    }
}
