//! The twelve monthly periods every record carries.
//!
//! Period order is significant: redistribution places its remainder on the
//! first period of the caller-supplied list, so the calendar order declared
//! here is the order used everywhere a "fixed ordered period list" is needed.

use crate::error::RollupError;
use chrono::{Datelike, NaiveDate};
use schemars::JsonSchema;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

pub const PERIOD_COUNT: usize = 12;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum Period {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Period {
    /// Calendar order, January first.
    pub const ALL: [Period; PERIOD_COUNT] = [
        Period::Jan,
        Period::Feb,
        Period::Mar,
        Period::Apr,
        Period::May,
        Period::Jun,
        Period::Jul,
        Period::Aug,
        Period::Sep,
        Period::Oct,
        Period::Nov,
        Period::Dec,
    ];

    const FULL_NAMES: [&'static str; PERIOD_COUNT] = [
        "january",
        "february",
        "march",
        "april",
        "may",
        "june",
        "july",
        "august",
        "september",
        "october",
        "november",
        "december",
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Short field name as it appears in source records (`"Jan"`).
    pub fn name(self) -> &'static str {
        match self {
            Period::Jan => "Jan",
            Period::Feb => "Feb",
            Period::Mar => "Mar",
            Period::Apr => "Apr",
            Period::May => "May",
            Period::Jun => "Jun",
            Period::Jul => "Jul",
            Period::Aug => "Aug",
            Period::Sep => "Sep",
            Period::Oct => "Oct",
            Period::Nov => "Nov",
            Period::Dec => "Dec",
        }
    }

    /// 1 = January, 12 = December.
    pub fn from_month(month: u32) -> Option<Period> {
        if (1..=12).contains(&month) {
            Some(Self::ALL[(month - 1) as usize])
        } else {
            None
        }
    }

    pub fn month_number(self) -> u32 {
        self.index() as u32 + 1
    }

    pub fn of_date(date: NaiveDate) -> Period {
        Self::ALL[date.month0() as usize]
    }

    /// Case-insensitive lookup by short (`"mar"`) or full (`"March"`) name.
    pub fn parse(field: &str) -> Option<Period> {
        let lower = field.trim().to_lowercase();
        Self::ALL.iter().copied().find(|p| {
            p.name().eq_ignore_ascii_case(&lower) || Self::FULL_NAMES[p.index()] == lower
        })
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Period {
    type Err = RollupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::parse(s).ok_or_else(|| RollupError::UnknownField(s.to_string()))
    }
}

/// One numeric value per period, stored in calendar order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PeriodValues([f64; PERIOD_COUNT]);

impl PeriodValues {
    pub fn splat(value: f64) -> Self {
        Self([value; PERIOD_COUNT])
    }

    pub fn get(&self, period: Period) -> f64 {
        self.0[period.index()]
    }

    pub fn set(&mut self, period: Period, value: f64) {
        self.0[period.index()] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Period, f64)> + '_ {
        Period::ALL.into_iter().map(move |p| (p, self.0[p.index()]))
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }
}

impl Index<Period> for PeriodValues {
    type Output = f64;

    fn index(&self, period: Period) -> &f64 {
        &self.0[period.index()]
    }
}

impl IndexMut<Period> for PeriodValues {
    fn index_mut(&mut self, period: Period) -> &mut f64 {
        &mut self.0[period.index()]
    }
}

// Serialized as `{"Jan": .., "Feb": .., ...}` so it can be flattened into a row.
impl Serialize for PeriodValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(PERIOD_COUNT))?;
        for (period, value) in self.iter() {
            map.serialize_entry(period.name(), &value)?;
        }
        map.end()
    }
}
