use crate::aggregator::{compute_average_with, compute_total};
use crate::period::{Period, PeriodValues, PERIOD_COUNT};
use serde::Serialize;

/// A named entity with twelve monthly values and their derived total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub name: String,
    #[serde(flatten)]
    pub values: PeriodValues,
    pub total: f64,
}

impl Record {
    pub fn new(name: impl Into<String>, values: PeriodValues) -> Self {
        let mut record = Self {
            name: name.into(),
            values,
            total: 0.0,
        };
        record.refresh_total();
        record
    }

    pub fn refresh_total(&mut self) {
        self.total = compute_total(&self.values, &Period::ALL);
    }

    pub fn value(&self, period: Period) -> f64 {
        self.values[period]
    }
}

/// A row of a flat table: a record plus its rounded monthly average.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatRow {
    #[serde(flatten)]
    pub record: Record,
    pub average: f64,
}

impl FlatRow {
    pub fn new(record: Record, average_decimals: u32) -> Self {
        let mut row = Self {
            record,
            average: 0.0,
        };
        row.refresh_average(average_decimals);
        row
    }

    pub fn refresh_average(&mut self, decimals: u32) {
        self.average = compute_average_with(self.record.total, PERIOD_COUNT, decimals);
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    pub fn total(&self) -> f64 {
        self.record.total
    }
}

/// A node of a hierarchical dataset. Internal nodes hold derived values only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    #[serde(flatten)]
    pub record: Record,
    pub path: Vec<String>,
}

impl TreeNode {
    pub fn new(record: Record, path: Vec<String>) -> Self {
        Self { record, path }
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    pub fn total(&self) -> f64 {
        self.record.total
    }

    pub fn value(&self, period: Period) -> f64 {
        self.record.values[period]
    }
}
