use crate::aggregator::coerce_numeric;
use crate::config::RollupConfig;
use crate::dispatcher::{classify_field, EditKind};
use crate::error::{RollupError, Result};
use crate::period::{Period, PERIOD_COUNT};
use crate::record::FlatRow;
use crate::redistributor::{apply_allocation, redistribute};
use crate::schema::EditRequest;
use log::{debug, warn};
use std::collections::HashMap;

/// Flat dataset: one row per entity, with total and average kept in step.
#[derive(Debug, Clone)]
pub struct FlatTable {
    rows: Vec<FlatRow>,
    by_name: HashMap<String, usize>,
    config: RollupConfig,
}

impl FlatTable {
    pub fn new(rows: Vec<FlatRow>, config: RollupConfig) -> Result<Self> {
        let mut by_name = HashMap::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            if by_name.insert(row.name().to_string(), i).is_some() {
                return Err(RollupError::DuplicateRecord(row.name().to_string()));
            }
        }

        Ok(Self {
            rows,
            by_name,
            config,
        })
    }

    pub fn rows(&self) -> &[FlatRow] {
        &self.rows
    }

    pub fn get(&self, name: &str) -> Option<&FlatRow> {
        self.by_name.get(name).map(|&i| &self.rows[i])
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn config(&self) -> &RollupConfig {
        &self.config
    }

    /// Applies one cell edit and returns the updated row.
    ///
    /// Month edits refresh total and average. Total and average edits are
    /// redistributed over the twelve months in calendar order. A rejected
    /// edit leaves the table untouched.
    pub fn apply_edit(&mut self, request: &EditRequest) -> Result<FlatRow> {
        let kind = classify_field(&request.target, &request.field).map_err(|e| {
            warn!("Rejected edit on '{}': {}", request.target, e);
            e
        })?;
        let value = coerce_numeric(&request.new_value);

        match kind {
            EditKind::Period(period) => self.set_period(&request.target, period, value),
            EditKind::Total => self.set_total(&request.target, value),
            EditKind::Average => self.set_total(&request.target, value * PERIOD_COUNT as f64),
        }
    }

    pub fn set_period(&mut self, name: &str, period: Period, value: f64) -> Result<FlatRow> {
        let idx = self.position(name)?;
        let decimals = self.config.average_decimals;
        let row = &mut self.rows[idx];

        row.record.values[period] = value;
        row.record.refresh_total();
        row.refresh_average(decimals);

        debug!(
            "Set {} of '{}' to {}; total is now {}",
            period, name, value, row.record.total
        );
        Ok(row.clone())
    }

    /// Spreads `total` over the months; the total itself is stored verbatim.
    pub fn set_total(&mut self, name: &str, total: f64) -> Result<FlatRow> {
        let idx = self.position(name)?;
        let allocation = redistribute(total, &Period::ALL)?;
        let decimals = self.config.average_decimals;
        let row = &mut self.rows[idx];

        apply_allocation(&mut row.record.values, &allocation);
        row.record.total = total;
        row.refresh_average(decimals);

        debug!("Redistributed total {} across the months of '{}'", total, name);
        Ok(row.clone())
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.by_name.get(name).copied().ok_or_else(|| {
            warn!("Rejected edit: no record named '{}'", name);
            RollupError::UnknownRecord(name.to_string())
        })
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.rows)
    }

    pub fn to_csv(&self) -> String {
        let mut output = String::new();
        output.push_str("Name,Total,Average");
        for period in Period::ALL {
            output.push(',');
            output.push_str(period.name());
        }
        output.push('\n');

        for row in &self.rows {
            output.push_str(&format!(
                "{},{:.2},{:.2}",
                csv_field(row.name()),
                row.total(),
                row.average
            ));
            for (_, value) in row.record.values.iter() {
                output.push_str(&format!(",{:.2}", value));
            }
            output.push('\n');
        }

        output
    }

    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str("| Name | Total | Average |");
        for period in Period::ALL {
            output.push_str(&format!(" {} |", period));
        }
        output.push('\n');
        output.push_str(&"|---".repeat(PERIOD_COUNT + 3));
        output.push_str("|\n");

        for row in &self.rows {
            output.push_str(&format!(
                "| {} | {:.2} | {:.2} |",
                row.name(),
                row.total(),
                row.average
            ));
            for (_, value) in row.record.values.iter() {
                output.push_str(&format!(" {:.2} |", value));
            }
            output.push('\n');
        }

        output
    }
}

fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}
