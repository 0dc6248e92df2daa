//! Read-only views over a dataset snapshot. Nothing here mutates records or
//! triggers propagation; every function borrows the dataset immutably.

use crate::aggregator::compute_total;
use crate::error::{RollupError, Result};
use crate::hierarchy::NodeId;
use crate::period::{Period, PeriodValues};
use crate::record::FlatRow;
use crate::table::FlatTable;
use crate::tree::TreeStore;
use crate::utils::parse_period_string;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::HashSet;

static CALENDAR: [Period; 12] = Period::ALL;

/// Case-insensitive substring match on record names. An empty filter
/// matches everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameFilter {
    needle: String,
}

impl NameFilter {
    pub fn new(text: &str) -> Self {
        Self {
            needle: text.to_lowercase(),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        self.needle.is_empty() || name.to_lowercase().contains(&self.needle)
    }
}

pub fn search_rows<'a>(table: &'a FlatTable, text: &str) -> Vec<&'a FlatRow> {
    let filter = NameFilter::new(text);
    table
        .rows()
        .iter()
        .filter(|row| filter.matches(row.name()))
        .collect()
}

/// Nodes to show for a tree search, depth-first: every matching node, its
/// ancestors (so it stays reachable) and its descendants.
pub fn search_tree(store: &TreeStore, text: &str) -> Vec<NodeId> {
    let filter = NameFilter::new(text);
    let index = store.index();
    let mut keep = HashSet::new();

    for id in index.walk() {
        if filter.matches(store.node(id).name()) {
            keep.insert(id);
            keep.extend(index.ancestors(id));
            keep.extend(index.descendants(id));
        }
    }

    index.walk().into_iter().filter(|id| keep.contains(id)).collect()
}

/// A contiguous run of months within one calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodRange {
    start: Period,
    end: Period,
}

impl PeriodRange {
    pub fn new(start: Period, end: Period) -> Result<Self> {
        if start > end {
            return Err(RollupError::InvalidPeriodRange(format!(
                "{} comes after {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn full_year() -> Self {
        Self {
            start: Period::Jan,
            end: Period::Dec,
        }
    }

    /// Accepts "YYYY-MM" or "YYYY-MM:YYYY-MM" within a single year.
    pub fn parse(raw: &str) -> Result<Self> {
        let (start, end) = parse_period_string(raw)?;
        Self::from_dates(start, end)
    }

    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start.year() != end.year() {
            return Err(RollupError::InvalidPeriodRange(format!(
                "{} and {} are in different years",
                start, end
            )));
        }
        Self::new(Period::of_date(start), Period::of_date(end))
    }

    pub fn start(&self) -> Period {
        self.start
    }

    pub fn end(&self) -> Period {
        self.end
    }

    pub fn periods(&self) -> &'static [Period] {
        &CALENDAR[self.start.index()..=self.end.index()]
    }

    pub fn contains(&self, period: Period) -> bool {
        self.start <= period && period <= self.end
    }

    pub fn total(&self, values: &PeriodValues) -> f64 {
        compute_total(values, self.periods())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeTotal {
    pub name: String,
    pub total: f64,
}

pub fn range_totals(table: &FlatTable, range: PeriodRange) -> Vec<RangeTotal> {
    table
        .rows()
        .iter()
        .map(|row| RangeTotal {
            name: row.name().to_string(),
            total: range.total(&row.record.values),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RollupConfig;
    use crate::record::{Record, TreeNode};

    fn table() -> FlatTable {
        let rows = ["Alice", "alina", "Bob"]
            .iter()
            .map(|name| FlatRow::new(Record::new(*name, PeriodValues::splat(10.0)), 2))
            .collect();
        FlatTable::new(rows, RollupConfig::default()).unwrap()
    }

    fn tree() -> TreeStore {
        let nodes = [
            vec!["North"],
            vec!["North", "Sales"],
            vec!["North", "Sales", "Alice"],
            vec!["North", "Ops"],
            vec!["South"],
        ]
        .iter()
        .map(|p| {
            let path: Vec<String> = p.iter().map(|s| s.to_string()).collect();
            TreeNode::new(
                Record::new(path.last().unwrap().clone(), PeriodValues::splat(1.0)),
                path,
            )
        })
        .collect();
        TreeStore::new(nodes, RollupConfig::default()).unwrap()
    }

    #[test]
    fn test_search_rows_case_insensitive() {
        let table = table();
        let names: Vec<&str> = search_rows(&table, "ALI").iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["Alice", "alina"]);
        assert_eq!(search_rows(&table, "").len(), 3);
        assert!(search_rows(&table, "zed").is_empty());
    }

    #[test]
    fn test_search_tree_keeps_ancestors_and_descendants() {
        let store = tree();
        let names: Vec<&str> = search_tree(&store, "alice")
            .into_iter()
            .map(|id| store.node(id).name())
            .collect();
        assert_eq!(names, vec!["North", "Sales", "Alice"]);

        let names: Vec<&str> = search_tree(&store, "sales")
            .into_iter()
            .map(|id| store.node(id).name())
            .collect();
        assert_eq!(names, vec!["North", "Sales", "Alice"]);
    }

    #[test]
    fn test_search_does_not_touch_values() {
        let store = tree();
        let before = store.nodes().to_vec();
        let _ = search_tree(&store, "o");
        assert_eq!(store.nodes(), before.as_slice());
    }

    #[test]
    fn test_period_range_parse() {
        let q1 = PeriodRange::parse("2024-01:2024-03").unwrap();
        assert_eq!(q1.periods(), &[Period::Jan, Period::Feb, Period::Mar]);
        assert!(q1.contains(Period::Feb));
        assert!(!q1.contains(Period::Apr));

        let single = PeriodRange::parse("2024-07").unwrap();
        assert_eq!(single.periods(), &[Period::Jul]);
    }

    #[test]
    fn test_period_range_rejects_bad_input() {
        assert!(matches!(
            PeriodRange::parse("2023-11:2024-02"),
            Err(RollupError::InvalidPeriodRange(_))
        ));
        assert!(PeriodRange::parse("2024-05:2024-02").is_err());
        assert!(PeriodRange::new(Period::Dec, Period::Jan).is_err());
    }

    #[test]
    fn test_range_totals() {
        let table = table();
        let totals = range_totals(&table, PeriodRange::parse("2024-01:2024-06").unwrap());
        assert_eq!(totals.len(), 3);
        assert!(totals.iter().all(|t| t.total == 60.0));
        assert_eq!(PeriodRange::full_year().total(&PeriodValues::splat(2.0)), 24.0);
    }
}
