//! # Monthly Rollup
//!
//! A library for keeping a table of monthly values consistent while it is
//! being edited cell by cell.
//!
//! ## Core Concepts
//!
//! - **Flat table**: one row per entity with twelve monthly values, a `total`
//!   and a rounded `average`
//! - **Hierarchy**: rows grouped by a path of labels; a group's months are the
//!   sums of its children's months
//! - **Detail edit**: changing a month recomputes the row total (and, in a
//!   hierarchy, every ancestor up to the root)
//! - **Aggregate edit**: changing a flat row's total redistributes it across
//!   the months, with the integer remainder placed on January
//!
//! ## Example
//!
//! ```rust
//! use monthly_rollup::*;
//!
//! let records = vec![SourceRecord::new("Alice")
//!     .with_value("Jan", 100)
//!     .with_value("Feb", 100)];
//! let mut table = load_flat(&records, &RollupConfig::default()).unwrap();
//!
//! let row = table
//!     .apply_edit(&EditRequest::new("Alice", "total", 2405.0))
//!     .unwrap();
//! assert_eq!(row.record.value(Period::Jan), 205.0);
//! assert_eq!(row.total(), 2405.0);
//! ```

pub mod aggregator;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod hierarchy;
pub mod ingestion;
pub mod period;
pub mod propagation;
pub mod record;
pub mod redistributor;
pub mod schema;
pub mod table;
pub mod tree;
pub mod utils;
pub mod view;

pub use aggregator::{coerce_json, coerce_numeric, compute_average, compute_total, round_to};
pub use config::{PropagationStrategy, RollupConfig};
pub use dispatcher::{classify_field, Dataset, EditKind, EditOutcome};
pub use error::{Result, RollupError};
pub use hierarchy::{HierarchyIndex, NodeId};
pub use ingestion::*;
pub use period::{Period, PeriodValues, PERIOD_COUNT};
pub use propagation::{propagate, verify_rollup, RollupViolation};
pub use record::{FlatRow, Record, TreeNode};
pub use redistributor::{apply_allocation, redistribute, Allocation};
pub use schema::*;
pub use table::FlatTable;
pub use tree::TreeStore;
pub use view::{range_totals, search_rows, search_tree, NameFilter, PeriodRange, RangeTotal};
