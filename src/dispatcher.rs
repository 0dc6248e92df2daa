use crate::error::{RollupError, Result};
use crate::period::Period;
use crate::record::{FlatRow, TreeNode};
use crate::schema::EditRequest;
use crate::table::FlatTable;
use crate::tree::TreeStore;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    /// A detail value; recompute the aggregate from it.
    Period(Period),
    /// The row total; redistribute it over the months.
    Total,
    /// The row average; treated as a total of `average * 12`.
    Average,
}

pub fn classify_field(target: &str, field: &str) -> Result<EditKind> {
    if let Some(period) = Period::parse(field) {
        return Ok(EditKind::Period(period));
    }

    match field.trim().to_lowercase().as_str() {
        "total" => Ok(EditKind::Total),
        "average" => Ok(EditKind::Average),
        "name" | "path" => Err(RollupError::not_allowed(
            target,
            field,
            "identity fields are read-only",
        )),
        _ => Err(RollupError::UnknownField(field.to_string())),
    }
}

/// What an edit changed, for the caller to re-render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EditOutcome {
    Row(FlatRow),
    /// The edited leaf followed by each updated ancestor, nearest first.
    Chain(Vec<TreeNode>),
}

/// Either shape of dataset behind one edit entry point.
#[derive(Debug, Clone)]
pub enum Dataset {
    Flat(FlatTable),
    Tree(TreeStore),
}

impl Dataset {
    pub fn apply_edit(&mut self, request: &EditRequest) -> Result<EditOutcome> {
        match self {
            Dataset::Flat(table) => table.apply_edit(request).map(EditOutcome::Row),
            Dataset::Tree(store) => store.apply_edit(request).map(EditOutcome::Chain),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Dataset::Flat(table) => table.len(),
            Dataset::Tree(store) => store.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        match self {
            Dataset::Flat(table) => table.to_json(),
            Dataset::Tree(store) => store.to_json(),
        }
    }
}
