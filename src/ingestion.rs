use crate::aggregator::coerce_period_fields;
use crate::config::RollupConfig;
use crate::error::{RollupError, Result};
use crate::period::PeriodValues;
use crate::record::{FlatRow, Record, TreeNode};
use crate::schema::SourceRecord;
use crate::table::FlatTable;
use crate::tree::TreeStore;
use log::{debug, info};
use std::collections::HashSet;

pub fn parse_source_json(raw: &str) -> Result<Vec<SourceRecord>> {
    Ok(serde_json::from_str(raw)?)
}

/// Materializes a flat table. Any `path` on the source records is ignored.
pub fn load_flat(records: &[SourceRecord], config: &RollupConfig) -> Result<FlatTable> {
    config.validate()?;

    let rows = records
        .iter()
        .map(|source| {
            let record = Record::new(source.name.clone(), coerce_period_fields(&source.fields));
            FlatRow::new(record, config.average_decimals)
        })
        .collect();

    let table = FlatTable::new(rows, config.clone())?;
    info!("Loaded flat table with {} rows", table.len());
    Ok(table)
}

/// Materializes a hierarchical dataset and derives every group's values.
///
/// Each record needs a non-empty `path`. A path whose parent prefix has no
/// record is rejected unless `synthesize_missing_ancestors` is set, in which
/// case an empty group node is inserted just before the first record that
/// needs it.
pub fn load_tree(records: &[SourceRecord], config: &RollupConfig) -> Result<TreeStore> {
    config.validate()?;

    let declared: HashSet<&[String]> = records
        .iter()
        .filter_map(|r| r.path.as_deref())
        .collect();

    let mut synthesized: HashSet<Vec<String>> = HashSet::new();
    let mut nodes = Vec::with_capacity(records.len());

    for source in records {
        let path = match source.path.as_deref() {
            Some(path) if !path.is_empty() => path,
            _ => return Err(RollupError::InvalidPath(source.name.clone())),
        };
        if let Some(label) = path.last().filter(|label| **label != source.name) {
            return Err(RollupError::PathNameMismatch {
                record: source.name.clone(),
                label: label.clone(),
            });
        }

        if config.synthesize_missing_ancestors {
            for len in 1..path.len() {
                let prefix = &path[..len];
                if declared.contains(prefix) || synthesized.contains(prefix) {
                    continue;
                }
                debug!("Synthesizing group node for '{}'", prefix.join(" / "));
                synthesized.insert(prefix.to_vec());
                nodes.push(TreeNode::new(
                    Record::new(prefix[len - 1].clone(), PeriodValues::default()),
                    prefix.to_vec(),
                ));
            }
        }

        let record = Record::new(source.name.clone(), coerce_period_fields(&source.fields));
        nodes.push(TreeNode::new(record, path.to_vec()));
    }

    let store = TreeStore::new(nodes, config.clone())?;
    info!(
        "Loaded hierarchy with {} nodes ({} synthesized) under {} root(s)",
        store.len(),
        synthesized.len(),
        store.index().roots().len()
    );
    Ok(store)
}

pub fn load_flat_from_json(raw: &str, config: &RollupConfig) -> Result<FlatTable> {
    load_flat(&parse_source_json(raw)?, config)
}

pub fn load_tree_from_json(raw: &str, config: &RollupConfig) -> Result<TreeStore> {
    load_tree(&parse_source_json(raw)?, config)
}
