//! Keeps ancestor roll-ups consistent after a leaf changes.

use crate::config::PropagationStrategy;
use crate::hierarchy::{join_path, HierarchyIndex, NodeId};
use crate::period::{Period, PeriodValues};
use crate::record::TreeNode;
use log::debug;

/// Refreshes the edited leaf's total, then every ancestor up to its root.
///
/// `previous` holds the leaf's values before the edit; only the `Delta`
/// strategy reads it, to restrict the work to the periods that changed and to
/// the stored values of each ancestor's immediate children. Returns the leaf
/// followed by each updated ancestor, nearest first.
pub fn propagate(
    index: &HierarchyIndex,
    nodes: &mut [TreeNode],
    leaf: NodeId,
    previous: &PeriodValues,
    strategy: PropagationStrategy,
) -> Vec<NodeId> {
    nodes[leaf.index()].record.refresh_total();

    let ancestors: Vec<NodeId> = index.ancestors(leaf).collect();

    match strategy {
        PropagationStrategy::Resum => {
            for &ancestor in &ancestors {
                let mut sums = PeriodValues::default();
                for period in Period::ALL {
                    sums[period] = sum_children(index, nodes, ancestor, period);
                }
                let record = &mut nodes[ancestor.index()].record;
                record.values = sums;
                record.refresh_total();
            }
        }
        PropagationStrategy::Delta => {
            let current = nodes[leaf.index()].record.values;
            let changed: Vec<Period> = Period::ALL
                .into_iter()
                .filter(|&p| current[p] != previous[p])
                .collect();

            // Nearest ancestor first: its children are already exact when it is summed.
            for &ancestor in &ancestors {
                for &period in &changed {
                    let sum: f64 = index
                        .children_of(ancestor)
                        .iter()
                        .map(|c| nodes[c.index()].record.values[period])
                        .sum();
                    nodes[ancestor.index()].record.values[period] = sum;
                }
                nodes[ancestor.index()].record.refresh_total();
            }
        }
    }

    debug!(
        "Propagated edit on '{}' through {} ancestor(s) using {:?}",
        join_path(index.path_of(leaf)),
        ancestors.len(),
        strategy
    );

    let mut chain = Vec::with_capacity(ancestors.len() + 1);
    chain.push(leaf);
    chain.extend(ancestors);
    chain
}

/// Sum of `period` over the immediate children of `node`, descending into
/// internal children rather than trusting their stored value.
pub fn sum_children(
    index: &HierarchyIndex,
    nodes: &[TreeNode],
    node: NodeId,
    period: Period,
) -> f64 {
    index
        .children_of(node)
        .iter()
        .map(|&child| {
            if index.is_leaf(child) {
                nodes[child.index()].record.values[period]
            } else {
                sum_children(index, nodes, child, period)
            }
        })
        .sum()
}

/// Recomputes every node bottom-up. Used once after loading.
pub fn rollup_all(index: &HierarchyIndex, nodes: &mut [TreeNode]) {
    for id in index.walk().into_iter().rev() {
        if !index.is_leaf(id) {
            let mut sums = PeriodValues::default();
            for &child in index.children_of(id) {
                for (period, value) in nodes[child.index()].record.values.iter() {
                    sums[period] += value;
                }
            }
            nodes[id.index()].record.values = sums;
        }
        nodes[id.index()].record.refresh_total();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RollupViolation {
    pub path: String,
    pub field: String,
    pub expected: f64,
    pub actual: f64,
}

/// Checks both roll-up invariants: `total == sum(months)` on every node, and
/// each internal node's months equal the sum over its children.
pub fn verify_rollup(
    index: &HierarchyIndex,
    nodes: &[TreeNode],
    tolerance: f64,
) -> Vec<RollupViolation> {
    let mut violations = Vec::new();

    for id in index.walk() {
        let record = &nodes[id.index()].record;
        let path = join_path(index.path_of(id));

        let expected_total = record.values.sum();
        if (record.total - expected_total).abs() > tolerance {
            violations.push(RollupViolation {
                path: path.clone(),
                field: "total".to_string(),
                expected: expected_total,
                actual: record.total,
            });
        }

        if index.is_leaf(id) {
            continue;
        }

        for period in Period::ALL {
            let expected: f64 = index
                .children_of(id)
                .iter()
                .map(|c| nodes[c.index()].record.values[period])
                .sum();
            let actual = record.values[period];
            if (actual - expected).abs() > tolerance {
                violations.push(RollupViolation {
                    path: path.clone(),
                    field: period.name().to_string(),
                    expected,
                    actual,
                });
            }
        }
    }

    violations
}
