use crate::aggregator::coerce_numeric;
use crate::config::RollupConfig;
use crate::dispatcher::{classify_field, EditKind};
use crate::error::{RollupError, Result};
use crate::hierarchy::{join_path, HierarchyIndex, NodeId};
use crate::period::Period;
use crate::propagation::{propagate, rollup_all, verify_rollup, RollupViolation};
use crate::record::TreeNode;
use crate::schema::EditRequest;
use log::{debug, warn};

/// Hierarchical dataset: an arena of nodes plus the index describing it.
#[derive(Debug, Clone)]
pub struct TreeStore {
    index: HierarchyIndex,
    nodes: Vec<TreeNode>,
    config: RollupConfig,
}

impl TreeStore {
    /// Builds the index and derives every internal node from its leaves.
    pub fn new(mut nodes: Vec<TreeNode>, config: RollupConfig) -> Result<Self> {
        let paths: Vec<Vec<String>> = nodes.iter().map(|n| n.path.clone()).collect();
        let index = HierarchyIndex::build(&paths)?;
        rollup_all(&index, &mut nodes);

        Ok(Self {
            index,
            nodes,
            config,
        })
    }

    pub fn index(&self) -> &HierarchyIndex {
        &self.index
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// Panics if `id` did not come from this store; see [`TreeStore::get`].
    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.index()]
    }

    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn config(&self) -> &RollupConfig {
        &self.config
    }

    pub fn find(&self, path: &[String]) -> Option<NodeId> {
        self.index.find(path)
    }

    /// Locates an edit target by explicit path, or by name when the name is
    /// unique across the whole forest.
    pub fn resolve(&self, name: &str, path: Option<&[String]>) -> Result<NodeId> {
        if let Some(path) = path {
            return self
                .index
                .find(path)
                .ok_or_else(|| RollupError::UnknownRecord(join_path(path)));
        }

        let mut matches = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.name() == name)
            .map(|(i, _)| NodeId::new(i));

        match (matches.next(), matches.next()) {
            (Some(id), None) => Ok(id),
            (None, _) => Err(RollupError::UnknownRecord(name.to_string())),
            (Some(_), Some(_)) => Err(RollupError::AmbiguousTarget {
                name: name.to_string(),
                matches: 2 + matches.count(),
            }),
        }
    }

    /// Applies one cell edit and returns the edited leaf followed by its
    /// updated ancestors. Only leaf months are editable.
    pub fn apply_edit(&mut self, request: &EditRequest) -> Result<Vec<TreeNode>> {
        let checked = self
            .resolve(&request.target, request.path.as_deref())
            .and_then(|id| {
                classify_field(&request.target, &request.field).map(|kind| (id, kind))
            });

        let (id, kind) = checked.map_err(|e| {
            warn!("Rejected edit on '{}': {}", request.target, e);
            e
        })?;

        let period = match kind {
            EditKind::Period(period) => period,
            EditKind::Total | EditKind::Average => {
                warn!(
                    "Rejected {} edit on hierarchical record '{}'",
                    request.field, request.target
                );
                return Err(RollupError::not_allowed(
                    &request.target,
                    &request.field,
                    "aggregates of hierarchical records are derived",
                ));
            }
        };

        let value = coerce_numeric(&request.new_value);
        let chain = self.set_period(id, period, value)?;
        Ok(chain.into_iter().map(|id| self.node(id).clone()).collect())
    }

    pub fn set_period(&mut self, id: NodeId, period: Period, value: f64) -> Result<Vec<NodeId>> {
        if id.index() >= self.nodes.len() {
            return Err(RollupError::UnknownRecord(format!("node #{}", id.index())));
        }
        if !self.index.is_leaf(id) {
            let node = self.node(id);
            warn!("Rejected edit on internal node '{}'", join_path(&node.path));
            return Err(RollupError::not_allowed(
                node.name(),
                period.name(),
                "values of a node with children are derived from its children",
            ));
        }

        let previous = self.nodes[id.index()].record.values;
        self.nodes[id.index()].record.values[period] = value;

        debug!(
            "Set {} of '{}' to {}",
            period,
            join_path(self.index.path_of(id)),
            value
        );

        Ok(propagate(
            &self.index,
            &mut self.nodes,
            id,
            &previous,
            self.config.propagation,
        ))
    }

    pub fn verify(&self, tolerance: f64) -> Vec<RollupViolation> {
        verify_rollup(&self.index, &self.nodes, tolerance)
    }

    /// Nodes in depth-first order.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        let ordered: Vec<&TreeNode> = self
            .index
            .walk()
            .into_iter()
            .map(|id| self.node(id))
            .collect();
        serde_json::to_string_pretty(&ordered)
    }

    /// Indented outline, one line per node.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();
        for id in self.index.walk() {
            let node = self.node(id);
            let indent = "  ".repeat(self.index.depth(id));
            output.push_str(&format!("{}- {}: {:.2}", indent, node.name(), node.total()));
            if !self.index.is_leaf(id) {
                output.push_str(" (group)");
            }
            output.push('\n');
        }
        output
    }
}
