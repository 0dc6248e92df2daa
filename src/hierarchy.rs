//! Path-based parent/child index over an arena of hierarchical records.
//!
//! Node ids are positions in the arena the index was built from, so the
//! index owns the structure and the records own only their values. There are
//! no back-pointers: every upward or downward step is an index lookup.

use crate::error::{RollupError, Result};
use serde::Serialize;
use std::collections::HashMap;

pub const PATH_SEPARATOR: &str = " / ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct HierarchyIndex {
    paths: Vec<Vec<String>>,
    parents: Vec<Option<NodeId>>,
    children: Vec<Vec<NodeId>>,
    roots: Vec<NodeId>,
    by_path: HashMap<Vec<String>, NodeId>,
}

impl HierarchyIndex {
    /// Builds the index from one path per node, in arena order.
    ///
    /// Every strict prefix of length `len - 1` must itself be one of the
    /// paths; the index never invents nodes.
    pub fn build(paths: &[Vec<String>]) -> Result<Self> {
        let mut by_path = HashMap::with_capacity(paths.len());

        for (i, path) in paths.iter().enumerate() {
            if path.is_empty() {
                return Err(RollupError::InvalidPath(format!("record #{}", i)));
            }
            if by_path.insert(path.clone(), NodeId(i)).is_some() {
                return Err(RollupError::DuplicateRecord(join_path(path)));
            }
        }

        let mut parents = vec![None; paths.len()];
        let mut children = vec![Vec::new(); paths.len()];
        let mut roots = Vec::new();

        for (i, path) in paths.iter().enumerate() {
            let id = NodeId(i);
            if path.len() == 1 {
                roots.push(id);
                continue;
            }

            let prefix = &path[..path.len() - 1];
            let parent = *by_path
                .get(prefix)
                .ok_or_else(|| RollupError::MissingParent {
                    record: join_path(path),
                    parent: join_path(prefix),
                })?;

            parents[i] = Some(parent);
            children[parent.index()].push(id);
        }

        Ok(Self {
            paths: paths.to_vec(),
            parents,
            children,
            roots,
            by_path,
        })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Children in source order.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        &self.children[id.index()]
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.children[id.index()].is_empty()
    }

    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.parents[id.index()]
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn path_of(&self, id: NodeId) -> &[String] {
        &self.paths[id.index()]
    }

    /// Zero for roots.
    pub fn depth(&self, id: NodeId) -> usize {
        self.paths[id.index()].len() - 1
    }

    pub fn find(&self, path: &[String]) -> Option<NodeId> {
        self.by_path.get(path).copied()
    }

    /// Walks from the parent of `id` up to its root, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            index: self,
            next: self.parent_of(id),
        }
    }

    /// Every node below `id` in depth-first pre-order, excluding `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children_of(id).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children_of(node).iter().rev().copied());
        }
        out
    }

    /// All nodes in depth-first pre-order, forest roots in source order.
    pub fn walk(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.len());
        for &root in &self.roots {
            out.push(root);
            out.extend(self.descendants(root));
        }
        out
    }
}

pub struct Ancestors<'a> {
    index: &'a HierarchyIndex,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.index.parent_of(current);
        Some(current)
    }
}

pub fn join_path(path: &[String]) -> String {
    path.join(PATH_SEPARATOR)
}
