//! Graph model for roles and playbooks.
//!
//! `RolesGraph` owns the node set, the deduplicated edge set and the exclusion
//! filter for one run. Insertion is idempotent: adding a node twice or linking
//! the same `(from, to)` pair twice leaves the graph unchanged, and every
//! insertion is checked against the filter first.
//!
//! A graph is normally produced by `graph::resolver::Resolver` and then handed
//! to `crate::visualization` for rendering.
use crate::errors::GraphError;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

pub mod resolver;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Role,
    Playbook,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
}

/// Relation that produced an edge. Informational only: edge identity is the
/// `(from, to)` pair, so the first kind discovered for a pair is the one kept.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Dependency,
    Include,
    Import,
}

impl EdgeKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EdgeKind::Dependency => "dependency",
            EdgeKind::Include => "include",
            EdgeKind::Import => "import",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
}

/// Names that must never appear in the graph, neither as a node nor as an edge endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionFilter {
    names: HashSet<String>,
}

impl ExclusionFilter {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut filter = Self::default();
        filter.extend(names);
        filter
    }

    /// Parse a colon- or comma-separated list such as `common:logging,ntp`.
    /// Blank items are dropped and surrounding whitespace is trimmed.
    #[must_use]
    pub fn parse(list: &str) -> Self {
        Self::new(list.split([':', ',']))
    }

    pub fn extend<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name: String = name.into();
            let trimmed = name.trim();
            if !trimmed.is_empty() {
                self.names.insert(trimmed.to_string());
            }
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RolesGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    // name -> position in `nodes`
    #[serde(skip)]
    node_index: HashMap<String, usize>,
    #[serde(skip)]
    links: HashSet<(String, String)>,
    #[serde(skip)]
    filter: ExclusionFilter,
}

impl RolesGraph {
    #[must_use]
    pub fn new(filter: ExclusionFilter) -> Self {
        Self { filter, ..Self::default() }
    }

    /// Insert a role node. Returns `true` only when a new node was created.
    pub fn add_role(&mut self, name: &str) -> bool {
        self.add_node(name, NodeKind::Role)
    }

    /// Insert a playbook node. Returns `true` only when a new node was created.
    pub fn add_playbook(&mut self, name: &str) -> bool {
        self.add_node(name, NodeKind::Playbook)
    }

    fn add_node(&mut self, name: &str, kind: NodeKind) -> bool {
        if self.filter.contains(name) || self.node_index.contains_key(name) {
            return false;
        }
        self.node_index.insert(name.to_string(), self.nodes.len());
        self.nodes.push(Node { name: name.to_string(), kind });
        true
    }

    /// Link `from` to `to`. Returns `Ok(true)` when a new edge was created,
    /// `Ok(false)` when an endpoint is excluded or the pair already exists.
    ///
    /// # Errors
    /// Returns `GraphError::UnknownNode` when a non-excluded endpoint was never added.
    pub fn link_roles(&mut self, from: &str, to: &str, kind: EdgeKind) -> Result<bool, GraphError> {
        if self.filter.contains(from) || self.filter.contains(to) {
            return Ok(false);
        }
        for name in [from, to] {
            if !self.node_index.contains_key(name) {
                return Err(GraphError::UnknownNode { name: name.to_string() });
            }
        }
        if !self.links.insert((from.to_string(), to.to_string())) {
            return Ok(false);
        }
        self.edges.push(Edge { from: from.to_string(), to: to.to_string(), kind });
        Ok(true)
    }

    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[must_use]
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.node_index.get(name).and_then(|&i| self.nodes.get(i))
    }

    #[must_use]
    pub fn contains_node(&self, name: &str) -> bool {
        self.node_index.contains_key(name)
    }

    #[must_use]
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.links.contains(&(from.to_string(), to.to_string()))
    }

    #[must_use]
    pub fn filter(&self) -> &ExclusionFilter {
        &self.filter
    }

    /// Build a fresh graph from role directories and/or playbook files.
    ///
    /// # Errors
    /// Returns the first `GraphError` met while resolving (see `resolver::Resolver`).
    pub fn build_from_targets<P: AsRef<std::path::Path>>(
        targets: &[P],
        filter: ExclusionFilter,
    ) -> Result<Self, GraphError> {
        let mut resolver = resolver::Resolver::new(filter);
        resolver.resolve_targets(targets)?;
        Ok(resolver.into_graph())
    }

    /// Save the node/edge description as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns `GraphError::Io` if serialization or writing the file fails.
    pub fn save_json(&self, path: &std::path::Path) -> Result<(), GraphError> {
        let data = serde_json::to_string_pretty(self)
            .map_err(|e| GraphError::Io(std::io::Error::other(e.to_string())))?;
        std::fs::write(path, data)?;
        Ok(())
    }
}
