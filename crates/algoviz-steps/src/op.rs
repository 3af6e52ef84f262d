//! The operation model shared by every generator.
//!
//! An [`Operation`] describes one instant of an algorithm's execution. A
//! generator returns the full ordered trace of its run; the replay engine
//! consumes traces from every family the same way.
//!
//! # Invariants
//!
//! - Every trace ends with exactly one terminal operation, in last position.
//! - `line` indexes into the producing algorithm's pseudocode listing.

use std::borrow::Borrow;
use std::fmt;

use crate::grid::Cell;
use crate::tree::TreeShape;

/// Identifier of a tree node.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a sorting operation did to the working array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SortKind {
    Compare,
    Swap,
    Overwrite,
    Pivot,
    Done,
}

/// One instant of a sorting run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SortStep {
    pub line: usize,
    pub note: String,
    /// Snapshot of the working array after this operation.
    pub array: Vec<i64>,
    /// Positions touched, ascending.
    pub indices: Vec<usize>,
    pub kind: SortKind,
}

/// What a pathfinding operation did to a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PathKind {
    /// Cell entered the frontier (enqueued, pushed or relaxed).
    Frontier,
    /// Cell was taken off the frontier and examined.
    Visit,
    /// Cell is part of the reconstructed route.
    Path,
    Done,
    /// Frontier exhausted without reaching the goal.
    Fail,
}

/// One instant of a grid search.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathStep {
    pub line: usize,
    pub note: String,
    pub kind: PathKind,
    /// Absent only for terminal summaries.
    pub cell: Option<Cell>,
}

/// What a tree operation represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TreeKind {
    Visit,
    Descend,
    /// Descent reached an absent child.
    Missing,
    Imbalance,
    Pivot,
    Rotate,
    Done,
}

/// One instant of a tree traversal or rotation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeStep {
    pub line: usize,
    pub note: String,
    pub kind: TreeKind,
    pub highlight: Vec<NodeId>,
    /// Full shape, present whenever the displayed shape is (re)established.
    pub tree: Option<TreeShape>,
}

/// What a graph traversal operation represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum GraphKind {
    Frontier,
    Visit,
    Done,
}

/// One instant of a graph traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphStep {
    pub line: usize,
    pub note: String,
    pub kind: GraphKind,
    pub highlight_node: Option<String>,
    /// Unordered pair, smaller id first.
    pub highlight_edge: Option<(String, String)>,
    /// Visited nodes in visiting order.
    pub visited: Vec<String>,
    /// Pending nodes, next to be taken first.
    pub frontier: Vec<String>,
}

impl GraphStep {
    /// Whether this is the traversal's final summary.
    pub fn is_done(&self) -> bool {
        self.kind == GraphKind::Done
    }
}

/// One instant of any algorithm's execution.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "target", rename_all = "lowercase"))]
pub enum Operation {
    Sort(SortStep),
    Path(PathStep),
    Tree(TreeStep),
    Graph(GraphStep),
}

impl Operation {
    /// Pseudocode line this operation corresponds to.
    pub fn line(&self) -> usize {
        match self {
            Operation::Sort(s) => s.line,
            Operation::Path(s) => s.line,
            Operation::Tree(s) => s.line,
            Operation::Graph(s) => s.line,
        }
    }

    /// Human-readable description of this instant.
    pub fn note(&self) -> &str {
        match self {
            Operation::Sort(s) => &s.note,
            Operation::Path(s) => &s.note,
            Operation::Tree(s) => &s.note,
            Operation::Graph(s) => &s.note,
        }
    }

    /// Whether this operation ends its trace.
    pub fn is_terminal(&self) -> bool {
        match self {
            Operation::Sort(s) => s.kind == SortKind::Done,
            Operation::Path(s) => matches!(s.kind, PathKind::Done | PathKind::Fail),
            Operation::Tree(s) => s.kind == TreeKind::Done,
            Operation::Graph(s) => s.is_done(),
        }
    }

    pub fn as_sort(&self) -> Option<&SortStep> {
        match self {
            Operation::Sort(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&PathStep> {
        match self {
            Operation::Path(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_tree(&self) -> Option<&TreeStep> {
        match self {
            Operation::Tree(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_graph(&self) -> Option<&GraphStep> {
        match self {
            Operation::Graph(s) => Some(s),
            _ => None,
        }
    }
}

/// Whether a trace is non-empty and ends in its only terminal operation.
pub fn is_well_terminated(trace: &[Operation]) -> bool {
    match trace.split_last() {
        Some((last, rest)) => last.is_terminal() && !rest.iter().any(Operation::is_terminal),
        None => false,
    }
}
