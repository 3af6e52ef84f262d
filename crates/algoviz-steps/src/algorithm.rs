//! Catalogue of every generator and dispatch by input.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::graph::{self, Graph, GraphSearch};
use crate::grid::Grid;
use crate::op::Operation;
use crate::pathfinding::{self, PathAlgorithm};
use crate::rotation::{self, RotationKind};
use crate::sorting::{self, SortAlgorithm};
use crate::traversal::{self, TraversalOrder};
use crate::tree::TreeShape;

/// Widget family an algorithm belongs to. Each family has its own input
/// shape and playback timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Family {
    Sorting,
    Pathfinding,
    Tree,
    Graph,
}

impl Family {
    pub fn as_str(&self) -> &'static str {
        match self {
            Family::Sorting => "sorting",
            Family::Pathfinding => "pathfinding",
            Family::Tree => "tree",
            Family::Graph => "graph",
        }
    }
}

/// Any supported algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum Algorithm {
    Sort(SortAlgorithm),
    Path(PathAlgorithm),
    Traversal(TraversalOrder),
    Rotation(RotationKind),
    Graph(GraphSearch),
}

impl Algorithm {
    /// Every algorithm, grouped by family.
    pub fn all() -> Vec<Self> {
        let mut out = Vec::new();
        out.extend(SortAlgorithm::ALL.map(Self::Sort));
        out.extend(PathAlgorithm::ALL.map(Self::Path));
        out.extend(TraversalOrder::ALL.map(Self::Traversal));
        out.extend(RotationKind::ALL.map(Self::Rotation));
        out.extend(GraphSearch::ALL.map(Self::Graph));
        out
    }

    pub fn family(&self) -> Family {
        match self {
            Self::Sort(_) => Family::Sorting,
            Self::Path(_) => Family::Pathfinding,
            Self::Traversal(_) | Self::Rotation(_) => Family::Tree,
            Self::Graph(_) => Family::Graph,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Sort(a) => a.name(),
            Self::Path(a) => a.name(),
            Self::Traversal(a) => a.name(),
            Self::Rotation(a) => a.name(),
            Self::Graph(a) => a.name(),
        }
    }

    /// Pseudocode listing that operation `line`s index into.
    pub fn listing(&self) -> &'static [&'static str] {
        match self {
            Self::Sort(a) => a.listing(),
            Self::Path(a) => a.listing(),
            Self::Traversal(a) => a.listing(),
            Self::Rotation(a) => a.listing(),
            Self::Graph(a) => a.listing(),
        }
    }

    /// Short identifier used on the command line and the wire.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Sort(SortAlgorithm::Bubble) => "bubble",
            Self::Sort(SortAlgorithm::Selection) => "selection",
            Self::Sort(SortAlgorithm::Insertion) => "insertion",
            Self::Sort(SortAlgorithm::Quick) => "quick",
            Self::Sort(SortAlgorithm::Merge) => "merge",
            Self::Path(PathAlgorithm::Bfs) => "bfs",
            Self::Path(PathAlgorithm::Dfs) => "dfs",
            Self::Path(PathAlgorithm::Dijkstra) => "dijkstra",
            Self::Path(PathAlgorithm::AStar) => "astar",
            Self::Traversal(TraversalOrder::Preorder) => "preorder",
            Self::Traversal(TraversalOrder::Inorder) => "inorder",
            Self::Traversal(TraversalOrder::Postorder) => "postorder",
            Self::Rotation(RotationKind::SingleLeft) => "rotate-left",
            Self::Rotation(RotationKind::SingleRight) => "rotate-right",
            Self::Rotation(RotationKind::LeftRight) => "rotate-left-right",
            Self::Rotation(RotationKind::RightLeft) => "rotate-right-left",
            Self::Graph(GraphSearch::Bfs) => "graph-bfs",
            Self::Graph(GraphSearch::Dfs) => "graph-dfs",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::all()
            .into_iter()
            .find(|a| a.slug() == wanted)
            .ok_or_else(|| Error::UnknownAlgorithm(s.to_string()))
    }
}

impl TryFrom<String> for Algorithm {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Algorithm> for String {
    fn from(a: Algorithm) -> Self {
        a.slug().to_string()
    }
}

/// Input for one generator run.
#[derive(Debug, Clone, Copy)]
pub enum Input<'a> {
    Values(&'a [i64]),
    Grid(&'a Grid),
    /// Traversals walk the whole tree; rotations pivot at `at`, or at the
    /// root when `at` is `None`.
    Tree {
        tree: &'a TreeShape,
        at: Option<&'a str>,
    },
    Graph {
        graph: &'a Graph,
        start: &'a str,
    },
}

impl Input<'_> {
    fn family(&self) -> Family {
        match self {
            Input::Values(_) => Family::Sorting,
            Input::Grid(_) => Family::Pathfinding,
            Input::Tree { .. } => Family::Tree,
            Input::Graph { .. } => Family::Graph,
        }
    }
}

/// Run `algorithm` over `input`, producing its full trace.
pub fn generate(algorithm: Algorithm, input: Input<'_>) -> Result<Vec<Operation>> {
    match (algorithm, input) {
        (Algorithm::Sort(a), Input::Values(values)) => Ok(sorting::generate(a, values)),
        (Algorithm::Path(a), Input::Grid(grid)) => pathfinding::generate(a, grid),
        (Algorithm::Traversal(order), Input::Tree { tree, .. }) => traversal::generate(order, tree),
        (Algorithm::Rotation(kind), Input::Tree { tree, at }) => {
            let at = match at {
                Some(at) => at,
                None => tree
                    .root
                    .as_ref()
                    .map(|r| r.as_str())
                    .ok_or_else(|| Error::UnknownNode("<root>".to_string()))?,
            };
            rotation::generate(kind, tree, at)
        }
        (Algorithm::Graph(search), Input::Graph { graph, start }) => {
            graph::generate(search, graph, start)
        }
        (algorithm, input) => Err(Error::WrongFamily {
            algorithm: algorithm.name(),
            expected: input.family().as_str(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_round_trip() {
        for algorithm in Algorithm::all() {
            assert_eq!(algorithm.slug().parse::<Algorithm>().unwrap(), algorithm);
        }
        assert_eq!(" AStar ".parse::<Algorithm>().unwrap(), Algorithm::Path(PathAlgorithm::AStar));
        assert!(matches!("heap".parse::<Algorithm>(), Err(Error::UnknownAlgorithm(_))));
    }

    #[test]
    fn catalogue_is_complete() {
        let all = Algorithm::all();
        assert_eq!(all.len(), 18);
        let tree = all.iter().filter(|a| a.family() == Family::Tree).count();
        assert_eq!(tree, 7);
        assert!(all.iter().all(|a| !a.listing().is_empty()));
    }

    #[test]
    fn mismatched_input_is_rejected() {
        let err = generate(Algorithm::Sort(SortAlgorithm::Quick), Input::Grid(&Grid::sample()));
        assert!(matches!(err, Err(Error::WrongFamily { expected: "pathfinding", .. })));
    }

    #[test]
    fn rotation_defaults_to_root() {
        let tree = RotationKind::SingleRight.fixture();
        let trace = generate(
            Algorithm::Rotation(RotationKind::SingleRight),
            Input::Tree { tree: &tree, at: None },
        )
        .unwrap();
        assert_eq!(trace.len(), 4);
    }
}
