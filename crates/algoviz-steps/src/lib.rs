//! AlgoViz Step Generators
//!
//! Pure functions that run a textbook algorithm over its input and return a
//! complete, ordered trace of what it did: comparisons, swaps, cell visits,
//! node visits and rotations. Each [`Operation`] carries a pseudocode line
//! marker and a human-readable note so a replay engine can step through the
//! run at any pace.
//!
//! # Families
//!
//! - **Sorting**: bubble, selection, insertion, quick, merge
//! - **Pathfinding**: BFS, DFS, Dijkstra, A* over a wall grid
//! - **Tree**: pre/in/post-order traversal and the four AVL rotations
//! - **Graph**: BFS and DFS over a small undirected graph
//!
//! # Guarantees
//!
//! Generators are deterministic: the same input always yields the same trace.
//! Every trace is finite and ends in exactly one terminal operation (`done`,
//! or `fail` for a search that exhausts its frontier).
//!
//! ```
//! use algoviz_steps::{generate, Algorithm, Input, Operation};
//!
//! let algorithm: Algorithm = "bubble".parse().unwrap();
//! let trace = generate(algorithm, Input::Values(&[5, 3, 1])).unwrap();
//! let done = trace.last().and_then(Operation::as_sort).unwrap();
//! assert_eq!(done.array, vec![1, 3, 5]);
//! ```

mod algorithm;
mod error;
mod op;

pub mod graph;
pub mod grid;
pub mod pathfinding;
pub mod rotation;
pub mod sorting;
pub mod traversal;
pub mod tree;

pub use algorithm::{generate, Algorithm, Family, Input};
pub use error::{Error, Result};
pub use graph::{Graph, GraphNode, GraphSearch};
pub use grid::{Cell, Grid};
pub use op::{
    is_well_terminated, GraphKind, GraphStep, NodeId, Operation, PathKind, PathStep, SortKind,
    SortStep, TreeKind, TreeStep,
};
pub use pathfinding::PathAlgorithm;
pub use rotation::RotationKind;
pub use sorting::SortAlgorithm;
pub use traversal::TraversalOrder;
pub use tree::{TreeNode, TreeShape};
