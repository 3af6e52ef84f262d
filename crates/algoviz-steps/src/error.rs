//! Error types for step generation.

use thiserror::Error;

use crate::grid::Cell;

/// Result type for step generation.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised when a generator's input violates its preconditions.
///
/// An unreachable goal is not an error: searches report it as a terminal
/// `fail` operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A cell lies outside the grid.
    #[error("cell {cell} is outside the {rows}x{cols} grid")]
    CellOutOfBounds { cell: Cell, rows: usize, cols: usize },

    /// The start or end cell is a wall.
    #[error("endpoint {0} is a wall")]
    BlockedEndpoint(Cell),

    /// The algorithm belongs to a different family than the generator.
    #[error("{algorithm} is not a {expected} algorithm")]
    WrongFamily {
        algorithm: &'static str,
        expected: &'static str,
    },

    /// A node id is referenced but not defined.
    #[error("unknown node: {0}")]
    UnknownNode(String),

    /// A node is reachable more than once from the root.
    #[error("cycle or shared child detected at node {0}")]
    CycleDetected(String),

    /// A rotation needs a child that is absent.
    #[error("node {node} has no {side} child")]
    MissingChild { node: String, side: &'static str },

    /// An algorithm name could not be parsed.
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// Wall density outside `0.0..=1.0`.
    #[error("wall density {0} is outside 0.0..=1.0")]
    InvalidDensity(f64),
}
