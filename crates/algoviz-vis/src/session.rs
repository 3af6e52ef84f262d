//! Current algorithm selection and its inputs.
//!
//! The session owns every editable input (sort array, wall grid, traversal
//! tree, graph start) and turns the selected algorithm into a [`Trace`].
//! Callers reload the replay engine after every change.

use algoviz_steps::{
    generate, sorting, Algorithm, Cell, Family, Graph, Grid, Input, TreeShape,
};

use crate::config::VisConfig;
use crate::display::Scene;
use crate::error::{Error, Result};
use crate::playback::Trace;

/// Longest array accepted for sorting.
pub const MAX_VALUES: usize = 128;

/// Editable inputs plus the selected algorithm.
#[derive(Debug, Clone)]
pub struct Session {
    algorithm: Algorithm,
    values: Vec<i64>,
    value_range: (i64, i64),
    grid: Grid,
    tree: TreeShape,
    graph: Graph,
    graph_start: String,
    seed: u64,
}

impl Session {
    /// Create a session with generated inputs from `config`.
    pub fn new(config: &VisConfig) -> Result<Self> {
        config.validate()?;
        let (min, max) = config.value_range;
        let mut grid = Grid::sample();
        grid.randomize_walls(config.wall_density, config.seed)?;
        Ok(Self {
            algorithm: config.algorithm,
            values: sorting::random_values(config.array_size, min, max, config.seed),
            value_range: config.value_range,
            grid,
            tree: TreeShape::sample(),
            graph: Graph::sample(),
            graph_start: "A".to_string(),
            seed: config.seed,
        })
    }

    /// Get the selected algorithm.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Select the algorithm used by the next [`Session::trace`].
    pub fn select(&mut self, algorithm: Algorithm) {
        tracing::debug!(%algorithm, "algorithm selected");
        self.algorithm = algorithm;
    }

    /// Get the array fed to sorting algorithms.
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// Replace the sort array; at most [`MAX_VALUES`] entries.
    pub fn set_values(&mut self, values: Vec<i64>) -> Result<()> {
        if values.len() > MAX_VALUES {
            return Err(Error::InvalidInput(format!(
                "{} values given, at most {MAX_VALUES} allowed",
                values.len()
            )));
        }
        self.values = values;
        Ok(())
    }

    /// Replace the array with a fresh random one of length `len`.
    pub fn shuffle_values(&mut self, len: usize, seed: Option<u64>) -> Result<()> {
        if len > MAX_VALUES {
            return Err(Error::InvalidInput(format!("array size {len} above {MAX_VALUES}")));
        }
        let seed = self.next_seed(seed);
        let (min, max) = self.value_range;
        self.values = sorting::random_values(len, min, max, seed);
        Ok(())
    }

    /// Get the node graph searches start from.
    pub fn graph_start(&self) -> &str {
        &self.graph_start
    }

    /// Start graph searches at `start`, which must be a node of the graph.
    pub fn set_graph_start(&mut self, start: &str) -> Result<()> {
        if !self.graph.contains(start) {
            return Err(algoviz_steps::Error::UnknownNode(start.to_string()).into());
        }
        self.graph_start = start.to_string();
        Ok(())
    }

    /// Get the pathfinding grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Toggle a wall, returning whether the cell is now walled.
    pub fn toggle_wall(&mut self, cell: Cell) -> Result<bool> {
        Ok(self.grid.toggle_wall(cell)?)
    }

    /// Move the start cell, clearing any wall under it.
    pub fn move_start(&mut self, cell: Cell) -> Result<()> {
        Ok(self.grid.set_start(cell)?)
    }

    /// Move the end cell, clearing any wall under it.
    pub fn move_end(&mut self, cell: Cell) -> Result<()> {
        Ok(self.grid.set_end(cell)?)
    }

    /// Re-roll every wall at `density`, from `seed` or the next session seed.
    pub fn randomize_walls(&mut self, density: f64, seed: Option<u64>) -> Result<()> {
        let seed = self.next_seed(seed);
        self.grid.randomize_walls(density, seed)?;
        tracing::debug!(density, seed, walls = self.grid.wall_count(), "walls randomized");
        Ok(())
    }

    /// Remove every wall.
    pub fn clear_walls(&mut self) {
        self.grid.clear_walls();
    }

    /// Run the selected algorithm over the current inputs.
    pub fn trace(&self) -> Result<Trace> {
        let algorithm = self.algorithm;
        let fixture;
        let (input, initial) = match algorithm {
            Algorithm::Sort(_) => (Input::Values(&self.values), Scene::bars(&self.values)),
            Algorithm::Path(_) => (Input::Grid(&self.grid), Scene::grid(&self.grid)),
            Algorithm::Traversal(_) => (
                Input::Tree { tree: &self.tree, at: None },
                Scene::tree(&self.tree),
            ),
            Algorithm::Rotation(kind) => {
                fixture = kind.fixture();
                (Input::Tree { tree: &fixture, at: None }, Scene::tree(&fixture))
            }
            Algorithm::Graph(_) => (
                Input::Graph { graph: &self.graph, start: &self.graph_start },
                Scene::graph(&self.graph),
            ),
        };
        let operations = generate(algorithm, input)?;
        Ok(Trace {
            algorithm,
            initial,
            operations,
        })
    }

    /// Whether an edit to the grid affects the selected algorithm.
    pub fn uses_grid(&self) -> bool {
        self.algorithm.family() == Family::Pathfinding
    }

    /// Whether a change to the sort array affects the selected algorithm.
    pub fn uses_values(&self) -> bool {
        self.algorithm.family() == Family::Sorting
    }

    /// Explicit seed, or the next one in this session's sequence.
    fn next_seed(&mut self, seed: Option<u64>) -> u64 {
        match seed {
            Some(seed) => seed,
            None => {
                self.seed = self.seed.wrapping_add(1);
                self.seed
            }
        }
    }
}
