//! Wall grid searched by the pathfinding generators.
//!
//! Cells are addressed by `(row, col)` with `(0, 0)` at the top left. Walls
//! are stored row-major. The start and end cells are never walls.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Error, Result};

/// A grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Manhattan distance to another cell.
    pub fn manhattan(&self, other: &Self) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Whether two cells share an edge.
    pub fn is_adjacent(&self, other: &Self) -> bool {
        self.manhattan(other) == 1
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A wall grid with distinguished start and end cells.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Grid {
    rows: usize,
    cols: usize,
    walls: Vec<bool>,
    start: Cell,
    end: Cell,
}

impl Grid {
    /// Rows in the sample grid.
    pub const SAMPLE_ROWS: usize = 20;
    /// Columns in the sample grid.
    pub const SAMPLE_COLS: usize = 30;

    /// Create an open grid.
    pub fn new(rows: usize, cols: usize, start: Cell, end: Cell) -> Result<Self> {
        let grid = Self {
            rows,
            cols,
            walls: vec![false; rows * cols],
            start,
            end,
        };
        grid.check_bounds(start)?;
        grid.check_bounds(end)?;
        Ok(grid)
    }

    /// The default 20x30 grid with start (9, 2) and end (9, 25).
    pub fn sample() -> Self {
        Self {
            rows: Self::SAMPLE_ROWS,
            cols: Self::SAMPLE_COLS,
            walls: vec![false; Self::SAMPLE_ROWS * Self::SAMPLE_COLS],
            start: Cell::new(9, 2),
            end: Cell::new(9, 25),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn start(&self) -> Cell {
        self.start
    }

    pub fn end(&self) -> Cell {
        self.end
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    fn check_bounds(&self, cell: Cell) -> Result<()> {
        if self.contains(cell) {
            Ok(())
        } else {
            Err(Error::CellOutOfBounds {
                cell,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    fn index(&self, cell: Cell) -> usize {
        cell.row * self.cols + cell.col
    }

    /// Whether `cell` is a wall. Out-of-bounds cells count as walls.
    pub fn is_wall(&self, cell: Cell) -> bool {
        !self.contains(cell) || self.walls[self.index(cell)]
    }

    /// Number of wall cells.
    pub fn wall_count(&self) -> usize {
        self.walls.iter().filter(|&&w| w).count()
    }

    /// Set or clear a wall. Endpoints cannot be walled; returns whether the
    /// grid changed.
    pub fn set_wall(&mut self, cell: Cell, wall: bool) -> Result<bool> {
        self.check_bounds(cell)?;
        if wall && (cell == self.start || cell == self.end) {
            return Err(Error::BlockedEndpoint(cell));
        }
        let idx = self.index(cell);
        let changed = self.walls[idx] != wall;
        self.walls[idx] = wall;
        Ok(changed)
    }

    /// Flip a wall. Endpoints are left untouched and reported as an error.
    pub fn toggle_wall(&mut self, cell: Cell) -> Result<bool> {
        self.check_bounds(cell)?;
        let wall = !self.walls[self.index(cell)];
        self.set_wall(cell, wall)?;
        Ok(wall)
    }

    /// Move the start cell, clearing any wall underneath it.
    pub fn set_start(&mut self, cell: Cell) -> Result<()> {
        self.check_bounds(cell)?;
        let idx = self.index(cell);
        self.walls[idx] = false;
        self.start = cell;
        Ok(())
    }

    /// Move the end cell, clearing any wall underneath it.
    pub fn set_end(&mut self, cell: Cell) -> Result<()> {
        self.check_bounds(cell)?;
        let idx = self.index(cell);
        self.walls[idx] = false;
        self.end = cell;
        Ok(())
    }

    pub fn clear_walls(&mut self) {
        self.walls.iter_mut().for_each(|w| *w = false);
    }

    /// Replace every wall with a random layout where each cell is a wall with
    /// probability `density`. The same seed always gives the same layout.
    pub fn randomize_walls(&mut self, density: f64, seed: u64) -> Result<()> {
        if !(0.0..=1.0).contains(&density) {
            return Err(Error::InvalidDensity(density));
        }
        let mut rng = StdRng::seed_from_u64(seed);
        for row in 0..self.rows {
            for col in 0..self.cols {
                let cell = Cell::new(row, col);
                let idx = self.index(cell);
                // Draw for every cell so endpoint moves don't shift the layout.
                let wall = rng.gen_bool(density);
                self.walls[idx] = wall && cell != self.start && cell != self.end;
            }
        }
        Ok(())
    }

    /// Check the invariants a search relies on.
    pub fn validate(&self) -> Result<()> {
        self.check_bounds(self.start)?;
        self.check_bounds(self.end)?;
        for endpoint in [self.start, self.end] {
            if self.is_wall(endpoint) {
                return Err(Error::BlockedEndpoint(endpoint));
            }
        }
        Ok(())
    }

    /// Open 4-neighbours of `cell` in up, right, down, left order.
    pub fn neighbors(&self, cell: Cell) -> Vec<Cell> {
        let mut out = Vec::with_capacity(4);
        if cell.row > 0 {
            out.push(Cell::new(cell.row - 1, cell.col));
        }
        if cell.col + 1 < self.cols {
            out.push(Cell::new(cell.row, cell.col + 1));
        }
        if cell.row + 1 < self.rows {
            out.push(Cell::new(cell.row + 1, cell.col));
        }
        if cell.col > 0 {
            out.push(Cell::new(cell.row, cell.col - 1));
        }
        out.retain(|&n| !self.is_wall(n));
        out
    }
}
