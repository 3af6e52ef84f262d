//! Grid search step generators.
//!
//! All four searches use the same neighbour rule: up, right, down, left,
//! bounded by the grid and skipping walls. A cell is recorded as `frontier`
//! when it is queued and as `visit` when it is taken off the frontier. Once
//! the end cell is visited the route is rebuilt from parent pointers and
//! emitted as `path` operations followed by `done`; an exhausted frontier
//! yields a single `fail`.
//!
//! Dijkstra and A* use a binary heap keyed by `(priority, insertion order)`,
//! so equal priorities pop first-in first-out.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};

use crate::error::Result;
use crate::grid::{Cell, Grid};
use crate::op::{Operation, PathKind, PathStep};

/// The four grid searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PathAlgorithm {
    Bfs,
    Dfs,
    Dijkstra,
    AStar,
}

impl PathAlgorithm {
    pub const ALL: [Self; 4] = [Self::Bfs, Self::Dfs, Self::Dijkstra, Self::AStar];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Bfs => "Breadth-First Search",
            Self::Dfs => "Depth-First Search",
            Self::Dijkstra => "Dijkstra",
            Self::AStar => "A*",
        }
    }

    pub fn listing(&self) -> &'static [&'static str] {
        match self {
            Self::Bfs => BFS_LISTING,
            Self::Dfs => DFS_LISTING,
            Self::Dijkstra => DIJKSTRA_LISTING,
            Self::AStar => ASTAR_LISTING,
        }
    }
}

const BFS_LISTING: &[&str] = &[
    "queue = [start]; seen = {start}",
    "while queue is not empty:",
    "  cell = queue.pop_front()",
    "  if cell == end: return path(cell)",
    "  for n in neighbors(cell):",
    "    if n not in seen: seen.add(n); parent[n] = cell; queue.push(n)",
    "return fail",
];

const DFS_LISTING: &[&str] = &[
    "stack = [start]; seen = {start}",
    "while stack is not empty:",
    "  cell = stack.pop()",
    "  if cell == end: return path(cell)",
    "  for n in neighbors(cell):",
    "    if n not in seen: seen.add(n); parent[n] = cell; stack.push(n)",
    "return fail",
];

const DIJKSTRA_LISTING: &[&str] = &[
    "dist[*] = inf; dist[start] = 0; pq = [(0, start)]",
    "while pq is not empty:",
    "  cell = pq.pop_min(); skip if settled",
    "  if cell == end: return path(cell)",
    "  for n in neighbors(cell):",
    "    if dist[cell] + 1 < dist[n]: dist[n] = dist[cell] + 1; parent[n] = cell; pq.push(n)",
    "return fail",
];

const ASTAR_LISTING: &[&str] = &[
    "g[*] = inf; g[start] = 0; open = [(h(start), start)]",
    "while open is not empty:",
    "  cell = open.pop_min(); skip if closed",
    "  if cell == end: return path(cell)",
    "  for n in neighbors(cell):",
    "    if g[cell] + 1 < g[n]: g[n] = g[cell] + 1; parent[n] = cell; open.push(g[n] + h(n), n)",
    "return fail",
];

const LINE_QUEUE: usize = 0;
const LINE_TAKE: usize = 2;
const LINE_REACHED: usize = 3;
const LINE_RELAX: usize = 5;
const LINE_FAIL: usize = 6;

/// Generate the trace for `algorithm` from the grid's start to its end.
pub fn generate(algorithm: PathAlgorithm, grid: &Grid) -> Result<Vec<Operation>> {
    grid.validate()?;
    let trace = match algorithm {
        PathAlgorithm::Bfs => bfs(grid),
        PathAlgorithm::Dfs => dfs(grid),
        PathAlgorithm::Dijkstra => best_first(grid, |_| 0),
        PathAlgorithm::AStar => {
            let end = grid.end();
            best_first(grid, move |cell| cell.manhattan(&end))
        }
    };
    Ok(trace)
}

fn step(kind: PathKind, line: usize, cell: Option<Cell>, note: String) -> Operation {
    Operation::Path(PathStep {
        line,
        note,
        kind,
        cell,
    })
}

fn frontier(ops: &mut Vec<Operation>, line: usize, cell: Cell) {
    ops.push(step(PathKind::Frontier, line, Some(cell), format!("queue {cell}")));
}

fn visit(ops: &mut Vec<Operation>, cell: Cell) {
    ops.push(step(PathKind::Visit, LINE_TAKE, Some(cell), format!("visit {cell}")));
}

fn breadth_or_depth(grid: &Grid, depth_first: bool) -> Vec<Operation> {
    let (start, end) = (grid.start(), grid.end());
    let mut ops = Vec::new();
    let mut parents = HashMap::new();
    let mut seen = HashSet::from([start]);
    let mut pending = VecDeque::from([start]);
    frontier(&mut ops, LINE_QUEUE, start);

    loop {
        let next = if depth_first {
            pending.pop_back()
        } else {
            pending.pop_front()
        };
        let Some(cell) = next else {
            break;
        };
        visit(&mut ops, cell);
        if cell == end {
            emit_path(&mut ops, &parents, start, end);
            return ops;
        }
        for n in grid.neighbors(cell) {
            if seen.insert(n) {
                parents.insert(n, cell);
                pending.push_back(n);
                frontier(&mut ops, LINE_RELAX, n);
            }
        }
    }

    ops.push(fail_step());
    ops
}

/// Breadth-first search with a FIFO frontier.
pub fn bfs(grid: &Grid) -> Vec<Operation> {
    breadth_or_depth(grid, false)
}

/// Depth-first search with a LIFO frontier.
pub fn dfs(grid: &Grid) -> Vec<Operation> {
    breadth_or_depth(grid, true)
}

/// Uniform-cost search ordered by `g + heuristic(cell)`. A zero heuristic is
/// Dijkstra; Manhattan distance to the end is A*.
fn best_first(grid: &Grid, heuristic: impl Fn(Cell) -> usize) -> Vec<Operation> {
    let (start, end) = (grid.start(), grid.end());
    let mut ops = Vec::new();
    let mut dist: HashMap<Cell, usize> = HashMap::from([(start, 0)]);
    let mut parents = HashMap::new();
    let mut settled = HashSet::new();
    let mut heap = BinaryHeap::new();
    let mut seq = 0u64;

    heap.push(Reverse((heuristic(start), seq, start)));
    frontier(&mut ops, LINE_QUEUE, start);

    while let Some(Reverse((_, _, cell))) = heap.pop() {
        if !settled.insert(cell) {
            continue;
        }
        visit(&mut ops, cell);
        if cell == end {
            emit_path(&mut ops, &parents, start, end);
            return ops;
        }
        let g = dist.get(&cell).copied().unwrap_or(usize::MAX);
        for n in grid.neighbors(cell) {
            if settled.contains(&n) {
                continue;
            }
            let candidate = g.saturating_add(1);
            if candidate < dist.get(&n).copied().unwrap_or(usize::MAX) {
                dist.insert(n, candidate);
                parents.insert(n, cell);
                seq += 1;
                heap.push(Reverse((candidate + heuristic(n), seq, n)));
                let note = format!("relax {n} to distance {candidate}");
                ops.push(step(PathKind::Frontier, LINE_RELAX, Some(n), note));
            }
        }
    }

    ops.push(fail_step());
    ops
}

fn fail_step() -> Operation {
    step(PathKind::Fail, LINE_FAIL, None, "no path to the end".to_string())
}

/// Walk parent pointers back from `end` to `start`, returning the route in
/// forward order, or `None` when `end` does not lead back to `start`.
pub fn reconstruct_path(
    parents: &HashMap<Cell, Cell>,
    start: Cell,
    end: Cell,
) -> Option<Vec<Cell>> {
    let mut route = vec![end];
    let mut cur = end;
    while cur != start {
        // A route can't be longer than the parent map.
        if route.len() > parents.len() + 1 {
            return None;
        }
        cur = *parents.get(&cur)?;
        route.push(cur);
    }
    route.reverse();
    Some(route)
}

fn emit_path(ops: &mut Vec<Operation>, parents: &HashMap<Cell, Cell>, start: Cell, end: Cell) {
    let Some(route) = reconstruct_path(parents, start, end) else {
        ops.push(fail_step());
        return;
    };
    let hops = route.len() - 1;
    for cell in route {
        ops.push(step(PathKind::Path, LINE_REACHED, Some(cell), format!("path {cell}")));
    }
    let note = format!("reached the end in {hops} steps");
    ops.push(step(PathKind::Done, LINE_REACHED, None, note));
}
