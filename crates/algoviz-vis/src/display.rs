//! Renderer-facing display state.
//!
//! A [`Display`] is a pure projection of `(trace, step)`: start from the
//! trace's initial [`Scene`] and apply every operation before `step`. The
//! replay engine applies one operation per tick and rebuilds from scratch on
//! seek.

use std::collections::BTreeSet;

use algoviz_steps::{
    Cell, Graph, GraphKind, GraphStep, Grid, NodeId, Operation, PathKind, PathStep, SortKind,
    SortStep, TreeShape, TreeStep,
};
use serde::Serialize;

/// Widget-specific part of the display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "widget", rename_all = "lowercase")]
pub enum Scene {
    /// Bar chart of the working array.
    Bars {
        array: Vec<i64>,
        highlight: Vec<usize>,
        mark: Option<SortKind>,
        sorted: bool,
    },
    /// Wall grid with search progress.
    Grid {
        grid: Grid,
        visited: BTreeSet<Cell>,
        frontier: BTreeSet<Cell>,
        path: Vec<Cell>,
        current: Option<Cell>,
        failed: bool,
    },
    Tree {
        tree: TreeShape,
        highlight: Vec<NodeId>,
    },
    Graph {
        graph: Graph,
        visited: BTreeSet<String>,
        frontier: BTreeSet<String>,
        current: Option<String>,
        active_edge: Option<(String, String)>,
        done: bool,
    },
}

impl Scene {
    pub fn bars(values: &[i64]) -> Self {
        Scene::Bars {
            array: values.to_vec(),
            highlight: Vec::new(),
            mark: None,
            sorted: false,
        }
    }

    pub fn grid(grid: &Grid) -> Self {
        Scene::Grid {
            grid: grid.clone(),
            visited: BTreeSet::new(),
            frontier: BTreeSet::new(),
            path: Vec::new(),
            current: None,
            failed: false,
        }
    }

    pub fn tree(tree: &TreeShape) -> Self {
        Scene::Tree {
            tree: tree.clone(),
            highlight: Vec::new(),
        }
    }

    pub fn graph(graph: &Graph) -> Self {
        Scene::Graph {
            graph: graph.clone(),
            visited: BTreeSet::new(),
            frontier: BTreeSet::new(),
            current: None,
            active_edge: None,
            done: false,
        }
    }

    /// Apply one operation's side effects. Operations for another widget are
    /// ignored.
    fn apply(&mut self, op: &Operation) {
        match (self, op) {
            (Scene::Bars { array, highlight, mark, sorted }, Operation::Sort(step)) => {
                apply_sort(step, array, highlight, mark, sorted)
            }
            (
                Scene::Grid { visited, frontier, path, current, failed, .. },
                Operation::Path(step),
            ) => apply_path(step, visited, frontier, path, current, failed),
            (Scene::Tree { tree, highlight }, Operation::Tree(step)) => {
                apply_tree(step, tree, highlight)
            }
            (
                Scene::Graph { visited, frontier, current, active_edge, done, .. },
                Operation::Graph(step),
            ) => apply_graph(step, visited, frontier, current, active_edge, done),
            _ => {}
        }
    }
}

fn apply_sort(
    step: &SortStep,
    array: &mut Vec<i64>,
    highlight: &mut Vec<usize>,
    mark: &mut Option<SortKind>,
    sorted: &mut bool,
) {
    array.clone_from(&step.array);
    highlight.clone_from(&step.indices);
    *mark = Some(step.kind);
    *sorted = step.kind == SortKind::Done;
}

fn apply_path(
    step: &PathStep,
    visited: &mut BTreeSet<Cell>,
    frontier: &mut BTreeSet<Cell>,
    path: &mut Vec<Cell>,
    current: &mut Option<Cell>,
    failed: &mut bool,
) {
    match (step.kind, step.cell) {
        (PathKind::Frontier, Some(cell)) => {
            if !visited.contains(&cell) {
                frontier.insert(cell);
            }
        }
        (PathKind::Visit, Some(cell)) => {
            frontier.remove(&cell);
            visited.insert(cell);
            *current = Some(cell);
        }
        (PathKind::Path, Some(cell)) => {
            path.push(cell);
            *current = Some(cell);
        }
        (PathKind::Fail, _) => {
            *failed = true;
            *current = None;
        }
        _ => {}
    }
}

fn apply_tree(step: &TreeStep, tree: &mut TreeShape, highlight: &mut Vec<NodeId>) {
    highlight.clone_from(&step.highlight);
    if let Some(shape) = &step.tree {
        tree.clone_from(shape);
    }
}

fn apply_graph(
    step: &GraphStep,
    visited: &mut BTreeSet<String>,
    frontier: &mut BTreeSet<String>,
    current: &mut Option<String>,
    active_edge: &mut Option<(String, String)>,
    done: &mut bool,
) {
    visited.extend(step.visited.iter().cloned());
    *frontier = step
        .frontier
        .iter()
        .filter(|id| !visited.contains(*id))
        .cloned()
        .collect();
    if step.kind == GraphKind::Visit {
        current.clone_from(&step.highlight_node);
    }
    active_edge.clone_from(&step.highlight_edge);
    *done = step.is_done();
    if *done {
        *current = None;
    }
}

/// Everything a renderer needs for one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Display {
    pub scene: Scene,
    /// Pseudocode line of the last applied operation.
    pub active_line: Option<usize>,
    pub status: String,
}

impl Display {
    pub fn new(scene: Scene) -> Self {
        Self {
            scene,
            active_line: None,
            status: "ready".to_string(),
        }
    }

    pub fn apply(&mut self, op: &Operation) {
        self.scene.apply(op);
        self.active_line = Some(op.line());
        self.status = op.note().to_string();
    }

    /// Rebuild display state from operations up to (but not including) the
    /// given step.
    pub fn from_operations(initial: &Scene, operations: &[Operation], up_to: usize) -> Self {
        let mut display = Self::new(initial.clone());
        for op in operations.iter().take(up_to) {
            display.apply(op);
        }
        display
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use algoviz_steps::{generate, Algorithm, GraphSearch, Input, PathAlgorithm, RotationKind, SortAlgorithm};

    #[test]
    fn sorting_replaces_array() {
        let values = [5, 3, 1];
        let trace = generate(Algorithm::Sort(SortAlgorithm::Bubble), Input::Values(&values)).unwrap();
        let display = Display::from_operations(&Scene::bars(&values), &trace, trace.len());
        match display.scene {
            Scene::Bars { array, sorted, mark, .. } => {
                assert_eq!(array, vec![1, 3, 5]);
                assert!(sorted);
                assert_eq!(mark, Some(SortKind::Done));
            }
            other => panic!("unexpected scene {other:?}"),
        }
        assert_eq!(display.active_line, trace.last().map(Operation::line));
    }

    #[test]
    fn step_zero_is_initial_scene() {
        let values = [2, 1];
        let trace = generate(Algorithm::Sort(SortAlgorithm::Quick), Input::Values(&values)).unwrap();
        let display = Display::from_operations(&Scene::bars(&values), &trace, 0);
        assert_eq!(display, Display::new(Scene::bars(&values)));
    }

    #[test]
    fn visited_cells_leave_frontier() {
        let grid = Grid::sample();
        let trace = generate(Algorithm::Path(PathAlgorithm::Bfs), Input::Grid(&grid)).unwrap();
        let initial = Scene::grid(&grid);
        for up_to in [1, 5, 40, trace.len()] {
            let display = Display::from_operations(&initial, &trace, up_to);
            let Scene::Grid { visited, frontier, .. } = display.scene else {
                panic!("expected grid scene");
            };
            assert!(visited.is_disjoint(&frontier), "step {up_to}");
        }
    }

    #[test]
    fn finished_search_shows_path() {
        let grid = Grid::sample();
        let trace = generate(Algorithm::Path(PathAlgorithm::AStar), Input::Grid(&grid)).unwrap();
        let display = Display::from_operations(&Scene::grid(&grid), &trace, trace.len());
        let Scene::Grid { path, failed, current, .. } = display.scene else {
            panic!("expected grid scene");
        };
        assert!(!failed);
        assert_eq!(path.first(), Some(&grid.start()));
        assert_eq!(path.last(), Some(&grid.end()));
        assert_eq!(current, Some(grid.end()));
    }

    #[test]
    fn rotation_swaps_shape() {
        let kind = RotationKind::SingleLeft;
        let fixture = kind.fixture();
        let trace = generate(Algorithm::Rotation(kind), Input::Tree { tree: &fixture, at: None }).unwrap();
        let initial = Scene::tree(&fixture);

        let Scene::Tree { tree, highlight } = Display::from_operations(&initial, &trace, 2).scene else {
            panic!("expected tree scene");
        };
        assert_eq!(tree, fixture);
        assert_eq!(highlight, vec![NodeId::from("n30")]);

        let Scene::Tree { tree, highlight } = Display::from_operations(&initial, &trace, 4).scene else {
            panic!("expected tree scene");
        };
        assert_eq!(tree.root, Some(NodeId::from("n40")));
        assert!(highlight.is_empty());
    }

    #[test]
    fn graph_done_clears_frontier() {
        let graph = Graph::sample();
        let trace = generate(
            Algorithm::Graph(GraphSearch::Dfs),
            Input::Graph { graph: &graph, start: "A" },
        )
        .unwrap();
        let display = Display::from_operations(&Scene::graph(&graph), &trace, trace.len());
        let Scene::Graph { visited, frontier, done, current, .. } = display.scene else {
            panic!("expected graph scene");
        };
        assert!(done);
        assert_eq!(visited.len(), 7);
        assert!(frontier.is_empty());
        assert!(current.is_none());
    }

    #[test]
    fn foreign_operations_are_ignored() {
        let values = [1, 2];
        let sort = generate(Algorithm::Sort(SortAlgorithm::Bubble), Input::Values(&values)).unwrap();
        let graph = Graph::sample();
        let mut display = Display::new(Scene::graph(&graph));
        display.apply(&sort[0]);
        assert_eq!(display.scene, Scene::graph(&graph));
        assert_eq!(display.status, sort[0].note());
    }
}
