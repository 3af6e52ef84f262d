//! Graph traversal step generators.
//!
//! Both traversals start with a `frontier` marker for the start node, then
//! alternate `visit` (node taken off the frontier) and `frontier` (node seen
//! for the first time), and end with a `done` step listing every visited node
//! with an empty frontier.
//!
//! DFS pushes neighbours in reverse adjacency order so the first neighbour
//! is explored first, matching recursive DFS. A node may sit on the stack
//! more than once; it is only reported as `frontier` the first time and is
//! skipped when popped after it has been visited.

use std::collections::{BTreeMap, HashSet, VecDeque};

use crate::error::{Error, Result};
use crate::op::{GraphKind, GraphStep, Operation};

/// A node with its layout position. Positions are only used for drawing.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphNode {
    pub id: String,
    pub x: f32,
    pub y: f32,
}

/// A small undirected graph. Neighbour order is significant.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub adjacency: BTreeMap<String, Vec<String>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, id: &str, x: f32, y: f32) {
        self.nodes.push(GraphNode {
            id: id.to_string(),
            x,
            y,
        });
        self.adjacency.entry(id.to_string()).or_default();
    }

    /// Connect two known nodes in both directions.
    pub fn add_edge(&mut self, a: &str, b: &str) -> Result<()> {
        for id in [a, b] {
            if !self.adjacency.contains_key(id) {
                return Err(Error::UnknownNode(id.to_string()));
            }
        }
        self.adjacency.entry(a.to_string()).or_default().push(b.to_string());
        self.adjacency.entry(b.to_string()).or_default().push(a.to_string());
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.adjacency.contains_key(id)
    }

    pub fn neighbors(&self, id: &str) -> &[String] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The seven-node demonstration graph. `A` is adjacent to `B` and `D`.
    pub fn sample() -> Self {
        let rows: [(&str, f32, f32, &[&str]); 7] = [
            ("A", 80.0, 60.0, &["B", "D"]),
            ("B", 220.0, 60.0, &["A", "C", "E"]),
            ("C", 360.0, 60.0, &["B", "F"]),
            ("D", 80.0, 200.0, &["A", "E", "G"]),
            ("E", 220.0, 200.0, &["B", "D", "F"]),
            ("F", 360.0, 200.0, &["C", "E", "G"]),
            ("G", 220.0, 320.0, &["D", "F"]),
        ];
        let mut graph = Self::new();
        for (id, x, y, neighbors) in rows {
            graph.add_node(id, x, y);
            graph
                .adjacency
                .insert(id.to_string(), neighbors.iter().map(|n| n.to_string()).collect());
        }
        graph
    }
}

/// The two graph traversals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum GraphSearch {
    Bfs,
    Dfs,
}

impl GraphSearch {
    pub const ALL: [Self; 2] = [Self::Bfs, Self::Dfs];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Bfs => "Graph BFS",
            Self::Dfs => "Graph DFS",
        }
    }

    pub fn listing(&self) -> &'static [&'static str] {
        match self {
            Self::Bfs => &[
                "queue = [start]; seen = {start}",
                "while queue is not empty:",
                "  node = queue.pop_front(); visit(node)",
                "  for n in adj[node]:",
                "    if n not in seen: seen.add(n); queue.push(n)",
                "done",
            ],
            Self::Dfs => &[
                "stack = [start]",
                "while stack is not empty:",
                "  node = stack.pop(); skip if visited; visit(node)",
                "  for n in reversed(adj[node]):",
                "    if n not visited: stack.push(n)",
                "done",
            ],
        }
    }
}

const LINE_START: usize = 0;
const LINE_VISIT: usize = 2;
const LINE_DISCOVER: usize = 4;
const LINE_DONE: usize = 5;

/// Generate the traversal trace of `graph` from `start`.
pub fn generate(search: GraphSearch, graph: &Graph, start: &str) -> Result<Vec<Operation>> {
    if !graph.contains(start) {
        return Err(Error::UnknownNode(start.to_string()));
    }
    for neighbours in graph.adjacency.values() {
        if let Some(unknown) = neighbours.iter().find(|n| !graph.contains(n)) {
            return Err(Error::UnknownNode(unknown.clone()));
        }
    }
    Ok(match search {
        GraphSearch::Bfs => bfs(graph, start),
        GraphSearch::Dfs => dfs(graph, start),
    })
}

/// A frontier entry: the node and the node it was discovered from.
type Pending = (String, Option<String>);

struct Recorder {
    ops: Vec<Operation>,
    visited: Vec<String>,
}

impl Recorder {
    fn emit(
        &mut self,
        kind: GraphKind,
        line: usize,
        node: Option<&str>,
        edge: Option<(&str, &str)>,
        frontier: Vec<String>,
        note: String,
    ) {
        self.ops.push(Operation::Graph(GraphStep {
            line,
            note,
            kind,
            highlight_node: node.map(str::to_string),
            highlight_edge: edge.map(|(a, b)| {
                let (a, b) = if a <= b { (a, b) } else { (b, a) };
                (a.to_string(), b.to_string())
            }),
            visited: self.visited.clone(),
            frontier,
        }));
    }

    fn finish(mut self) -> Vec<Operation> {
        let note = format!("traversal complete: {} nodes visited", self.visited.len());
        self.emit(GraphKind::Done, LINE_DONE, None, None, Vec::new(), note);
        self.ops
    }
}

fn edge_of(pending: &Pending) -> Option<(&str, &str)> {
    pending.1.as_deref().map(|from| (from, pending.0.as_str()))
}

fn bfs(graph: &Graph, start: &str) -> Vec<Operation> {
    let mut rec = Recorder {
        ops: Vec::new(),
        visited: Vec::new(),
    };
    let mut seen = HashSet::from([start.to_string()]);
    let mut queue: VecDeque<Pending> = VecDeque::from([(start.to_string(), None)]);
    let ids = |q: &VecDeque<Pending>| q.iter().map(|(id, _)| id.clone()).collect::<Vec<_>>();

    rec.emit(
        GraphKind::Frontier,
        LINE_START,
        Some(start),
        None,
        ids(&queue),
        format!("start at {start}"),
    );

    while let Some(entry) = queue.pop_front() {
        let node = entry.0.as_str();
        rec.visited.push(node.to_string());
        rec.emit(
            GraphKind::Visit,
            LINE_VISIT,
            Some(node),
            edge_of(&entry),
            ids(&queue),
            format!("visit {node}"),
        );
        for n in graph.neighbors(node) {
            if seen.insert(n.clone()) {
                queue.push_back((n.clone(), Some(node.to_string())));
                rec.emit(
                    GraphKind::Frontier,
                    LINE_DISCOVER,
                    Some(n.as_str()),
                    Some((node, n.as_str())),
                    ids(&queue),
                    format!("discover {n} from {node}"),
                );
            }
        }
    }

    rec.finish()
}

fn dfs(graph: &Graph, start: &str) -> Vec<Operation> {
    let mut rec = Recorder {
        ops: Vec::new(),
        visited: Vec::new(),
    };
    let mut visited = HashSet::new();
    let mut discovered = HashSet::from([start.to_string()]);
    let mut stack: Vec<Pending> = vec![(start.to_string(), None)];

    // Top of stack first, each pending node once.
    let pending = |stack: &[Pending], visited: &HashSet<String>| {
        let mut listed = HashSet::new();
        stack
            .iter()
            .rev()
            .filter(|(id, _)| !visited.contains(id) && listed.insert(id.clone()))
            .map(|(id, _)| id.clone())
            .collect::<Vec<_>>()
    };

    rec.emit(
        GraphKind::Frontier,
        LINE_START,
        Some(start),
        None,
        pending(&stack, &visited),
        format!("start at {start}"),
    );

    while let Some(entry) = stack.pop() {
        let node = entry.0.as_str();
        if !visited.insert(node.to_string()) {
            continue;
        }
        rec.visited.push(node.to_string());
        rec.emit(
            GraphKind::Visit,
            LINE_VISIT,
            Some(node),
            edge_of(&entry),
            pending(&stack, &visited),
            format!("visit {node}"),
        );
        for n in graph.neighbors(node).iter().rev() {
            if visited.contains(n) {
                continue;
            }
            stack.push((n.clone(), Some(node.to_string())));
            if discovered.insert(n.clone()) {
                rec.emit(
                    GraphKind::Frontier,
                    LINE_DISCOVER,
                    Some(n.as_str()),
                    Some((node, n.as_str())),
                    pending(&stack, &visited),
                    format!("discover {n} from {node}"),
                );
            }
        }
    }

    rec.finish()
}
