//! Depth-first tree traversal generators.
//!
//! Each step carries the full (unchanged) tree shape and a highlight set.
//! Descending into a child is its own step, and descending into an absent
//! child records a `missing` marker before returning.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::op::{NodeId, Operation, TreeKind, TreeStep};
use crate::tree::{Side, TreeNode, TreeShape};

/// The three depth-first orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TraversalOrder {
    Preorder,
    Inorder,
    Postorder,
}

impl TraversalOrder {
    pub const ALL: [Self; 3] = [Self::Preorder, Self::Inorder, Self::Postorder];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Preorder => "Preorder Traversal",
            Self::Inorder => "Inorder Traversal",
            Self::Postorder => "Postorder Traversal",
        }
    }

    pub fn listing(&self) -> &'static [&'static str] {
        match self {
            Self::Preorder => &[
                "preorder(node):",
                "  if node is null: return",
                "  visit(node)",
                "  preorder(node.left)",
                "  preorder(node.right)",
                "done",
            ],
            Self::Inorder => &[
                "inorder(node):",
                "  if node is null: return",
                "  inorder(node.left)",
                "  visit(node)",
                "  inorder(node.right)",
                "done",
            ],
            Self::Postorder => &[
                "postorder(node):",
                "  if node is null: return",
                "  postorder(node.left)",
                "  postorder(node.right)",
                "  visit(node)",
                "done",
            ],
        }
    }

    /// Listing lines for (visit, descend left, descend right).
    fn lines(&self) -> (usize, usize, usize) {
        match self {
            Self::Preorder => (2, 3, 4),
            Self::Inorder => (3, 2, 4),
            Self::Postorder => (4, 2, 3),
        }
    }
}

const LINE_NULL: usize = 1;
const LINE_DONE: usize = 5;

/// Generate the traversal trace of `tree` in `order`.
pub fn generate(order: TraversalOrder, tree: &TreeShape) -> Result<Vec<Operation>> {
    tree.validate()?;
    let mut walker = Walker {
        tree,
        order,
        ops: Vec::new(),
        seen: HashSet::new(),
    };
    match &tree.root {
        Some(root) => walker.walk(root)?,
        None => walker.emit(TreeKind::Missing, LINE_NULL, Vec::new(), "tree is empty".into()),
    }
    walker.emit(TreeKind::Done, LINE_DONE, Vec::new(), "traversal complete".into());
    Ok(walker.ops)
}

struct Walker<'a> {
    tree: &'a TreeShape,
    order: TraversalOrder,
    ops: Vec<Operation>,
    seen: HashSet<&'a str>,
}

impl<'a> Walker<'a> {
    fn emit(&mut self, kind: TreeKind, line: usize, highlight: Vec<NodeId>, note: String) {
        self.ops.push(Operation::Tree(TreeStep {
            line,
            note,
            kind,
            highlight,
            tree: Some(self.tree.clone()),
        }));
    }

    fn walk(&mut self, id: &'a NodeId) -> Result<()> {
        if !self.seen.insert(id.as_str()) {
            return Err(Error::CycleDetected(id.0.clone()));
        }
        let tree: &'a TreeShape = self.tree;
        let node = tree.node(id.as_str())?;
        match self.order {
            TraversalOrder::Preorder => {
                self.visit(node);
                self.branch(node, Side::Left)?;
                self.branch(node, Side::Right)?;
            }
            TraversalOrder::Inorder => {
                self.branch(node, Side::Left)?;
                self.visit(node);
                self.branch(node, Side::Right)?;
            }
            TraversalOrder::Postorder => {
                self.branch(node, Side::Left)?;
                self.branch(node, Side::Right)?;
                self.visit(node);
            }
        }
        Ok(())
    }

    fn visit(&mut self, node: &TreeNode) {
        let (line, ..) = self.order.lines();
        let note = format!("visit {}", node.label);
        self.emit(TreeKind::Visit, line, vec![node.id.clone()], note);
    }

    fn branch(&mut self, node: &'a TreeNode, side: Side) -> Result<()> {
        let (_, left_line, right_line) = self.order.lines();
        let line = match side {
            Side::Left => left_line,
            Side::Right => right_line,
        };
        let note = format!("go {} from {}", side.as_str(), node.label);
        self.emit(TreeKind::Descend, line, vec![node.id.clone()], note);

        match node.child(side) {
            Some(child) => self.walk(child),
            None => {
                let note = format!("{} child of {} is null", side.as_str(), node.label);
                self.emit(TreeKind::Missing, LINE_NULL, vec![node.id.clone()], note);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visit_labels(trace: &[Operation]) -> Vec<String> {
        trace
            .iter()
            .filter_map(Operation::as_tree)
            .filter(|s| s.kind == TreeKind::Visit)
            .map(|s| s.note.trim_start_matches("visit ").to_string())
            .collect()
    }

    #[test]
    fn orders_on_sample_tree() {
        let tree = TreeShape::sample();
        let pre = visit_labels(&generate(TraversalOrder::Preorder, &tree).unwrap());
        let ino = visit_labels(&generate(TraversalOrder::Inorder, &tree).unwrap());
        let post = visit_labels(&generate(TraversalOrder::Postorder, &tree).unwrap());
        assert_eq!(pre, ["42", "17", "8", "23", "64", "51", "79"]);
        assert_eq!(ino, ["8", "17", "23", "42", "51", "64", "79"]);
        assert_eq!(post, ["8", "23", "17", "51", "79", "64", "42"]);
    }

    #[test]
    fn every_leaf_gets_two_null_markers() {
        let tree = TreeShape::sample();
        let trace = generate(TraversalOrder::Inorder, &tree).unwrap();
        let missing = trace
            .iter()
            .filter_map(Operation::as_tree)
            .filter(|s| s.kind == TreeKind::Missing)
            .count();
        // n nodes have n + 1 null links
        assert_eq!(missing, tree.len() + 1);
    }

    #[test]
    fn steps_carry_unchanged_tree() {
        let tree = TreeShape::sample();
        let trace = generate(TraversalOrder::Postorder, &tree).unwrap();
        for op in &trace {
            assert_eq!(op.as_tree().unwrap().tree.as_ref(), Some(&tree));
        }
        let last = trace.last().unwrap().as_tree().unwrap();
        assert_eq!(last.kind, TreeKind::Done);
        assert!(last.highlight.is_empty());
    }

    #[test]
    fn empty_tree_completes() {
        let trace = generate(TraversalOrder::Preorder, &TreeShape::default()).unwrap();
        assert_eq!(trace.len(), 2);
        assert!(trace[1].is_terminal());
    }

    #[test]
    fn cyclic_tree_fails_fast() {
        let tree = TreeShape::from_rows(&[
            ("a", "a", None, Some("b")),
            ("b", "b", Some("a"), None),
        ]);
        assert!(matches!(
            generate(TraversalOrder::Inorder, &tree),
            Err(Error::CycleDetected(_))
        ));
    }
}
