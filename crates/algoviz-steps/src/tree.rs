//! Binary tree shapes shared by the traversal and rotation generators.
//!
//! A [`TreeShape`] maps node ids to node records and names a root. It must
//! form a strict binary tree: every child id is defined and every node is
//! reachable at most once from the root. [`TreeShape::validate`] checks this
//! so that walkers can never loop.

use std::collections::{BTreeMap, HashSet};

use crate::error::{Error, Result};
use crate::op::NodeId;

/// Which child of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    pub fn opposite(&self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// One node record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeNode {
    pub id: NodeId,
    pub label: String,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

impl TreeNode {
    pub fn child(&self, side: Side) -> Option<&NodeId> {
        match side {
            Side::Left => self.left.as_ref(),
            Side::Right => self.right.as_ref(),
        }
    }

    fn child_mut(&mut self, side: Side) -> &mut Option<NodeId> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

/// A full tree snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeShape {
    pub root: Option<NodeId>,
    pub nodes: BTreeMap<NodeId, TreeNode>,
}

impl TreeShape {
    /// Build a shape from `(id, label, left, right)` rows; the first row is
    /// the root.
    pub fn from_rows(rows: &[(&str, &str, Option<&str>, Option<&str>)]) -> Self {
        let nodes = rows
            .iter()
            .map(|&(id, label, left, right)| {
                let node = TreeNode {
                    id: NodeId::from(id),
                    label: label.to_string(),
                    left: left.map(NodeId::from),
                    right: right.map(NodeId::from),
                };
                (node.id.clone(), node)
            })
            .collect();
        Self {
            root: rows.first().map(|&(id, ..)| NodeId::from(id)),
            nodes,
        }
    }

    /// The sample traversal tree rooted at "42".
    pub fn sample() -> Self {
        Self::from_rows(&[
            ("n42", "42", Some("n17"), Some("n64")),
            ("n17", "17", Some("n8"), Some("n23")),
            ("n64", "64", Some("n51"), Some("n79")),
            ("n8", "8", None, None),
            ("n23", "23", None, None),
            ("n51", "51", None, None),
            ("n79", "79", None, None),
        ])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Result<&TreeNode> {
        self.nodes
            .get(id)
            .ok_or_else(|| Error::UnknownNode(id.to_string()))
    }

    pub fn node_mut(&mut self, id: &str) -> Result<&mut TreeNode> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| Error::UnknownNode(id.to_string()))
    }

    pub fn label(&self, id: &str) -> Result<&str> {
        Ok(&self.node(id)?.label)
    }

    /// Ids of the subtree rooted at `id`, in preorder.
    pub fn subtree(&self, id: &str) -> Result<Vec<NodeId>> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![self.node(id)?.id.clone()];
        while let Some(cur) = stack.pop() {
            if !seen.insert(cur.clone()) {
                return Err(Error::CycleDetected(cur.0));
            }
            let node = self.node(cur.as_str())?;
            if let Some(right) = &node.right {
                stack.push(right.clone());
            }
            if let Some(left) = &node.left {
                stack.push(left.clone());
            }
            out.push(cur);
        }
        Ok(out)
    }

    /// Check that the shape is a strict binary tree.
    pub fn validate(&self) -> Result<()> {
        match &self.root {
            Some(root) => self.subtree(root.as_str()).map(|_| ()),
            None => Ok(()),
        }
    }

    /// Height of the subtree at `id`; an absent subtree has height 0.
    pub fn height(&self, id: Option<&NodeId>) -> Result<usize> {
        self.validate()?;
        Ok(self.height_unchecked(id))
    }

    fn height_unchecked(&self, id: Option<&NodeId>) -> usize {
        match id.and_then(|id| self.nodes.get(id)) {
            Some(node) => {
                let left = self.height_unchecked(node.left.as_ref());
                let right = self.height_unchecked(node.right.as_ref());
                1 + left.max(right)
            }
            None => 0,
        }
    }

    /// Left height minus right height at `id`.
    pub fn balance_factor(&self, id: &str) -> Result<i64> {
        self.validate()?;
        let node = self.node(id)?;
        let left = self.height_unchecked(node.left.as_ref()) as i64;
        let right = self.height_unchecked(node.right.as_ref()) as i64;
        Ok(left - right)
    }

    /// Parent of `id` and the side it hangs on, or `None` for the root.
    pub fn parent_of(&self, id: &str) -> Option<(NodeId, Side)> {
        self.nodes.values().find_map(|node| {
            if node.left.as_ref().is_some_and(|c| c.as_str() == id) {
                Some((node.id.clone(), Side::Left))
            } else if node.right.as_ref().is_some_and(|c| c.as_str() == id) {
                Some((node.id.clone(), Side::Right))
            } else {
                None
            }
        })
    }

    pub(crate) fn set_child(&mut self, parent: &str, side: Side, child: Option<NodeId>) -> Result<()> {
        *self.node_mut(parent)?.child_mut(side) = child;
        Ok(())
    }

    /// Point whatever referenced `old` (its parent or the root) at `new`.
    pub(crate) fn replace_link(&mut self, old: &str, new: NodeId) -> Result<()> {
        match self.parent_of(old) {
            Some((parent, side)) => self.set_child(parent.as_str(), side, Some(new)),
            None => {
                self.root = Some(new);
                Ok(())
            }
        }
    }
}
