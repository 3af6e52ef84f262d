//! AVL rotation step generators.
//!
//! Every rotation is replayed as four steps: the unbalanced subtree is
//! highlighted, the pivot (old subtree root) is selected, the shape switches
//! to the rotated tree with the new subtree root highlighted, and finally the
//! highlight clears.
//!
//! Rotations are real relinking operations on a [`TreeShape`], so any valid
//! tree can be rotated at any node that has the children the case needs.
//! [`RotationKind::fixture`] provides the four three-node demonstration trees.

use crate::error::{Error, Result};
use crate::op::{NodeId, Operation, TreeKind, TreeStep};
use crate::tree::{Side, TreeShape};

/// The four AVL rebalancing cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum RotationKind {
    SingleLeft,
    SingleRight,
    LeftRight,
    RightLeft,
}

impl RotationKind {
    pub const ALL: [Self; 4] = [
        Self::SingleLeft,
        Self::SingleRight,
        Self::LeftRight,
        Self::RightLeft,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::SingleLeft => "Left Rotation",
            Self::SingleRight => "Right Rotation",
            Self::LeftRight => "Left-Right Rotation",
            Self::RightLeft => "Right-Left Rotation",
        }
    }

    pub fn listing(&self) -> &'static [&'static str] {
        match self {
            Self::SingleLeft => &[
                "if balance(z) < -1 and balance(z.right) <= 0:",
                "  pivot = z",
                "  y = z.right; z.right = y.left; y.left = z",
                "  relink parent to y",
            ],
            Self::SingleRight => &[
                "if balance(z) > 1 and balance(z.left) >= 0:",
                "  pivot = z",
                "  y = z.left; z.left = y.right; y.right = z",
                "  relink parent to y",
            ],
            Self::LeftRight => &[
                "if balance(z) > 1 and balance(z.left) < 0:",
                "  pivot = z",
                "  rotate_left(z.left); rotate_right(z)",
                "  relink parent to new root",
            ],
            Self::RightLeft => &[
                "if balance(z) < -1 and balance(z.right) > 0:",
                "  pivot = z",
                "  rotate_right(z.right); rotate_left(z)",
                "  relink parent to new root",
            ],
        }
    }

    /// The three-node demonstration tree for this case, rooted at `n30`.
    pub fn fixture(&self) -> TreeShape {
        match self {
            Self::SingleLeft => TreeShape::from_rows(&[
                ("n30", "30", None, Some("n40")),
                ("n40", "40", None, Some("n50")),
                ("n50", "50", None, None),
            ]),
            Self::SingleRight => TreeShape::from_rows(&[
                ("n30", "30", Some("n20"), None),
                ("n20", "20", Some("n10"), None),
                ("n10", "10", None, None),
            ]),
            Self::LeftRight => TreeShape::from_rows(&[
                ("n30", "30", Some("n10"), None),
                ("n10", "10", None, Some("n20")),
                ("n20", "20", None, None),
            ]),
            Self::RightLeft => TreeShape::from_rows(&[
                ("n30", "30", None, Some("n50")),
                ("n50", "50", Some("n40"), None),
                ("n40", "40", None, None),
            ]),
        }
    }

    /// The case that rebalances `at`, or `None` when `at` is balanced.
    pub fn detect(tree: &TreeShape, at: &str) -> Result<Option<Self>> {
        let balance = tree.balance_factor(at)?;
        let node = tree.node(at)?;
        let child_balance = |child: Option<&NodeId>| match child {
            Some(id) => tree.balance_factor(id.as_str()),
            None => Ok(0),
        };
        let kind = if balance > 1 {
            if child_balance(node.left.as_ref())? >= 0 {
                Some(Self::SingleRight)
            } else {
                Some(Self::LeftRight)
            }
        } else if balance < -1 {
            if child_balance(node.right.as_ref())? <= 0 {
                Some(Self::SingleLeft)
            } else {
                Some(Self::RightLeft)
            }
        } else {
            None
        };
        Ok(kind)
    }

    /// Rotate `tree` at `at`, returning the new subtree root.
    pub fn apply(&self, tree: &mut TreeShape, at: &str) -> Result<NodeId> {
        match self {
            Self::SingleLeft => rotate(tree, at, Side::Right),
            Self::SingleRight => rotate(tree, at, Side::Left),
            Self::LeftRight => {
                let left = required_child(tree, at, Side::Left)?;
                rotate(tree, left.as_str(), Side::Right)?;
                rotate(tree, at, Side::Left)
            }
            Self::RightLeft => {
                let right = required_child(tree, at, Side::Right)?;
                rotate(tree, right.as_str(), Side::Left)?;
                rotate(tree, at, Side::Right)
            }
        }
    }
}

fn required_child(tree: &TreeShape, at: &str, side: Side) -> Result<NodeId> {
    tree.node(at)?
        .child(side)
        .cloned()
        .ok_or_else(|| Error::MissingChild {
            node: at.to_string(),
            side: side.as_str(),
        })
}

/// Lift the `lift`-side child of `at` into its place. Lifting the right
/// child is a left rotation.
fn rotate(tree: &mut TreeShape, at: &str, lift: Side) -> Result<NodeId> {
    let child = required_child(tree, at, lift)?;
    let inner = tree.node(child.as_str())?.child(lift.opposite()).cloned();

    tree.replace_link(at, child.clone())?;
    tree.set_child(at, lift, inner)?;
    tree.set_child(child.as_str(), lift.opposite(), Some(NodeId::from(at)))?;
    Ok(child)
}

/// Generate the four-step rotation scenario for `kind` at node `at`.
pub fn generate(kind: RotationKind, tree: &TreeShape, at: &str) -> Result<Vec<Operation>> {
    tree.validate()?;
    let before = tree.clone();
    let subtree = before.subtree(at)?;
    let balance = before.balance_factor(at)?;
    let pivot_label = before.label(at)?.to_string();

    let mut after = before.clone();
    let new_root = kind.apply(&mut after, at)?;
    after.validate()?;
    let new_label = after.label(new_root.as_str())?.to_string();

    let step = |line, kind, highlight, tree, note: String| {
        Operation::Tree(TreeStep {
            line,
            note,
            kind,
            highlight,
            tree,
        })
    };

    Ok(vec![
        step(
            0,
            TreeKind::Imbalance,
            subtree,
            Some(before),
            format!("imbalance detected at {pivot_label} (balance {balance})"),
        ),
        step(
            1,
            TreeKind::Pivot,
            vec![NodeId::from(at)],
            None,
            format!("pivot {pivot_label} selected"),
        ),
        step(
            2,
            TreeKind::Rotate,
            vec![new_root],
            Some(after),
            format!("{}: {new_label} is the new subtree root", kind.name()),
        ),
        step(
            3,
            TreeKind::Done,
            Vec::new(),
            None,
            "re-linked and balanced".to_string(),
        ),
    ])
}

/// The scenario for `kind` on its own fixture tree.
pub fn canned(kind: RotationKind) -> Result<Vec<Operation>> {
    generate(kind, &kind.fixture(), "n30")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn final_shape(trace: &[Operation]) -> TreeShape {
        trace
            .iter()
            .filter_map(Operation::as_tree)
            .filter_map(|s| s.tree.clone())
            .last()
            .unwrap()
    }

    fn children(tree: &TreeShape, id: &str) -> (Option<String>, Option<String>) {
        let node = tree.node(id).unwrap();
        (
            node.left.as_ref().map(|n| n.0.clone()),
            node.right.as_ref().map(|n| n.0.clone()),
        )
    }

    #[test]
    fn single_left_fixture() {
        let trace = canned(RotationKind::SingleLeft).unwrap();
        assert_eq!(trace.len(), 4);
        let after = final_shape(&trace);
        assert_eq!(after.root, Some(NodeId::from("n40")));
        assert_eq!(children(&after, "n40"), (Some("n30".into()), Some("n50".into())));
        assert_eq!(children(&after, "n30"), (None, None));
    }

    #[test]
    fn single_right_fixture() {
        let after = final_shape(&canned(RotationKind::SingleRight).unwrap());
        assert_eq!(after.root, Some(NodeId::from("n20")));
        assert_eq!(children(&after, "n20"), (Some("n10".into()), Some("n30".into())));
    }

    #[test]
    fn left_right_fixture() {
        let after = final_shape(&canned(RotationKind::LeftRight).unwrap());
        assert_eq!(after.root, Some(NodeId::from("n20")));
        assert_eq!(children(&after, "n20"), (Some("n10".into()), Some("n30".into())));
        assert_eq!(children(&after, "n10"), (None, None));
    }

    #[test]
    fn right_left_fixture() {
        let after = final_shape(&canned(RotationKind::RightLeft).unwrap());
        assert_eq!(after.root, Some(NodeId::from("n40")));
        assert_eq!(children(&after, "n40"), (Some("n30".into()), Some("n50".into())));
    }

    #[test]
    fn scenario_shape() {
        let trace = canned(RotationKind::LeftRight).unwrap();
        let steps: Vec<_> = trace.iter().map(|op| op.as_tree().unwrap()).collect();
        assert_eq!(
            steps.iter().map(|s| s.kind).collect::<Vec<_>>(),
            vec![TreeKind::Imbalance, TreeKind::Pivot, TreeKind::Rotate, TreeKind::Done]
        );
        assert_eq!(steps[0].highlight.len(), 3);
        assert_eq!(steps[1].highlight, vec![NodeId::from("n30")]);
        assert_eq!(steps[2].highlight, vec![NodeId::from("n20")]);
        assert!(steps[3].highlight.is_empty());
        assert!(steps[1].tree.is_none() && steps[3].tree.is_none());
    }

    #[test]
    fn detect_matches_fixtures() {
        for kind in RotationKind::ALL {
            assert_eq!(RotationKind::detect(&kind.fixture(), "n30").unwrap(), Some(kind));
        }
        assert_eq!(RotationKind::detect(&TreeShape::sample(), "n42").unwrap(), None);
    }

    #[test]
    fn rotation_inside_larger_tree_relinks_parent() {
        let mut tree = TreeShape::sample();
        let new_root = RotationKind::SingleLeft.apply(&mut tree, "n64").unwrap();
        assert_eq!(new_root, NodeId::from("n79"));
        assert_eq!(children(&tree, "n42").1, Some("n79".into()));
        assert_eq!(children(&tree, "n79").0, Some("n64".into()));
        assert_eq!(children(&tree, "n64"), (Some("n51".into()), None));
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn missing_child_is_an_error() {
        let tree = RotationKind::SingleLeft.fixture();
        assert!(matches!(
            generate(RotationKind::SingleRight, &tree, "n30"),
            Err(Error::MissingChild { side: "left", .. })
        ));
    }
}
