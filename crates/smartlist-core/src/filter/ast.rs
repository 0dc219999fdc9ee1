//! Filter expression tree.

use std::fmt;
use std::sync::Arc;

use super::criterion::Leaf;
use super::error::{FilterError, FilterResult};

/// Deepest tree the tagged and textual codecs accept; a lone leaf has depth 1.
///
/// Each group costs the tagged form two JSON nesting levels, so this stays
/// well inside `serde_json`'s recursion limit even with structured payloads.
pub const MAX_DEPTH: usize = 32;

/// Boolean operator of a [`ConjunctionNode`].
///
/// The ordinal (`AND` = 0, `OR` = 1) is what the tagged form stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Conjunction {
    /// Every child must match.
    #[default]
    And,
    /// At least one child must match.
    Or,
}

impl Conjunction {
    /// Stable ordinal used by the tagged form.
    pub fn ordinal(self) -> i64 {
        match self {
            Conjunction::And => 0,
            Conjunction::Or => 1,
        }
    }

    /// Resolves an ordinal read from the tagged form.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::UnknownOperator` for anything but 0 or 1.
    pub fn from_ordinal(value: i64) -> FilterResult<Self> {
        match value {
            0 => Ok(Conjunction::And),
            1 => Ok(Conjunction::Or),
            _ => Err(FilterError::UnknownOperator { value }),
        }
    }
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conjunction::And => f.write_str("AND"),
            Conjunction::Or => f.write_str("OR"),
        }
    }
}

/// A node of a smart-list filter tree.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterNode {
    /// An atomic criterion.
    Leaf(Leaf),
    /// An AND/OR group of child nodes.
    Conjunction(ConjunctionNode),
}

impl FilterNode {
    /// Returns the number of leaves in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            FilterNode::Leaf(_) => 1,
            FilterNode::Conjunction(node) => node.children().iter().map(Self::leaf_count).sum(),
        }
    }

    /// Returns the depth of the tree; a lone leaf has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            FilterNode::Leaf(_) => 1,
            FilterNode::Conjunction(node) => {
                1 + node.children().iter().map(Self::depth).max().unwrap_or(0)
            }
        }
    }

    /// Returns true if the tree is deeper than `limit`.
    ///
    /// Stops descending once the limit is passed, so it is safe on trees of
    /// any depth.
    pub fn exceeds_depth(&self, limit: usize) -> bool {
        match self {
            FilterNode::Leaf(_) => limit == 0,
            FilterNode::Conjunction(node) => {
                limit == 0
                    || node
                        .children()
                        .iter()
                        .any(|child| child.exceeds_depth(limit - 1))
            }
        }
    }

    /// Returns true if this node is a conjunction.
    pub fn is_conjunction(&self) -> bool {
        matches!(self, FilterNode::Conjunction(_))
    }
}

impl From<Leaf> for FilterNode {
    fn from(leaf: Leaf) -> Self {
        FilterNode::Leaf(leaf)
    }
}

impl From<ConjunctionNode> for FilterNode {
    fn from(node: ConjunctionNode) -> Self {
        FilterNode::Conjunction(node)
    }
}

/// Composite node aggregating children under AND or OR.
///
/// Children are held behind an `Arc<[FilterNode]>`: a node is an immutable
/// value, and an edit always produces a new node with a replaced child list.
/// Cloning a node is cheap and readers on other threads keep seeing the
/// snapshot they started with.
#[derive(Debug, Clone, PartialEq)]
pub struct ConjunctionNode {
    operator: Conjunction,
    children: Arc<[FilterNode]>,
}

impl ConjunctionNode {
    /// Creates a node from an operator and an ordered child list.
    pub fn new(operator: Conjunction, children: Vec<FilterNode>) -> Self {
        Self {
            operator,
            children: children.into(),
        }
    }

    /// Creates an empty node.
    pub fn empty(operator: Conjunction) -> Self {
        Self::new(operator, Vec::new())
    }

    /// Absorbs `candidate` into a conjunction.
    ///
    /// If `candidate` is already a conjunction, its operator and children are
    /// taken over verbatim and `requested` is ignored. Otherwise a single-child
    /// node with `requested` is created.
    ///
    /// Wrapping an OR group while asking for AND therefore keeps OR. Callers
    /// that need the requested operator honored use
    /// [`wrap_with_operator`](Self::wrap_with_operator).
    ///
    /// # Example
    ///
    /// ```
    /// use smartlist_core::filter::{Conjunction, ConjunctionNode, FilterNode};
    ///
    /// let or_group = FilterNode::from(ConjunctionNode::empty(Conjunction::Or));
    /// let wrapped = ConjunctionNode::wrap(or_group, Conjunction::And);
    /// assert_eq!(wrapped.operator(), Conjunction::Or);
    /// ```
    pub fn wrap(candidate: FilterNode, requested: Conjunction) -> Self {
        match candidate {
            FilterNode::Conjunction(existing) => existing,
            leaf => Self::new(requested, vec![leaf]),
        }
    }

    /// Like [`wrap`](Self::wrap), but never discards `requested`.
    ///
    /// A candidate conjunction with the same operator is absorbed; any other
    /// candidate becomes the single child of a new `requested` node.
    pub fn wrap_with_operator(candidate: FilterNode, requested: Conjunction) -> Self {
        match candidate {
            FilterNode::Conjunction(existing) if existing.operator == requested => existing,
            other => Self::new(requested, vec![other]),
        }
    }

    /// The node's operator.
    pub fn operator(&self) -> Conjunction {
        self.operator
    }

    /// The ordered children.
    pub fn children(&self) -> &[FilterNode] {
        &self.children
    }

    /// Returns a copy of this node with the whole child list replaced.
    pub fn with_children(&self, children: Vec<FilterNode>) -> Self {
        Self::new(self.operator, children)
    }

    /// Returns a copy of this node with `child` appended.
    pub fn appended(&self, child: FilterNode) -> Self {
        let mut children = self.children.to_vec();
        children.push(child);
        Self::new(self.operator, children)
    }

    /// Returns true if the node has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.children.len()
    }
}
