//! Tree node representation.

use crate::core::types::FeatureIndex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a node inside [`crate::tree::RegressionTree`].
pub type NodeIndex = usize;

/// Either a leaf with a constant output or an internal threshold split.
///
/// Rows whose split feature is `<= split_threshold` go left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TreeNode {
    /// Terminal node
    Leaf {
        /// Prediction of every row reaching this leaf
        output: f64,
        /// Number of training rows in the leaf
        data_count: usize,
    },
    /// Split node
    Internal {
        /// Feature tested by the split
        split_feature: FeatureIndex,
        /// Threshold value
        split_threshold: f64,
        /// Reduction of the squared error achieved by the split
        split_gain: f64,
        /// Child for values at or below the threshold
        left_child: NodeIndex,
        /// Child for values above the threshold
        right_child: NodeIndex,
        /// Number of training rows reaching this node
        data_count: usize,
    },
}

impl TreeNode {
    /// Creates a new leaf node.
    pub fn new_leaf(output: f64, data_count: usize) -> Self {
        TreeNode::Leaf { output, data_count }
    }

    /// Whether this node is a leaf
    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf { .. })
    }

    /// Number of training rows reaching this node
    pub fn data_count(&self) -> usize {
        match self {
            TreeNode::Leaf { data_count, .. } | TreeNode::Internal { data_count, .. } => *data_count,
        }
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeNode::Leaf { output, data_count } => {
                write!(f, "Leaf(output={:.6}, count={})", output, data_count)
            }
            TreeNode::Internal {
                split_feature,
                split_threshold,
                split_gain,
                ..
            } => write!(
                f,
                "Split(feature={}, threshold={:.6}, gain={:.6})",
                split_feature, split_threshold, split_gain
            ),
        }
    }
}
