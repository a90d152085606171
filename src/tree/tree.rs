//! Depth-limited least-squares regression tree.

use crate::core::error::{RatingError, Result};
use crate::tree::node::{NodeIndex, TreeNode};
use crate::tree::split::{SplitFinder, SplitFinderConfig};
use ndarray::{Array1, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

/// Regression tree stored as a flat node vector; index 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<TreeNode>,
    num_features: usize,
}

impl RegressionTree {
    /// Grow a tree on `targets` by recursive exact splitting.
    ///
    /// Every leaf outputs the mean target of its rows.
    pub fn fit(
        features: ArrayView2<'_, f64>,
        targets: &[f64],
        max_depth: usize,
        min_data_in_leaf: usize,
    ) -> Result<Self> {
        if features.nrows() != targets.len() {
            return Err(RatingError::dimension_mismatch(
                format!("{} targets", features.nrows()),
                targets.len().to_string(),
            ));
        }
        if targets.is_empty() {
            return Err(RatingError::training("Cannot grow a tree on zero rows"));
        }

        let finder = SplitFinder::new(SplitFinderConfig {
            min_data_in_leaf,
            ..SplitFinderConfig::default()
        });
        let mut tree = RegressionTree {
            nodes: Vec::new(),
            num_features: features.ncols(),
        };
        let indices: Vec<usize> = (0..targets.len()).collect();
        tree.grow(&finder, features, targets, indices, 0, max_depth);
        Ok(tree)
    }

    fn grow(
        &mut self,
        finder: &SplitFinder,
        features: ArrayView2<'_, f64>,
        targets: &[f64],
        indices: Vec<usize>,
        depth: usize,
        max_depth: usize,
    ) -> NodeIndex {
        let node = self.nodes.len();
        let mean = indices.iter().map(|&i| targets[i]).sum::<f64>() / indices.len() as f64;
        self.nodes.push(TreeNode::new_leaf(mean, indices.len()));

        if depth >= max_depth {
            return node;
        }
        let split = match finder.find_best_split(features, targets, &indices) {
            Some(split) => split,
            None => return node,
        };

        let (left, right): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .copied()
            .partition(|&row| features[[row, split.feature]] <= split.threshold);
        if left.is_empty() || right.is_empty() {
            return node;
        }
        let data_count = indices.len();
        drop(indices);

        let left_child = self.grow(finder, features, targets, left, depth + 1, max_depth);
        let right_child = self.grow(finder, features, targets, right, depth + 1, max_depth);
        self.nodes[node] = TreeNode::Internal {
            split_feature: split.feature,
            split_threshold: split.threshold,
            split_gain: split.gain,
            left_child,
            right_child,
            data_count,
        };
        node
    }

    /// Predict a single row
    pub fn predict_row(&self, row: ArrayView1<'_, f64>) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Leaf { output, .. } => return *output,
                TreeNode::Internal {
                    split_feature,
                    split_threshold,
                    left_child,
                    right_child,
                    ..
                } => {
                    index = if row[*split_feature] <= *split_threshold {
                        *left_child
                    } else {
                        *right_child
                    };
                }
            }
        }
    }

    /// Predict every row
    pub fn predict(&self, features: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        if features.ncols() != self.num_features {
            return Err(RatingError::dimension_mismatch(
                format!("{} features", self.num_features),
                features.ncols().to_string(),
            ));
        }
        Ok(features.rows().into_iter().map(|row| self.predict_row(row)).collect())
    }

    /// Returns the number of nodes in the tree.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of leaf nodes in the tree.
    pub fn num_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Returns a node by index
    pub fn node(&self, index: NodeIndex) -> Option<&TreeNode> {
        self.nodes.get(index)
    }

    /// Total split gain per feature
    pub fn feature_importance(&self) -> Array1<f64> {
        let mut importance = Array1::zeros(self.num_features);
        for node in &self.nodes {
            if let TreeNode::Internal {
                split_feature,
                split_gain,
                ..
            } = node
            {
                importance[*split_feature] += *split_gain;
            }
        }
        importance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_tree_fits_step_function() {
        let features = array![[1.0], [2.0], [3.0], [4.0], [5.0], [6.0]];
        let targets = [1.0, 1.0, 1.0, 5.0, 5.0, 5.0];

        let tree = RegressionTree::fit(features.view(), &targets, 3, 1).unwrap();
        let predictions = tree.predict(features.view()).unwrap();
        for (p, t) in predictions.iter().zip(targets.iter()) {
            assert_abs_diff_eq!(*p, *t);
        }
        assert_eq!(tree.num_leaves(), 2);
        assert!(tree.feature_importance()[0] > 0.0);
    }

    #[test]
    fn test_depth_zero_is_mean() {
        let features = array![[1.0], [2.0]];
        let tree = RegressionTree::fit(features.view(), &[2.0, 4.0], 0, 1).unwrap();
        assert_eq!(tree.num_nodes(), 1);
        assert_abs_diff_eq!(tree.predict_row(array![10.0].view()), 3.0);
    }

    #[test]
    fn test_predict_checks_width() {
        let features = array![[1.0], [2.0]];
        let tree = RegressionTree::fit(features.view(), &[2.0, 4.0], 2, 1).unwrap();
        assert!(tree.predict(array![[1.0, 2.0]].view()).is_err());
    }

    #[test]
    fn test_adjacent_float_split_keeps_leaves_finite() {
        let lo = f64::from_bits(1.0f64.to_bits() + 1);
        let hi = f64::from_bits(lo.to_bits() + 1);
        let features = array![[lo], [lo], [hi], [hi]];
        let targets = [1.0, 1.0, 9.0, 9.0];

        let tree = RegressionTree::fit(features.view(), &targets, 3, 1).unwrap();
        let predictions = tree.predict(features.view()).unwrap();
        assert!(predictions.iter().all(|p| p.is_finite()));
        assert_eq!(predictions.to_vec(), targets.to_vec());
    }
}
