//! Exact split search on squared error.

use crate::core::constants::EPSILON;
use crate::core::types::FeatureIndex;
use ndarray::ArrayView2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Best split of one node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitInfo {
    /// Feature index for the split
    pub feature: FeatureIndex,
    /// Rows with a feature value `<= threshold` go left
    pub threshold: f64,
    /// Reduction of the sum of squared errors
    pub gain: f64,
    /// Number of rows going left
    pub left_count: usize,
    /// Number of rows going right
    pub right_count: usize,
}

/// Split finder configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitFinderConfig {
    /// Minimum number of rows in each child
    pub min_data_in_leaf: usize,
    /// Minimum gain for a split to be accepted
    pub min_split_gain: f64,
}

impl Default for SplitFinderConfig {
    fn default() -> Self {
        SplitFinderConfig {
            min_data_in_leaf: 1,
            min_split_gain: EPSILON,
        }
    }
}

/// Searches every feature for the threshold that most reduces squared error.
#[derive(Debug, Clone)]
pub struct SplitFinder {
    config: SplitFinderConfig,
}

impl SplitFinder {
    /// Create a split finder
    pub fn new(config: SplitFinderConfig) -> Self {
        SplitFinder { config }
    }

    /// Get configuration
    pub fn config(&self) -> &SplitFinderConfig {
        &self.config
    }

    /// Best split of the rows `indices`; features are searched in parallel.
    ///
    /// Equal gains resolve to the lower feature index, then the lower
    /// threshold, so the result does not depend on scheduling.
    pub fn find_best_split(
        &self,
        features: ArrayView2<'_, f64>,
        targets: &[f64],
        indices: &[usize],
    ) -> Option<SplitInfo> {
        if indices.len() < 2 * self.config.min_data_in_leaf.max(1) {
            return None;
        }

        let candidates: Vec<Option<SplitInfo>> = (0..features.ncols())
            .into_par_iter()
            .map(|feature| self.best_split_for_feature(features, targets, indices, feature))
            .collect();

        candidates
            .into_iter()
            .flatten()
            .fold(None, |best: Option<SplitInfo>, candidate| match best {
                Some(b) if b.gain >= candidate.gain => Some(b),
                _ => Some(candidate),
            })
    }

    fn best_split_for_feature(
        &self,
        features: ArrayView2<'_, f64>,
        targets: &[f64],
        indices: &[usize],
        feature: FeatureIndex,
    ) -> Option<SplitInfo> {
        let mut order: Vec<(f64, f64)> = indices
            .iter()
            .map(|&row| (features[[row, feature]], targets[row]))
            .collect();
        order.sort_by(|a, b| a.0.total_cmp(&b.0));

        let n = order.len();
        let total: f64 = order.iter().map(|&(_, t)| t).sum();
        let parent_score = total * total / n as f64;
        let min_leaf = self.config.min_data_in_leaf.max(1);

        let mut best: Option<SplitInfo> = None;
        let mut left_sum = 0.0;
        for pos in 1..n {
            left_sum += order[pos - 1].1;
            if pos < min_leaf || n - pos < min_leaf {
                continue;
            }
            if order[pos - 1].0 == order[pos].0 {
                continue;
            }

            let right_sum = total - left_sum;
            let gain = left_sum * left_sum / pos as f64
                + right_sum * right_sum / (n - pos) as f64
                - parent_score;
            if gain > self.config.min_split_gain && best.as_ref().map_or(true, |b| gain > b.gain) {
                best = Some(SplitInfo {
                    feature,
                    threshold: split_threshold(order[pos - 1].0, order[pos].0),
                    gain,
                    left_count: pos,
                    right_count: n - pos,
                });
            }
        }
        best
    }
}

/// Midpoint of two distinct sorted values, kept strictly below `hi` so
/// that `<= threshold` always leaves `hi` on the right.
fn split_threshold(lo: f64, hi: f64) -> f64 {
    let mid = lo / 2.0 + hi / 2.0;
    if mid >= lo && mid < hi {
        mid
    } else {
        lo
    }
}
