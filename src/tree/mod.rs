//! Regression trees used as weak learners by the boosted regressor.

pub mod node;
pub mod split;
pub mod tree;

pub use node::{NodeIndex, TreeNode};
pub use split::{SplitFinder, SplitFinderConfig, SplitInfo};
pub use tree::RegressionTree;
