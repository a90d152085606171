//! Evaluation metrics.

pub mod regression;

pub use regression::{mae, mean_squared_error, r_squared, rmse};
