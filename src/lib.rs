//! # artist-rating
//!
//! Builds a supervised-learning dataset for predicting the rating a user
//! gives a music artist, then fits a feature-selection plus gradient
//! boosting pipeline and predicts a held-out partition.
//!
//! ## Pipeline
//!
//! 1. **Ingestion** ([`dataset::loader`]): `train.csv`, `test.csv`,
//!    `words.csv` and `users.csv` become typed tables.
//! 2. **Cleaning** ([`dataset::preprocessing`]): frequency encoding of the
//!    words answers, label encoding and imputation of the users table.
//! 3. **Merging** ([`dataset::merge`]): left joins of each ratings partition
//!    with the words table on (artist, user) and the users table on user.
//! 4. **Aggregation** ([`dataset::aggregate`]): mean, min, max and median
//!    rating per user and per artist, computed from the training partition
//!    only; users and artists unseen in training get the sentinel.
//! 5. **Modelling** ([`pipeline`]): [`SelectKBest`] then
//!    [`GradientBoostingRegressor`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use artist_rating::{Config, DatasetBuilder, ModelPipeline};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! artist_rating::init()?;
//!
//! let config = Config::default();
//! let dataset = DatasetBuilder::new(config.clone())?.build_from_dir("data")?;
//!
//! let model = ModelPipeline::new(&config.model)?.fit(&dataset.features, &dataset.target_vector)?;
//! let predictions = model.predict(&dataset.target_features)?;
//! println!("{} predictions", predictions.len());
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    non_snake_case,
    non_upper_case_globals
)]

pub mod boosting;
pub mod config;
pub mod core;
pub mod dataset;
pub mod metrics;
pub mod pipeline;
pub mod selection;
pub mod tree;

pub use crate::boosting::GradientBoostingRegressor;
pub use crate::config::{Config, ConfigBuilder, ModelConfig, SchemaConfig};
pub use crate::core::constants::*;
pub use crate::core::error::{RatingError, Result};
pub use crate::core::traits::Regressor;
pub use crate::core::types::*;
pub use crate::dataset::{
    apply_aggregates, merge, normalize_users, normalize_words, AggregateStatistics,
    BuiltDataset, CsvLoader, DatasetBuilder, FeatureMatrix, RatingTable, RawUsersTable,
    RawWordsTable,
};
pub use crate::pipeline::{FittedPipeline, ModelPipeline};
pub use crate::selection::SelectKBest;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging.
///
/// Idempotent; `RUST_LOG` defaults to `info`.
pub fn init() -> Result<()> {
    crate::core::initialize_core()
}

/// Check if the library has been initialized.
pub fn is_initialized() -> bool {
    crate::core::is_core_initialized()
}
