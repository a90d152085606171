//! Feature matrices and the end-to-end dataset build.

use crate::config::Config;
use crate::core::error::{RatingError, Result};
use crate::core::types::Partition;
use crate::dataset::aggregate::{apply_aggregates, AggregateStatistics};
use crate::dataset::loader::{CsvLoader, InputTables};
use crate::dataset::merge::Merger;
use crate::dataset::preprocessing::{normalize_users, normalize_words};
use crate::dataset::table::{RatingTable, RawUsersTable, RawWordsTable};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use std::path::Path;

/// Named numeric columns over rows.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    columns: Vec<String>,
    values: Array2<f64>,
}

impl FeatureMatrix {
    /// Create a feature matrix; one name per column
    pub fn new(columns: Vec<String>, values: Array2<f64>) -> Result<Self> {
        if columns.len() != values.ncols() {
            return Err(RatingError::dimension_mismatch(
                format!("{} column names", values.ncols()),
                format!("{}", columns.len()),
            ));
        }
        Ok(FeatureMatrix { columns, values })
    }

    /// Column names in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Values, rows by columns
    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.values.nrows()
    }

    /// Number of columns
    pub fn num_features(&self) -> usize {
        self.values.ncols()
    }

    /// Values of a named column
    pub fn column(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|idx| self.values.column(idx))
    }

    /// Keep the given columns, in the given order
    pub fn select(&self, indices: &[usize]) -> Result<FeatureMatrix> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.num_features()) {
            return Err(RatingError::invalid_parameter(
                "column index",
                bad.to_string(),
                format!("matrix has {} columns", self.num_features()),
            ));
        }
        FeatureMatrix::new(
            indices.iter().map(|&i| self.columns[i].clone()).collect(),
            self.values.select(Axis(1), indices),
        )
    }

    /// Split into names and values
    pub fn into_parts(self) -> (Vec<String>, Array2<f64>) {
        (self.columns, self.values)
    }

    /// Convert into a polars DataFrame with one `f64` column per feature
    #[cfg(feature = "polars")]
    pub fn to_polars(&self) -> Result<polars::prelude::DataFrame> {
        use polars::prelude::{Column, DataFrame, PlSmallStr};

        let columns: Vec<Column> = self
            .columns
            .iter()
            .zip(self.values.columns())
            .map(|(name, values)| Column::new(PlSmallStr::from(name.as_str()), values.to_vec()))
            .collect();
        DataFrame::new(columns)
            .map_err(|e| RatingError::data_loading(format!("Failed to build DataFrame: {}", e)))
    }
}

/// Output of a dataset build.
#[derive(Debug, Clone)]
pub struct BuiltDataset {
    /// Training feature matrix
    pub features: FeatureMatrix,
    /// Training ratings, same row order as `features`
    pub target_vector: Array1<f64>,
    /// Target-partition feature matrix with the training column order
    pub target_features: FeatureMatrix,
    /// Identifiers of the target rows
    pub target_ids: Vec<String>,
    /// Statistics the aggregate columns were derived from
    pub statistics: AggregateStatistics,
}

struct PartitionOutput {
    features: FeatureMatrix,
    ratings: Option<Array1<f64>>,
    ids: Vec<String>,
}

/// Runs cleaning, merging and aggregation for one pair of partitions.
#[derive(Debug, Clone)]
pub struct DatasetBuilder {
    config: Config,
}

impl DatasetBuilder {
    /// Create a builder; the configuration is validated up front
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(DatasetBuilder { config })
    }

    /// Configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load the four tables from `dir` and build
    pub fn build_from_dir<P: AsRef<Path>>(&self, dir: P) -> Result<BuiltDataset> {
        let tables = CsvLoader::new(self.config.schema.clone()).load_dir(dir)?;
        self.build_from_tables(tables)
    }

    /// Build from already loaded tables
    pub fn build_from_tables(&self, tables: InputTables) -> Result<BuiltDataset> {
        self.build(tables.train, tables.test, tables.words, tables.users)
    }

    /// Build the training and target feature matrices.
    ///
    /// Statistics are computed from `train` only and shared read-only by both
    /// augmentations. Either every step succeeds or nothing is returned.
    pub fn build(
        &self,
        train: RatingTable,
        mut target: RatingTable,
        words: RawWordsTable,
        users: RawUsersTable,
    ) -> Result<BuiltDataset> {
        let sentinel = self.config.sentinel;

        if train.partition() != Partition::Training {
            return Err(RatingError::invalid_parameter(
                "train",
                train.partition().to_string(),
                "expected the training partition",
            ));
        }
        if target.partition() != Partition::Target {
            return Err(RatingError::invalid_parameter(
                "target",
                target.partition().to_string(),
                "expected the target partition",
            ));
        }
        target.align_context_to(train.context_columns())?;

        let words = normalize_words(words, sentinel)?;
        let users = normalize_users(users, &self.config.schema, sentinel)?;
        let merger = Merger::new(&words, &users)?;

        let statistics = AggregateStatistics::compute(&train)?;
        if let Some((lo, hi)) = statistics.rating_range() {
            if (lo..=hi).contains(&sentinel) {
                return Err(RatingError::invalid_parameter(
                    "sentinel",
                    sentinel.to_string(),
                    format!("lies inside the training rating range [{}, {}]", lo, hi),
                ));
            }
        }

        let augment = |ratings: &RatingTable| -> Result<PartitionOutput> {
            let augmented = apply_aggregates(merger.merge(ratings), &statistics, sentinel);
            Ok(PartitionOutput {
                features: augmented.to_feature_matrix()?,
                ratings: match augmented.partition() {
                    Partition::Training => Some(augmented.target_vector()?),
                    Partition::Target => None,
                },
                ids: augmented.row_ids(),
            })
        };
        let (train_output, target_output) = if self.config.parallel {
            rayon::join(|| augment(&train), || augment(&target))
        } else {
            (augment(&train), augment(&target))
        };
        let train_output = train_output?;
        let target_output = target_output?;

        if train_output.features.columns() != target_output.features.columns() {
            return Err(RatingError::dimension_mismatch(
                format!("target columns {:?}", train_output.features.columns()),
                format!("{:?}", target_output.features.columns()),
            ));
        }

        let features = train_output.features;
        let target_vector = train_output.ratings.unwrap_or_else(|| Array1::zeros(0));
        let target_features = target_output.features;
        let target_ids = target_output.ids;

        log::info!(
            "Built dataset: {} training rows, {} target rows, {} features",
            features.num_rows(),
            target_features.num_rows(),
            features.num_features()
        );

        Ok(BuiltDataset {
            features,
            target_vector,
            target_features,
            target_ids,
            statistics,
        })
    }
}
