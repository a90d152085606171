//! Dataset construction.
//!
//! Raw tables flow through four stages before reaching the model:
//!
//! 1. [`loader`] reads the ratings, words and users files into typed tables.
//! 2. [`preprocessing`] cleans the words and users tables.
//! 3. [`merge`] left-joins each ratings partition with the cleaned tables.
//! 4. [`aggregate`] attaches per-user and per-artist rating statistics
//!    computed from the training partition only.
//!
//! [`DatasetBuilder`] runs the whole flow and returns a [`BuiltDataset`].

pub mod aggregate;
pub mod dataset;
pub mod loader;
pub mod merge;
pub mod preprocessing;
pub mod table;

pub use aggregate::{apply_aggregates, AggregateFeatures, AggregateStatistics, AugmentedTable, RatingStats};
pub use dataset::{BuiltDataset, DatasetBuilder, FeatureMatrix};
pub use loader::{CsvConfig, CsvLoader, InputTables, TextEncoding};
pub use merge::{merge, MergedRecord, MergedTable, Merger};
pub use preprocessing::{
    columns_with_missing, normalize_users, normalize_words, FrequencyEncoder, LabelEncoder,
    UsersTable, WordsTable,
};
pub use table::{RatingRecord, RatingTable, RawTable, RawUsersTable, RawWordsTable};
