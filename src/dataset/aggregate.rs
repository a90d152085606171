//! Per-user and per-artist rating statistics.
//!
//! Statistics are computed once from the training ratings and then applied,
//! unchanged, to both partitions. A user or artist absent from training
//! resolves to the sentinel in all four of its columns.

use crate::core::constants::AGGREGATE_COLUMNS;
use crate::core::error::{RatingError, Result};
use crate::core::types::*;
use crate::dataset::merge::MergedTable;
use crate::dataset::table::RatingTable;
use crate::dataset::FeatureMatrix;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Descriptive statistics of one group of ratings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingStats {
    /// Arithmetic mean
    pub mean: f64,
    /// Smallest rating
    pub min: f64,
    /// Largest rating
    pub max: f64,
    /// Median; the average of the two middle values for even-sized groups
    pub median: f64,
    /// Number of ratings in the group
    pub count: usize,
}

impl RatingStats {
    /// Statistics of a non-empty group
    pub fn from_ratings(ratings: &[f64]) -> Option<Self> {
        if ratings.is_empty() {
            return None;
        }

        let mut sorted = ratings.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let n = sorted.len();
        let median = if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        };

        Some(RatingStats {
            mean: sorted.iter().sum::<f64>() / n as f64,
            min: sorted[0],
            max: sorted[n - 1],
            median,
            count: n,
        })
    }

    /// Values in column order: mean, min, max, median
    pub fn values(&self) -> [f64; 4] {
        [self.mean, self.min, self.max, self.median]
    }
}

/// Rating statistics grouped by user and by artist.
///
/// Only ever computed from a training partition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregateStatistics {
    by_user: HashMap<EntityId, RatingStats>,
    by_artist: HashMap<EntityId, RatingStats>,
    rating_range: Option<(f64, f64)>,
}

impl AggregateStatistics {
    /// Group the training ratings by user and by artist.
    ///
    /// A target partition is rejected: its statistics would leak into the
    /// features of the rows being predicted.
    pub fn compute(training: &RatingTable) -> Result<Self> {
        if training.partition() != Partition::Training {
            return Err(RatingError::invalid_parameter(
                "partition",
                training.partition().to_string(),
                "aggregate statistics must be computed from the training partition",
            ));
        }

        let mut user_ratings: HashMap<&str, Vec<f64>> = HashMap::new();
        let mut artist_ratings: HashMap<&str, Vec<f64>> = HashMap::new();
        let mut rating_range: Option<(f64, f64)> = None;

        for (row, record) in training.records().iter().enumerate() {
            let rating = record.rating.ok_or_else(|| {
                RatingError::data_integrity("train", "rating", row, "", "is a missing rating")
            })?;
            user_ratings.entry(&record.key.user_id).or_default().push(rating);
            artist_ratings.entry(&record.key.artist_id).or_default().push(rating);
            rating_range = Some(match rating_range {
                Some((lo, hi)) => (lo.min(rating), hi.max(rating)),
                None => (rating, rating),
            });
        }

        let by_user = group_stats(user_ratings);
        let by_artist = group_stats(artist_ratings);
        log::info!(
            "Computed rating statistics for {} users and {} artists from {} training rows",
            by_user.len(),
            by_artist.len(),
            training.len()
        );

        Ok(AggregateStatistics {
            by_user,
            by_artist,
            rating_range,
        })
    }

    /// Statistics of one user or artist
    pub fn lookup(&self, group: GroupKey, id: &str) -> Option<&RatingStats> {
        match group {
            GroupKey::User => self.by_user.get(id),
            GroupKey::Artist => self.by_artist.get(id),
        }
    }

    /// Statistics of a user
    pub fn user(&self, user_id: &str) -> Option<&RatingStats> {
        self.by_user.get(user_id)
    }

    /// Statistics of an artist
    pub fn artist(&self, artist_id: &str) -> Option<&RatingStats> {
        self.by_artist.get(artist_id)
    }

    /// Number of distinct training users
    pub fn num_users(&self) -> usize {
        self.by_user.len()
    }

    /// Number of distinct training artists
    pub fn num_artists(&self) -> usize {
        self.by_artist.len()
    }

    /// Smallest and largest training rating
    pub fn rating_range(&self) -> Option<(f64, f64)> {
        self.rating_range
    }

    /// The eight aggregate values of a row, user columns first
    pub fn features_for(&self, key: &PairKey, sentinel: f64) -> AggregateFeatures {
        let user = self.user(&key.user_id);
        let artist = self.artist(&key.artist_id);
        let fill = [sentinel; 4];

        let mut values = [0.0; 8];
        values[..4].copy_from_slice(&user.map(RatingStats::values).unwrap_or(fill));
        values[4..].copy_from_slice(&artist.map(RatingStats::values).unwrap_or(fill));

        AggregateFeatures {
            values,
            user_seen: user.is_some(),
            artist_seen: artist.is_some(),
        }
    }
}

fn group_stats(groups: HashMap<&str, Vec<f64>>) -> HashMap<EntityId, RatingStats> {
    groups
        .into_iter()
        .filter_map(|(id, ratings)| RatingStats::from_ratings(&ratings).map(|s| (id.to_string(), s)))
        .collect()
}

/// Aggregate values attached to one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateFeatures {
    /// Values in [`AGGREGATE_COLUMNS`] order
    pub values: [f64; 8],
    /// Whether the user occurs in training
    pub user_seen: bool,
    /// Whether the artist occurs in training
    pub artist_seen: bool,
}

/// A merged partition with its aggregate columns attached.
#[derive(Debug, Clone)]
pub struct AugmentedTable<'a> {
    merged: MergedTable<'a>,
    aggregates: Vec<AggregateFeatures>,
    sentinel: f64,
}

/// Attach the eight aggregate columns to every row of a merged partition.
pub fn apply_aggregates<'a>(
    merged: MergedTable<'a>,
    stats: &AggregateStatistics,
    sentinel: f64,
) -> AugmentedTable<'a> {
    let aggregates: Vec<AggregateFeatures> = merged
        .ratings()
        .records()
        .iter()
        .map(|record| stats.features_for(&record.key, sentinel))
        .collect();

    let table = AugmentedTable {
        merged,
        aggregates,
        sentinel,
    };
    let (unseen_users, unseen_artists) = table.unseen_counts();
    log::info!(
        "{} partition: {} rows, {} with an unseen user, {} with an unseen artist",
        table.partition(),
        table.len(),
        unseen_users,
        unseen_artists
    );
    table
}

impl<'a> AugmentedTable<'a> {
    /// Partition of the underlying ratings
    pub fn partition(&self) -> Partition {
        self.merged.ratings().partition()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.merged.len()
    }

    /// Whether the partition has no rows
    pub fn is_empty(&self) -> bool {
        self.merged.is_empty()
    }

    /// Underlying merged partition
    pub fn merged(&self) -> &MergedTable<'a> {
        &self.merged
    }

    /// Aggregate values of every row
    pub fn aggregates(&self) -> &[AggregateFeatures] {
        &self.aggregates
    }

    /// Rows whose user, respectively artist, is absent from training
    pub fn unseen_counts(&self) -> (usize, usize) {
        self.aggregates.iter().fold((0, 0), |(users, artists), a| {
            (users + usize::from(!a.user_seen), artists + usize::from(!a.artist_seen))
        })
    }

    /// Feature column names: merged columns then the aggregate columns
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = self.merged.feature_names();
        names.extend(AGGREGATE_COLUMNS.iter().map(|c| c.to_string()));
        names
    }

    /// Dense feature matrix with every missing value replaced by the sentinel
    pub fn to_feature_matrix(&self) -> Result<FeatureMatrix> {
        let columns = self.feature_names();
        let preference = self.merged.preference_positions();

        let mut data = Vec::with_capacity(self.len() * columns.len());
        for (row, aggregates) in self.aggregates.iter().enumerate() {
            let values = self.merged.row_values(row);
            data.extend(values.into_iter().enumerate().map(|(col, value)| {
                let value = value.unwrap_or(self.sentinel);
                if preference.contains(&col) {
                    value.trunc()
                } else {
                    value
                }
            }));
            data.extend_from_slice(&aggregates.values);
        }

        let values = Array2::from_shape_vec((self.len(), columns.len()), data).map_err(|e| {
            RatingError::dimension_mismatch(
                format!("{} x {} feature values", self.len(), columns.len()),
                e.to_string(),
            )
        })?;
        FeatureMatrix::new(columns, values)
    }

    /// Known ratings; only available for the training partition
    pub fn target_vector(&self) -> Result<Array1<f64>> {
        self.merged
            .ratings()
            .records()
            .iter()
            .enumerate()
            .map(|(row, record)| {
                record.rating.ok_or_else(|| {
                    RatingError::data_integrity(
                        self.partition().table_name(),
                        "rating",
                        row,
                        "",
                        "is a missing rating",
                    )
                })
            })
            .collect()
    }

    /// Row identifiers: the id column when present, else the row position
    pub fn row_ids(&self) -> Vec<String> {
        self.merged
            .ratings()
            .records()
            .iter()
            .enumerate()
            .map(|(row, record)| record.id.clone().unwrap_or_else(|| row.to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn training() -> RatingTable {
        RatingTable::training(vec![
            ("A1", "U1", 80.0),
            ("A1", "U2", 60.0),
            ("A2", "U1", 40.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_artist_statistics() {
        let stats = AggregateStatistics::compute(&training()).unwrap();

        let a1 = stats.artist("A1").unwrap();
        assert_abs_diff_eq!(a1.mean, 70.0);
        assert_abs_diff_eq!(a1.min, 60.0);
        assert_abs_diff_eq!(a1.max, 80.0);
        assert_abs_diff_eq!(a1.median, 70.0);

        let a2 = stats.artist("A2").unwrap();
        assert_eq!(a2.values(), [40.0; 4]);
        assert_eq!(a2.count, 1);

        let u1 = stats.lookup(GroupKey::User, "U1").unwrap();
        assert_abs_diff_eq!(u1.mean, 60.0);
        assert_eq!(stats.rating_range(), Some((40.0, 80.0)));
    }

    #[test]
    fn test_unseen_artist_gets_sentinel() {
        let stats = AggregateStatistics::compute(&training()).unwrap();
        let features = stats.features_for(&PairKey::new("A3", "U1"), -999.0);

        assert!(features.user_seen);
        assert!(!features.artist_seen);
        assert_eq!(features.values[..4], [60.0, 40.0, 80.0, 60.0]);
        assert_eq!(features.values[4..], [-999.0; 4]);
    }

    #[test]
    fn test_median_of_even_group() {
        let stats = RatingStats::from_ratings(&[10.0, 40.0, 20.0, 30.0]).unwrap();
        assert_abs_diff_eq!(stats.median, 25.0);
        assert!(RatingStats::from_ratings(&[]).is_none());
    }

    #[test]
    fn test_target_partition_is_rejected() {
        let target = RatingTable::target(vec![("A1", "U1")]).unwrap();
        let err = AggregateStatistics::compute(&target).unwrap_err();
        assert_eq!(err.category(), "invalid_parameter");
    }

    #[test]
    fn test_compute_is_deterministic() {
        let table = training();
        assert_eq!(
            AggregateStatistics::compute(&table).unwrap(),
            AggregateStatistics::compute(&table).unwrap()
        );
    }
}
