//! Core data types for the rating dataset builder.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a user or an artist as it appears in the raw tables.
pub type EntityId = String;

/// Feature index inside a feature matrix.
pub type FeatureIndex = usize;

/// Composite join key of the ratings and words tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairKey {
    /// Artist identifier
    pub artist_id: EntityId,
    /// User identifier
    pub user_id: EntityId,
}

impl PairKey {
    /// Create a new pair key
    pub fn new<A: Into<EntityId>, U: Into<EntityId>>(artist_id: A, user_id: U) -> Self {
        PairKey {
            artist_id: artist_id.into(),
            user_id: user_id.into(),
        }
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(artist={}, user={})", self.artist_id, self.user_id)
    }
}

/// One of the two disjoint row sets of a dataset build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Partition {
    /// Rows with known ratings; the only source of aggregate statistics
    Training,
    /// Rows whose ratings are to be predicted
    Target,
}

impl Partition {
    /// Table name used in diagnostics
    pub fn table_name(&self) -> &'static str {
        match self {
            Partition::Training => "train",
            Partition::Target => "test",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

/// Which entity an aggregate statistic is grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupKey {
    /// Grouped by user identifier
    User,
    /// Grouped by artist identifier
    Artist,
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::User => write!(f, "user"),
            GroupKey::Artist => write!(f, "artist"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_key_ordering_and_display() {
        let a = PairKey::new("A1", "U2");
        let b = PairKey::new("A2", "U1");
        assert!(a < b);
        assert_eq!(a.to_string(), "(artist=A1, user=U2)");
    }

    #[test]
    fn test_partition_table_name() {
        assert_eq!(Partition::Training.table_name(), "train");
        assert_eq!(Partition::Target.to_string(), "test");
    }
}
