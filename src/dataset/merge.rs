//! Left joins of a ratings partition with the words and users tables.
//!
//! The merged table does not copy any row. It keeps the three tables by
//! reference together with the matching row of each side, so the join
//! cardinality is fixed by construction: one output row per rating row.

use crate::core::error::{RatingError, Result};
use crate::core::types::PairKey;
use crate::dataset::preprocessing::{UserRecord, UsersTable, WordsRecord, WordsTable};
use crate::dataset::table::{RatingRecord, RatingTable};
use std::collections::HashMap;

/// Join indices over the cleaned words and users tables.
///
/// Building the indices checks the uniqueness of the join keys; the same
/// merger is reused for both partitions.
#[derive(Debug)]
pub struct Merger<'a> {
    words: &'a WordsTable,
    users: &'a UsersTable,
    words_index: HashMap<&'a PairKey, usize>,
    users_index: HashMap<&'a str, usize>,
}

impl<'a> Merger<'a> {
    /// Index both tables, failing on a duplicated join key
    pub fn new(words: &'a WordsTable, users: &'a UsersTable) -> Result<Self> {
        let mut words_index = HashMap::with_capacity(words.len());
        for (row, record) in words.records().iter().enumerate() {
            if words_index.insert(&record.key, row).is_some() {
                let matches = words.records().iter().filter(|r| r.key == record.key).count();
                return Err(RatingError::join_cardinality("words", record.key.to_string(), matches));
            }
        }

        let mut users_index = HashMap::with_capacity(users.len());
        for (row, record) in users.records().iter().enumerate() {
            if users_index.insert(record.user_id.as_str(), row).is_some() {
                let matches = users
                    .records()
                    .iter()
                    .filter(|r| r.user_id == record.user_id)
                    .count();
                return Err(RatingError::join_cardinality("users", record.user_id.clone(), matches));
            }
        }

        Ok(Merger {
            words,
            users,
            words_index,
            users_index,
        })
    }

    /// Left-join a ratings partition
    pub fn merge(&self, ratings: &'a RatingTable) -> MergedTable<'a> {
        let words_rows: Vec<Option<usize>> = ratings
            .records()
            .iter()
            .map(|r| self.words_index.get(&r.key).copied())
            .collect();
        let user_rows: Vec<Option<usize>> = ratings
            .records()
            .iter()
            .map(|r| self.users_index.get(r.key.user_id.as_str()).copied())
            .collect();

        let unknown_users = user_rows.iter().filter(|m| m.is_none()).count();
        if unknown_users > 0 {
            log::warn!(
                "{} partition: {} of {} rows reference an unknown user",
                ratings.partition(),
                unknown_users,
                ratings.len()
            );
        }
        log::debug!(
            "{} partition: {} of {} rows matched a words record",
            ratings.partition(),
            words_rows.iter().filter(|m| m.is_some()).count(),
            ratings.len()
        );

        MergedTable {
            ratings,
            words: self.words,
            users: self.users,
            words_rows,
            user_rows,
        }
    }
}

/// Left-join `ratings` with `words` on (artist, user) and with `users` on user.
pub fn merge<'a>(
    ratings: &'a RatingTable,
    words: &'a WordsTable,
    users: &'a UsersTable,
) -> Result<MergedTable<'a>> {
    Ok(Merger::new(words, users)?.merge(ratings))
}

/// One joined row.
#[derive(Debug, Clone, Copy)]
pub struct MergedRecord<'a> {
    /// Left-side rating row
    pub rating: &'a RatingRecord,
    /// Matching words row, if any
    pub words: Option<&'a WordsRecord>,
    /// Matching users row, if any
    pub user: Option<&'a UserRecord>,
}

/// A ratings partition joined with the words and users tables.
#[derive(Debug, Clone)]
pub struct MergedTable<'a> {
    ratings: &'a RatingTable,
    words: &'a WordsTable,
    users: &'a UsersTable,
    words_rows: Vec<Option<usize>>,
    user_rows: Vec<Option<usize>>,
}

impl<'a> MergedTable<'a> {
    /// Number of rows; always the row count of the ratings partition
    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    /// Whether the partition has no rows
    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    /// Left-side ratings partition
    pub fn ratings(&self) -> &'a RatingTable {
        self.ratings
    }

    /// Joined row
    pub fn record(&self, row: usize) -> MergedRecord<'a> {
        MergedRecord {
            rating: &self.ratings.records()[row],
            words: self.words_rows[row].map(|i| &self.words.records()[i]),
            user: self.user_rows[row].map(|i| &self.users.records()[i]),
        }
    }

    /// Joined rows in input order
    pub fn records(&self) -> impl Iterator<Item = MergedRecord<'a>> + '_ {
        (0..self.len()).map(move |row| self.record(row))
    }

    /// Column names of the joined row, identifier and rating columns excluded
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = self.ratings.context_columns().to_vec();
        names.extend(self.words.feature_names());
        names.extend(self.users.feature_names().iter().cloned());
        names
    }

    /// Number of joined feature columns
    pub fn num_features(&self) -> usize {
        self.ratings.context_columns().len() + self.words.num_features() + self.users.num_features()
    }

    /// Positions of the integer preference columns within [`Self::feature_names`]
    pub fn preference_positions(&self) -> [usize; 2] {
        let offset = self.ratings.context_columns().len() + self.words.num_features();
        self.users.preference_offsets().map(|p| offset + p)
    }

    /// Joined values of a row; `None` where the row has no match or no value
    pub fn row_values(&self, row: usize) -> Vec<Option<f64>> {
        let record = self.record(row);
        let mut values = Vec::with_capacity(self.num_features());
        values.extend(record.rating.context.iter().copied());
        match record.words {
            Some(words) => values.extend(words.feature_values().map(Some)),
            None => values.extend(std::iter::repeat(None).take(self.words.num_features())),
        }
        match record.user {
            Some(user) => values.extend(user.feature_values()),
            None => values.extend(std::iter::repeat(None).take(self.users.num_features())),
        }
        values
    }

    /// Number of rows without a words match
    pub fn unmatched_words(&self) -> usize {
        self.words_rows.iter().filter(|m| m.is_none()).count()
    }

    /// Number of rows without a users match
    pub fn unmatched_users(&self) -> usize {
        self.user_rows.iter().filter(|m| m.is_none()).count()
    }
}
