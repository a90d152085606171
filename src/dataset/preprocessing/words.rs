//! Cleaning of the words table.

use super::encoding::FrequencyEncoder;
use crate::core::error::Result;
use crate::core::types::PairKey;
use crate::dataset::table::{parse_number, RawWordsTable};

/// Cleaned words row; every value is numeric.
#[derive(Debug, Clone, PartialEq)]
pub struct WordsRecord {
    /// Artist and user identifiers
    pub key: PairKey,
    /// Row count of the raw "heard of" answer
    pub heard_of: f64,
    /// Row count of the raw "own artist music" answer
    pub own_artist_music: f64,
    /// Attribute values, missing ones replaced by the sentinel
    pub attributes: Vec<f64>,
}

impl WordsRecord {
    /// Feature values in [`WordsTable::feature_names`] order
    pub fn feature_values(&self) -> impl Iterator<Item = f64> + '_ {
        [self.heard_of, self.own_artist_music]
            .into_iter()
            .chain(self.attributes.iter().copied())
    }
}

/// Cleaned words table.
#[derive(Debug, Clone, PartialEq)]
pub struct WordsTable {
    heard_of_column: String,
    own_artist_music_column: String,
    attribute_columns: Vec<String>,
    records: Vec<WordsRecord>,
}

impl WordsTable {
    /// Feature column names contributed by this table
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = vec![
            self.heard_of_column.clone(),
            self.own_artist_music_column.clone(),
        ];
        names.extend(self.attribute_columns.iter().cloned());
        names
    }

    /// Number of feature columns
    pub fn num_features(&self) -> usize {
        2 + self.attribute_columns.len()
    }

    /// Cleaned records in input order
    pub fn records(&self) -> &[WordsRecord] {
        &self.records
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Clean the words table.
///
/// Attribute values that are absent become `sentinel`. The "heard of" and
/// "own artist music" answers are replaced by the number of rows in the
/// table sharing the same raw answer; absent and empty answers share the
/// empty category.
pub fn normalize_words(raw: RawWordsTable, sentinel: f64) -> Result<WordsTable> {
    let heard_of = FrequencyEncoder::fit(
        raw.records
            .iter()
            .map(|r| r.heard_of.as_deref().unwrap_or("")),
    );
    let own_artist_music = FrequencyEncoder::fit(
        raw.records
            .iter()
            .map(|r| r.own_artist_music.as_deref().unwrap_or("")),
    );
    log::debug!(
        "Frequency encoding: {} '{}' categories, {} '{}' categories",
        heard_of.num_categories(),
        raw.heard_of_column,
        own_artist_music.num_categories(),
        raw.own_artist_music_column
    );

    let mut records = Vec::with_capacity(raw.records.len());
    for (row, record) in raw.records.into_iter().enumerate() {
        let attributes = record
            .attributes
            .iter()
            .zip(&raw.attribute_columns)
            .map(|(value, column)| {
                parse_number("words", column, row, value.as_deref())
                    .map(|parsed| parsed.unwrap_or(sentinel))
            })
            .collect::<Result<Vec<_>>>()?;

        records.push(WordsRecord {
            heard_of: heard_of.transform(record.heard_of.as_deref().unwrap_or("")) as f64,
            own_artist_music: own_artist_music
                .transform(record.own_artist_music.as_deref().unwrap_or(""))
                as f64,
            key: record.key,
            attributes,
        });
    }

    log::info!(
        "Normalized words table: {} rows, {} feature columns",
        records.len(),
        2 + raw.attribute_columns.len()
    );

    Ok(WordsTable {
        heard_of_column: raw.heard_of_column,
        own_artist_music_column: raw.own_artist_music_column,
        attribute_columns: raw.attribute_columns,
        records,
    })
}
