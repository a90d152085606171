//! Typed in-memory tables.
//!
//! Ingestion produces a [`RawTable`] of optional strings per file. Each raw
//! table is validated exactly once against the [`SchemaConfig`] and turned
//! into a typed table, so later stages never index columns by name.

use crate::config::SchemaConfig;
use crate::core::error::{RatingError, Result};
use crate::core::types::*;
use std::collections::HashMap;

/// Untyped table as read from a delimited file.
///
/// Empty cells are stored as `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    /// Create an empty table with the given headers
    pub fn new<S: Into<String>>(name: S, headers: Vec<String>) -> Self {
        RawTable {
            name: name.into(),
            headers,
            rows: Vec::new(),
        }
    }

    /// Build a table from string literals; empty strings become missing values
    pub fn from_rows<S: Into<String>>(name: S, headers: &[&str], rows: &[Vec<&str>]) -> Result<Self> {
        let mut table = RawTable::new(name, headers.iter().map(|h| h.to_string()).collect());
        for row in rows {
            table.push_row(
                row.iter()
                    .map(|cell| {
                        let cell = cell.trim();
                        if cell.is_empty() {
                            None
                        } else {
                            Some(cell.to_string())
                        }
                    })
                    .collect(),
            )?;
        }
        Ok(table)
    }

    /// Append a row; its width must match the header
    pub fn push_row(&mut self, row: Vec<Option<String>>) -> Result<()> {
        if row.len() != self.headers.len() {
            return Err(RatingError::data_loading(format!(
                "Table '{}' row {} has {} fields, expected {}",
                self.name,
                self.rows.len(),
                row.len(),
                self.headers.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Table name used in diagnostics
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column headers in file order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Rows in file order
    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Position of a required column
    pub fn column_index(&self, column: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| RatingError::schema(self.name.clone(), column))
    }

    /// Whether the table has a column
    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    fn identifier(&self, row: usize, col: usize) -> Result<EntityId> {
        match &self.rows[row][col] {
            Some(value) => Ok(value.clone()),
            None => Err(RatingError::data_integrity(
                self.name.clone(),
                self.headers[col].clone(),
                row,
                "",
                "is a missing identifier",
            )),
        }
    }

    fn number(&self, row: usize, col: usize) -> Result<Option<f64>> {
        parse_number(&self.name, &self.headers[col], row, self.rows[row][col].as_deref())
    }
}

/// Parse an optional numeric cell, rejecting non-numeric text.
pub(crate) fn parse_number(
    table: &str,
    column: &str,
    row: usize,
    value: Option<&str>,
) -> Result<Option<f64>> {
    match value {
        None => Ok(None),
        Some(text) => match text.trim().parse::<f64>() {
            Ok(number) if number.is_finite() => Ok(Some(number)),
            _ => Err(RatingError::data_integrity(
                table,
                column,
                row,
                text,
                "is not numeric",
            )),
        },
    }
}

/// One row of a ratings partition.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingRecord {
    /// Artist and user identifiers
    pub key: PairKey,
    /// Known rating; always present in the training partition
    pub rating: Option<f64>,
    /// Extra numeric columns carried as features (track, time, ...)
    pub context: Vec<Option<f64>>,
    /// Row identifier of the target partition, when configured
    pub id: Option<String>,
}

/// A ratings partition: the left side of every join.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingTable {
    partition: Partition,
    context_columns: Vec<String>,
    records: Vec<RatingRecord>,
}

impl RatingTable {
    /// Create an empty partition
    pub fn new(partition: Partition, context_columns: Vec<String>) -> Self {
        RatingTable {
            partition,
            context_columns,
            records: Vec::new(),
        }
    }

    /// Build a training partition from `(artist, user, rating)` triples
    pub fn training<A, U, I>(ratings: I) -> Result<Self>
    where
        A: Into<EntityId>,
        U: Into<EntityId>,
        I: IntoIterator<Item = (A, U, f64)>,
    {
        let mut table = RatingTable::new(Partition::Training, Vec::new());
        for (artist, user, rating) in ratings {
            table.push(RatingRecord {
                key: PairKey::new(artist, user),
                rating: Some(rating),
                context: Vec::new(),
                id: None,
            })?;
        }
        table.ensure_unique_pairs()?;
        Ok(table)
    }

    /// Build a target partition from `(artist, user)` pairs
    pub fn target<A, U, I>(pairs: I) -> Result<Self>
    where
        A: Into<EntityId>,
        U: Into<EntityId>,
        I: IntoIterator<Item = (A, U)>,
    {
        let mut table = RatingTable::new(Partition::Target, Vec::new());
        for (artist, user) in pairs {
            table.push(RatingRecord {
                key: PairKey::new(artist, user),
                rating: None,
                context: Vec::new(),
                id: None,
            })?;
        }
        table.ensure_unique_pairs()?;
        Ok(table)
    }

    /// Validate a raw ratings table and convert it.
    ///
    /// Artist and user columns are required; the training partition also
    /// requires the rating column. Every other column is a numeric context
    /// column, except the configured id column of the target partition.
    pub fn from_raw(raw: &RawTable, partition: Partition, schema: &SchemaConfig) -> Result<Self> {
        let artist_idx = raw.column_index(&schema.artist_column)?;
        let user_idx = raw.column_index(&schema.user_column)?;
        let rating_idx = match partition {
            Partition::Training => Some(raw.column_index(&schema.rating_column)?),
            Partition::Target => {
                if raw.has_column(&schema.rating_column) {
                    log::warn!(
                        "Target table '{}' has a '{}' column; it is ignored",
                        raw.name(),
                        schema.rating_column
                    );
                }
                None
            }
        };
        let id_idx = match (&schema.id_column, partition) {
            (Some(id), Partition::Target) => Some(raw.column_index(id)?),
            _ => None,
        };

        let context_idx: Vec<usize> = (0..raw.headers().len())
            .filter(|&i| {
                let header = &raw.headers()[i];
                i != artist_idx
                    && i != user_idx
                    && *header != schema.rating_column
                    && schema.id_column.as_deref() != Some(header.as_str())
            })
            .collect();
        let context_columns = context_idx
            .iter()
            .map(|&i| raw.headers()[i].clone())
            .collect();

        let mut table = RatingTable::new(partition, context_columns);
        for row in 0..raw.num_rows() {
            let rating = match rating_idx {
                Some(idx) => match raw.number(row, idx)? {
                    Some(value) => Some(value),
                    None => {
                        return Err(RatingError::data_integrity(
                            raw.name(),
                            schema.rating_column.clone(),
                            row,
                            "",
                            "is a missing rating in the training partition",
                        ))
                    }
                },
                None => None,
            };

            let context = context_idx
                .iter()
                .map(|&idx| raw.number(row, idx))
                .collect::<Result<Vec<_>>>()?;

            table.push(RatingRecord {
                key: PairKey::new(raw.identifier(row, artist_idx)?, raw.identifier(row, user_idx)?),
                rating,
                context,
                id: id_idx.and_then(|idx| raw.rows()[row][idx].clone()),
            })?;
        }

        table.ensure_unique_pairs()?;
        log::debug!(
            "Validated {} partition: {} rows, context columns {:?}",
            partition,
            table.len(),
            table.context_columns
        );
        Ok(table)
    }

    /// Append a record
    pub fn push(&mut self, record: RatingRecord) -> Result<()> {
        if record.context.len() != self.context_columns.len() {
            return Err(RatingError::dimension_mismatch(
                format!("{} context values", self.context_columns.len()),
                format!("{}", record.context.len()),
            ));
        }
        if self.partition == Partition::Training && record.rating.is_none() {
            return Err(RatingError::data_integrity(
                self.partition.table_name(),
                "rating",
                self.records.len(),
                "",
                "is a missing rating in the training partition",
            ));
        }
        self.records.push(record);
        Ok(())
    }

    /// Fail if an (artist, user) pair occurs more than once
    pub fn ensure_unique_pairs(&self) -> Result<()> {
        let mut counts: HashMap<&PairKey, usize> = HashMap::with_capacity(self.records.len());
        for record in &self.records {
            *counts.entry(&record.key).or_insert(0) += 1;
        }
        match counts.into_iter().filter(|(_, n)| *n > 1).min() {
            Some((key, n)) => Err(RatingError::join_cardinality(
                self.partition.table_name(),
                key.to_string(),
                n,
            )),
            None => Ok(()),
        }
    }

    /// Reorder context columns to `columns`; the two sets must be equal
    pub fn align_context_to(&mut self, columns: &[String]) -> Result<()> {
        if self.context_columns == columns {
            return Ok(());
        }

        let mut order = Vec::with_capacity(columns.len());
        for column in columns {
            let idx = self
                .context_columns
                .iter()
                .position(|c| c == column)
                .ok_or_else(|| RatingError::schema(self.partition.table_name(), column.clone()))?;
            order.push(idx);
        }
        if let Some(extra) = self.context_columns.iter().find(|c| !columns.contains(c)) {
            return Err(RatingError::schema(
                "train",
                extra.clone(),
            ));
        }

        for record in &mut self.records {
            record.context = order.iter().map(|&i| record.context[i]).collect();
        }
        self.context_columns = columns.to_vec();
        Ok(())
    }

    /// Partition of this table
    pub fn partition(&self) -> Partition {
        self.partition
    }

    /// Context column names
    pub fn context_columns(&self) -> &[String] {
        &self.context_columns
    }

    /// Records in input order
    pub fn records(&self) -> &[RatingRecord] {
        &self.records
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the partition has no rows
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// One row of the words table before cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct RawWordsRecord {
    /// Artist and user identifiers
    pub key: PairKey,
    /// Raw "heard of" answer
    pub heard_of: Option<String>,
    /// Raw "own artist music" answer
    pub own_artist_music: Option<String>,
    /// Remaining attribute values in file order
    pub attributes: Vec<Option<String>>,
}

/// Words table before cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct RawWordsTable {
    /// Name of the "heard of" column
    pub heard_of_column: String,
    /// Name of the "own artist music" column
    pub own_artist_music_column: String,
    /// Attribute column names in file order
    pub attribute_columns: Vec<String>,
    /// Records in file order
    pub records: Vec<RawWordsRecord>,
}

impl RawWordsTable {
    /// Validate a raw words table and convert it
    pub fn from_raw(raw: &RawTable, schema: &SchemaConfig) -> Result<Self> {
        let artist_idx = raw.column_index(&schema.artist_column)?;
        let user_idx = raw.column_index(&schema.user_column)?;
        let heard_idx = raw.column_index(&schema.heard_of_column)?;
        let own_idx = raw.column_index(&schema.own_artist_music_column)?;

        let attribute_idx: Vec<usize> = (0..raw.headers().len())
            .filter(|i| ![artist_idx, user_idx, heard_idx, own_idx].contains(i))
            .collect();

        let mut records = Vec::with_capacity(raw.num_rows());
        for row in 0..raw.num_rows() {
            let cells = &raw.rows()[row];
            records.push(RawWordsRecord {
                key: PairKey::new(raw.identifier(row, artist_idx)?, raw.identifier(row, user_idx)?),
                heard_of: cells[heard_idx].clone(),
                own_artist_music: cells[own_idx].clone(),
                attributes: attribute_idx.iter().map(|&i| cells[i].clone()).collect(),
            });
        }

        Ok(RawWordsTable {
            heard_of_column: schema.heard_of_column.clone(),
            own_artist_music_column: schema.own_artist_music_column.clone(),
            attribute_columns: attribute_idx
                .iter()
                .map(|&i| raw.headers()[i].clone())
                .collect(),
            records,
        })
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

/// One row of the users table before cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct RawUserRecord {
    /// Primary key
    pub user_id: EntityId,
    /// Every non-key column, aligned with [`RawUsersTable::columns`]
    pub values: Vec<Option<String>>,
}

/// Users table before cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct RawUsersTable {
    /// Non-key column names in file order
    pub columns: Vec<String>,
    /// Records in file order
    pub records: Vec<RawUserRecord>,
}

impl RawUsersTable {
    /// Validate a raw users table and convert it.
    ///
    /// Every role column named by the schema must be present.
    pub fn from_raw(raw: &RawTable, schema: &SchemaConfig) -> Result<Self> {
        let key_idx = raw.column_index(&schema.respondent_column)?;

        let mut required: Vec<&str> = vec![&schema.age_column];
        required.extend(schema.nominal_columns());
        required.extend(schema.preference_columns());
        required.extend(schema.scale_questions.iter().map(|q| q.as_str()));
        for column in required {
            raw.column_index(column)?;
        }

        let value_idx: Vec<usize> = (0..raw.headers().len()).filter(|&i| i != key_idx).collect();

        let mut records = Vec::with_capacity(raw.num_rows());
        for row in 0..raw.num_rows() {
            records.push(RawUserRecord {
                user_id: raw.identifier(row, key_idx)?,
                values: value_idx.iter().map(|&i| raw.rows()[row][i].clone()).collect(),
            });
        }

        Ok(RawUsersTable {
            columns: value_idx.iter().map(|&i| raw.headers()[i].clone()).collect(),
            records,
        })
    }

    /// Position of a non-key column
    pub fn column_index(&self, column: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| RatingError::schema("users", column))
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
