//! Cleaning of the users table.

use super::encoding::LabelEncoder;
use super::columns_with_missing;
use crate::config::SchemaConfig;
use crate::core::error::{RatingError, Result};
use crate::core::types::EntityId;
use crate::dataset::table::{parse_number, RawUsersTable};
use regex::Regex;
use std::sync::OnceLock;

/// Number of fixed demographic feature columns preceding the responses
const DEMOGRAPHIC_COLUMNS: usize = 7;

/// Cleaned users row.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    /// Primary key
    pub user_id: EntityId,
    /// Gender code
    pub gender: u32,
    /// Age, sentinel when unknown
    pub age: f64,
    /// Working status code
    pub working: u32,
    /// Region code
    pub region: u32,
    /// Music-genre preference code
    pub music: u32,
    /// Digits extracted from the own-music listening answer
    pub list_own: i64,
    /// Digits extracted from the background-music listening answer
    pub list_back: i64,
    /// Remaining numeric responses; scale questions already sentinel-filled
    pub responses: Vec<Option<f64>>,
}

impl UserRecord {
    /// Feature values in [`UsersTable::feature_names`] order
    pub fn feature_values(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        [
            self.gender as f64,
            self.age,
            self.working as f64,
            self.region as f64,
            self.music as f64,
            self.list_own as f64,
            self.list_back as f64,
        ]
        .into_iter()
        .map(Some)
        .chain(self.responses.iter().copied())
    }
}

/// Cleaned users table.
#[derive(Debug, Clone, PartialEq)]
pub struct UsersTable {
    feature_names: Vec<String>,
    encoders: Vec<(String, LabelEncoder)>,
    records: Vec<UserRecord>,
}

impl UsersTable {
    /// Feature column names contributed by this table
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Number of feature columns
    pub fn num_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Positions of the two preference columns within [`Self::feature_names`]
    pub fn preference_offsets(&self) -> [usize; 2] {
        [5, 6]
    }

    /// Fitted encoder of a nominal column
    pub fn encoder(&self, column: &str) -> Option<&LabelEncoder> {
        self.encoders
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, encoder)| encoder)
    }

    /// Cleaned records in input order
    pub fn records(&self) -> &[UserRecord] {
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

fn digit_run() -> &'static Regex {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    DIGITS.get_or_init(|| Regex::new(r"\d+").expect("digit pattern is a valid regex"))
}

/// First run of decimal digits in `text`, or 0 when there is none.
///
/// Returns `None` only when the digit run overflows `i64`.
pub fn parse_preference(text: &str) -> Option<i64> {
    match digit_run().find(text) {
        Some(m) => m.as_str().parse().ok(),
        None => Some(0),
    }
}

/// Clean the users table.
///
/// Nominal columns get dense codes over their sorted distinct values, with
/// absent values forming the empty category. Age and the scale questions
/// fall back to `sentinel`. The preference columns keep the first digit run
/// of their free text. Every other column must be numeric and stays missing
/// where absent.
pub fn normalize_users(raw: RawUsersTable, schema: &SchemaConfig, sentinel: f64) -> Result<UsersTable> {
    let with_missing = columns_with_missing(&raw);
    if !with_missing.is_empty() {
        log::info!("Users columns with missing values: {:?}", with_missing);
    }

    let nominal_idx = schema
        .nominal_columns()
        .iter()
        .map(|column| raw.column_index(column))
        .collect::<Result<Vec<_>>>()?;
    let age_idx = raw.column_index(&schema.age_column)?;
    let preference_idx = schema
        .preference_columns()
        .iter()
        .map(|column| raw.column_index(column))
        .collect::<Result<Vec<_>>>()?;

    let response_idx: Vec<usize> = (0..raw.columns.len())
        .filter(|i| *i != age_idx && !nominal_idx.contains(i) && !preference_idx.contains(i))
        .collect();
    let response_is_scale: Vec<bool> = response_idx
        .iter()
        .map(|&i| schema.is_numeric_scale(&raw.columns[i]))
        .collect();

    let encoders: Vec<(String, LabelEncoder)> = nominal_idx
        .iter()
        .map(|&idx| {
            let encoder = LabelEncoder::fit(
                raw.records
                    .iter()
                    .map(|r| r.values[idx].as_deref().unwrap_or("")),
            );
            log::debug!("'{}': {} categories", raw.columns[idx], encoder.len());
            (raw.columns[idx].clone(), encoder)
        })
        .collect();

    let code = |nominal: usize, value: &Option<String>| -> Result<u32> {
        let (column, encoder) = &encoders[nominal];
        let value = value.as_deref().unwrap_or("");
        encoder
            .transform(value)
            .ok_or_else(|| RatingError::data_integrity("users", column.clone(), 0, value, "has no code"))
    };

    let mut records = Vec::with_capacity(raw.records.len());
    for (row, record) in raw.records.iter().enumerate() {
        let values = &record.values;

        let mut preferences = [0i64; 2];
        for (slot, &idx) in preferences.iter_mut().zip(&preference_idx) {
            let text = values[idx].as_deref().unwrap_or("");
            *slot = parse_preference(text).ok_or_else(|| {
                RatingError::data_integrity(
                    "users",
                    raw.columns[idx].clone(),
                    row,
                    text,
                    "has a digit run that does not fit in an integer",
                )
            })?;
        }

        let responses = response_idx
            .iter()
            .zip(&response_is_scale)
            .map(|(&idx, &is_scale)| {
                let parsed = parse_number("users", &raw.columns[idx], row, values[idx].as_deref())?;
                Ok(if is_scale { Some(parsed.unwrap_or(sentinel)) } else { parsed })
            })
            .collect::<Result<Vec<_>>>()?;

        records.push(UserRecord {
            user_id: record.user_id.clone(),
            gender: code(0, &values[nominal_idx[0]])?,
            age: parse_number("users", &schema.age_column, row, values[age_idx].as_deref())?
                .unwrap_or(sentinel),
            working: code(1, &values[nominal_idx[1]])?,
            region: code(2, &values[nominal_idx[2]])?,
            music: code(3, &values[nominal_idx[3]])?,
            list_own: preferences[0],
            list_back: preferences[1],
            responses,
        });
    }

    let mut feature_names: Vec<String> = [
        &schema.gender_column,
        &schema.age_column,
        &schema.working_column,
        &schema.region_column,
        &schema.music_column,
        &schema.list_own_column,
        &schema.list_back_column,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    feature_names.extend(response_idx.iter().map(|&i| raw.columns[i].clone()));
    debug_assert_eq!(feature_names.len(), DEMOGRAPHIC_COLUMNS + response_idx.len());

    log::info!(
        "Normalized users table: {} rows, {} feature columns",
        records.len(),
        feature_names.len()
    );

    Ok(UsersTable {
        feature_names,
        encoders,
        records,
    })
}
