//! Column-role configuration for the four input tables.
//!
//! Every column the dataset builder treats specially is named here. Columns
//! not named by any role are carried through as plain numeric features.

use crate::core::constants::*;
use crate::core::error::{RatingError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Column names for each role in the ratings, words and users tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Artist identifier in ratings and words tables
    pub artist_column: String,
    /// User identifier in ratings and words tables
    pub user_column: String,
    /// Rating column of the training partition
    pub rating_column: String,
    /// Optional row identifier of the target partition
    pub id_column: Option<String>,
    /// Primary key of the users table
    pub respondent_column: String,
    /// Frequency-encoded "heard of" column of the words table
    pub heard_of_column: String,
    /// Frequency-encoded "own artist music" column of the words table
    pub own_artist_music_column: String,
    /// Gender column (nominal)
    pub gender_column: String,
    /// Age column (numeric scale)
    pub age_column: String,
    /// Working status column (nominal)
    pub working_column: String,
    /// Region column (nominal)
    pub region_column: String,
    /// Music-genre preference column (nominal)
    pub music_column: String,
    /// Free-text listening preference for own music
    pub list_own_column: String,
    /// Free-text listening preference for background music
    pub list_back_column: String,
    /// Question columns treated as numeric scales besides age
    pub scale_questions: Vec<String>,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        SchemaConfig {
            artist_column: DEFAULT_ARTIST_COLUMN.to_string(),
            user_column: DEFAULT_USER_COLUMN.to_string(),
            rating_column: DEFAULT_RATING_COLUMN.to_string(),
            id_column: None,
            respondent_column: DEFAULT_RESPONDENT_COLUMN.to_string(),
            heard_of_column: DEFAULT_HEARD_OF_COLUMN.to_string(),
            own_artist_music_column: DEFAULT_OWN_ARTIST_MUSIC_COLUMN.to_string(),
            gender_column: DEFAULT_GENDER_COLUMN.to_string(),
            age_column: DEFAULT_AGE_COLUMN.to_string(),
            working_column: DEFAULT_WORKING_COLUMN.to_string(),
            region_column: DEFAULT_REGION_COLUMN.to_string(),
            music_column: DEFAULT_MUSIC_COLUMN.to_string(),
            list_own_column: DEFAULT_LIST_OWN_COLUMN.to_string(),
            list_back_column: DEFAULT_LIST_BACK_COLUMN.to_string(),
            scale_questions: DEFAULT_SCALE_QUESTIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl SchemaConfig {
    /// Nominal users columns, in feature order
    pub fn nominal_columns(&self) -> [&str; 4] {
        [
            &self.gender_column,
            &self.working_column,
            &self.region_column,
            &self.music_column,
        ]
    }

    /// Free-text preference columns, in feature order
    pub fn preference_columns(&self) -> [&str; 2] {
        [&self.list_own_column, &self.list_back_column]
    }

    /// Whether a users column is a declared numeric scale
    pub fn is_numeric_scale(&self, column: &str) -> bool {
        column == self.age_column || self.scale_questions.iter().any(|q| q == column)
    }

    /// Validate that no column name is used for two roles within one table
    pub fn validate(&self) -> Result<()> {
        let mut ratings_roles = vec![
            ("artist_column", self.artist_column.as_str()),
            ("user_column", self.user_column.as_str()),
            ("rating_column", self.rating_column.as_str()),
        ];
        if let Some(id) = &self.id_column {
            ratings_roles.push(("id_column", id.as_str()));
        }
        check_distinct("ratings", &ratings_roles)?;

        check_distinct(
            "words",
            &[
                ("artist_column", self.artist_column.as_str()),
                ("user_column", self.user_column.as_str()),
                ("heard_of_column", self.heard_of_column.as_str()),
                ("own_artist_music_column", self.own_artist_music_column.as_str()),
            ],
        )?;

        let mut users_roles = vec![
            ("respondent_column", self.respondent_column.as_str()),
            ("gender_column", self.gender_column.as_str()),
            ("age_column", self.age_column.as_str()),
            ("working_column", self.working_column.as_str()),
            ("region_column", self.region_column.as_str()),
            ("music_column", self.music_column.as_str()),
            ("list_own_column", self.list_own_column.as_str()),
            ("list_back_column", self.list_back_column.as_str()),
        ];
        users_roles.extend(
            self.scale_questions
                .iter()
                .map(|q| ("scale_questions", q.as_str())),
        );
        check_distinct("users", &users_roles)
    }
}

fn check_distinct(table: &str, roles: &[(&str, &str)]) -> Result<()> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for &(role, column) in roles {
        if column.trim().is_empty() {
            return Err(RatingError::invalid_parameter(
                role,
                column,
                format!("column name for table '{}' must not be empty", table),
            ));
        }
        if let Some(previous) = seen.insert(column, role) {
            return Err(RatingError::invalid_parameter(
                role,
                column,
                format!("column already used as {} in table '{}'", previous, table),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schema_is_valid() {
        let schema = SchemaConfig::default();
        assert!(schema.validate().is_ok());
        assert!(schema.is_numeric_scale("AGE"));
        assert!(schema.is_numeric_scale("Q18"));
        assert!(!schema.is_numeric_scale("Q1"));
        assert_eq!(schema.nominal_columns(), ["GENDER", "WORKING", "REGION", "MUSIC"]);
    }

    #[test]
    fn test_duplicate_role_rejected() {
        let schema = SchemaConfig {
            music_column: "GENDER".to_string(),
            ..SchemaConfig::default()
        };
        let err = schema.validate().unwrap_err();
        assert!(err.to_string().contains("gender_column"));
    }

    #[test]
    fn test_id_column_must_not_shadow_keys() {
        let schema = SchemaConfig {
            id_column: Some("User".to_string()),
            ..SchemaConfig::default()
        };
        assert!(schema.validate().is_err());
    }
}
