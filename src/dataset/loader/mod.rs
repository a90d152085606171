//! Ingestion of the ratings, words and users tables.

pub mod csv;

pub use self::csv::{CsvConfig, CsvLoader};

use crate::core::error::{RatingError, Result};
use crate::dataset::table::{RatingTable, RawUsersTable, RawWordsTable};
use serde::{Deserialize, Serialize};

/// Text encoding of a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextEncoding {
    /// UTF-8; invalid sequences are an error
    Utf8,
    /// ISO-8859-1, decoded byte by byte
    Latin1,
}

impl TextEncoding {
    /// Decode one field
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        match self {
            TextEncoding::Utf8 => String::from_utf8(bytes.to_vec())
                .map_err(|e| RatingError::data_loading(format!("Invalid UTF-8 field: {}", e))),
            TextEncoding::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
        }
    }
}

/// The four tables of one dataset build, validated against the schema
#[derive(Debug, Clone)]
pub struct InputTables {
    /// Training partition
    pub train: RatingTable,
    /// Target partition
    pub test: RatingTable,
    /// Words table before cleaning
    pub words: RawWordsTable,
    /// Users table before cleaning
    pub users: RawUsersTable,
}
