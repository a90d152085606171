//! CSV file loader for the four input tables.
//!
//! Fields are trimmed and empty fields become missing values. The words table
//! is usually ISO-8859-1 encoded, so every table can be decoded either as
//! UTF-8 or byte-wise as Latin-1.

use super::{InputTables, TextEncoding};
use crate::config::SchemaConfig;
use crate::core::error::{RatingError, Result};
use crate::core::types::Partition;
use crate::dataset::table::{RatingTable, RawTable, RawUsersTable, RawWordsTable};
use csv::{ByteRecord, ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// CSV-specific configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvConfig {
    /// Field delimiter
    pub delimiter: char,
    /// Quote character
    pub quote_char: char,
    /// Maximum number of rows to read
    pub max_rows: Option<usize>,
    /// Encoding of the words table
    pub words_encoding: TextEncoding,
    /// Encoding of every other table
    pub encoding: TextEncoding,
}

impl Default for CsvConfig {
    fn default() -> Self {
        CsvConfig {
            delimiter: ',',
            quote_char: '"',
            max_rows: None,
            words_encoding: TextEncoding::Latin1,
            encoding: TextEncoding::Utf8,
        }
    }
}

/// CSV data loader
#[derive(Debug, Clone)]
pub struct CsvLoader {
    schema: SchemaConfig,
    csv_config: CsvConfig,
}

impl CsvLoader {
    /// Create a new CSV loader for the given column roles
    pub fn new(schema: SchemaConfig) -> Self {
        CsvLoader {
            schema,
            csv_config: CsvConfig::default(),
        }
    }

    /// Create CSV loader with custom configuration
    pub fn with_csv_config(mut self, csv_config: CsvConfig) -> Self {
        self.csv_config = csv_config;
        self
    }

    /// Set delimiter character
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.csv_config.delimiter = delimiter;
        self
    }

    /// Set maximum rows to read per table
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.csv_config.max_rows = Some(max_rows);
        self
    }

    /// Get the CSV configuration
    pub fn csv_config(&self) -> &CsvConfig {
        &self.csv_config
    }

    /// Load `train.csv`, `test.csv`, `words.csv` and `users.csv` from a directory
    pub fn load_dir<P: AsRef<Path>>(&self, dir: P) -> Result<InputTables> {
        let dir = dir.as_ref();
        log::info!("Loading input tables from {}", dir.display());

        let tables = InputTables {
            train: self.load_ratings(dir.join("train.csv"), Partition::Training)?,
            test: self.load_ratings(dir.join("test.csv"), Partition::Target)?,
            words: self.load_words(dir.join("words.csv"))?,
            users: self.load_users(dir.join("users.csv"))?,
        };

        log::info!(
            "Loaded train={} test={} words={} users={} rows",
            tables.train.len(),
            tables.test.len(),
            tables.words.len(),
            tables.users.len()
        );
        Ok(tables)
    }

    /// Load one ratings partition
    pub fn load_ratings<P: AsRef<Path>>(&self, path: P, partition: Partition) -> Result<RatingTable> {
        let raw = self.read_table(path, partition.table_name(), self.csv_config.encoding)?;
        RatingTable::from_raw(&raw, partition, &self.schema)
    }

    /// Load the words table
    pub fn load_words<P: AsRef<Path>>(&self, path: P) -> Result<RawWordsTable> {
        let raw = self.read_table(path, "words", self.csv_config.words_encoding)?;
        RawWordsTable::from_raw(&raw, &self.schema)
    }

    /// Load the users table
    pub fn load_users<P: AsRef<Path>>(&self, path: P) -> Result<RawUsersTable> {
        let raw = self.read_table(path, "users", self.csv_config.encoding)?;
        RawUsersTable::from_raw(&raw, &self.schema)
    }

    /// Read a delimited file into an untyped table
    pub fn read_table<P: AsRef<Path>>(
        &self,
        path: P,
        name: &str,
        encoding: TextEncoding,
    ) -> Result<RawTable> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            RatingError::data_loading(format!("Failed to open {}: {}", path.display(), e))
        })?;

        let mut reader = ReaderBuilder::new()
            .delimiter(self.csv_config.delimiter as u8)
            .quote(self.csv_config.quote_char as u8)
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(file);

        let header_record = reader.byte_headers()?.clone();
        let mut kept = Vec::with_capacity(header_record.len());
        let mut headers: Vec<String> = Vec::with_capacity(header_record.len());
        for (idx, field) in header_record.iter().enumerate() {
            let header = encoding.decode(field)?;
            if header.is_empty() {
                log::warn!(
                    "{}: dropping unnamed column at position {}",
                    path.display(),
                    idx
                );
                continue;
            }
            if headers.contains(&header) {
                return Err(RatingError::data_loading(format!(
                    "{}: duplicate column '{}'",
                    path.display(),
                    header
                )));
            }
            kept.push(idx);
            headers.push(header);
        }

        let mut table = RawTable::new(name, headers);
        let mut record = ByteRecord::new();
        while reader.read_byte_record(&mut record)? {
            if let Some(max_rows) = self.csv_config.max_rows {
                if table.num_rows() >= max_rows {
                    break;
                }
            }

            let mut row = Vec::with_capacity(kept.len());
            for &idx in &kept {
                let field = record.get(idx).unwrap_or_default();
                if field.is_empty() {
                    row.push(None);
                } else {
                    row.push(Some(encoding.decode(field)?));
                }
            }
            table.push_row(row)?;
        }

        log::debug!(
            "Read {} rows x {} columns from {}",
            table.num_rows(),
            table.headers().len(),
            path.display()
        );
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_csv_config_default() {
        let config = CsvConfig::default();
        assert_eq!(config.delimiter, ',');
        assert_eq!(config.quote_char, '"');
        assert_eq!(config.words_encoding, TextEncoding::Latin1);
        assert_eq!(config.encoding, TextEncoding::Utf8);
    }

    #[test]
    fn test_csv_loader_configuration() {
        let loader = CsvLoader::new(SchemaConfig::default())
            .with_delimiter(';')
            .with_max_rows(1000);

        assert_eq!(loader.csv_config().delimiter, ';');
        assert_eq!(loader.csv_config().max_rows, Some(1000));
    }

    #[test]
    fn test_read_table_with_missing_values_and_unnamed_column() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, ",Artist,User,Rating").unwrap();
        writeln!(file, "0,1, 2 ,30").unwrap();
        writeln!(file, "1,1,3,").unwrap();

        let loader = CsvLoader::new(SchemaConfig::default());
        let table = loader
            .read_table(file.path(), "train", TextEncoding::Utf8)
            .unwrap();

        assert_eq!(table.headers(), ["Artist", "User", "Rating"]);
        assert_eq!(table.rows()[0][1].as_deref(), Some("2"));
        assert_eq!(table.rows()[1][2], None);
    }

    #[test]
    fn test_latin1_words_are_decoded() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"Artist,User,HEARD_OF,OWN_ARTIST_MUSIC,Caf\xe9\n")
            .unwrap();
        file.write_all(b"1,2,Heard of,Own none of their music,1\n")
            .unwrap();

        let loader = CsvLoader::new(SchemaConfig::default());
        let words = loader.load_words(file.path()).unwrap();
        assert_eq!(words.attribute_columns, vec!["Café".to_string()]);
        assert_eq!(words.records[0].heard_of.as_deref(), Some("Heard of"));
    }

    #[test]
    fn test_missing_file_is_data_loading_error() {
        let dir = TempDir::new().unwrap();
        let loader = CsvLoader::new(SchemaConfig::default());
        let err = loader.load_dir(dir.path()).unwrap_err();
        assert_eq!(err.category(), "data_loading");
        assert!(err.to_string().contains("train.csv"));
    }

    #[test]
    fn test_max_rows_limits_reading() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Artist,User,Rating").unwrap();
        for i in 0..10 {
            writeln!(file, "1,{},50", i).unwrap();
        }

        let loader = CsvLoader::new(SchemaConfig::default()).with_max_rows(4);
        let train = loader
            .load_ratings(file.path(), Partition::Training)
            .unwrap();
        assert_eq!(train.len(), 4);
    }
}
