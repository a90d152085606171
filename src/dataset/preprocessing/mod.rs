//! Cleaning of the words and users tables.
//!
//! Both cleaners consume a validated raw table and return a fully typed one:
//! categorical answers become numeric codes and absent values are either
//! replaced by the sentinel or kept as `None` for the final fill.

pub mod encoding;
pub mod missing;
pub mod users;
pub mod words;

pub use encoding::{FrequencyEncoder, LabelEncoder};
pub use missing::MissingValueAnalysis;
pub use users::{normalize_users, parse_preference, UserRecord, UsersTable};
pub use words::{normalize_words, WordsRecord, WordsTable};

use crate::dataset::table::RawUsersTable;

/// Users columns holding at least one missing value, in table order
pub fn columns_with_missing(users: &RawUsersTable) -> Vec<String> {
    MissingValueAnalysis::analyze(&users.columns, users.records.iter().map(|r| r.values.as_slice()))
        .columns_with_missing()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SchemaConfig;
    use crate::dataset::table::RawTable;

    #[test]
    fn test_columns_with_missing_in_table_order() {
        let raw = RawTable::from_rows(
            "users",
            &[
                "RESPID", "GENDER", "AGE", "WORKING", "REGION", "MUSIC", "LIST_OWN", "LIST_BACK",
                "Q16", "Q18", "Q19",
            ],
            &[
                vec!["U1", "Male", "", "Employed", "North", "Rock", "1 hour", "", "1", "2", "3"],
                vec!["U2", "", "40", "Retired", "South", "Pop", "2 hours", "", "1", "", "3"],
            ],
        )
        .unwrap();
        let users = RawUsersTable::from_raw(&raw, &SchemaConfig::default()).unwrap();

        assert_eq!(
            columns_with_missing(&users),
            vec!["GENDER", "AGE", "LIST_BACK", "Q18"]
        );
    }
}
