//! Missing value detection for raw tables.

use serde::{Deserialize, Serialize};

/// Missing value analysis results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingValueAnalysis {
    /// Column names in table order
    pub columns: Vec<String>,
    /// Missing values per column
    pub missing_per_column: Vec<usize>,
    /// Number of rows analysed
    pub num_rows: usize,
}

impl MissingValueAnalysis {
    /// Count missing cells of row-major `rows` aligned with `columns`
    pub fn analyze<'a, I>(columns: &[String], rows: I) -> Self
    where
        I: IntoIterator<Item = &'a [Option<String>]>,
    {
        let mut missing_per_column = vec![0; columns.len()];
        let mut num_rows = 0;
        for row in rows {
            num_rows += 1;
            for (count, cell) in missing_per_column.iter_mut().zip(row) {
                if cell.is_none() {
                    *count += 1;
                }
            }
        }

        MissingValueAnalysis {
            columns: columns.to_vec(),
            missing_per_column,
            num_rows,
        }
    }

    /// Total number of missing cells
    pub fn total_missing(&self) -> usize {
        self.missing_per_column.iter().sum()
    }

    /// Columns with at least one missing value, in table order
    pub fn columns_with_missing(&self) -> Vec<&str> {
        self.columns
            .iter()
            .zip(&self.missing_per_column)
            .filter(|&(_, &count)| count > 0)
            .map(|(column, _)| column.as_str())
            .collect()
    }

    /// Missing ratio of a column
    pub fn missing_ratio(&self, column: &str) -> Option<f64> {
        let idx = self.columns.iter().position(|c| c == column)?;
        if self.num_rows == 0 {
            return Some(0.0);
        }
        Some(self.missing_per_column[idx] as f64 / self.num_rows as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_value_detection() {
        let columns = vec!["AGE".to_string(), "GENDER".to_string(), "Q1".to_string()];
        let rows = vec![
            vec![None, Some("Male".to_string()), Some("3".to_string())],
            vec![Some("40".to_string()), Some("Female".to_string()), None],
            vec![None, Some("Male".to_string()), Some("5".to_string())],
        ];

        let analysis = MissingValueAnalysis::analyze(&columns, rows.iter().map(|r| r.as_slice()));
        assert_eq!(analysis.missing_per_column, vec![2, 0, 1]);
        assert_eq!(analysis.total_missing(), 3);
        assert_eq!(analysis.columns_with_missing(), vec!["AGE", "Q1"]);
        assert_eq!(analysis.missing_ratio("Q1"), Some(1.0 / 3.0));
        assert_eq!(analysis.missing_ratio("Q2"), None);
    }
}
