//! Categorical encoders.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Dense integer codes for the distinct values of a nominal column.
///
/// Classes are sorted, so the codes are reproducible for a given input and
/// form the contiguous range `0..len()`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
    codes: BTreeMap<String, u32>,
}

impl LabelEncoder {
    /// Fit on every observed value
    pub fn fit<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut classes: Vec<String> = values.into_iter().map(str::to_string).collect();
        classes.sort();
        classes.dedup();

        let codes = classes
            .iter()
            .enumerate()
            .map(|(code, class)| (class.clone(), code as u32))
            .collect();

        LabelEncoder { classes, codes }
    }

    /// Code of a value, `None` when it was never observed
    pub fn transform(&self, value: &str) -> Option<u32> {
        self.codes.get(value).copied()
    }

    /// Original value of a code
    pub fn inverse(&self, code: u32) -> Option<&str> {
        self.classes.get(code as usize).map(String::as_str)
    }

    /// Sorted distinct values
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Number of classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether no value was observed
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Replaces a value with the number of rows sharing it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FrequencyEncoder {
    counts: HashMap<String, usize>,
}

impl FrequencyEncoder {
    /// Count every value of the column
    pub fn fit<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut counts = HashMap::new();
        for value in values {
            *counts.entry(value.to_string()).or_insert(0) += 1;
        }
        FrequencyEncoder { counts }
    }

    /// Row count of a value; zero when it was never observed
    pub fn transform(&self, value: &str) -> usize {
        self.counts.get(value).copied().unwrap_or(0)
    }

    /// Number of distinct values
    pub fn num_categories(&self) -> usize {
        self.counts.len()
    }
}
