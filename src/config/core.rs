//! Core configuration structures and builder.
//!
//! A [`Config`] bundles the sentinel value, the column roles of the input
//! tables and the parameters of the selector and regressor. It can be built
//! programmatically with [`ConfigBuilder`], read from a JSON or TOML file and
//! patched from `ARTIST_RATING_*` environment variables.

use crate::config::schema::SchemaConfig;
use crate::core::constants::*;
use crate::core::error::{RatingError, Result};
use crate::{config_error, ensure};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters of the feature selector and the boosted regressor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Number of features kept by the univariate selector
    pub select_k: usize,
    /// Number of boosting iterations
    pub num_iterations: usize,
    /// Learning rate (shrinkage)
    pub learning_rate: f64,
    /// Maximum depth of each tree
    pub max_depth: usize,
    /// Minimum number of rows in a leaf
    pub min_data_in_leaf: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            select_k: DEFAULT_SELECT_K,
            num_iterations: DEFAULT_NUM_ITERATIONS,
            learning_rate: DEFAULT_LEARNING_RATE,
            max_depth: DEFAULT_MAX_DEPTH,
            min_data_in_leaf: DEFAULT_MIN_DATA_IN_LEAF,
        }
    }
}

impl ModelConfig {
    /// Validate model parameters
    pub fn validate(&self) -> Result<()> {
        if self.select_k == 0 {
            return Err(RatingError::invalid_parameter(
                "select_k",
                self.select_k.to_string(),
                "must be at least 1",
            ));
        }

        if self.num_iterations == 0 {
            return Err(RatingError::invalid_parameter(
                "num_iterations",
                self.num_iterations.to_string(),
                "must be at least 1",
            ));
        }

        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(RatingError::invalid_parameter(
                "learning_rate",
                self.learning_rate.to_string(),
                "must be in range (0.0, 1.0]",
            ));
        }

        if self.max_depth == 0 {
            return Err(RatingError::invalid_parameter(
                "max_depth",
                self.max_depth.to_string(),
                "must be at least 1",
            ));
        }

        if self.min_data_in_leaf == 0 {
            return Err(RatingError::invalid_parameter(
                "min_data_in_leaf",
                self.min_data_in_leaf.to_string(),
                "must be at least 1",
            ));
        }

        Ok(())
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Value marking missing fields and entities unseen in training
    pub sentinel: f64,
    /// Augment training and target partitions concurrently
    pub parallel: bool,
    /// Column roles of the input tables
    pub schema: SchemaConfig,
    /// Selector and regressor parameters
    pub model: ModelConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            sentinel: DEFAULT_SENTINEL,
            parallel: true,
            schema: SchemaConfig::default(),
            model: ModelConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.sentinel.is_finite(),
            RatingError::invalid_parameter("sentinel", self.sentinel.to_string(), "must be a finite number")
        );

        self.schema.validate()?;
        self.model.validate()
    }

    /// Load configuration from a `.json` or `.toml` file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            RatingError::config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| RatingError::config(format!("Failed to parse JSON config: {}", e)))?,
            Some("toml") => toml::from_str(&content)
                .map_err(|e| RatingError::config(format!("Failed to parse TOML config: {}", e)))?,
            _ => return Err(config_error!("Unsupported config file format. Use .json or .toml")),
        };

        config.validate()?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a `.json` or `.toml` file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::to_string_pretty(self)
                .map_err(|e| RatingError::config(format!("Failed to serialize to JSON: {}", e)))?,
            Some("toml") => toml::to_string_pretty(self)
                .map_err(|e| RatingError::config(format!("Failed to serialize to TOML: {}", e)))?,
            _ => return Err(config_error!("Unsupported config file format. Use .json or .toml")),
        };

        std::fs::write(path, content)
            .map_err(|e| RatingError::config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Apply `ARTIST_RATING_*` environment variable overrides
    pub fn apply_environment_overrides(&mut self) -> Result<()> {
        if let Some(sentinel) = env_override("ARTIST_RATING_SENTINEL")? {
            self.sentinel = sentinel;
        }
        if let Some(k) = env_override("ARTIST_RATING_SELECT_K")? {
            self.model.select_k = k;
        }
        if let Some(iterations) = env_override("ARTIST_RATING_NUM_ITERATIONS")? {
            self.model.num_iterations = iterations;
        }
        if let Some(rate) = env_override("ARTIST_RATING_LEARNING_RATE")? {
            self.model.learning_rate = rate;
        }

        self.validate()
    }
}

fn env_override<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(val) => val
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| RatingError::config(format!("Invalid {}: '{}'", name, val))),
        Err(_) => Ok(None),
    }
}

/// Builder for creating configurations with validation
#[derive(Debug)]
pub struct ConfigBuilder {
    config: Config,
    validation_errors: Vec<String>,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        ConfigBuilder {
            config: Config::default(),
            validation_errors: Vec::new(),
        }
    }

    /// Set the sentinel value
    pub fn sentinel(mut self, sentinel: f64) -> Self {
        if !sentinel.is_finite() {
            self.validation_errors
                .push("sentinel must be a finite number".to_string());
        }
        self.config.sentinel = sentinel;
        self
    }

    /// Enable or disable concurrent partition augmentation
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Replace the column schema
    pub fn schema(mut self, schema: SchemaConfig) -> Self {
        self.config.schema = schema;
        self
    }

    /// Set the row identifier column of the target partition
    pub fn id_column<S: Into<String>>(mut self, column: S) -> Self {
        self.config.schema.id_column = Some(column.into());
        self
    }

    /// Set the number of selected features
    pub fn select_k(mut self, k: usize) -> Self {
        if k == 0 {
            self.validation_errors
                .push("select_k must be at least 1".to_string());
        }
        self.config.model.select_k = k;
        self
    }

    /// Set the number of boosting iterations
    pub fn num_iterations(mut self, iterations: usize) -> Self {
        self.config.model.num_iterations = iterations;
        self
    }

    /// Set the learning rate
    pub fn learning_rate(mut self, rate: f64) -> Self {
        if rate <= 0.0 || rate > 1.0 {
            self.validation_errors
                .push("learning_rate must be in range (0.0, 1.0]".to_string());
        }
        self.config.model.learning_rate = rate;
        self
    }

    /// Set the maximum tree depth
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.model.max_depth = depth;
        self
    }

    /// Set the minimum number of rows per leaf
    pub fn min_data_in_leaf(mut self, min_data: usize) -> Self {
        self.config.model.min_data_in_leaf = min_data;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<Config> {
        if !self.validation_errors.is_empty() {
            return Err(RatingError::config(format!(
                "Configuration validation failed: {}",
                self.validation_errors.join(", ")
            )));
        }

        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.sentinel, DEFAULT_SENTINEL);
        assert_eq!(config.model.select_k, DEFAULT_SELECT_K);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .sentinel(-1.0e6)
            .select_k(10)
            .num_iterations(20)
            .learning_rate(0.05)
            .max_depth(3)
            .id_column("id")
            .build()
            .unwrap();

        assert_eq!(config.sentinel, -1.0e6);
        assert_eq!(config.model.select_k, 10);
        assert_eq!(config.model.num_iterations, 20);
        assert_eq!(config.model.max_depth, 3);
        assert_eq!(config.schema.id_column.as_deref(), Some("id"));
    }

    #[test]
    fn test_config_builder_validation() {
        let result = ConfigBuilder::new()
            .learning_rate(-0.1)
            .select_k(0)
            .build();
        assert!(result.is_err());

        let result = ConfigBuilder::new().sentinel(f64::NAN).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_config_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let config = ConfigBuilder::new()
            .select_k(7)
            .sentinel(-5000.0)
            .build()
            .unwrap();

        let toml_path = dir.path().join("config.toml");
        config.save_to_file(&toml_path).unwrap();
        assert_eq!(Config::load_from_file(&toml_path).unwrap(), config);

        let json_path = dir.path().join("config.json");
        config.save_to_file(&json_path).unwrap();
        assert_eq!(Config::load_from_file(&json_path).unwrap(), config);

        assert!(config.save_to_file(dir.path().join("config.yaml")).is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "sentinel = -1234.0\n[model]\nselect_k = 3\n").unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.sentinel, -1234.0);
        assert_eq!(config.model.select_k, 3);
        assert_eq!(config.model.num_iterations, DEFAULT_NUM_ITERATIONS);
        assert_eq!(config.schema, SchemaConfig::default());
    }
}
