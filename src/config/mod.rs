//! Configuration management.
//!
//! Column roles live in [`schema`], everything else in [`core`].

pub mod core;
pub mod schema;

pub use self::core::{Config, ConfigBuilder, ModelConfig};
pub use self::schema::SchemaConfig;

/// Configuration file looked up by the command line tool when none is given
pub const DEFAULT_CONFIG_FILE: &str = "artist-rating.toml";
