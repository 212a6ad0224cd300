//! Configuration module for Unique-Ledger
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! The category and location lists live in the configuration and are handed to the
//! classifier explicitly; nothing here is global state.
//!
//! # Example
//!
//! ```no_run
//! use unique_ledger::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("ledger.toml")).unwrap();
//! println!("Index page: {}", config.index_url());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{CacheConfig, Config, OutputConfig, RetryConfig, ScraperConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
