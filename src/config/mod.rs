//! Configuration module for Ripple-Map
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so an empty file (or no file at all) is a valid
//! configuration.
//!
//! # Example
//!
//! ```no_run
//! use ripple_map::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("ripple-map.toml")).unwrap();
//! println!("Crawler will scan {} levels", config.crawler.scan_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ChildPolicy, Config, CrawlerConfig, JavascriptConfig, UserAgentConfig, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
