//! Configuration module for Mailtrawl
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A configuration file is optional: `Config::default()` describes a crawl of
//! 100 pages with a 10 second request timeout and a 1 second politeness delay.
//!
//! # Example
//!
//! ```no_run
//! use mailtrawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("mailtrawl.toml")).unwrap();
//! println!("Crawler will visit at most {} pages", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
