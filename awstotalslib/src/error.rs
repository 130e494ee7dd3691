//! Error types for awstotalslib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading settings or building a report.
///
/// Missing or malformed data files are never errors: they degrade to
/// zeroed aggregates. Only configuration problems surface here.
#[derive(Error, Debug)]
pub enum AwstotalsError {
    /// The AWStats data directory does not exist or is not a directory
    #[error("AWStats data directory not found: {0}")]
    DataDirNotFound(PathBuf),

    /// Failed to read a settings file
    #[error("failed to read config file '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Settings file is not valid TOML or has unexpected fields
    #[error("failed to parse config file '{path}': {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Invalid glob pattern in a site allow-list or deny-list
    #[error("invalid glob pattern '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },

    /// Data file name pattern failed to compile
    #[error("invalid file name pattern: {0}")]
    Regex(#[from] regex::Error),
}
