//! Typed error kinds for the indexing and query engine.
//!
//! Library code returns `IndexResult<T>`; the CLI boundary in `main.rs` converts
//! failures to a printed message and a non-zero exit code the way `anyhow` would,
//! but internal callers match on the concrete variant instead of downcasting.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type returned by the indexing and query engine.
#[derive(Error, Debug)]
pub enum IndexError {
    /// A file has no registered grammar for its extension. Never surfaced from
    /// indexing (the file is just skipped); returned only when a caller asks
    /// the registry to resolve an extension directly.
    #[error("no grammar registered for extension '{extension}'")]
    UnsupportedExtension { extension: String },

    /// tree-sitter failed to parse a file, or a compiled query failed to run.
    /// Swallowed during indexing (the file contributes no symbols); kept as a
    /// typed variant so callers that do care (e.g. diagnostics) can inspect it.
    #[error("failed to parse '{path}' as {language}: {reason}")]
    ParseError {
        path: PathBuf,
        language: String,
        reason: String,
    },

    #[error("query error in {language} {query_name} query: {reason}")]
    QueryError {
        language: String,
        query_name: &'static str,
        reason: String,
    },

    #[error("I/O error at '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cache at '{path}' is corrupt or from an incompatible version: {reason}")]
    CacheCorrupt { path: PathBuf, reason: String },

    #[error("file not found in index: '{path}'")]
    UnknownFile {
        path: String,
        suggestions: Vec<String>,
    },

    #[error("symbol not found: '{name}'")]
    UnknownSymbol {
        name: String,
        suggestions: Vec<String>,
    },

    #[error("version control unavailable: {reason}")]
    VcsUnavailable { reason: String },

    #[error("invalid query parameter: {reason}")]
    UsageError { reason: String },
}

/// Result type alias used throughout the engine.
pub type IndexResult<T> = Result<T, IndexError>;
