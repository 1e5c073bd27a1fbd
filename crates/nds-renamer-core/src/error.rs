/// Typed errors for every fallible boundary of the core crate.
///
/// Per-file problems met during a walk are never returned to the caller as
/// errors; the walker folds them into a `FileOutcome`. These types describe
/// *why* a file was skipped and are what callers see when loading a catalog
/// or writing a report.
use std::path::PathBuf;
use thiserror::Error;

/// Failure to read the game code from a ROM header.
#[derive(Debug, Error)]
pub enum HeaderError {
    #[error("failed to read header of {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is too short to hold an NDS header ({len} bytes)")]
    TooShort { path: PathBuf, len: u64 },

    #[error("game code of {path} is not ASCII: {bytes:02X?}")]
    NotAscii { path: PathBuf, bytes: [u8; 4] },
}

/// Failure to load a catalog document.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed DAT catalog {path}: {source}")]
    Xml {
        path: PathBuf,
        #[source]
        source: quick_xml::DeError,
    },

    #[error("malformed JSON catalog {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported catalog format: {0} (expected .dat, .xml or .json)")]
    UnsupportedFormat(PathBuf),
}

/// A derived file stem that cannot be used as a file name.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("derived name is empty")]
    Empty,

    #[error("derived name {0:?} is a relative path component")]
    Relative(String),

    #[error("derived name {0:?} contains a path separator or NUL")]
    Separator(String),
}

/// Failure to write a run report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode JSON report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to encode CSV report: {0}")]
    Csv(#[from] csv::Error),

    #[error("unsupported report format: {0} (expected .json or .csv)")]
    UnsupportedFormat(PathBuf),
}
