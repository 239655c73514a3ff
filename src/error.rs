//! Error type shared by all library operations.

use pdbtbx::PDBError;
use polars::prelude::PolarsError;
use std::fmt;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, FootprintError>;

/// Everything that can go wrong while fetching, loading or comparing complexes.
#[derive(Debug)]
pub enum FootprintError {
    /// Filesystem access failed
    Io(std::io::Error),
    /// The HTTP client failed before a response was received
    Http(reqwest::Error),
    /// The server answered, but not with a usable structure file
    Download {
        /// URL that was requested
        url: String,
        /// Reason the response was rejected
        reason: String,
    },
    /// The structure file could not be parsed
    Pdb(Vec<PDBError>),
    /// Building or writing a table failed
    Polars(PolarsError),
    /// Malformed PDB identifier
    InvalidPdbId(String),
    /// Malformed or empty chain groups
    InvalidGroups(String),
    /// A requested chain does not exist in the structure
    MissingChain(String),
    /// Superposition could not be computed
    Alignment(String),
}

impl fmt::Display for FootprintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Http(e) => write!(f, "HTTP request error: {e}"),
            Self::Download { url, reason } => write!(f, "Failed to download {url}: {reason}"),
            Self::Pdb(errors) => {
                let msgs: Vec<String> = errors
                    .iter()
                    .map(|e| e.short_description().to_string())
                    .collect();
                write!(f, "Failed to read structure: {}", msgs.join("; "))
            }
            Self::Polars(e) => write!(f, "Table error: {e}"),
            Self::InvalidPdbId(id) => write!(f, "Invalid PDB identifier '{id}'"),
            Self::InvalidGroups(msg) => write!(f, "Invalid chain groups: {msg}"),
            Self::MissingChain(chain) => write!(f, "Chain {chain} not found in structure"),
            Self::Alignment(msg) => write!(f, "Superposition failed: {msg}"),
        }
    }
}

impl std::error::Error for FootprintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Http(e) => Some(e),
            Self::Polars(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FootprintError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<reqwest::Error> for FootprintError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err)
    }
}

impl From<PolarsError> for FootprintError {
    fn from(err: PolarsError) -> Self {
        Self::Polars(err)
    }
}

impl From<Vec<PDBError>> for FootprintError {
    fn from(errors: Vec<PDBError>) -> Self {
        Self::Pdb(errors)
    }
}
