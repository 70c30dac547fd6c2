//! Error types of the data sources
//!

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("could not open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    ReadMatrix(#[from] ndarray_csv::ReadError),
    #[error("malformed record in {file} at line {line}: {reason}")]
    Malformed {
        file: String,
        line: u64,
        reason: String,
    },
    #[error("sentence `{0}` has no entry in the phrase dictionary")]
    MissingPhrase(String),
    #[error("phrase id {0} has no sentiment value")]
    MissingSentiment(usize),
    #[error("expected {expected} rows in the word vector table, found {found}")]
    RowMismatch { expected: usize, found: usize },
    #[error("vector for `{word}` has {found} components, expected {expected}")]
    Dimension {
        word: String,
        expected: usize,
        found: usize,
    },
    #[error("no `saved_params_<iter>` checkpoint in {0}")]
    NoCheckpoint(PathBuf),
}
