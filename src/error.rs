//! Error types in sentiment-sweep
//!

use thiserror::Error;

use ndarray::ShapeError;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid parameter {0}")]
    Parameters(String),
    #[error("a sentence without tokens has no feature vector")]
    EmptySentence,
    #[error("token `{0}` is not in the vocabulary")]
    UnknownToken(String),
    #[error("the {0} split contains no samples")]
    EmptySplit(&'static str),
    #[error("expected {expected} samples, found {found}")]
    MismatchedSamples { expected: usize, found: usize },
    #[error("features of the {split} split have dimension {found}, expected {expected}")]
    MismatchedFeatures {
        split: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("not enough samples to compute the accuracy")]
    NotEnoughSamples,
    #[error("invalid ndarray shape {0}")]
    NdShape(#[from] ShapeError),
    #[error(transparent)]
    Classifier(#[from] linfa_logistic::error::Error),
    #[error(transparent)]
    Dataset(#[from] sentiment_datasets::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("could not render plot: {0}")]
    Plot(String),
}
