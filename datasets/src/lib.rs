//! `sentiment-datasets` provides the data sources of the sentiment experiments.
//!
//! ## The Big Picture
//!
//! Sentences and their sentiment classes come from the Stanford Sentiment Treebank, the
//! word vectors either from a pretrained GloVe table or from a checkpoint of custom
//! embeddings. Both are read into plain `ndarray` structures, ready to be turned into
//! features by `sentiment-sweep`.
//!
//! ## Current State
//!
//! * [`StanfordSentiment`]: treebank reader with train/dev/test splits and five sentiment
//!   classes
//! * [`WordVectors`]: token table backed by a dense matrix, read from GloVe text files
//!   (optionally gzipped) or from `saved_params_<iter>.csv` checkpoints
//!
//! ## Using a dataset
//!
//! ```ignore
//! let treebank = sentiment_datasets::StanfordSentiment::load("stanfordSentimentTreebank")?;
//! let vectors = sentiment_datasets::WordVectors::from_glove(
//!     treebank.tokens(),
//!     "glove.6B.50d.txt",
//!     50,
//! )?;
//! ```

pub mod error;
pub mod treebank;
pub mod vectors;

pub use error::{Error, Result};
pub use treebank::{categorify, LabeledSentence, Split, StanfordSentiment, N_CLASSES};
pub use vectors::{latest_checkpoint, Vocabulary, WordVectors};
