//! `sentiment-sweep` trains sentence-level sentiment classifiers on averaged word vectors.
//!
//! ## The Big Picture
//!
//! Every sentence of the Stanford Sentiment Treebank is mapped to a single feature vector,
//! the mean of the vectors of its words. A multinomial logistic regression from
//! [`linfa-logistic`](https://crates.io/crates/linfa-logistic) is fitted on these features for
//! every value of a geometric grid of L2 regularization strengths, and the model with the
//! best accuracy on the dev split is selected.
//!
//! ## Current state
//!
//! * [`features`]: sentence features and dataset construction
//! * [`SweepParams`]: grid and solver configuration, checked with [`linfa::ParamGuard`]
//! * [`sweep`]: fitting, scoring and model selection
//! * [`metrics`]: accuracy and fixed-size confusion counts
//! * [`report`]: recap table, prediction files and plots
//!
//! ## Example
//!
//! ```ignore
//! use sentiment_sweep::prelude::*;
//!
//! let treebank = StanfordSentiment::load("stanfordSentimentTreebank")?;
//! let vectors = WordVectors::from_glove(treebank.tokens(), "glove.6B.50d.txt", 50)?;
//!
//! let splits = Splits::new(
//!     featurize(&vectors, &treebank.train_sentences())?,
//!     featurize(&vectors, &treebank.dev_sentences())?,
//!     featurize(&vectors, &treebank.test_sentences())?,
//! )?;
//!
//! let results = SweepParams::default().sweep(&splits)?;
//! let best = results.best().unwrap();
//! println!("best reg {:.2E}, test accuracy {:.3}", best.reg, best.test);
//! ```

pub mod error;
pub mod features;
mod hyperparams;
pub mod metrics;
pub mod prelude;
pub mod report;
pub mod sweep;

pub use error::{Error, Result};
pub use features::{featurize, sentence_features, SentimentDataset};
pub use hyperparams::{regularization_values, SweepParams, SweepValidParams};
pub use sweep::{choose_best_model, SentimentModel, Splits, SweepResult, SweepResults};
