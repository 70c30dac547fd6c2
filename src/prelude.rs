//! sentiment-sweep prelude.
//!
//! This module contains the most used types, traits and functions that you can import
//! easily as a group.
//!

#[doc(no_inline)]
pub use crate::error::{Error, Result};

#[doc(no_inline)]
pub use crate::features::{featurize, sentence_features, SentimentDataset};

#[doc(no_inline)]
pub use crate::hyperparams::{regularization_values, SweepParams, SweepValidParams};

#[doc(no_inline)]
pub use crate::sweep::{choose_best_model, Splits, SweepResult, SweepResults};

#[doc(no_inline)]
pub use crate::metrics::{accuracy, confusion_counts};

#[doc(no_inline)]
pub use sentiment_datasets::{LabeledSentence, StanfordSentiment, Vocabulary, WordVectors};

#[doc(no_inline)]
pub use linfa::ParamGuard;
