//! Regularization sweep and model selection
//!
//! One classifier is fitted on the training split for every regularization strength of the
//! grid and scored on all three splits. The model with the best accuracy on the dev split is
//! selected.
use std::fmt;

use linfa::traits::{Fit, Predict};
use linfa::ParamGuard;
use linfa_logistic::MultiFittedLogisticRegression;
use ndarray::{Array1, ArrayBase, Data, Ix2};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::features::SentimentDataset;
use crate::hyperparams::{SweepParams, SweepValidParams};
use crate::metrics::accuracy;

/// Fitted sentiment classifier
pub type SentimentModel = MultiFittedLogisticRegression<f64, usize>;

/// Train, dev and test features of a sentiment corpus
pub struct Splits {
    train: SentimentDataset,
    dev: SentimentDataset,
    test: SentimentDataset,
}

impl Splits {
    /// Group the three splits, they must be non-empty and share the feature dimension
    pub fn new(
        train: SentimentDataset,
        dev: SentimentDataset,
        test: SentimentDataset,
    ) -> Result<Self> {
        let dim = train.records().ncols();
        for &(name, split) in [("train", &train), ("dev", &dev), ("test", &test)].iter() {
            if split.records().nrows() == 0 {
                return Err(Error::EmptySplit(name));
            }
            if split.records().ncols() != dim {
                return Err(Error::MismatchedFeatures {
                    split: name,
                    expected: dim,
                    found: split.records().ncols(),
                });
            }
        }

        Ok(Splits { train, dev, test })
    }

    pub fn train(&self) -> &SentimentDataset {
        &self.train
    }

    pub fn dev(&self) -> &SentimentDataset {
        &self.dev
    }

    pub fn test(&self) -> &SentimentDataset {
        &self.test
    }
}

/// Outcome of a single regularization strength
///
/// Accuracies are given in percent.
pub struct SweepResult<M = SentimentModel> {
    pub reg: f64,
    pub model: M,
    pub train: f64,
    pub dev: f64,
    pub test: f64,
}

impl<M> fmt::Debug for SweepResult<M> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SweepResult")
            .field("reg", &self.reg)
            .field("train", &self.train)
            .field("dev", &self.dev)
            .field("test", &self.test)
            .finish()
    }
}

impl SweepResult {
    /// Predict sentiment classes with the model of this result
    pub fn predict<D: Data<Elem = f64>>(&self, records: &ArrayBase<D, Ix2>) -> Array1<usize> {
        self.model.predict(records)
    }
}

/// Select the result with the highest dev accuracy
///
/// Ties go to the earliest result, i.e. the smallest regularization strength of a sorted
/// sweep. Returns `None` for an empty slice.
pub fn choose_best_model<M>(results: &[SweepResult<M>]) -> Option<&SweepResult<M>> {
    results.iter().fold(None, |best, result| match best {
        Some(best) if best.dev >= result.dev => Some(best),
        _ => Some(result),
    })
}

/// All results of a sweep, in ascending order of regularization strength
#[derive(Debug)]
pub struct SweepResults<M = SentimentModel> {
    results: Vec<SweepResult<M>>,
}

impl<M> SweepResults<M> {
    pub fn results(&self) -> &[SweepResult<M>] {
        &self.results
    }

    pub fn regularization_values(&self) -> Vec<f64> {
        self.results.iter().map(|result| result.reg).collect()
    }

    pub fn best(&self) -> Option<&SweepResult<M>> {
        choose_best_model(&self.results)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl SweepValidParams {
    /// Fit and score a classifier with regularization strength `reg`
    pub fn evaluate(&self, reg: f64, splits: &Splits) -> Result<SweepResult> {
        let model: SentimentModel = self
            .classifier(reg)
            .fit(splits.train())
            .map_err(Error::Classifier)?;

        let score = |dataset: &SentimentDataset| -> Result<f64> {
            let prediction: Array1<usize> = model.predict(dataset.records());
            accuracy(dataset.targets(), &prediction)
        };

        let train = score(splits.train())?;
        let dev = score(splits.dev())?;
        let test = score(splits.test())?;

        Ok(SweepResult {
            reg,
            model,
            train,
            dev,
            test,
        })
    }

    /// Evaluate every strength of the grid, from weakest to strongest regularization
    pub fn sweep(&self, splits: &Splits) -> Result<SweepResults> {
        let values = self.regularization_values();
        debug!(
            steps = values.len(),
            train = splits.train().records().nrows(),
            dev = splits.dev().records().nrows(),
            test = splits.test().records().nrows(),
            "starting regularization sweep"
        );

        let mut results = Vec::with_capacity(values.len());
        for reg in values {
            info!("Training for reg={:.6}", reg);
            let result = self.evaluate(reg, splits)?;
            info!(
                train = result.train,
                dev = result.dev,
                test = result.test,
                "accuracy (%) for reg={:.6}",
                reg
            );

            results.push(result);
        }

        Ok(SweepResults { results })
    }
}

impl SweepParams {
    /// Validate the parameters and run the sweep
    pub fn sweep(&self, splits: &Splits) -> Result<SweepResults> {
        self.check_ref()?.sweep(splits)
    }
}
