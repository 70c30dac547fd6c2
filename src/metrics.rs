//! Scoring of sentiment predictions
use ndarray::prelude::*;
use ndarray::Data;

use crate::error::{Error, Result};

/// Percentage of predictions equal to the ground truth
pub fn accuracy<A, S, T>(
    ground_truth: &ArrayBase<S, Ix1>,
    prediction: &ArrayBase<T, Ix1>,
) -> Result<f64>
where
    A: PartialEq,
    S: Data<Elem = A>,
    T: Data<Elem = A>,
{
    if ground_truth.len() != prediction.len() {
        return Err(Error::MismatchedSamples {
            expected: ground_truth.len(),
            found: prediction.len(),
        });
    }
    if ground_truth.is_empty() {
        return Err(Error::NotEnoughSamples);
    }

    let matches = ground_truth
        .iter()
        .zip(prediction.iter())
        .filter(|(a, b)| a == b)
        .count();

    Ok(matches as f64 * 100.0 / ground_truth.len() as f64)
}

/// Count matrix of true against predicted class
///
/// Rows correspond to the true class and columns to the predicted class, for the fixed set of
/// classes `0..n_classes`. Pairs involving a class outside of this range are not counted.
pub fn confusion_counts<S, T>(
    ground_truth: &ArrayBase<S, Ix1>,
    prediction: &ArrayBase<T, Ix1>,
    n_classes: usize,
) -> Result<Array2<usize>>
where
    S: Data<Elem = usize>,
    T: Data<Elem = usize>,
{
    if ground_truth.len() != prediction.len() {
        return Err(Error::MismatchedSamples {
            expected: ground_truth.len(),
            found: prediction.len(),
        });
    }

    let mut counts = Array2::zeros((n_classes, n_classes));
    for (&truth, &predicted) in ground_truth.iter().zip(prediction.iter()) {
        if truth < n_classes && predicted < n_classes {
            counts[(truth, predicted)] += 1;
        }
    }

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn accuracy_in_percent() {
        let truth = array![0, 1, 2, 3];
        let prediction = array![0, 1, 3, 3];

        assert_abs_diff_eq!(accuracy(&truth, &prediction).unwrap(), 75.0);
        assert_abs_diff_eq!(accuracy(&truth, &truth.view()).unwrap(), 100.0);
    }

    #[test]
    fn accuracy_needs_matching_shapes() {
        let truth = array![0, 1, 2];
        let prediction = array![0, 1];

        assert!(matches!(
            accuracy(&truth, &prediction),
            Err(Error::MismatchedSamples {
                expected: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn accuracy_of_nothing() {
        let empty: Array1<usize> = Array1::zeros(0);

        assert!(matches!(
            accuracy(&empty, &empty),
            Err(Error::NotEnoughSamples)
        ));
    }

    #[test]
    fn confusion_counts_fixed_classes() {
        let truth = array![0, 0, 1, 4, 4, 4];
        let prediction = array![0, 1, 1, 4, 3, 4];

        let counts = confusion_counts(&truth, &prediction, 5).unwrap();

        assert_eq!(counts.dim(), (5, 5));
        assert_eq!(counts[(0, 0)], 1);
        assert_eq!(counts[(0, 1)], 1);
        assert_eq!(counts[(1, 1)], 1);
        assert_eq!(counts[(4, 3)], 1);
        assert_eq!(counts[(4, 4)], 2);
        // class 2 never occurs but keeps its row
        assert_eq!(counts.row(2).sum(), 0);
        assert_eq!(counts.sum(), 6);
    }

    #[test]
    fn confusion_counts_skip_unknown_classes() {
        let truth = array![0, 7];
        let prediction = array![0, 0];

        let counts = confusion_counts(&truth, &prediction, 2).unwrap();
        assert_eq!(counts, array![[1, 0], [0, 0]]);
    }
}
