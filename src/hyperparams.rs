use linfa::ParamGuard;
use linfa_logistic::MultiLogisticRegression;

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// A verified set of sweep parameters
///
/// See [`SweepParams`] for the meaning of the individual values.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct SweepValidParams {
    min_exponent: f64,
    max_exponent: f64,
    steps: usize,
    base: f64,
    epsilon: f64,
    max_iterations: u64,
    gradient_tolerance: f64,
}

impl SweepValidParams {
    pub fn min_exponent(&self) -> f64 {
        self.min_exponent
    }

    pub fn max_exponent(&self) -> f64 {
        self.max_exponent
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn base(&self) -> f64 {
        self.base
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn max_iterations(&self) -> u64 {
        self.max_iterations
    }

    pub fn gradient_tolerance(&self) -> f64 {
        self.gradient_tolerance
    }

    /// Regularization strengths of the sweep, sorted in ascending order
    ///
    /// The values are spaced evenly on a log scale, from `base^min_exponent` to
    /// `base^max_exponent` inclusive.
    pub fn regularization_values(&self) -> Vec<f64> {
        let mut values = if self.steps == 1 {
            vec![self.base.powf(self.min_exponent)]
        } else {
            let step = (self.max_exponent - self.min_exponent) / (self.steps - 1) as f64;
            (0..self.steps)
                .map(|i| self.base.powf(self.min_exponent + step * i as f64))
                .collect()
        };

        values.sort_by(|a, b| a.total_cmp(b));
        values
    }

    /// Multinomial logistic regression penalized with regularization strength `reg`
    ///
    /// The L2 weight is `reg + epsilon`, which keeps the penalty strictly positive for a zero
    /// strength.
    pub fn classifier(&self, reg: f64) -> MultiLogisticRegression<f64> {
        MultiLogisticRegression::default()
            .alpha(reg + self.epsilon)
            .max_iterations(self.max_iterations)
            .gradient_tolerance(self.gradient_tolerance)
    }
}

/// Sweep over the regularization strength of a linear sentiment classifier
///
/// A family of multinomial logistic regression models is fitted, one for every value of a
/// geometric grid of L2 regularization strengths. By default the grid holds 100 values from
/// `1e-4` to `1e2`.
///
/// ## Examples
///
/// ```rust
/// use linfa::ParamGuard;
/// use sentiment_sweep::SweepParams;
///
/// let params = SweepParams::new()
///     .min_exponent(-2.)
///     .max_exponent(0.)
///     .steps(3)
///     .check()
///     .unwrap();
///
/// let values = params.regularization_values();
/// assert_eq!(values.len(), 3);
/// assert!((values[1] - 0.1).abs() < 1e-12);
/// ```
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct SweepParams(SweepValidParams);

impl Default for SweepParams {
    fn default() -> Self {
        Self::new()
    }
}

impl SweepParams {
    pub fn new() -> Self {
        Self(SweepValidParams {
            min_exponent: -4.0,
            max_exponent: 2.0,
            steps: 100,
            base: 10.0,
            epsilon: 1e-12,
            max_iterations: 100,
            gradient_tolerance: 1e-4,
        })
    }

    /// Set the exponent of the smallest regularization strength, defaults to `-4`.
    pub fn min_exponent(mut self, min_exponent: f64) -> Self {
        self.0.min_exponent = min_exponent;
        self
    }

    /// Set the exponent of the largest regularization strength, defaults to `2`.
    pub fn max_exponent(mut self, max_exponent: f64) -> Self {
        self.0.max_exponent = max_exponent;
        self
    }

    /// Set the number of grid values, defaults to `100`.
    pub fn steps(mut self, steps: usize) -> Self {
        self.0.steps = steps;
        self
    }

    /// Set the base of the geometric grid, defaults to `10`.
    pub fn base(mut self, base: f64) -> Self {
        self.0.base = base;
        self
    }

    /// Set the constant added to every regularization strength, defaults to `1e-12`.
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.0.epsilon = epsilon;
        self
    }

    /// Configure the maximum number of solver iterations per model, defaults to `100`.
    pub fn max_iterations(mut self, max_iterations: u64) -> Self {
        self.0.max_iterations = max_iterations;
        self
    }

    /// Configure the gradient tolerance of the solver, defaults to `1e-4`.
    pub fn gradient_tolerance(mut self, gradient_tolerance: f64) -> Self {
        self.0.gradient_tolerance = gradient_tolerance;
        self
    }
}

impl ParamGuard for SweepParams {
    type Checked = SweepValidParams;
    type Error = Error;

    fn check_ref(&self) -> Result<&Self::Checked> {
        let params = &self.0;

        if !params.min_exponent.is_finite() || !params.max_exponent.is_finite() {
            Err(Error::Parameters(format!(
                "exponents must be finite, got {} and {}",
                params.min_exponent, params.max_exponent
            )))
        } else if params.min_exponent > params.max_exponent {
            Err(Error::Parameters(format!(
                "min_exponent {} exceeds max_exponent {}",
                params.min_exponent, params.max_exponent
            )))
        } else if params.steps == 0 {
            Err(Error::Parameters("steps must be at least 1".to_string()))
        } else if !params.base.is_finite() || params.base <= 1.0 {
            Err(Error::Parameters(format!(
                "base must be finite and greater than 1, got {}",
                params.base
            )))
        } else if params.base.powf(params.min_exponent) <= 0.0
            || !params.base.powf(params.max_exponent).is_finite()
        {
            Err(Error::Parameters(format!(
                "grid {}^{} to {}^{} leaves the positive finite range",
                params.base, params.min_exponent, params.base, params.max_exponent
            )))
        } else if !params.epsilon.is_finite() || params.epsilon < 0.0 {
            Err(Error::Parameters(format!(
                "epsilon must be finite and non-negative, got {}",
                params.epsilon
            )))
        } else if !params.gradient_tolerance.is_finite() || params.gradient_tolerance <= 0.0 {
            Err(Error::Parameters(format!(
                "gradient_tolerance must be finite and positive, got {}",
                params.gradient_tolerance
            )))
        } else {
            Ok(params)
        }
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

/// The default grid: 100 values from `1e-4` to `1e2`, sorted ascending
pub fn regularization_values() -> Vec<f64> {
    // defaults always pass validation
    SweepParams::new().0.regularization_values()
}
