use thiserror::Error;

use crate::math::spline::splineerror::SplineError;
use crate::parameter::parametererror::ParameterError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EfficiencyError {
    #[error(transparent)]
    Spline(#[from] SplineError),
    #[error(transparent)]
    Parameter(#[from] ParameterError),
    #[error("a binned efficiency needs at least two boundaries, got {found}")]
    TooFewBoundaries {
        found: usize
    },
    #[error("bin boundary {index} is not finite or does not exceed the previous one")]
    NonIncreasingBoundaries {
        index: usize
    },
    #[error("expected {expected} coefficients, found {found}")]
    CoefficientCountMismatch {
        expected: usize,
        found: usize
    },
    #[error("observable range [{low}, {high}] is empty")]
    InvalidRange {
        low: f64,
        high: f64
    },
    #[error("threshold {limit} does not lie above the previous threshold {previous}")]
    ThresholdOutOfOrder {
        limit: f64,
        previous: f64
    },
    #[error("threshold {limit} lies outside the observable range [{low}, {high}]")]
    ThresholdOutsideRange {
        limit: f64,
        low: f64,
        high: f64
    }
}
