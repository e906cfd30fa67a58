use thiserror::Error;

use crate::math::banded::bandedsystem::BandedSystemError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SplineError {
    #[error("a knot vector needs at least two knots, got {found}")]
    TooFewKnots {
        found: usize
    },
    #[error("knot {index} is not finite")]
    NonFiniteKnot {
        index: usize
    },
    #[error("knots must be strictly increasing, but knot {index} ({value}) follows {previous}")]
    NonIncreasingKnots {
        index: usize,
        previous: f64,
        value: f64
    },
    #[error("expected {expected} spline coefficients, found {found}")]
    CoefficientCountMismatch {
        expected: usize,
        found: usize
    },
    #[error("expected {expected} {what}, found {found}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize
    },
    #[error("smoothing parameter must lie in [0, 1), got {0}")]
    SmoothingOutOfRange(f64),
    #[error("knot interval {interval} has a vanishing or non-finite geometric factor")]
    DegenerateGeometry {
        interval: usize
    },
    #[error("decay rate must be positive and finite, got {0}")]
    InvalidDecayRate(f64),
    #[error("histogram bin {bin} is invalid: {reason}")]
    InvalidHistogramBin {
        bin: usize,
        reason: &'static str
    },
    #[error("normal equations of the histogram fit are singular")]
    SingularNormalEquations,
    #[error(transparent)]
    LinearSystem(#[from] BandedSystemError)
}
