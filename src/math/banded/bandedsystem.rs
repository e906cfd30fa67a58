use nalgebra::DMatrix;
use thiserror::Error;

/// Relative size below which a pivot is treated as zero.
pub const PIVOT_TOLERANCE: f64 = 1e-13;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BandedSystemError {
    #[error("banded system must have at least one row")]
    Empty,
    #[error("band `{band}` has {found} entries, expected {expected}")]
    BandLengthMismatch {
        band: &'static str,
        expected: usize,
        found: usize
    },
    #[error("right-hand side has {found} entries, expected {expected}")]
    RhsLengthMismatch {
        expected: usize,
        found: usize
    },
    #[error("zero pivot in row {row}")]
    ZeroPivot {
        row: usize
    }
}

/// A square linear system stored by its diagonals only.
pub trait BandedSystem {
    fn dimension(&self) -> usize;

    fn entry(&self, row: usize, col: usize) -> f64;

    fn solve(&self, rhs: &[f64]) -> Result<Vec<f64>, BandedSystemError>;

    fn to_dense(&self) -> DMatrix<f64> {
        let n = self.dimension();
        DMatrix::from_fn(n, n, |row, col| self.entry(row, col))
    }
}

pub(crate) fn check_band(band: &'static str, values: &[f64], expected: usize) -> Result<(), BandedSystemError> {
    if values.len() != expected {
        return Err(BandedSystemError::BandLengthMismatch { band, expected, found: values.len() });
    }
    Ok(())
}

pub(crate) fn check_rhs(rhs: &[f64], expected: usize) -> Result<(), BandedSystemError> {
    if rhs.len() != expected {
        return Err(BandedSystemError::RhsLengthMismatch { expected, found: rhs.len() });
    }
    Ok(())
}

/// `row_scale` is the largest magnitude found in the original row.
pub(crate) fn check_pivot(pivot: f64, row_scale: f64, row: usize) -> Result<f64, BandedSystemError> {
    if !pivot.is_finite() || pivot.abs() <= PIVOT_TOLERANCE * row_scale || pivot == 0.0 {
        log::trace!("rejecting pivot {:e} in row {} (row scale {:e})", pivot, row, row_scale);
        return Err(BandedSystemError::ZeroPivot { row });
    }
    Ok(pivot)
}
