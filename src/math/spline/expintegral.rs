use nalgebra::{
    DMatrix,
    DVector
};
use serde::{
    Deserialize,
    Serialize
};
use statrs::function::factorial::factorial;
use statrs::function::gamma::gamma_lr;

use crate::math::spline::cubicpolynomial::CubicPolynomial;
use crate::math::spline::cubicsplineknot::CubicSplineKnot;
use crate::math::spline::splineerror::SplineError;

/// `∫_lo^hi p(x) exp(-γx) dx` for a cubic `p` and `γ > 0`.
///
/// The polynomial is re-centred on `lo` and each power is integrated through
/// the regularised lower incomplete gamma function,
/// `∫_0^w yⁿ e^{-γy} dy = n! P(n+1, γw) / γ^{n+1}`.
pub fn exp_polynomial_integral(polynomial: &CubicPolynomial, lo: f64, hi: f64, gamma: f64) -> f64 {
    assert!(hi >= lo, "integration range [{}, {}] is inverted", lo, hi);
    let width = hi - lo;
    let local = polynomial.shifted(lo);
    let mut sum = 0.0;
    let mut gamma_power = gamma;
    for (n, coef) in local.coefs().iter().enumerate() {
        if *coef != 0.0 {
            sum += coef * factorial(n as u64) * gamma_lr((n + 1) as f64, gamma * width) / gamma_power;
        }
        gamma_power *= gamma;
    }
    (-gamma * lo).exp() * sum
}

/// One bin of a decay-time histogram.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub low: f64,
    pub high: f64,
    pub content: f64,
    pub error: f64
}

impl HistogramBin {
    pub fn new(low: f64, high: f64, content: f64, error: f64) -> HistogramBin {
        HistogramBin { low, high, content, error }
    }

    pub fn centre(&self) -> f64 {
        0.5 * (self.low + self.high)
    }
}

#[derive(Clone, Debug)]
pub struct HistogramFit {
    pub coefficients: Vec<f64>,
    pub covariance: DMatrix<f64>,
    pub chi_squared: f64
}

impl CubicSplineKnot {
    /// Integrals of every basis spline times `exp(-γx)` over `[lo, hi]`,
    /// which must lie within the knots.
    pub fn exp_basis_integrals(&self, lo: f64, hi: f64, gamma: f64) -> Vec<f64> {
        let knots = self.knot_vector();
        let mut integrals = vec![0.0; self.coefficient_count()];
        for interval in 0..self.size() - 1 {
            let a = lo.max(knots.u(interval as isize));
            let b = hi.min(knots.u(interval as isize + 1));
            if a >= b {
                continue;
            }
            for slot in 0..4 {
                integrals[interval + slot] += exp_polynomial_integral(&knots.basis_polynomial(interval, slot), a, b, gamma);
            }
        }
        integrals
    }

    /// Weighted least-squares fit of the spline coefficients to a histogram
    /// whose parent distribution is `ε(t) exp(-γt)`, each bin normalised by
    /// the integral of the bare exponential over it.
    pub fn fit_exponential_histogram(&self, bins: &[HistogramBin], gamma: f64) -> Result<HistogramFit, SplineError> {
        if !(gamma.is_finite() && gamma > 0.0) {
            return Err(SplineError::InvalidDecayRate(gamma));
        }
        for (bin, entry) in bins.iter().enumerate() {
            let reason = if !(entry.low < entry.high) {
                Some("edges are not increasing")
            } else if entry.low < self.knot_vector().first() || entry.high > self.knot_vector().last() {
                Some("bin extends beyond the knots")
            } else if !(entry.error > 0.0) {
                Some("error is not positive")
            } else {
                None
            };
            if let Some(reason) = reason {
                return Err(SplineError::InvalidHistogramBin { bin, reason });
            }
        }

        let splines = self.coefficient_count();
        let design = DMatrix::from_fn(bins.len(), splines, |_, _| 0.0);
        let design = bins.iter().enumerate().fold(design, |mut design, (row, bin)| {
            let norm = ((-gamma * bin.low).exp() - (-gamma * bin.high).exp()) / gamma;
            for (col, integral) in self.exp_basis_integrals(bin.low, bin.high, gamma).iter().enumerate() {
                design[(row, col)] = integral / norm;
            }
            design
        });
        let weights = DVector::from_iterator(bins.len(), bins.iter().map(|bin| 1.0 / (bin.error * bin.error)));
        let contents = DVector::from_iterator(bins.len(), bins.iter().map(|bin| bin.content));

        let weighted = DMatrix::from_fn(bins.len(), splines, |row, col| design[(row, col)] * weights[row]);
        let normal = design.transpose() * &weighted;
        let rhs = weighted.transpose() * &contents;

        if bins.len() < splines || normal.diagonal().iter().any(|d| !(*d > 0.0)) {
            log::warn!("{} histogram bins leave some of the {} spline coefficients undetermined", bins.len(), splines);
            return Err(SplineError::SingularNormalEquations);
        }
        let cholesky = match normal.cholesky() {
            Some(cholesky) => cholesky,
            None => {
                log::warn!("normal equations of the histogram fit are not positive definite");
                return Err(SplineError::SingularNormalEquations);
            }
        };
        let solution = cholesky.solve(&rhs);
        let covariance = cholesky.inverse();

        let residuals = contents - &design * &solution;
        let chi_squared: f64 = residuals.iter()
            .zip(weights.iter())
            .map(|(r, w)| r * r * w)
            .sum();
        log::debug!("histogram fit over {} bins: chi2 = {}", bins.len(), chi_squared);

        Ok(HistogramFit {
            coefficients: solution.iter().copied().collect(),
            covariance,
            chi_squared
        })
    }
}
