use std::sync::OnceLock;

use num_complex::Complex64;

use crate::math::gaussconvolution::piecewiseconvolution::PiecewiseConvolution;
use crate::math::spline::boundaryconditions::BoundaryConditions;
use crate::math::spline::coefficientsolver;
use crate::math::spline::coefficientsource::CoefficientSource;
use crate::math::spline::cubicpolynomial::CubicPolynomial;
use crate::math::spline::knotvector::{
    KnotLocation,
    KnotVector
};
use crate::math::spline::splineerror::SplineError;

/// Cubic B-spline on a fixed knot vector.
///
/// Holds only knot-derived data. Coefficients are supplied per call through
/// [`CubicSplineKnot::bind`], so the same instance serves any number of
/// coefficient sets. The integrals of the basis over each interval and the
/// monomial form of every basis polynomial are computed on first use.
#[derive(Debug)]
pub struct CubicSplineKnot {
    knots: KnotVector,
    basis_integrals: OnceLock<Vec<[f64; 4]>>,
    basis_polynomials: OnceLock<Vec<[CubicPolynomial; 4]>>
}

impl CubicSplineKnot {
    pub fn new(knots: Vec<f64>) -> Result<CubicSplineKnot, SplineError> {
        Ok(CubicSplineKnot {
            knots: KnotVector::new(knots)?,
            basis_integrals: OnceLock::new(),
            basis_polynomials: OnceLock::new()
        })
    }

    pub fn knot_vector(&self) -> &KnotVector {
        &self.knots
    }

    pub fn knots(&self) -> &[f64] {
        self.knots.knots()
    }

    pub fn size(&self) -> usize {
        self.knots.size()
    }

    pub fn coefficient_count(&self) -> usize {
        self.knots.size() + 2
    }

    pub fn compute_coefficients(&self,
                                values: &[f64],
                                boundary_conditions: &BoundaryConditions) -> Result<Vec<f64>, SplineError> {
        coefficientsolver::interpolate(&self.knots, values, boundary_conditions)
    }

    pub fn smooth(&self, values: &[f64], errors: &[f64], lambda: f64) -> Result<Vec<f64>, SplineError> {
        coefficientsolver::smooth(&self.knots, values, errors, lambda)
    }

    /// Smooths (when `lambda > 0`) and then interpolates.
    pub fn smoothed_coefficients(&self,
                                 values: &[f64],
                                 errors: &[f64],
                                 lambda: f64,
                                 boundary_conditions: &BoundaryConditions) -> Result<Vec<f64>, SplineError> {
        let smoothed = self.smooth(values, errors, lambda)?;
        self.compute_coefficients(&smoothed, boundary_conditions)
    }

    pub fn bind<'a, C>(&'a self, coefficients: &'a C) -> Result<BoundSpline<'a, C>, SplineError>
        where C: CoefficientSource + ?Sized {
        let expected = self.coefficient_count();
        let found = coefficients.coefficient_count();
        if found != expected {
            return Err(SplineError::CoefficientCountMismatch { expected, found });
        }
        Ok(BoundSpline { spline: self, coefficients })
    }

    /// For coefficient lists whose length was checked when they were attached.
    pub(crate) fn bind_checked<'a, C>(&'a self, coefficients: &'a C) -> BoundSpline<'a, C>
        where C: CoefficientSource + ?Sized {
        debug_assert_eq!(coefficients.coefficient_count(), self.coefficient_count());
        BoundSpline { spline: self, coefficients }
    }

    fn basis_integrals(&self) -> &[[f64; 4]] {
        self.basis_integrals.get_or_init(|| {
            log::debug!("caching basis integrals for {} knot intervals", self.size() - 1);
            (0..self.size() - 1)
                .map(|i| {
                    let lo = self.knots.u(i as isize);
                    let hi = self.knots.u(i as isize + 1);
                    let mut integrals = [0.0; 4];
                    for (slot, integral) in integrals.iter_mut().enumerate() {
                        *integral = self.knots.basis_polynomial(i, slot).integral(lo, hi);
                    }
                    integrals
                })
                .collect()
        })
    }

    fn basis_polynomials(&self) -> &[[CubicPolynomial; 4]] {
        self.basis_polynomials.get_or_init(|| {
            log::debug!("caching convolution moments for {} knot intervals", self.size() - 1);
            (0..self.size() - 1)
                .map(|i| std::array::from_fn(|slot| self.knots.basis_polynomial(i, slot)))
                .collect()
        })
    }
}

/// A spline paired with a coefficient list for the duration of a borrow.
pub struct BoundSpline<'a, C: ?Sized> {
    spline: &'a CubicSplineKnot,
    coefficients: &'a C
}

impl<'a, C> BoundSpline<'a, C> where C: CoefficientSource + ?Sized {
    fn b(&self, i: usize) -> f64 {
        self.coefficients.coefficient(i)
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        let knots = &self.spline.knots;
        let n = knots.size();
        match knots.locate(x) {
            KnotLocation::LeftOfKnots => {
                let b0 = self.b(0);
                b0 - (x - knots.first()) * knots.r(0) * (b0 - self.b(1))
            },
            KnotLocation::RightOfKnots => {
                let bn = self.b(n + 1);
                bn + (x - knots.last()) * knots.r(n as isize - 2) * (bn - self.b(n))
            },
            KnotLocation::Interval(i) => (0..4)
                .map(|slot| self.b(i + slot) * knots.basis_value(x, i, slot))
                .sum()
        }
    }

    /// Integral over the whole knot span.
    pub fn definite_integral(&self) -> f64 {
        self.spline.basis_integrals()
            .iter()
            .enumerate()
            .map(|(i, integrals)| {
                integrals.iter()
                    .enumerate()
                    .map(|(slot, integral)| self.b(i + slot) * integral)
                    .sum::<f64>()
            })
            .sum()
    }

    /// The spline restricted to knot interval `interval`, in monomial form.
    pub fn interval_polynomial(&self, interval: usize) -> CubicPolynomial {
        let mut result = CubicPolynomial::default();
        for (slot, polynomial) in self.spline.basis_polynomials()[interval].iter().enumerate() {
            result += *polynomial * self.b(interval + slot);
        }
        result
    }

    /// Straight line continuing the spline beyond the first or last knot.
    pub fn edge_polynomial(&self, left: bool) -> CubicPolynomial {
        let knots = &self.spline.knots;
        let n = knots.size();
        let (slope, anchor) = if left {
            (-knots.r(0) * (self.b(0) - self.b(1)), knots.first())
        } else {
            (knots.r(n as isize - 2) * (self.b(n + 1) - self.b(n)), knots.last())
        };
        CubicPolynomial::linear(self.evaluate(anchor) - slope * anchor, slope)
    }

    /// `∫_{umin}^{umax} s(scale·u + offset) exp(-u²) w(i(z - u)) du`.
    ///
    /// Parts of the range outside the knots use the linear extrapolation.
    pub fn convolution_integral(&self, umin: f64, umax: f64, scale: f64, offset: f64, z: Complex64) -> Complex64 {
        let lo = scale * umin + offset;
        let hi = scale * umax + offset;
        assert!(hi >= lo, "convolution range [{}, {}] is inverted", lo, hi);

        let knots = &self.spline.knots;
        let mut convolution = PiecewiseConvolution::new(scale, offset, z);
        if lo < knots.first() {
            convolution.add_segment(lo, hi.min(knots.first()), &self.edge_polynomial(true));
        }
        for i in 0..knots.size() - 1 {
            let a = lo.max(knots.u(i as isize));
            let b = hi.min(knots.u(i as isize + 1));
            if a < b {
                convolution.add_segment(a, b, &self.interval_polynomial(i));
            }
        }
        if hi > knots.last() {
            convolution.add_segment(lo.max(knots.last()), hi, &self.edge_polynomial(false));
        }
        convolution.sum()
    }

    /// Largest coefficient magnitude; bounds the spline on the knot span.
    pub fn max_abs_coefficient(&self) -> f64 {
        (0..self.coefficients.coefficient_count())
            .map(|i| self.b(i).abs())
            .fold(0.0, f64::max)
    }
}
