use crate::math::spline::cubicpolynomial::CubicPolynomial;
use crate::math::spline::splineerror::SplineError;

// ─────────────────────────────────────────────
// Basis table
// ─────────────────────────────────────────────
//
// On interval i the four cubic B-splines touching it are written as sums of
// products (x - a)(x - b)(x - c) scaled by 1/P, 1/Q, 1/R or 1/S:
//
//   A = -d(i+1)³ / P
//   B =  d(i+1)² d(i-2) / P + d(i-1) d(i+2) d(i+1) / Q + d(i) d(i+2)² / R
//   C = -d(i-1)² d(i+1) / Q - d(i) d(i+2) d(i-1) / R - d(i+3) d(i)² / S
//   D =  d(i)³ / S
//
// with d(j) = x - u(j). The terms are stored flat; SLOT_TERMS gives the range
// belonging to A, B, C and D.

pub const SLOT_TERMS: [std::ops::Range<usize>; 4] = [0..1, 1..4, 4..7, 7..8];

#[derive(Clone, Copy, Debug, Default)]
pub struct BasisTerm {
    pub weight: f64,
    pub roots: [f64; 3]
}

impl BasisTerm {
    fn new(weight: f64, roots: [f64; 3]) -> BasisTerm {
        BasisTerm { weight, roots }
    }

    pub fn value(&self, x: f64) -> f64 {
        self.weight * (x - self.roots[0]) * (x - self.roots[1]) * (x - self.roots[2])
    }

    pub fn polynomial(&self) -> CubicPolynomial {
        CubicPolynomial::from_roots(self.weight, self.roots)
    }
}

/// Products of knot spacings normalising the basis on one interval.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntervalGeometry {
    pub p: f64,
    pub q: f64,
    pub r: f64,
    pub s: f64
}

/// Where an abscissa falls relative to the knots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KnotLocation {
    LeftOfKnots,
    Interval(usize),
    RightOfKnots
}

#[derive(Clone, Debug)]
pub struct KnotVector {
    knots: Vec<f64>,
    geometry: Vec<IntervalGeometry>,
    basis: Vec<[BasisTerm; 8]>
}

impl KnotVector {
    pub fn new(knots: Vec<f64>) -> Result<KnotVector, SplineError> {
        if knots.len() < 2 {
            return Err(SplineError::TooFewKnots { found: knots.len() });
        }
        if let Some(index) = knots.iter().position(|u| !u.is_finite()) {
            return Err(SplineError::NonFiniteKnot { index });
        }
        if let Some(index) = (1..knots.len()).find(|&i| knots[i] <= knots[i - 1]) {
            return Err(SplineError::NonIncreasingKnots {
                index,
                previous: knots[index - 1],
                value: knots[index]
            });
        }

        let mut knot_vector = KnotVector { knots, geometry: Vec::new(), basis: Vec::new() };
        let intervals = knot_vector.size() - 1;
        knot_vector.geometry = (0..intervals)
            .map(|i| knot_vector.compute_geometry(i))
            .collect::<Result<Vec<_>, _>>()?;
        knot_vector.basis = (0..intervals)
            .map(|i| knot_vector.compute_basis(i))
            .collect();
        log::debug!("knot vector with {} knots on [{}, {}]", knot_vector.size(), knot_vector.first(), knot_vector.last());
        Ok(knot_vector)
    }

    pub fn size(&self) -> usize {
        self.knots.len()
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    pub fn first(&self) -> f64 {
        self.knots[0]
    }

    pub fn last(&self) -> f64 {
        self.knots[self.knots.len() - 1]
    }

    /// Knot `i`, clamped to the first/last knot outside `[0, N-1]`.
    pub fn u(&self, i: isize) -> f64 {
        let last = self.knots.len() as isize - 1;
        self.knots[i.clamp(0, last) as usize]
    }

    pub fn h(&self, i: isize, j: isize) -> f64 {
        self.u(i) - self.u(j)
    }

    /// Width of interval `i`.
    pub fn width(&self, i: isize) -> f64 {
        self.h(i + 1, i)
    }

    pub fn r(&self, i: isize) -> f64 {
        3.0 / self.width(i)
    }

    pub fn f(&self, i: isize) -> f64 {
        -(self.r(i - 1) + self.r(i))
    }

    pub fn p(&self, i: isize) -> f64 {
        2.0 * (self.width(i - 1) + self.width(i))
    }

    pub fn geometry(&self, interval: usize) -> &IntervalGeometry {
        &self.geometry[interval]
    }

    pub fn basis_terms(&self, interval: usize) -> &[BasisTerm; 8] {
        &self.basis[interval]
    }

    /// Value of basis slot `slot` (0..4 for A..D) of `interval` at `x`.
    pub fn basis_value(&self, x: f64, interval: usize, slot: usize) -> f64 {
        self.basis[interval][SLOT_TERMS[slot].clone()]
            .iter()
            .map(|term| term.value(x))
            .sum()
    }

    /// Monomial form of basis slot `slot` of `interval`.
    pub fn basis_polynomial(&self, interval: usize, slot: usize) -> CubicPolynomial {
        let mut result = CubicPolynomial::default();
        for term in &self.basis[interval][SLOT_TERMS[slot].clone()] {
            result += term.polynomial();
        }
        result
    }

    pub fn locate(&self, x: f64) -> KnotLocation {
        if x < self.first() {
            return KnotLocation::LeftOfKnots;
        }
        if x > self.last() {
            return KnotLocation::RightOfKnots;
        }
        // last knot <= x among all knots but the final one; NaN lands in the first interval
        let interior = &self.knots[..self.knots.len() - 1];
        let index = interior.partition_point(|&u| u <= x);
        KnotLocation::Interval(index.saturating_sub(1))
    }

    fn compute_geometry(&self, interval: usize) -> Result<IntervalGeometry, SplineError> {
        let i = interval as isize;
        let w = self.h(i + 1, i);
        let geometry = IntervalGeometry {
            p: self.h(i + 1, i - 2) * self.h(i + 1, i - 1) * w,
            q: self.h(i + 1, i - 1) * self.h(i + 2, i - 1) * w,
            r: self.h(i + 2, i) * self.h(i + 2, i - 1) * w,
            s: self.h(i + 2, i) * self.h(i + 3, i) * w
        };
        let valid = [geometry.p, geometry.q, geometry.r, geometry.s]
            .iter()
            .all(|v| v.is_finite() && *v != 0.0);
        if !valid {
            return Err(SplineError::DegenerateGeometry { interval });
        }
        Ok(geometry)
    }

    fn compute_basis(&self, interval: usize) -> [BasisTerm; 8] {
        let i = interval as isize;
        let IntervalGeometry { p, q, r, s } = self.geometry[interval];
        let u = |k: isize| self.u(i + k);
        [
            BasisTerm::new(-1.0 / p, [u(1), u(1), u(1)]),
            BasisTerm::new(1.0 / p, [u(-2), u(1), u(1)]),
            BasisTerm::new(1.0 / q, [u(-1), u(1), u(2)]),
            BasisTerm::new(1.0 / r, [u(0), u(2), u(2)]),
            BasisTerm::new(-1.0 / q, [u(-1), u(-1), u(1)]),
            BasisTerm::new(-1.0 / r, [u(-1), u(0), u(2)]),
            BasisTerm::new(-1.0 / s, [u(0), u(0), u(3)]),
            BasisTerm::new(1.0 / s, [u(0), u(0), u(0)])
        ]
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rejects_invalid_knots() {
        assert_eq!(KnotVector::new(vec![1.0]).unwrap_err(), SplineError::TooFewKnots { found: 1 });
        assert_eq!(
            KnotVector::new(vec![0.0, 1.0, 1.0]).unwrap_err(),
            SplineError::NonIncreasingKnots { index: 2, previous: 1.0, value: 1.0 }
        );
        assert_eq!(KnotVector::new(vec![0.0, f64::NAN]).unwrap_err(), SplineError::NonFiniteKnot { index: 1 });
    }

    #[test]
    fn underflowing_spacing_products_are_degenerate() {
        // 1e-120 cubed is below the smallest subnormal
        assert_eq!(
            KnotVector::new(vec![0.0, 1e-120, 1.0]).unwrap_err(),
            SplineError::DegenerateGeometry { interval: 0 }
        );
    }

    #[test]
    fn ghost_knots_clamp() {
        let knots = KnotVector::new(vec![0.5, 1.0, 2.0]).unwrap();
        assert_eq!(knots.u(-2), 0.5);
        assert_eq!(knots.u(1), 1.0);
        assert_eq!(knots.u(5), 2.0);
        assert_eq!(knots.width(-1), 0.0);
        assert_relative_eq!(knots.r(1), 3.0);
        assert_relative_eq!(knots.p(1), 3.0);
    }

    #[test]
    fn locate_follows_interval_convention() {
        let knots = KnotVector::new(vec![0.0, 1.0, 2.0, 3.0]).unwrap();
        assert_eq!(knots.locate(-0.1), KnotLocation::LeftOfKnots);
        assert_eq!(knots.locate(0.0), KnotLocation::Interval(0));
        assert_eq!(knots.locate(1.0), KnotLocation::Interval(1));
        assert_eq!(knots.locate(2.5), KnotLocation::Interval(2));
        assert_eq!(knots.locate(3.0), KnotLocation::Interval(2));
        assert_eq!(knots.locate(3.1), KnotLocation::RightOfKnots);
        assert_eq!(knots.locate(f64::NAN), KnotLocation::Interval(0));
    }

    #[test]
    fn basis_is_partition_of_unity() {
        let knots = KnotVector::new(vec![0.0, 0.4, 1.3, 2.0, 3.5, 4.1]).unwrap();
        for interval in 0..knots.size() - 1 {
            let lo = knots.u(interval as isize);
            let hi = knots.u(interval as isize + 1);
            for t in [0.0, 0.25, 0.6, 1.0] {
                let x = lo + t * (hi - lo);
                let total: f64 = (0..4).map(|slot| knots.basis_value(x, interval, slot)).sum();
                assert_relative_eq!(total, 1.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn basis_polynomials_match_products() {
        let knots = KnotVector::new(vec![0.0, 0.4, 1.3, 2.0, 3.5]).unwrap();
        for slot in 0..4 {
            let poly = knots.basis_polynomial(1, slot);
            for x in [0.4, 0.8, 1.3] {
                assert_relative_eq!(poly.value(x), knots.basis_value(x, 1, slot), epsilon = 1e-12);
            }
        }
    }
}
