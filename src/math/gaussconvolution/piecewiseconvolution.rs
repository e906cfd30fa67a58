use num_complex::Complex64;

use crate::math::gaussconvolution::gaussmoments::{
    DecayMoments,
    GaussMoments,
    MAX_ORDER
};
use crate::math::spline::cubicpolynomial::CubicPolynomial;

/// Accumulates `∫ p(scale·u + offset) exp(-u²) w(i(z - u)) du` over a
/// sequence of adjacent segments, each carrying its own cubic `p`.
///
/// Segments are given in the original variable `t = scale·u + offset`.
/// Moments at a shared segment boundary are computed once.
pub struct PiecewiseConvolution {
    scale: f64,
    offset: f64,
    z: Complex64,
    decay: DecayMoments,
    scale_powers: [f64; MAX_ORDER],
    boundary: Option<(f64, GaussMoments)>,
    sum: Complex64
}

impl PiecewiseConvolution {
    pub fn new(scale: f64, offset: f64, z: Complex64) -> PiecewiseConvolution {
        let mut scale_powers = [1.0; MAX_ORDER];
        for n in 1..MAX_ORDER {
            scale_powers[n] = scale_powers[n - 1] * scale;
        }
        PiecewiseConvolution {
            scale,
            offset,
            z,
            decay: DecayMoments::new(z),
            scale_powers,
            boundary: None,
            sum: Complex64::new(0.0, 0.0)
        }
    }

    fn moments_at(&self, t: f64) -> GaussMoments {
        match self.boundary {
            Some((cached, moments)) if cached == t => moments,
            _ => GaussMoments::new((t - self.offset) / self.scale, self.z)
        }
    }

    /// Adds the segment `[lo, hi]`; empty or inverted segments are skipped.
    pub fn add_segment(&mut self, lo: f64, hi: f64, polynomial: &CubicPolynomial) {
        if !(lo < hi) {
            return;
        }
        let lower = self.moments_at(lo);
        let upper = GaussMoments::new((hi - self.offset) / self.scale, self.z);
        let dm = upper - lower;
        let local = polynomial.shifted(self.offset);
        for j in 0..MAX_ORDER {
            for k in 0..MAX_ORDER - j {
                let weight = local.moment(j, k) * self.scale_powers[j + k];
                if weight != 0.0 {
                    self.sum += dm.get(j) * self.decay.get(k) * weight;
                }
            }
        }
        self.boundary = Some((hi, upper));
    }

    pub fn sum(&self) -> Complex64 {
        self.sum
    }
}
