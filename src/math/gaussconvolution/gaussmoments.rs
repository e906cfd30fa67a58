use std::f64::consts::PI;
use std::ops::Sub;

use num_complex::Complex64;
use statrs::function::erf::erf;

use crate::math::gaussconvolution::faddeeva::gauss_decay_kernel;

pub const MAX_ORDER: usize = 4;

/// Primitive functions `M_n(x, z)`, n = 0..3, of `xⁿ exp(-x²) w(i(z - x))`
/// up to the polynomial factors `K_n(z)`.
///
///   M_n = erf(x) L(n, 0) + exp(-x²) L(n, 1) + exp(-x²) w(i(z - x)) L(n, 2)
///
/// The difference of two `GaussMoments` gives the contribution of a segment.
#[derive(Clone, Copy, Debug)]
pub struct GaussMoments {
    m: [Complex64; MAX_ORDER]
}

impl GaussMoments {
    pub fn new(x: f64, z: Complex64) -> GaussMoments {
        let n0 = erf(x);
        let n1 = (-x * x).exp();
        let n2 = gauss_decay_kernel(x, z);

        let l2 = [
            -1.0,
            -2.0 * x,
            -2.0 * (2.0 * x * x - 1.0),
            -4.0 * x * (2.0 * x * x - 3.0)
        ];
        let two_over_root_pi = 2.0 / PI.sqrt();
        let mut m = [Complex64::new(0.0, 0.0); MAX_ORDER];
        for (j, mj) in m.iter_mut().enumerate() {
            let l0 = if j == 0 { 1.0 } else { 0.0 };
            let l1 = if j == 0 { 0.0 } else { two_over_root_pi * l2[j - 1] };
            *mj = n0 * l0 + n1 * l1 + n2 * l2[j];
        }
        GaussMoments { m }
    }

    pub fn get(&self, j: usize) -> Complex64 {
        self.m[j]
    }
}

impl Sub for GaussMoments {
    type Output = GaussMoments;

    fn sub(self, other: GaussMoments) -> GaussMoments {
        let mut m = self.m;
        for (lhs, rhs) in m.iter_mut().zip(other.m.iter()) {
            *lhs -= rhs;
        }
        GaussMoments { m }
    }
}

/// Factors `K_n(z)` pairing with `GaussMoments`.
#[derive(Clone, Copy, Debug)]
pub struct DecayMoments {
    k: [Complex64; MAX_ORDER]
}

impl DecayMoments {
    pub fn new(z: Complex64) -> DecayMoments {
        let zi = z.inv();
        let zi2 = zi * zi;
        DecayMoments {
            k: [
                0.5 * zi,
                0.5 * zi2,
                zi * (zi2 + 1.0),
                zi2 * (3.0 * zi2 + 3.0)
            ]
        }
    }

    pub fn get(&self, k: usize) -> Complex64 {
        self.k[k]
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn simpson<F: Fn(f64) -> Complex64>(f: F, a: f64, b: f64, n: usize) -> Complex64 {
        let h = (b - a) / n as f64;
        let mut sum = f(a) + f(b);
        for i in 1..n {
            let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
            sum += weight * f(a + i as f64 * h);
        }
        sum * h / 3.0
    }

    #[test]
    fn moments_integrate_monomials() {
        // ∫ xⁿ exp(-x²) w(i(z-x)) dx = 2^-n Σ_j C(n, j) ΔM_j K_{n-j}
        let z = Complex64::new(0.35, -0.8);
        let (a, b) = (-0.7, 1.9);
        let dm = GaussMoments::new(b, z) - GaussMoments::new(a, z);
        let k = DecayMoments::new(z);
        let binomial = [[1.0, 0.0, 0.0, 0.0], [1.0, 1.0, 0.0, 0.0], [1.0, 2.0, 1.0, 0.0], [1.0, 3.0, 3.0, 1.0]];
        for n in 0..MAX_ORDER {
            let closed: Complex64 = (0..=n)
                .map(|j| dm.get(j) * k.get(n - j) * binomial[n][j])
                .sum::<Complex64>() / (1u32 << n) as f64;
            let numeric = simpson(|x| x.powi(n as i32) * gauss_decay_kernel(x, z), a, b, 4000);
            assert_abs_diff_eq!(closed.re, numeric.re, epsilon = 1e-10);
            assert_abs_diff_eq!(closed.im, numeric.im, epsilon = 1e-10);
        }
    }
}
