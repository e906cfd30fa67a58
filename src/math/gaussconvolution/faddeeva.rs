//! Faddeeva function `w(z) = exp(-z²) erfc(-iz)` and the Gaussian-smeared
//! decay kernel built on it.
//!
//! `w` is evaluated with Weideman's rational expansion (SIAM J. Numer. Anal.
//! 31, 1994): for `Im z >= 0`
//!
//!   w(z) = 2 p(Z) / (L - iz)² + 1 / (√π (L - iz)),   Z = (L + iz) / (L - iz)
//!
//! with `p` a polynomial whose coefficients are obtained once from a
//! trapezoidal Fourier transform and cached. The lower half plane follows
//! from `w(z) = 2 exp(-z²) - w(-z)`.

use std::f64::consts::PI;
use std::sync::OnceLock;

use num_complex::Complex64;

const TERMS: usize = 40;

/// Below this value of `Re(z) - x` the kernel is assembled from the
/// reflected form so that `exp(-x²)` and the growing exponential never meet
/// as separate factors.
pub const REFLECTION_THRESHOLD: f64 = -5.0;

struct WeidemanExpansion {
    l: f64,
    coefs: [f64; TERMS]
}

fn weideman_expansion() -> &'static WeidemanExpansion {
    static EXPANSION: OnceLock<WeidemanExpansion> = OnceLock::new();
    EXPANSION.get_or_init(compute_weideman_expansion)
}

fn compute_weideman_expansion() -> WeidemanExpansion {
    let m = 2 * TERMS;
    let l = (TERMS as f64 / std::f64::consts::SQRT_2).sqrt();
    let samples: Vec<(f64, f64)> = (1..m)
        .map(|k| {
            let theta = k as f64 * PI / m as f64;
            let t = l * (theta / 2.0).tan();
            (theta, (-t * t).exp() * (l * l + t * t))
        })
        .collect();

    // the k = 0 node contributes f(0) = L²; nodes ±k are symmetric
    let mut coefs = [0.0; TERMS];
    for (n, coef) in coefs.iter_mut().enumerate() {
        let order = (n + 1) as f64;
        let mut sum = l * l;
        for &(theta, f) in &samples {
            sum += 2.0 * f * (order * theta).cos();
        }
        *coef = sum / (2 * m) as f64;
    }
    log::debug!("initialised {}-term Faddeeva expansion (L = {})", TERMS, l);
    WeidemanExpansion { l, coefs }
}

pub fn faddeeva(z: Complex64) -> Complex64 {
    if z.im < 0.0 {
        return 2.0 * (-z * z).exp() - faddeeva(-z);
    }
    let expansion = weideman_expansion();
    let iz = Complex64::i() * z;
    let denominator = expansion.l - iz;
    let big_z = (expansion.l + iz) / denominator;
    let mut p = Complex64::new(0.0, 0.0);
    for &a in expansion.coefs.iter().rev() {
        p = p * big_z + a;
    }
    2.0 * p / (denominator * denominator) + 1.0 / (PI.sqrt() * denominator)
}

/// `exp(-x²) w(i(z - x))`, the convolution of a unit Gaussian with a complex
/// exponential decay, in the scaled variable `x`.
pub fn gauss_decay_kernel(x: f64, z: Complex64) -> Complex64 {
    let re = z.re - x;
    let argument = Complex64::new(-z.im, re);
    if re > REFLECTION_THRESHOLD {
        faddeeva(argument) * (-x * x).exp()
    } else {
        // exp(-argument²) exp(-x²) = exp(z² - 2zx)
        2.0 * (z * z - 2.0 * z * x).exp() - faddeeva(-argument) * (-x * x).exp()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn assert_complex_eq(actual: Complex64, expected: Complex64, tolerance: f64) {
        assert_abs_diff_eq!(actual.re, expected.re, epsilon = tolerance);
        assert_abs_diff_eq!(actual.im, expected.im, epsilon = tolerance);
    }

    #[test]
    fn reference_values() {
        assert_complex_eq(faddeeva(Complex64::new(0.0, 0.0)), Complex64::new(1.0, 0.0), 1e-12);
        // w(i) = e erfc(1)
        assert_complex_eq(faddeeva(Complex64::new(0.0, 1.0)), Complex64::new(0.427_583_576_155_807, 0.0), 1e-12);
        // w(1) = e^{-1} + 2i/√π D(1)
        assert_complex_eq(
            faddeeva(Complex64::new(1.0, 0.0)),
            Complex64::new(0.367_879_441_171_442_3, 0.607_157_705_841_393_7),
            1e-12
        );
    }

    #[test]
    fn real_axis_matches_error_function() {
        // Re w(x) = exp(-x²) for real x
        for x in [-2.5, -0.3, 0.8, 3.0] {
            assert_abs_diff_eq!(faddeeva(Complex64::new(x, 0.0)).re, (-x * x).exp(), epsilon = 1e-12);
        }
        // w(iy) = exp(y²) erfc(y), tabulated to 18 digits
        let imaginary_axis: [(f64, f64); 3] = [
            (0.2, 0.809_019_519_901_580_742),
            (1.5, 0.321_585_416_454_317_502),
            (4.0, 0.136_999_457_625_061_390)
        ];
        for (y, expected) in imaginary_axis {
            let value = faddeeva(Complex64::new(0.0, y));
            assert_abs_diff_eq!(value.re, expected, epsilon = 1e-13);
            assert_abs_diff_eq!(value.im, 0.0, epsilon = 1e-13);
        }
    }

    #[test]
    fn reflection_is_consistent() {
        let z = Complex64::new(0.7, -0.4);
        let expected = 2.0 * (-z * z).exp() - faddeeva(-z);
        assert_complex_eq(faddeeva(z), expected, 1e-14);
        // symmetry w(-conj z) = conj w(z)
        let z = Complex64::new(1.3, 0.6);
        assert_complex_eq(faddeeva(-z.conj()), faddeeva(z).conj(), 1e-13);
    }

    #[test]
    fn kernel_is_continuous_across_threshold() {
        let z = Complex64::new(0.02, -0.3);
        let x0 = z.re - REFLECTION_THRESHOLD;
        let below = gauss_decay_kernel(x0 - 1e-9, z);
        let above = gauss_decay_kernel(x0 + 1e-9, z);
        assert_complex_eq(below, above, 1e-7);
    }

    #[test]
    fn kernel_tends_to_decay_far_from_origin() {
        // for x >> 1 the smeared kernel approaches 2 exp(-2 z x)
        let z = Complex64::new(0.05, -0.2);
        for x in [4.9, 8.0, 15.0, 30.0] {
            let expected = 2.0 * (z * z - 2.0 * z * x).exp();
            assert_complex_eq(gauss_decay_kernel(x, z), expected, 1e-8);
        }
    }
}
