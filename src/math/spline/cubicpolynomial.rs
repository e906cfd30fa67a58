use std::ops::{
    AddAssign,
    Mul
};

/// Cubic polynomial in monomial form, `c[0] + c[1] x + c[2] x² + c[3] x³`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CubicPolynomial {
    coefs: [f64; 4]
}

const BINOMIAL: [[f64; 4]; 4] = [
    [1.0, 0.0, 0.0, 0.0],
    [1.0, 1.0, 0.0, 0.0],
    [1.0, 2.0, 1.0, 0.0],
    [1.0, 3.0, 3.0, 1.0]
];

impl CubicPolynomial {
    pub fn new(coefs: [f64; 4]) -> CubicPolynomial {
        CubicPolynomial { coefs }
    }

    pub fn constant(value: f64) -> CubicPolynomial {
        CubicPolynomial::new([value, 0.0, 0.0, 0.0])
    }

    pub fn linear(intercept: f64, slope: f64) -> CubicPolynomial {
        CubicPolynomial::new([intercept, slope, 0.0, 0.0])
    }

    /// `weight · (x - a)(x - b)(x - c)`
    pub fn from_roots(weight: f64, roots: [f64; 3]) -> CubicPolynomial {
        let [a, b, c] = roots;
        CubicPolynomial::new([
            -weight * a * b * c,
            weight * (a * b + a * c + b * c),
            -weight * (a + b + c),
            weight
        ])
    }

    pub fn coefs(&self) -> &[f64; 4] {
        &self.coefs
    }

    pub fn value(&self, x: f64) -> f64 {
        let mut result = self.coefs[3];
        for &beta in self.coefs[..3].iter().rev() {
            result = f64::mul_add(result, x, beta);
        }
        result
    }

    /// Polynomial `q` with `q(y) = p(y + offset)`.
    pub fn shifted(&self, offset: f64) -> CubicPolynomial {
        if offset == 0.0 {
            return *self;
        }
        let mut coefs = [0.0; 4];
        for (m, coef) in coefs.iter_mut().enumerate() {
            let mut power = 1.0;
            for n in m..4 {
                *coef += self.coefs[n] * BINOMIAL[n][m] * power;
                power *= offset;
            }
        }
        CubicPolynomial::new(coefs)
    }

    /// Exact integral over `[lo, hi]`, evaluated in coordinates relative to `lo`.
    pub fn integral(&self, lo: f64, hi: f64) -> f64 {
        let local = self.shifted(lo);
        let width = hi - lo;
        let mut power = width;
        let mut result = 0.0;
        for (n, coef) in local.coefs.iter().enumerate() {
            result += coef * power / (n + 1) as f64;
            power *= width;
        }
        result
    }

    /// Moment weight `s(j, k) = c[j+k] · C(j+k, j) / 2^(j+k)` entering the
    /// Gaussian convolution sum.
    pub fn moment(&self, j: usize, k: usize) -> f64 {
        let n = j + k;
        assert!(n < 4, "moment ({}, {}) exceeds cubic order", j, k);
        self.coefs[n] * BINOMIAL[n][j] / (1u32 << n) as f64
    }
}

impl AddAssign for CubicPolynomial {
    fn add_assign(&mut self, other: CubicPolynomial) {
        for (lhs, rhs) in self.coefs.iter_mut().zip(other.coefs.iter()) {
            *lhs += rhs;
        }
    }
}

impl Mul<f64> for CubicPolynomial {
    type Output = CubicPolynomial;

    fn mul(self, factor: f64) -> CubicPolynomial {
        CubicPolynomial::new(self.coefs.map(|c| c * factor))
    }
}
