use crate::math::banded::bandedsystem::{
    check_band,
    check_pivot,
    check_rhs,
    BandedSystem,
    BandedSystemError
};

/// Row `i` reads `sub[i-1] x[i-1] + diag[i] x[i] + sup[i] x[i+1] = rhs[i]`.
#[derive(Clone, Debug)]
pub struct TridiagonalSystem {
    sub: Vec<f64>,
    diag: Vec<f64>,
    sup: Vec<f64>
}

impl TridiagonalSystem {
    pub fn new(sub: Vec<f64>, diag: Vec<f64>, sup: Vec<f64>) -> Result<TridiagonalSystem, BandedSystemError> {
        if diag.is_empty() {
            return Err(BandedSystemError::Empty);
        }
        let off = diag.len() - 1;
        check_band("sub", &sub, off)?;
        check_band("sup", &sup, off)?;
        Ok(TridiagonalSystem { sub, diag, sup })
    }

    fn row_scale(&self, i: usize) -> f64 {
        let mut scale = self.diag[i].abs();
        if i > 0 {
            scale = scale.max(self.sub[i - 1].abs());
        }
        if i < self.sup.len() {
            scale = scale.max(self.sup[i].abs());
        }
        scale
    }
}

impl BandedSystem for TridiagonalSystem {
    fn dimension(&self) -> usize {
        self.diag.len()
    }

    fn entry(&self, row: usize, col: usize) -> f64 {
        if row == col {
            self.diag[row]
        } else if col + 1 == row {
            self.sub[col]
        } else if row + 1 == col {
            self.sup[row]
        } else {
            0.0
        }
    }

    /// Thomas algorithm: forward elimination, then back substitution.
    fn solve(&self, rhs: &[f64]) -> Result<Vec<f64>, BandedSystemError> {
        let n = self.dimension();
        check_rhs(rhs, n)?;

        let mut modified_sup: Vec<f64> = Vec::with_capacity(n - 1);
        let mut x: Vec<f64> = Vec::with_capacity(n);
        for i in 0..n {
            let (a, c_prev, x_prev) = if i == 0 {
                (0.0, 0.0, 0.0)
            } else {
                (self.sub[i - 1], modified_sup[i - 1], x[i - 1])
            };
            let pivot = check_pivot(self.diag[i] - a * c_prev, self.row_scale(i), i)?;
            if i + 1 < n {
                modified_sup.push(self.sup[i] / pivot);
            }
            x.push((rhs[i] - a * x_prev) / pivot);
        }
        for i in (0..n - 1).rev() {
            x[i] -= modified_sup[i] * x[i + 1];
        }
        Ok(x)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::DVector;

    #[test]
    fn solves_like_dense_lu() {
        let system = TridiagonalSystem::new(
            vec![1.0, -0.5, 2.0, 0.3],
            vec![4.0, 3.5, 5.0, 6.0, 2.5],
            vec![0.7, 1.1, -1.0, 0.4]
        ).unwrap();
        let rhs = vec![1.0, -2.0, 0.5, 3.0, 0.25];

        let solution = system.solve(&rhs).unwrap();
        let dense = system.to_dense().lu().solve(&DVector::from_vec(rhs)).unwrap();
        for (x, y) in solution.iter().zip(dense.iter()) {
            assert_relative_eq!(*x, *y, epsilon = 1e-12);
        }
    }

    #[test]
    fn single_row_system() {
        let system = TridiagonalSystem::new(vec![], vec![2.0], vec![]).unwrap();
        assert_relative_eq!(system.solve(&[3.0]).unwrap()[0], 1.5);
    }

    #[test]
    fn zero_pivot_is_reported() {
        // second pivot vanishes: 1 - 1 * 1 = 0
        let system = TridiagonalSystem::new(vec![1.0], vec![1.0, 1.0], vec![1.0]).unwrap();
        assert_eq!(system.solve(&[1.0, 2.0]), Err(BandedSystemError::ZeroPivot { row: 1 }));
    }

    #[test]
    fn band_lengths_are_checked() {
        let result = TridiagonalSystem::new(vec![1.0, 2.0], vec![1.0, 1.0], vec![1.0]);
        assert!(matches!(result, Err(BandedSystemError::BandLengthMismatch { band: "sub", .. })));
        let system = TridiagonalSystem::new(vec![1.0], vec![3.0, 3.0], vec![1.0]).unwrap();
        assert!(matches!(system.solve(&[1.0]), Err(BandedSystemError::RhsLengthMismatch { .. })));
    }
}
