use crate::math::banded::bandedsystem::{
    check_band,
    check_pivot,
    check_rhs,
    BandedSystem,
    BandedSystemError
};

/// Symmetric matrix with bandwidth two.
///
/// `first[i]` sits at `(i, i+1)` and `(i+1, i)`, `second[i]` at `(i, i+2)`
/// and `(i+2, i)`. Solved through a banded `L D Lᵀ` factorisation where `L`
/// is unit lower triangular with two sub-diagonals.
#[derive(Clone, Debug)]
pub struct SymmetricPentadiagonalSystem {
    diag: Vec<f64>,
    first: Vec<f64>,
    second: Vec<f64>
}

struct LdlFactors {
    d: Vec<f64>,
    l1: Vec<f64>,
    l2: Vec<f64>
}

impl SymmetricPentadiagonalSystem {
    pub fn new(diag: Vec<f64>, first: Vec<f64>, second: Vec<f64>) -> Result<SymmetricPentadiagonalSystem, BandedSystemError> {
        if diag.is_empty() {
            return Err(BandedSystemError::Empty);
        }
        let n = diag.len();
        check_band("first", &first, n - 1)?;
        check_band("second", &second, n.saturating_sub(2))?;
        Ok(SymmetricPentadiagonalSystem { diag, first, second })
    }

    fn row_scale(&self, i: usize) -> f64 {
        let mut scale = self.diag[i].abs();
        for band in [&self.first, &self.second] {
            let width = self.diag.len() - band.len();
            if i < band.len() {
                scale = scale.max(band[i].abs());
            }
            if i >= width {
                scale = scale.max(band[i - width].abs());
            }
        }
        scale
    }

    fn factorize(&self) -> Result<LdlFactors, BandedSystemError> {
        let n = self.dimension();
        let mut d = vec![0.0; n];
        let mut l1 = vec![0.0; self.first.len()];
        let mut l2 = vec![0.0; self.second.len()];
        for i in 0..n {
            let mut pivot = self.diag[i];
            if i >= 1 {
                pivot -= l1[i - 1] * l1[i - 1] * d[i - 1];
            }
            if i >= 2 {
                pivot -= l2[i - 2] * l2[i - 2] * d[i - 2];
            }
            d[i] = check_pivot(pivot, self.row_scale(i), i)?;

            if i < l1.len() {
                let mut numerator = self.first[i];
                if i >= 1 {
                    numerator -= l2[i - 1] * l1[i - 1] * d[i - 1];
                }
                l1[i] = numerator / d[i];
            }
            if i < l2.len() {
                l2[i] = self.second[i] / d[i];
            }
        }
        Ok(LdlFactors { d, l1, l2 })
    }
}

impl BandedSystem for SymmetricPentadiagonalSystem {
    fn dimension(&self) -> usize {
        self.diag.len()
    }

    fn entry(&self, row: usize, col: usize) -> f64 {
        let (lo, hi) = if row <= col { (row, col) } else { (col, row) };
        match hi - lo {
            0 => self.diag[lo],
            1 => self.first[lo],
            2 => self.second[lo],
            _ => 0.0
        }
    }

    fn solve(&self, rhs: &[f64]) -> Result<Vec<f64>, BandedSystemError> {
        let n = self.dimension();
        check_rhs(rhs, n)?;
        let LdlFactors { d, l1, l2 } = self.factorize()?;

        // L y = rhs
        let mut x = rhs.to_vec();
        for i in 1..n {
            x[i] -= l1[i - 1] * x[i - 1];
            if i >= 2 {
                x[i] -= l2[i - 2] * x[i - 2];
            }
        }
        // D z = y
        for (xi, di) in x.iter_mut().zip(d.iter()) {
            *xi /= di;
        }
        // Lᵀ x = z
        for i in (0..n).rev() {
            if i + 1 < n {
                x[i] -= l1[i] * x[i + 1];
            }
            if i + 2 < n {
                x[i] -= l2[i] * x[i + 2];
            }
        }
        Ok(x)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::DVector;

    fn assert_matches_dense(system: &SymmetricPentadiagonalSystem, rhs: Vec<f64>) {
        let solution = system.solve(&rhs).unwrap();
        let dense = system.to_dense().lu().solve(&DVector::from_vec(rhs)).unwrap();
        assert_eq!(solution.len(), dense.len());
        for (x, y) in solution.iter().zip(dense.iter()) {
            assert_relative_eq!(*x, *y, epsilon = 1e-11, max_relative = 1e-11);
        }
    }

    #[test]
    fn matches_dense_solution() {
        let system = SymmetricPentadiagonalSystem::new(
            vec![6.0, 7.0, 8.0, 6.5, 9.0, 7.5],
            vec![1.0, -2.0, 1.5, 0.5, -1.0],
            vec![0.5, 0.25, -0.75, 1.0]
        ).unwrap();
        assert_matches_dense(&system, vec![1.0, 0.0, -1.0, 2.0, 0.5, -3.0]);
    }

    #[test]
    fn small_dimensions() {
        let one = SymmetricPentadiagonalSystem::new(vec![4.0], vec![], vec![]).unwrap();
        assert_relative_eq!(one.solve(&[2.0]).unwrap()[0], 0.5);

        let two = SymmetricPentadiagonalSystem::new(vec![4.0, 3.0], vec![1.0], vec![]).unwrap();
        assert_matches_dense(&two, vec![1.0, 2.0]);

        let three = SymmetricPentadiagonalSystem::new(vec![4.0, 3.0, 5.0], vec![1.0, -1.0], vec![0.5]).unwrap();
        assert_matches_dense(&three, vec![1.0, 2.0, -1.0]);
    }

    #[test]
    fn dense_view_is_symmetric() {
        let system = SymmetricPentadiagonalSystem::new(
            vec![6.0, 7.0, 8.0, 6.5],
            vec![1.0, -2.0, 1.5],
            vec![0.5, 0.25]
        ).unwrap();
        let dense = system.to_dense();
        assert_eq!(dense, dense.transpose());
        assert_eq!(dense[(3, 0)], 0.0);
        assert_eq!(dense[(2, 0)], 0.5);
    }

    #[test]
    fn singular_matrix_is_rejected() {
        let system = SymmetricPentadiagonalSystem::new(vec![1.0, 1.0, 2.0], vec![1.0, 1.0], vec![0.0]).unwrap();
        assert_eq!(system.solve(&[1.0, 1.0, 1.0]), Err(BandedSystemError::ZeroPivot { row: 1 }));
    }
}
