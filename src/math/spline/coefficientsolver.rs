use crate::math::banded::bandedsystem::BandedSystem;
use crate::math::banded::pentadiagonalsystem::SymmetricPentadiagonalSystem;
use crate::math::banded::tridiagonalsystem::TridiagonalSystem;
use crate::math::spline::boundaryconditions::{
    BoundaryCondition,
    BoundaryConditions
};
use crate::math::spline::knotvector::KnotVector;
use crate::math::spline::splineerror::SplineError;

fn check_length(what: &'static str, values: &[f64], expected: usize) -> Result<(), SplineError> {
    if values.len() != expected {
        return Err(SplineError::LengthMismatch { what, expected, found: values.len() });
    }
    Ok(())
}

// ─────────────────────────────────────────────
// Exact interpolation
// ─────────────────────────────────────────────
//
// The first and last coefficients equal the first and last sample. The N
// remaining unknowns c[j] = b[j+1] satisfy a tridiagonal system:
//
//   interior row i:  A(u_i, i) c[i-1] + B(u_i, i) c[i] + C(u_i, i) c[i+1] = y_i
//
// while rows 0 and N-1 encode the boundary conditions after moving the known
// outer coefficients to the right-hand side.

/// Maps `N` sampled values at the knots to `N + 2` B-spline coefficients.
pub fn interpolate(knots: &KnotVector,
                   values: &[f64],
                   boundary_conditions: &BoundaryConditions) -> Result<Vec<f64>, SplineError> {
    let n = knots.size();
    check_length("sampled values", values, n)?;

    let first = values[0];
    let last = values[n - 1];
    let ln = n as isize - 1;

    let w0 = knots.width(0);
    let (diag_first, sup_first, rhs_first) = match boundary_conditions.left {
        BoundaryCondition::SecondDerivative(value) => {
            let h20 = knots.h(2, 0);
            (
                -(6.0 / w0 + 6.0 / h20) / w0,
                6.0 / (h20 * w0),
                value - first * 6.0 / (w0 * w0)
            )
        },
        BoundaryCondition::FirstDerivative(value) => (3.0 / w0, 0.0, value + first * 3.0 / w0)
    };

    let wl = knots.width(ln - 1);
    let (sub_last, diag_last, rhs_last) = match boundary_conditions.right {
        BoundaryCondition::SecondDerivative(value) => {
            let hl = knots.h(ln, ln - 2);
            (
                6.0 / (hl * wl),
                -(6.0 / wl + 6.0 / hl) / wl,
                value - last * 6.0 / (wl * wl)
            )
        },
        BoundaryCondition::FirstDerivative(value) => (0.0, -3.0 / wl, value - last * 3.0 / wl)
    };

    let mut sub = Vec::with_capacity(n - 1);
    let mut diag = Vec::with_capacity(n);
    let mut sup = Vec::with_capacity(n - 1);
    let mut rhs = Vec::with_capacity(n);

    diag.push(diag_first);
    sup.push(sup_first);
    rhs.push(rhs_first);
    for i in 1..n - 1 {
        let x = knots.u(i as isize);
        sub.push(knots.basis_value(x, i, 0));
        diag.push(knots.basis_value(x, i, 1));
        sup.push(knots.basis_value(x, i, 2));
        rhs.push(values[i]);
    }
    sub.push(sub_last);
    diag.push(diag_last);
    rhs.push(rhs_last);

    let system = TridiagonalSystem::new(sub, diag, sup)?;
    let interior = system.solve(&rhs)?;

    let mut coefficients = Vec::with_capacity(n + 2);
    coefficients.push(first);
    coefficients.extend(interior);
    coefficients.push(last);
    Ok(coefficients)
}

// ─────────────────────────────────────────────
// Reinsch smoothing
// ─────────────────────────────────────────────
//
// Pollock's formulation: with weights 1/σ² and μ = 2λ / (3(1-λ)) solve
//
//   (R + μ Qᵀ Σ Q) b = Qᵀ y
//
// where R is the tridiagonal matrix of p(i), h(i) and Q the second-difference
// operator built from r(i), f(i). The smoothed values are y - μ Σ Q b.

/// Replaces `values` by smoothed values; `lambda = 0` leaves them untouched
/// and `lambda -> 1` approaches a straight line.
pub fn smooth(knots: &KnotVector,
              values: &[f64],
              errors: &[f64],
              lambda: f64) -> Result<Vec<f64>, SplineError> {
    if !(0.0..1.0).contains(&lambda) {
        return Err(SplineError::SmoothingOutOfRange(lambda));
    }
    let n = knots.size();
    check_length("sampled values", values, n)?;
    check_length("sample errors", errors, n)?;

    let mut y = values.to_vec();
    if n < 3 || lambda == 0.0 {
        return Ok(y);
    }

    let mu = 2.0 * lambda / (3.0 * (1.0 - lambda));
    let var = |i: usize| errors[i] * errors[i];
    let r = |i: usize| knots.r(i as isize);
    let f = |i: usize| knots.f(i as isize);
    let m = n - 2;

    let q: Vec<f64> = (0..m)
        .map(|i| r(i) * (y[i] - y[i + 1]) - r(i + 1) * (y[i + 1] - y[i + 2]))
        .collect();
    let diag: Vec<f64> = (0..m)
        .map(|i| {
            knots.p(i as isize + 1)
                + mu * (r(i) * r(i) * var(i) + f(i + 1) * f(i + 1) * var(i + 1) + r(i + 1) * r(i + 1) * var(i + 2))
        })
        .collect();
    let first: Vec<f64> = (0..m - 1)
        .map(|i| {
            knots.width(i as isize + 1)
                + mu * (f(i + 1) * r(i + 1) * var(i + 1) + r(i + 1) * f(i + 2) * var(i + 2))
        })
        .collect();
    let second: Vec<f64> = (0..m.saturating_sub(2))
        .map(|i| mu * r(i + 1) * r(i + 2) * var(i + 2))
        .collect();

    let system = SymmetricPentadiagonalSystem::new(diag, first, second)?;
    let b = system.solve(&q)?;
    log::trace!("smoothing with lambda {} (mu {}) over {} knots", lambda, mu, n);

    for (i, yi) in y.iter_mut().enumerate() {
        let mut correction = 0.0;
        if i < m {
            correction += r(i) * b[i];
        }
        if i >= 1 && i - 1 < m {
            correction += f(i) * b[i - 1];
        }
        if i >= 2 && i - 2 < m {
            correction += r(i - 1) * b[i - 2];
        }
        *yi -= mu * var(i) * correction;
    }
    Ok(y)
}
