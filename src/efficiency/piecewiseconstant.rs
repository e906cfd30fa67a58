use num_complex::Complex64;

use crate::efficiency::efficiencyerror::EfficiencyError;
use crate::math::gaussconvolution::piecewiseconvolution::PiecewiseConvolution;
use crate::math::spline::cubicpolynomial::CubicPolynomial;

// ─────────────────────────────────────────────
// Shared algebra of step functions
// ─────────────────────────────────────────────

pub(crate) fn validate_boundaries(boundaries: &[f64]) -> Result<(), EfficiencyError> {
    if boundaries.len() < 2 {
        return Err(EfficiencyError::TooFewBoundaries { found: boundaries.len() });
    }
    if let Some(index) = boundaries.iter().position(|b| !b.is_finite()) {
        return Err(EfficiencyError::NonIncreasingBoundaries { index });
    }
    match boundaries.windows(2).position(|w| !(w[0] < w[1])) {
        Some(index) => Err(EfficiencyError::NonIncreasingBoundaries { index: index + 1 }),
        None => Ok(())
    }
}

/// Bin containing `x`, for `x` inside `[first, last]`; the last boundary
/// belongs to the last bin.
pub(crate) fn locate_bin(boundaries: &[f64], x: f64) -> usize {
    let interior = &boundaries[..boundaries.len() - 1];
    interior.partition_point(|&b| b <= x).saturating_sub(1)
}

pub(crate) fn boundaries_within(boundaries: &[f64], lo: f64, hi: f64) -> Vec<f64> {
    boundaries.iter()
        .copied()
        .filter(|b| (lo..=hi).contains(b))
        .collect()
}

/// `∫ h(x) dx` over `[lo, hi] ∩ [first, last]` for a step function with
/// height `height(i)` on bin `i`.
pub(crate) fn step_integral<F>(boundaries: &[f64], height: F, lo: f64, hi: f64) -> f64
    where F: Fn(usize) -> f64 {
    boundaries.windows(2)
        .enumerate()
        .map(|(i, w)| {
            let overlap = hi.min(w[1]) - lo.max(w[0]);
            if overlap > 0.0 { overlap * height(i) } else { 0.0 }
        })
        .sum()
}

/// Convolution of a step function with the smeared decay kernel.
///
/// With `extend` the first and last heights continue beyond the outer
/// boundaries; otherwise the function vanishes there.
pub(crate) fn step_convolution<F>(boundaries: &[f64],
                                  height: F,
                                  extend: bool,
                                  umin: f64,
                                  umax: f64,
                                  scale: f64,
                                  offset: f64,
                                  z: Complex64) -> Complex64
    where F: Fn(usize) -> f64 {
    let lo = scale * umin + offset;
    let hi = scale * umax + offset;
    assert!(hi >= lo, "convolution range [{}, {}] is inverted", lo, hi);

    let bins = boundaries.len() - 1;
    let first = boundaries[0];
    let last = boundaries[bins];
    let mut convolution = PiecewiseConvolution::new(scale, offset, z);
    if extend && lo < first {
        convolution.add_segment(lo, hi.min(first), &CubicPolynomial::constant(height(0)));
    }
    for (i, w) in boundaries.windows(2).enumerate() {
        convolution.add_segment(lo.max(w[0]), hi.min(w[1]), &CubicPolynomial::constant(height(i)));
    }
    if extend && hi > last {
        convolution.add_segment(lo.max(last), hi, &CubicPolynomial::constant(height(bins - 1)));
    }
    convolution.sum()
}
