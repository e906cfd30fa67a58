use std::sync::Arc;

use num_complex::Complex64;

use crate::efficiency::efficiency::{
    coefficient_parameters,
    same_point,
    GaussModelEfficiency
};
use crate::efficiency::efficiencyerror::EfficiencyError;
use crate::efficiency::piecewiseconstant::boundaries_within;
use crate::math::spline::boundaryconditions::BoundaryConditions;
use crate::math::spline::cubicsplineknot::{
    BoundSpline,
    CubicSplineKnot
};
use crate::math::spline::expintegral::HistogramBin;
use crate::math::spline::splineerror::SplineError;
use crate::parameter::parameter::Parameter;

/// Efficiency given by a cubic B-spline whose coefficients are parameters.
#[derive(Clone, Debug)]
pub struct CubicSplineEfficiency {
    name: String,
    spline: Arc<CubicSplineKnot>,
    coefficients: Vec<Parameter>
}

impl CubicSplineEfficiency {
    pub fn new(name: impl Into<String>,
               knots: Vec<f64>,
               coefficients: Vec<Parameter>) -> Result<CubicSplineEfficiency, EfficiencyError> {
        CubicSplineEfficiency::with_spline(name, Arc::new(CubicSplineKnot::new(knots)?), coefficients)
    }

    /// Shares an existing knot vector and its caches.
    pub fn with_spline(name: impl Into<String>,
                       spline: Arc<CubicSplineKnot>,
                       coefficients: Vec<Parameter>) -> Result<CubicSplineEfficiency, EfficiencyError> {
        spline.bind(&coefficients)?;
        Ok(CubicSplineEfficiency { name: name.into(), spline, coefficients })
    }

    /// Interpolates `values` sampled at the knots, after Reinsch smoothing
    /// with weight `smoothing` when it is positive. `smoothing` outside
    /// `[0, 1)` is rejected before anything else is checked.
    ///
    /// Constant coefficients are named `{name}_coef_{i}`. Floating ones are
    /// named `{name}_smoothed_bin_{i}` with the outermost two held constant.
    pub fn from_samples(name: impl Into<String>,
                        knots: Vec<f64>,
                        values: &[f64],
                        errors: &[f64],
                        smoothing: f64,
                        boundary_conditions: &BoundaryConditions,
                        constant_coefficients: bool) -> Result<CubicSplineEfficiency, EfficiencyError> {
        if !(0.0..1.0).contains(&smoothing) {
            return Err(SplineError::SmoothingOutOfRange(smoothing).into());
        }
        let name = name.into();
        let spline = CubicSplineKnot::new(knots)?;
        let values = if smoothing > 0.0 {
            spline.smoothed_coefficients(values, errors, smoothing, boundary_conditions)?
        } else {
            spline.compute_coefficients(values, boundary_conditions)?
        };

        let coefficients = if constant_coefficients {
            coefficient_parameters(&format!("{}_coef", name), &values, true)?
        } else {
            let coefficients = coefficient_parameters(&format!("{}_smoothed_bin", name), &values, false)?;
            if let (Some(first), Some(last)) = (coefficients.first(), coefficients.last()) {
                first.set_constant(true);
                last.set_constant(true);
            }
            coefficients
        };
        log::debug!("spline efficiency '{}' built on {} knots (smoothing {})", name, spline.size(), smoothing);
        Ok(CubicSplineEfficiency { name, spline: Arc::new(spline), coefficients })
    }

    /// Places the knots at the bin centres and interpolates the contents.
    pub fn from_histogram(name: impl Into<String>,
                          bins: &[HistogramBin],
                          smoothing: f64,
                          constant_coefficients: bool) -> Result<CubicSplineEfficiency, EfficiencyError> {
        let centres = bins.iter().map(HistogramBin::centre).collect();
        let values: Vec<f64> = bins.iter().map(|bin| bin.content).collect();
        let errors: Vec<f64> = bins.iter().map(|bin| bin.error).collect();
        CubicSplineEfficiency::from_samples(
            name,
            centres,
            &values,
            &errors,
            smoothing,
            &BoundaryConditions::natural(),
            constant_coefficients
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn spline(&self) -> &Arc<CubicSplineKnot> {
        &self.spline
    }

    pub fn knots(&self) -> &[f64] {
        self.spline.knots()
    }

    pub fn coefficients(&self) -> &[Parameter] {
        &self.coefficients
    }

    fn bound(&self) -> BoundSpline<'_, [Parameter]> {
        self.spline.bind_checked(&self.coefficients[..])
    }

    pub fn max_value(&self) -> f64 {
        self.bound().max_abs_coefficient()
    }
}

impl GaussModelEfficiency for CubicSplineEfficiency {
    fn evaluate(&self, x: f64) -> f64 {
        self.bound().evaluate(x)
    }

    fn definite_integral(&self, lo: f64, hi: f64) -> Option<f64> {
        let knots = self.spline.knot_vector();
        if same_point(lo, knots.first()) && same_point(hi, knots.last()) {
            return Some(self.bound().definite_integral());
        }
        log::warn!(
            "spline efficiency '{}' integrates analytically over [{}, {}] only, not [{}, {}]",
            self.name, knots.first(), knots.last(), lo, hi
        );
        None
    }

    fn convolution_integral(&self, umin: f64, umax: f64, scale: f64, offset: f64, z: Complex64) -> Complex64 {
        self.bound().convolution_integral(umin, umax, scale, offset, z)
    }

    fn bin_boundaries(&self, lo: f64, hi: f64) -> Vec<f64> {
        boundaries_within(self.spline.knots(), lo, hi)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use approx::{
        assert_abs_diff_eq,
        assert_relative_eq
    };

    use crate::efficiency::efficiencyerror::EfficiencyError;

    const KNOTS: [f64; 6] = [0.3, 0.8, 1.5, 2.5, 4.0, 7.0];
    const VALUES: [f64; 6] = [0.2, 0.5, 0.8, 0.9, 0.95, 1.0];

    fn floating() -> CubicSplineEfficiency {
        CubicSplineEfficiency::from_samples(
            "acc", KNOTS.to_vec(), &VALUES, &[0.02; 6], 0.0, &BoundaryConditions::natural(), false
        ).unwrap()
    }

    #[test]
    fn samples_are_interpolated() {
        let efficiency = floating();
        for (u, y) in KNOTS.iter().zip(VALUES.iter()) {
            assert_relative_eq!(efficiency.evaluate(*u), *y, epsilon = 1e-12);
        }
    }

    #[test]
    fn smoothing_outside_unit_interval_is_rejected() {
        for smoothing in [-0.5, f64::NAN, 1.0] {
            let result = CubicSplineEfficiency::from_samples(
                "acc", KNOTS.to_vec(), &VALUES, &[0.02; 6], smoothing, &BoundaryConditions::natural(), false
            );
            assert!(matches!(result, Err(EfficiencyError::Spline(SplineError::SmoothingOutOfRange(_)))));
        }
        // checked before the knots are looked at
        let result = CubicSplineEfficiency::from_samples(
            "acc", vec![1.0], &[0.5], &[], -0.5, &BoundaryConditions::natural(), true
        );
        assert!(matches!(result, Err(EfficiencyError::Spline(SplineError::SmoothingOutOfRange(_)))));
    }

    #[test]
    fn floating_coefficients_are_named_and_fixed_at_the_ends() {
        let efficiency = floating();
        let coefficients = efficiency.coefficients();
        assert_eq!(coefficients.len(), 8);
        assert_eq!(coefficients[3].name(), "acc_smoothed_bin_3");
        assert!(coefficients[0].is_constant());
        assert!(coefficients[7].is_constant());
        assert!(coefficients[1..7].iter().all(|c| !c.is_constant()));
    }

    #[test]
    fn constant_coefficients_are_named() {
        let efficiency = CubicSplineEfficiency::from_samples(
            "acc", KNOTS.to_vec(), &VALUES, &[], 0.0, &BoundaryConditions::natural(), true
        ).unwrap();
        assert_eq!(efficiency.coefficients()[0].name(), "acc_coef_0");
        assert!(efficiency.coefficients().iter().all(Parameter::is_constant));
    }

    #[test]
    fn moving_a_coefficient_moves_the_curve() {
        let efficiency = floating();
        let before = efficiency.evaluate(2.0);
        let handle = efficiency.coefficients()[3].clone();
        handle.set_value(handle.value() - 0.05).unwrap();
        assert!(efficiency.evaluate(2.0) < before);
    }

    #[test]
    fn integral_only_over_the_knot_span() {
        let efficiency = floating();
        assert!(efficiency.definite_integral(0.3, 7.0).is_some());
        assert!(efficiency.definite_integral(0.3 + 1e-14, 7.0).is_some());
        assert_eq!(efficiency.definite_integral(0.0, 7.0), None);
        assert_eq!(efficiency.definite_integral(1.0, 2.0), None);
    }

    #[test]
    fn boundaries_are_the_knots_in_range() {
        let efficiency = floating();
        assert_eq!(efficiency.bin_boundaries(0.8, 3.0), vec![0.8, 1.5, 2.5]);
        assert_eq!(efficiency.bin_boundaries(0.0, 10.0), KNOTS.to_vec());
    }

    #[test]
    fn coefficient_count_is_checked() {
        let coefficients = (0..7).map(|i| Parameter::constant(format!("c{}", i), 0.5)).collect();
        assert_eq!(
            CubicSplineEfficiency::new("acc", KNOTS.to_vec(), coefficients).err(),
            Some(EfficiencyError::Spline(SplineError::CoefficientCountMismatch { expected: 8, found: 7 }))
        );
    }

    #[test]
    fn histogram_bins_become_knots() {
        let bins: Vec<HistogramBin> = (0..6)
            .map(|i| HistogramBin::new(i as f64, (i + 1) as f64, 0.5 + 0.08 * i as f64, 0.03))
            .collect();
        let efficiency = CubicSplineEfficiency::from_histogram("hist", &bins, 0.0, true).unwrap();
        assert_eq!(efficiency.knots(), &[0.5, 1.5, 2.5, 3.5, 4.5, 5.5]);
        // linear data is reproduced exactly by a natural spline
        assert_abs_diff_eq!(efficiency.evaluate(2.0), 0.5 + 0.08 * 1.5, epsilon = 1e-12);
    }
}
