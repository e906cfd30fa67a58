use num_complex::Complex64;

use crate::efficiency::efficiency::{
    coefficient_parameters,
    same_point,
    GaussModelEfficiency
};
use crate::efficiency::efficiencyerror::EfficiencyError;
use crate::efficiency::piecewiseconstant::{
    boundaries_within,
    locate_bin,
    step_convolution,
    step_integral,
    validate_boundaries
};
use crate::parameter::parameter::Parameter;

/// Piecewise-constant efficiency; one coefficient per bin.
///
/// Outside the boundaries the first or last bin value continues.
#[derive(Clone, Debug)]
pub struct BinnedEfficiency {
    name: String,
    boundaries: Vec<f64>,
    coefficients: Vec<Parameter>
}

impl BinnedEfficiency {
    pub fn new(name: impl Into<String>,
               boundaries: Vec<f64>,
               coefficients: Vec<Parameter>) -> Result<BinnedEfficiency, EfficiencyError> {
        validate_boundaries(&boundaries)?;
        let expected = boundaries.len() - 1;
        if coefficients.len() != expected {
            return Err(EfficiencyError::CoefficientCountMismatch { expected, found: coefficients.len() });
        }
        Ok(BinnedEfficiency { name: name.into(), boundaries, coefficients })
    }

    /// Coefficients named `{name}_bin_{i}`.
    pub fn from_values(name: impl Into<String>,
                       boundaries: Vec<f64>,
                       values: &[f64],
                       constant_coefficients: bool) -> Result<BinnedEfficiency, EfficiencyError> {
        let name = name.into();
        let coefficients = coefficient_parameters(&format!("{}_bin", name), values, constant_coefficients)?;
        BinnedEfficiency::new(name, boundaries, coefficients)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    pub fn coefficients(&self) -> &[Parameter] {
        &self.coefficients
    }

    fn height(&self, bin: usize) -> f64 {
        self.coefficients[bin].value()
    }

    pub fn max_value(&self) -> f64 {
        self.coefficients.iter()
            .map(|c| c.value().abs())
            .fold(0.0, f64::max)
    }
}

impl GaussModelEfficiency for BinnedEfficiency {
    fn evaluate(&self, x: f64) -> f64 {
        let last = self.coefficients.len() - 1;
        if x < self.boundaries[0] {
            return self.height(0);
        }
        if x > self.boundaries[last + 1] {
            return self.height(last);
        }
        self.height(locate_bin(&self.boundaries, x))
    }

    fn definite_integral(&self, lo: f64, hi: f64) -> Option<f64> {
        let first = self.boundaries[0];
        let last = self.boundaries[self.boundaries.len() - 1];
        if same_point(lo, first) && same_point(hi, last) {
            return Some(step_integral(&self.boundaries, |i| self.height(i), first, last));
        }
        log::warn!(
            "binned efficiency '{}' integrates analytically over [{}, {}] only, not [{}, {}]",
            self.name, first, last, lo, hi
        );
        None
    }

    fn convolution_integral(&self, umin: f64, umax: f64, scale: f64, offset: f64, z: Complex64) -> Complex64 {
        step_convolution(&self.boundaries, |i| self.height(i), true, umin, umax, scale, offset, z)
    }

    fn bin_boundaries(&self, lo: f64, hi: f64) -> Vec<f64> {
        boundaries_within(&self.boundaries, lo, hi)
    }
}
