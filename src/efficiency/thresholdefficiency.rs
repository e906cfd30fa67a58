use num_complex::Complex64;

use crate::efficiency::efficiency::GaussModelEfficiency;
use crate::efficiency::efficiencyerror::EfficiencyError;
use crate::efficiency::piecewiseconstant::{
    boundaries_within,
    locate_bin,
    step_convolution,
    step_integral
};
use crate::parameter::parameter::Parameter;

/// Step function on `[low, high]` built up from the left.
///
/// Each threshold closes a bin whose parameter is the fraction of the total
/// area in that bin. The bin above the last threshold holds the rest,
/// `1 - Σ fractions`, read afresh on every call.
#[derive(Clone, Debug)]
pub struct ThresholdEfficiency {
    name: String,
    boundaries: Vec<f64>,
    fractions: Vec<Parameter>
}

impl ThresholdEfficiency {
    pub fn new(name: impl Into<String>, low: f64, high: f64) -> Result<ThresholdEfficiency, EfficiencyError> {
        if !(low.is_finite() && high.is_finite() && low < high) {
            return Err(EfficiencyError::InvalidRange { low, high });
        }
        Ok(ThresholdEfficiency { name: name.into(), boundaries: vec![low, high], fractions: Vec::new() })
    }

    /// Closes the open bin at `upper_limit`, giving it area `fraction`.
    pub fn add_threshold(&mut self, upper_limit: f64, fraction: Parameter) -> Result<(), EfficiencyError> {
        let (low, high) = self.range();
        if !(upper_limit > low && upper_limit < high) {
            return Err(EfficiencyError::ThresholdOutsideRange { limit: upper_limit, low, high });
        }
        let previous = self.boundaries[self.boundaries.len() - 2];
        if !(upper_limit > previous) {
            return Err(EfficiencyError::ThresholdOutOfOrder { limit: upper_limit, previous });
        }
        self.boundaries.insert(self.boundaries.len() - 1, upper_limit);
        self.fractions.push(fraction);
        log::debug!("threshold efficiency '{}' now has {} bins", self.name, self.bin_count());
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn range(&self) -> (f64, f64) {
        (self.boundaries[0], self.boundaries[self.boundaries.len() - 1])
    }

    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    pub fn bin_count(&self) -> usize {
        self.boundaries.len() - 1
    }

    /// The fractions of every bin except the last.
    pub fn coefficients(&self) -> &[Parameter] {
        &self.fractions
    }

    pub fn last_bin_fraction(&self) -> f64 {
        1.0 - self.fractions.iter().map(Parameter::value).sum::<f64>()
    }

    fn fraction(&self, bin: usize) -> f64 {
        match self.fractions.get(bin) {
            Some(fraction) => fraction.value(),
            None => self.last_bin_fraction()
        }
    }

    fn density(&self, bin: usize) -> f64 {
        self.fraction(bin) / (self.boundaries[bin + 1] - self.boundaries[bin])
    }

    pub fn max_value(&self) -> f64 {
        (0..self.bin_count())
            .map(|bin| self.density(bin).abs())
            .fold(0.0, f64::max)
    }
}

impl GaussModelEfficiency for ThresholdEfficiency {
    fn evaluate(&self, x: f64) -> f64 {
        let (low, high) = self.range();
        if x < low || x > high {
            return 0.0;
        }
        self.density(locate_bin(&self.boundaries, x))
    }

    fn definite_integral(&self, lo: f64, hi: f64) -> Option<f64> {
        let last = self.last_bin_fraction();
        let density = |bin: usize| {
            let fraction = self.fractions.get(bin).map_or(last, Parameter::value);
            fraction / (self.boundaries[bin + 1] - self.boundaries[bin])
        };
        Some(step_integral(&self.boundaries, density, lo, hi))
    }

    fn convolution_integral(&self, umin: f64, umax: f64, scale: f64, offset: f64, z: Complex64) -> Complex64 {
        step_convolution(&self.boundaries, |bin| self.density(bin), false, umin, umax, scale, offset, z)
    }

    fn bin_boundaries(&self, lo: f64, hi: f64) -> Vec<f64> {
        boundaries_within(&self.boundaries, lo, hi)
    }
}
