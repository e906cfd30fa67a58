use num_complex::Complex64;

use crate::efficiency::binnedefficiency::BinnedEfficiency;
use crate::efficiency::cubicsplineefficiency::CubicSplineEfficiency;
use crate::efficiency::efficiencyerror::EfficiencyError;
use crate::efficiency::thresholdefficiency::ThresholdEfficiency;
use crate::parameter::parameter::Parameter;

/// What a Gaussian resolution model needs from an efficiency ε(t).
pub trait GaussModelEfficiency {
    fn evaluate(&self, x: f64) -> f64;

    /// `∫_lo^hi ε(x) dx`, or `None` when no closed form covers the range.
    fn definite_integral(&self, lo: f64, hi: f64) -> Option<f64>;

    /// `∫_{umin}^{umax} ε(scale·u + offset) exp(-u²) w(i(z - u)) du`.
    fn convolution_integral(&self, umin: f64, umax: f64, scale: f64, offset: f64, z: Complex64) -> Complex64;

    /// Points in `[lo, hi]` where ε changes its functional form.
    fn bin_boundaries(&self, lo: f64, hi: f64) -> Vec<f64>;
}

#[derive(Clone, Debug)]
pub enum Efficiency {
    CubicSpline(CubicSplineEfficiency),
    Binned(BinnedEfficiency),
    Threshold(ThresholdEfficiency)
}

impl Efficiency {
    pub fn name(&self) -> &str {
        match self {
            Efficiency::CubicSpline(efficiency) => efficiency.name(),
            Efficiency::Binned(efficiency) => efficiency.name(),
            Efficiency::Threshold(efficiency) => efficiency.name()
        }
    }

    pub fn parameters(&self) -> &[Parameter] {
        match self {
            Efficiency::CubicSpline(efficiency) => efficiency.coefficients(),
            Efficiency::Binned(efficiency) => efficiency.coefficients(),
            Efficiency::Threshold(efficiency) => efficiency.coefficients()
        }
    }

    /// Upper bound of ε over its support.
    pub fn max_value(&self) -> f64 {
        match self {
            Efficiency::CubicSpline(efficiency) => efficiency.max_value(),
            Efficiency::Binned(efficiency) => efficiency.max_value(),
            Efficiency::Threshold(efficiency) => efficiency.max_value()
        }
    }
}

impl GaussModelEfficiency for Efficiency {
    fn evaluate(&self, x: f64) -> f64 {
        match self {
            Efficiency::CubicSpline(efficiency) => efficiency.evaluate(x),
            Efficiency::Binned(efficiency) => efficiency.evaluate(x),
            Efficiency::Threshold(efficiency) => efficiency.evaluate(x)
        }
    }

    fn definite_integral(&self, lo: f64, hi: f64) -> Option<f64> {
        match self {
            Efficiency::CubicSpline(efficiency) => efficiency.definite_integral(lo, hi),
            Efficiency::Binned(efficiency) => efficiency.definite_integral(lo, hi),
            Efficiency::Threshold(efficiency) => efficiency.definite_integral(lo, hi)
        }
    }

    fn convolution_integral(&self, umin: f64, umax: f64, scale: f64, offset: f64, z: Complex64) -> Complex64 {
        match self {
            Efficiency::CubicSpline(efficiency) => efficiency.convolution_integral(umin, umax, scale, offset, z),
            Efficiency::Binned(efficiency) => efficiency.convolution_integral(umin, umax, scale, offset, z),
            Efficiency::Threshold(efficiency) => efficiency.convolution_integral(umin, umax, scale, offset, z)
        }
    }

    fn bin_boundaries(&self, lo: f64, hi: f64) -> Vec<f64> {
        match self {
            Efficiency::CubicSpline(efficiency) => efficiency.bin_boundaries(lo, hi),
            Efficiency::Binned(efficiency) => efficiency.bin_boundaries(lo, hi),
            Efficiency::Threshold(efficiency) => efficiency.bin_boundaries(lo, hi)
        }
    }
}

impl From<CubicSplineEfficiency> for Efficiency {
    fn from(efficiency: CubicSplineEfficiency) -> Self {
        Efficiency::CubicSpline(efficiency)
    }
}

impl From<BinnedEfficiency> for Efficiency {
    fn from(efficiency: BinnedEfficiency) -> Self {
        Efficiency::Binned(efficiency)
    }
}

impl From<ThresholdEfficiency> for Efficiency {
    fn from(efficiency: ThresholdEfficiency) -> Self {
        Efficiency::Threshold(efficiency)
    }
}

/// Relative slack allowed when a requested range is compared with the
/// support of an efficiency.
pub(crate) const RANGE_TOLERANCE: f64 = 1e-10;

pub(crate) fn same_point(a: f64, b: f64) -> bool {
    (a - b).abs() <= RANGE_TOLERANCE * a.abs().max(b.abs()).max(1.0)
}

/// Builds one parameter per value, named `{prefix}_{i}`.
///
/// Floating parameters get the range `[0, 1]`, widened (with a warning) to
/// include a value that falls outside it.
pub(crate) fn coefficient_parameters(prefix: &str,
                                     values: &[f64],
                                     constant: bool) -> Result<Vec<Parameter>, EfficiencyError> {
    values.iter()
        .enumerate()
        .map(|(i, value)| {
            let name = format!("{}_{}", prefix, i);
            if constant {
                return Ok(Parameter::constant(name, *value));
            }
            let (min, max) = (value.min(0.0), value.max(1.0));
            if min < 0.0 || max > 1.0 {
                log::warn!("initial value {} of '{}' lies outside [0, 1]; range widened to [{}, {}]", value, name, min, max);
            }
            Ok(Parameter::floating(name, *value, min, max)?)
        })
        .collect()
}
