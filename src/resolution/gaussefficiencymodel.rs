use std::f64::consts::{
    PI,
    SQRT_2
};

use num_complex::Complex64;
use rand::Rng;
use rand_distr::{
    Distribution,
    Normal
};

use crate::efficiency::efficiency::{
    Efficiency,
    GaussModelEfficiency
};
use crate::math::gaussconvolution::faddeeva::gauss_decay_kernel;
use crate::parameter::parameter::Parameter;
use crate::resolution::acceptancegenerator::DEFAULT_MAX_ATTEMPTS;
use crate::resolution::decaybasis::DecayBasis;
use crate::resolution::generationerror::GenerationError;

/// How a basis maps onto the complex kernel.
enum KernelForm {
    /// Bare Gaussian: no decay to smear.
    Gaussian,
    /// Identically zero.
    Vanishing,
    Real(Complex64),
    Imaginary(Complex64),
    Hyperbolic {
        z: Complex64,
        y: f64,
        sign: f64
    }
}

/// Gaussian time resolution multiplied by an efficiency ε(t).
///
/// With `scale = σ·s_σ·√2`, `offset = μ·s_μ` and `u = (t - offset)/scale`,
/// a basis `exp(-t/τ)·g(ωt)` is smeared by evaluating
/// `exp(-u²) w(i(z - u))` at `z = (scale/2)(1/τ - iω)`.
#[derive(Clone, Debug)]
pub struct GaussEfficiencyModel {
    name: String,
    efficiency: Efficiency,
    mean: Parameter,
    sigma: Parameter,
    mean_scale_factor: Parameter,
    sigma_scale_factor: Parameter
}

impl GaussEfficiencyModel {
    pub fn new(name: impl Into<String>,
               efficiency: Efficiency,
               mean: Parameter,
               sigma: Parameter) -> GaussEfficiencyModel {
        let name = name.into();
        let mean_scale_factor = Parameter::constant(format!("{}_mean_scale_factor", name), 1.0);
        let sigma_scale_factor = Parameter::constant(format!("{}_sigma_scale_factor", name), 1.0);
        GaussEfficiencyModel::with_scale_factors(name, efficiency, mean, sigma, mean_scale_factor, sigma_scale_factor)
    }

    pub fn with_scale_factors(name: impl Into<String>,
                              efficiency: Efficiency,
                              mean: Parameter,
                              sigma: Parameter,
                              mean_scale_factor: Parameter,
                              sigma_scale_factor: Parameter) -> GaussEfficiencyModel {
        GaussEfficiencyModel {
            name: name.into(),
            efficiency,
            mean,
            sigma,
            mean_scale_factor,
            sigma_scale_factor
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn efficiency(&self) -> &Efficiency {
        &self.efficiency
    }

    pub fn mean(&self) -> &Parameter {
        &self.mean
    }

    pub fn sigma(&self) -> &Parameter {
        &self.sigma
    }

    /// Resolution width `σ·s_σ`.
    pub fn width(&self) -> f64 {
        self.sigma.value() * self.sigma_scale_factor.value()
    }

    pub fn scale(&self) -> f64 {
        self.width() * SQRT_2
    }

    pub fn offset(&self) -> f64 {
        self.mean.value() * self.mean_scale_factor.value()
    }

    fn kernel_form(&self, basis: &DecayBasis, scale: f64) -> KernelForm {
        let basis = basis.normalized();
        let tau = match basis.tau() {
            None => return KernelForm::Gaussian,
            Some(tau) => tau
        };
        if tau == 0.0 {
            return match basis {
                DecayBasis::Exp { .. } | DecayBasis::Cos { .. } => KernelForm::Gaussian,
                _ => KernelForm::Vanishing
            };
        }
        let z = |omega: f64| Complex64::new(1.0 / tau, -omega) * (0.5 * scale);
        match basis {
            DecayBasis::Exp { .. } => KernelForm::Real(z(0.0)),
            DecayBasis::Cos { omega, .. } => KernelForm::Real(z(omega)),
            DecayBasis::Sin { omega, .. } if omega == 0.0 => KernelForm::Vanishing,
            DecayBasis::Sin { omega, .. } => KernelForm::Imaginary(z(omega)),
            DecayBasis::Cosh { delta_gamma, .. } => KernelForm::Hyperbolic { z: z(0.0), y: 0.25 * scale * delta_gamma, sign: 1.0 },
            DecayBasis::Sinh { delta_gamma, .. } => KernelForm::Hyperbolic { z: z(0.0), y: 0.25 * scale * delta_gamma, sign: -1.0 },
            DecayBasis::NoBasis => KernelForm::Gaussian
        }
    }

    /// Resolution-smeared basis times the efficiency, at `t`.
    pub fn evaluate(&self, t: f64, basis: &DecayBasis) -> f64 {
        let scale = self.scale();
        let u = (t - self.offset()) / scale;
        let efficiency = self.efficiency.evaluate(t);
        if efficiency.is_nan() {
            log::error!("resolution model '{}': efficiency is NaN at t = {}", self.name, t);
        }
        let smeared = match self.kernel_form(basis, scale) {
            KernelForm::Gaussian => return efficiency * (-u * u).exp() / (scale * PI.sqrt()),
            KernelForm::Vanishing => return 0.0,
            KernelForm::Real(z) => gauss_decay_kernel(u, z).re,
            KernelForm::Imaginary(z) => gauss_decay_kernel(u, z).im,
            KernelForm::Hyperbolic { z, y, sign } => {
                0.5 * (gauss_decay_kernel(u, z - y).re + sign * gauss_decay_kernel(u, z + y).re)
            }
        };
        if smeared.is_nan() {
            log::error!("resolution model '{}': smeared {:?} is NaN at t = {}", self.name, basis, t);
        }
        efficiency * smeared
    }

    /// `∫_{tmin}^{tmax} evaluate(t) dt` in closed form.
    ///
    /// `None` for the bare Gaussian forms, whose integral would need the
    /// efficiency integrated against a Gaussian.
    pub fn analytical_integral(&self, tmin: f64, tmax: f64, basis: &DecayBasis) -> Option<f64> {
        let scale = self.scale();
        let offset = self.offset();
        let umin = (tmin - offset) / scale;
        let umax = (tmax - offset) / scale;
        let convolve = |z: Complex64| self.efficiency.convolution_integral(umin, umax, scale, offset, z);
        let result = match self.kernel_form(basis, scale) {
            KernelForm::Gaussian => {
                log::warn!("resolution model '{}': no analytical integral for {:?}", self.name, basis);
                return None;
            },
            KernelForm::Vanishing => return Some(0.0),
            KernelForm::Real(z) => convolve(z).re,
            KernelForm::Imaginary(z) => convolve(z).im,
            KernelForm::Hyperbolic { z, y, sign } => 0.5 * (convolve(z - y).re + sign * convolve(z + y).re)
        };
        if result.is_nan() {
            log::error!("resolution model '{}': integral of {:?} over [{}, {}] is NaN", self.name, basis, tmin, tmax);
        }
        Some(scale * result)
    }

    /// Draws from the resolution Gaussian alone, redrawing until the value
    /// falls strictly inside `(tmin, tmax)`.
    pub fn generate_resolution<R>(&self, rng: &mut R, tmin: f64, tmax: f64) -> Result<f64, GenerationError>
        where R: Rng + ?Sized {
        if !(tmin.is_finite() && tmax.is_finite() && tmin < tmax) {
            return Err(GenerationError::InvalidRange { tmin, tmax });
        }
        let width = self.width();
        if !(width.is_finite() && width > 0.0) {
            return Err(GenerationError::InvalidWidth(width));
        }
        let gaussian = Normal::new(self.offset(), width)
            .map_err(|_| GenerationError::InvalidWidth(width))?;
        for _ in 0..DEFAULT_MAX_ATTEMPTS {
            let t = gaussian.sample(rng);
            if t > tmin && t < tmax {
                return Ok(t);
            }
        }
        log::warn!("resolution model '{}': no draw inside [{}, {}]", self.name, tmin, tmax);
        Err(GenerationError::AttemptsExhausted { attempts: DEFAULT_MAX_ATTEMPTS })
    }
}
