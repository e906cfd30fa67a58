use rand::Rng;
use rand_distr::{
    Distribution,
    Normal
};

use crate::efficiency::efficiency::GaussModelEfficiency;
use crate::resolution::gaussefficiencymodel::GaussEfficiencyModel;
use crate::resolution::generationerror::GenerationError;

pub const DEFAULT_MAX_ATTEMPTS: usize = 1_000_000;

/// Hit-or-miss generation of observed decay times.
///
/// A true decay time drawn from the caller's distribution is smeared by the
/// model's Gaussian resolution, kept if it falls inside `(tmin, tmax)`, and
/// then accepted with probability `ε(t) / max ε`.
pub struct AcceptanceGenerator<'a> {
    model: &'a GaussEfficiencyModel,
    tmin: f64,
    tmax: f64,
    max_efficiency: f64,
    resolution: Normal<f64>,
    max_attempts: usize
}

impl<'a> AcceptanceGenerator<'a> {
    pub fn new(model: &'a GaussEfficiencyModel, tmin: f64, tmax: f64) -> Result<AcceptanceGenerator<'a>, GenerationError> {
        if !(tmin.is_finite() && tmax.is_finite() && tmin < tmax) {
            return Err(GenerationError::InvalidRange { tmin, tmax });
        }
        let max_efficiency = model.efficiency().max_value();
        if !(max_efficiency.is_finite() && max_efficiency > 0.0) {
            return Err(GenerationError::InvalidMaximum(max_efficiency));
        }
        let width = model.width();
        if !(width.is_finite() && width > 0.0) {
            return Err(GenerationError::InvalidWidth(width));
        }
        let resolution = Normal::new(model.offset(), width)
            .map_err(|_| GenerationError::InvalidWidth(width))?;
        log::debug!(
            "generator for '{}' on [{}, {}] with efficiency maximum {}",
            model.name(), tmin, tmax, max_efficiency
        );
        Ok(AcceptanceGenerator {
            model,
            tmin,
            tmax,
            max_efficiency,
            resolution,
            max_attempts: DEFAULT_MAX_ATTEMPTS
        })
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> AcceptanceGenerator<'a> {
        self.max_attempts = max_attempts;
        self
    }

    pub fn max_efficiency(&self) -> f64 {
        self.max_efficiency
    }

    pub fn generate<R, D>(&self, rng: &mut R, decay_time: &D) -> Result<f64, GenerationError>
        where R: Rng + ?Sized,
              D: Distribution<f64> {
        for _ in 0..self.max_attempts {
            let t = decay_time.sample(rng) + self.resolution.sample(rng);
            if !(t > self.tmin && t < self.tmax) {
                continue;
            }
            let efficiency = self.model.efficiency().evaluate(t);
            if efficiency > self.max_efficiency {
                log::error!(
                    "efficiency '{}' is {} at t = {}, above its maximum {}",
                    self.model.efficiency().name(), efficiency, t, self.max_efficiency
                );
                continue;
            }
            if efficiency > rng.r#gen::<f64>() * self.max_efficiency {
                return Ok(t);
            }
        }
        log::warn!("'{}': no event accepted in {} attempts", self.model.name(), self.max_attempts);
        Err(GenerationError::AttemptsExhausted { attempts: self.max_attempts })
    }

    pub fn generate_n<R, D>(&self, rng: &mut R, decay_time: &D, n: usize) -> Result<Vec<f64>, GenerationError>
        where R: Rng + ?Sized,
              D: Distribution<f64> {
        (0..n).map(|_| self.generate(rng, decay_time)).collect()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::distributions::Uniform;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::efficiency::binnedefficiency::BinnedEfficiency;
    use crate::efficiency::efficiency::Efficiency;
    use crate::parameter::parameter::Parameter;

    fn model(boundaries: Vec<f64>, coefficients: &[f64], sigma: f64) -> GaussEfficiencyModel {
        let efficiency: Efficiency = BinnedEfficiency::from_values("steps", boundaries, coefficients, true).unwrap().into();
        GaussEfficiencyModel::new(
            "res",
            efficiency,
            Parameter::constant("mean", 0.0),
            Parameter::constant("sigma", sigma)
        )
    }

    #[test]
    fn accepted_times_follow_the_efficiency() {
        let model = model(vec![0.0, 1.0, 2.0, 3.0], &[0.2, 0.6, 1.0], 1e-4);
        let generator = AcceptanceGenerator::new(&model, 0.0, 3.0).unwrap();
        assert_eq!(generator.max_efficiency(), 1.0);

        let mut rng = StdRng::seed_from_u64(20_240_917);
        let flat = Uniform::new(0.0_f64, 3.0);
        let events = generator.generate_n(&mut rng, &flat, 20_000).unwrap();
        assert!(events.iter().all(|&t| t > 0.0 && t < 3.0));

        let total = events.len() as f64;
        let fraction = |lo: f64, hi: f64| events.iter().filter(|&&t| t >= lo && t < hi).count() as f64 / total;
        assert_abs_diff_eq!(fraction(0.0, 1.0), 0.2 / 1.8, epsilon = 0.02);
        assert_abs_diff_eq!(fraction(1.0, 2.0), 0.6 / 1.8, epsilon = 0.02);
        assert_abs_diff_eq!(fraction(2.0, 3.0), 1.0 / 1.8, epsilon = 0.02);
    }

    #[test]
    fn range_and_maximum_are_checked() {
        let model = model(vec![0.0, 1.0], &[0.5], 0.05);
        assert!(matches!(
            AcceptanceGenerator::new(&model, 2.0, 1.0),
            Err(GenerationError::InvalidRange { .. })
        ));
        assert!(matches!(
            AcceptanceGenerator::new(&model, 0.0, f64::INFINITY),
            Err(GenerationError::InvalidRange { .. })
        ));

        let empty = self::model(vec![0.0, 1.0], &[0.0], 0.05);
        assert_eq!(
            AcceptanceGenerator::new(&empty, 0.0, 1.0).err(),
            Some(GenerationError::InvalidMaximum(0.0))
        );
    }

    #[test]
    fn unreachable_acceptance_gives_up() {
        let model = model(vec![0.0, 1.0, 2.0], &[0.0, 1.0], 1e-4);
        let generator = AcceptanceGenerator::new(&model, 0.0, 0.5).unwrap().with_max_attempts(500);
        let mut rng = StdRng::seed_from_u64(7);
        let flat = Uniform::new(0.0_f64, 0.5);
        assert_eq!(
            generator.generate(&mut rng, &flat),
            Err(GenerationError::AttemptsExhausted { attempts: 500 })
        );
    }
}
