use serde::{
    Deserialize,
    Serialize
};

/// Time dependence `f(t)` that the resolution model smears.
///
/// `tau` is the lifetime, `omega` an oscillation frequency and
/// `delta_gamma` a width difference entering as `cosh/sinh(ΔΓ t / 2)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "basis_type")]
pub enum DecayBasis {
    NoBasis,
    Exp {
        tau: f64
    },
    Sin {
        tau: f64,
        omega: f64
    },
    Cos {
        tau: f64,
        omega: f64
    },
    Sinh {
        tau: f64,
        delta_gamma: f64
    },
    Cosh {
        tau: f64,
        delta_gamma: f64
    }
}

impl DecayBasis {
    /// `Cosh` without a width difference is a plain exponential.
    pub fn normalized(self) -> DecayBasis {
        match self {
            DecayBasis::Cosh { tau, delta_gamma } if delta_gamma == 0.0 => DecayBasis::Exp { tau },
            basis => basis
        }
    }

    pub fn tau(&self) -> Option<f64> {
        match *self {
            DecayBasis::NoBasis => None,
            DecayBasis::Exp { tau }
            | DecayBasis::Sin { tau, .. }
            | DecayBasis::Cos { tau, .. }
            | DecayBasis::Sinh { tau, .. }
            | DecayBasis::Cosh { tau, .. } => Some(tau)
        }
    }

    /// Unsmeared value at `t`.
    pub fn value(&self, t: f64) -> f64 {
        let decay = |tau: f64| (-t / tau).exp();
        match *self {
            DecayBasis::NoBasis => 1.0,
            DecayBasis::Exp { tau } => decay(tau),
            DecayBasis::Sin { tau, omega } => decay(tau) * (omega * t).sin(),
            DecayBasis::Cos { tau, omega } => decay(tau) * (omega * t).cos(),
            DecayBasis::Sinh { tau, delta_gamma } => decay(tau) * (0.5 * delta_gamma * t).sinh(),
            DecayBasis::Cosh { tau, delta_gamma } => decay(tau) * (0.5 * delta_gamma * t).cosh()
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn parses_tagged_json() {
        let basis: DecayBasis = serde_json::from_str(r#"{"basis_type": "Cos", "tau": 1.5, "omega": 17.8}"#).unwrap();
        assert_eq!(basis, DecayBasis::Cos { tau: 1.5, omega: 17.8 });
        let basis: DecayBasis = serde_json::from_str(r#"{"basis_type": "NoBasis"}"#).unwrap();
        assert_eq!(basis, DecayBasis::NoBasis);
    }

    #[test]
    fn flat_cosh_is_exponential() {
        let basis = DecayBasis::Cosh { tau: 1.5, delta_gamma: 0.0 }.normalized();
        assert_eq!(basis, DecayBasis::Exp { tau: 1.5 });
        let basis = DecayBasis::Sinh { tau: 1.5, delta_gamma: 0.0 }.normalized();
        assert_eq!(basis, DecayBasis::Sinh { tau: 1.5, delta_gamma: 0.0 });
    }

    #[test]
    fn values() {
        assert_relative_eq!(DecayBasis::Exp { tau: 2.0 }.value(1.0), (-0.5f64).exp());
        assert_relative_eq!(
            DecayBasis::Sinh { tau: 2.0, delta_gamma: 0.2 }.value(1.0),
            (-0.5f64).exp() * 0.1f64.sinh()
        );
        assert_eq!(DecayBasis::NoBasis.tau(), None);
    }
}
