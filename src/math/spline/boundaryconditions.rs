use serde::{
    Deserialize,
    Serialize
};

/// Constraint imposed on the spline at one end of the knot vector.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum BoundaryCondition {
    SecondDerivative(f64),
    FirstDerivative(f64)
}

impl Default for BoundaryCondition {
    fn default() -> Self {
        BoundaryCondition::SecondDerivative(0.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundaryConditions {
    #[serde(default)]
    pub left: BoundaryCondition,
    #[serde(default)]
    pub right: BoundaryCondition
}

impl BoundaryConditions {
    pub fn new(left: BoundaryCondition, right: BoundaryCondition) -> BoundaryConditions {
        BoundaryConditions { left, right }
    }

    /// Zero curvature at both ends.
    pub fn natural() -> BoundaryConditions {
        BoundaryConditions::default()
    }

    pub fn clamped(left_slope: f64, right_slope: f64) -> BoundaryConditions {
        BoundaryConditions::new(
            BoundaryCondition::FirstDerivative(left_slope),
            BoundaryCondition::FirstDerivative(right_slope)
        )
    }
}
