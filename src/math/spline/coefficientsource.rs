use crate::parameter::parameter::Parameter;

/// Read-only view of spline coefficients owned by the caller.
///
/// Values are fetched on every access; nothing derived from them is kept
/// between calls.
pub trait CoefficientSource {
    fn coefficient_count(&self) -> usize;

    fn coefficient(&self, i: usize) -> f64;
}

impl CoefficientSource for [f64] {
    fn coefficient_count(&self) -> usize {
        self.len()
    }

    fn coefficient(&self, i: usize) -> f64 {
        self[i]
    }
}

impl CoefficientSource for Vec<f64> {
    fn coefficient_count(&self) -> usize {
        self.len()
    }

    fn coefficient(&self, i: usize) -> f64 {
        self[i]
    }
}

impl CoefficientSource for [Parameter] {
    fn coefficient_count(&self) -> usize {
        self.len()
    }

    fn coefficient(&self, i: usize) -> f64 {
        self[i].value()
    }
}

impl CoefficientSource for Vec<Parameter> {
    fn coefficient_count(&self) -> usize {
        self.len()
    }

    fn coefficient(&self, i: usize) -> f64 {
        self[i].value()
    }
}
