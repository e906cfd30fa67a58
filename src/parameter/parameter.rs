use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::parameter::parametererror::ParameterError;

#[derive(Clone, Debug, PartialEq)]
struct ParameterState {
    name: String,
    value: f64,
    min: f64,
    max: f64,
    constant: bool
}

/// Shared handle to a named real-valued quantity.
///
/// Clones refer to the same underlying value, so an optimizer holding one
/// clone can move a coefficient that a spline reads through another.
#[derive(Clone)]
pub struct Parameter {
    state: Arc<RwLock<ParameterState>>
}

impl Parameter {
    pub fn constant(name: impl Into<String>, value: f64) -> Parameter {
        Parameter::from_state(ParameterState {
            name: name.into(),
            value,
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
            constant: true
        })
    }

    pub fn floating(name: impl Into<String>, value: f64, min: f64, max: f64) -> Result<Parameter, ParameterError> {
        let name = name.into();
        if !(min < max) {
            return Err(ParameterError::InvalidRange { name, min, max });
        }
        if !(min..=max).contains(&value) {
            return Err(ParameterError::OutOfRange { name, value, min, max });
        }
        Ok(Parameter::from_state(ParameterState { name, value, min, max, constant: false }))
    }

    fn from_state(state: ParameterState) -> Parameter {
        Parameter { state: Arc::new(RwLock::new(state)) }
    }

    pub fn name(&self) -> String {
        self.state.read().name.clone()
    }

    pub fn value(&self) -> f64 {
        self.state.read().value
    }

    pub fn range(&self) -> (f64, f64) {
        let state = self.state.read();
        (state.min, state.max)
    }

    pub fn is_constant(&self) -> bool {
        self.state.read().constant
    }

    pub fn set_constant(&self, constant: bool) {
        self.state.write().constant = constant;
    }

    pub fn set_value(&self, value: f64) -> Result<(), ParameterError> {
        let mut state = self.state.write();
        if state.constant {
            return Err(ParameterError::Constant(state.name.clone()));
        }
        if !(state.min..=state.max).contains(&value) {
            return Err(ParameterError::OutOfRange {
                name: state.name.clone(),
                value,
                min: state.min,
                max: state.max
            });
        }
        state.value = value;
        Ok(())
    }

    pub fn shares_state_with(&self, other: &Parameter) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("Parameter")
            .field("name", &state.name)
            .field("value", &state.value)
            .field("constant", &state.constant)
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_value() {
        let p = Parameter::floating("eps", 0.4, 0.0, 1.0).unwrap();
        let q = p.clone();
        q.set_value(0.7).unwrap();
        assert_eq!(p.value(), 0.7);
        assert!(p.shares_state_with(&q));
    }

    #[test]
    fn constant_parameters_refuse_updates() {
        let p = Parameter::constant("c", 1.5);
        assert_eq!(p.set_value(2.0), Err(ParameterError::Constant("c".to_string())));
        p.set_constant(false);
        p.set_value(2.0).unwrap();
        assert_eq!(p.value(), 2.0);
    }

    #[test]
    fn range_is_enforced() {
        assert!(matches!(Parameter::floating("x", 2.0, 0.0, 1.0), Err(ParameterError::OutOfRange { .. })));
        assert!(matches!(Parameter::floating("x", 0.0, 1.0, 1.0), Err(ParameterError::InvalidRange { .. })));
        let p = Parameter::floating("x", 0.5, 0.0, 1.0).unwrap();
        assert!(p.set_value(-0.1).is_err());
        assert_eq!(p.range(), (0.0, 1.0));
    }
}
