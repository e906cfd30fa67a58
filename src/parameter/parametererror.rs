use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    #[error("parameter '{name}' has an empty range [{min}, {max}]")]
    InvalidRange {
        name: String,
        min: f64,
        max: f64
    },
    #[error("value {value} of parameter '{name}' lies outside [{min}, {max}]")]
    OutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64
    },
    #[error("parameter '{0}' is constant")]
    Constant(String)
}
