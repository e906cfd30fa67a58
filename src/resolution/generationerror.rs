use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    #[error("generation range [{tmin}, {tmax}] is empty or not finite")]
    InvalidRange {
        tmin: f64,
        tmax: f64
    },
    #[error("resolution width must be positive and finite, got {0}")]
    InvalidWidth(f64),
    #[error("efficiency maximum must be positive and finite, got {0}")]
    InvalidMaximum(f64),
    #[error("no event accepted after {attempts} attempts")]
    AttemptsExhausted {
        attempts: usize
    }
}
