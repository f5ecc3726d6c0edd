//! Error types for the solver pipeline.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("constraints are not feasible")]
    Infeasible,

    #[error("cannot step backwards by {step}: multiplier is not invertible modulo {modulus}")]
    UnsupportedStep { step: i64, modulus: u64 },
}

pub type Result<T> = std::result::Result<T, SolveError>;
