mod aggregate_error;
mod value_error;

pub use aggregate_error::AggregateError;
pub use value_error::ValueError;

use miette::Diagnostic;
use thiserror::Error;

/// Unified error type wrapping all deferral errors.
#[derive(Debug, Error, Diagnostic)]
pub enum DeferralError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Aggregate(#[from] AggregateError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Value(#[from] ValueError),
}
