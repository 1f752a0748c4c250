use miette::Diagnostic;
use thiserror::Error;

use crate::value::Value;

/// Failure payload produced when every branch of an `any` combinator
/// rejects. Reasons are kept in the order the rejections were observed.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
#[error("all promises were rejected ({} reasons)", .errors.len())]
#[diagnostic(help("inspect the individual rejection reasons in `errors`"))]
pub struct AggregateError {
    pub errors: Vec<Value>,
}

impl AggregateError {
    pub fn new(errors: Vec<Value>) -> Self {
        Self { errors }
    }
}
