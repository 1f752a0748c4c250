use crate::value::Value;

/// Settlement state. Monotonic: once a promise leaves `Pending` the variant
/// and its payload never change again.
#[derive(Debug, Clone, PartialEq)]
pub enum PromiseState {
    Pending,
    Fulfilled(Value),
    Rejected(Value),
}
