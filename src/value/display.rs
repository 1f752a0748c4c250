use super::Value;
use crate::promise::PromiseState;
use std::fmt;

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            Value::String(s) => write!(f, "{s}"),
            Value::List(items) => {
                let rendered: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
            Value::Outcome(outcome) => {
                write!(
                    f,
                    "{{ status: {}, value: {} }}",
                    outcome.status, outcome.value
                )
            }
            Value::Aggregate(aggregate) => {
                let reasons: Vec<String> =
                    aggregate.errors.iter().map(|v| v.to_string()).collect();
                write!(f, "AggregateError [{}]", reasons.join(", "))
            }
            Value::Promise(promise) => match promise.state() {
                PromiseState::Pending => write!(f, "Promise {{ <pending> }}"),
                PromiseState::Fulfilled(value) => {
                    write!(f, "Promise {{ <fulfilled>: {value} }}")
                }
                PromiseState::Rejected(value) => {
                    write!(f, "Promise {{ <rejected>: {value} }}")
                }
            },
        }
    }
}
