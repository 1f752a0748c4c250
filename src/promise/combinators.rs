use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use super::{Promise, Resolver};
use crate::errors::AggregateError;
use crate::event_loop::EventLoop;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleStatus {
    Fulfilled,
    Rejected,
}

impl fmt::Display for SettleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettleStatus::Fulfilled => write!(f, "fulfilled"),
            SettleStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// One entry of an `all_settled` result list.
#[derive(Debug, Clone, PartialEq)]
pub struct SettledOutcome {
    pub status: SettleStatus,
    pub value: Value,
}

impl SettledOutcome {
    pub fn fulfilled(value: Value) -> Self {
        Self {
            status: SettleStatus::Fulfilled,
            value,
        }
    }

    pub fn rejected(error: Value) -> Self {
        Self {
            status: SettleStatus::Rejected,
            value: error,
        }
    }
}

/// Non-promise inputs count as already fulfilled at the subscription site.
fn adopt(event_loop: &EventLoop, input: Value) -> Promise {
    match input {
        Value::Promise(promise) => promise,
        other => Promise::resolved(event_loop, other),
    }
}

fn finish_slot(
    slots: &Rc<RefCell<Vec<Option<Value>>>>,
    remaining: &Rc<Cell<usize>>,
    resolve: &Resolver,
    index: usize,
    value: Value,
) {
    slots.borrow_mut()[index] = Some(value);
    remaining.set(remaining.get() - 1);
    if remaining.get() == 0 {
        let values: Vec<Value> = slots
            .borrow_mut()
            .drain(..)
            .map(|slot| slot.unwrap_or(Value::Undefined))
            .collect();
        resolve.resolve(Value::List(values));
    }
}

impl Promise {
    /// Fulfill with every input's result in input order, or reject with the
    /// first rejection observed. An empty input fulfills immediately with an
    /// empty list.
    pub fn all(event_loop: &EventLoop, inputs: Vec<Value>) -> Promise {
        Promise::new(event_loop, move |resolve, reject| {
            if inputs.is_empty() {
                resolve.resolve(Value::List(Vec::new()));
                return Ok(());
            }
            let slots = Rc::new(RefCell::new(vec![None::<Value>; inputs.len()]));
            let remaining = Rc::new(Cell::new(inputs.len()));
            for (index, input) in inputs.into_iter().enumerate() {
                let slots = slots.clone();
                let remaining = remaining.clone();
                let resolve = resolve.clone();
                let reject = reject.clone();
                adopt(event_loop, input).then(
                    move |value| {
                        finish_slot(&slots, &remaining, &resolve, index, value);
                        Ok(Value::Undefined)
                    },
                    move |error| {
                        reject.reject(error);
                        Ok(Value::Undefined)
                    },
                );
            }
            Ok(())
        })
    }

    /// Always fulfills, with one outcome record per input in input order,
    /// once every input has settled either way.
    pub fn all_settled(event_loop: &EventLoop, inputs: Vec<Value>) -> Promise {
        Promise::new(event_loop, move |resolve, _reject| {
            if inputs.is_empty() {
                resolve.resolve(Value::List(Vec::new()));
                return Ok(());
            }
            let slots = Rc::new(RefCell::new(vec![None::<Value>; inputs.len()]));
            let remaining = Rc::new(Cell::new(inputs.len()));
            for (index, input) in inputs.into_iter().enumerate() {
                let fulfil_slots = slots.clone();
                let fulfil_remaining = remaining.clone();
                let fulfil_resolve = resolve.clone();
                let reject_slots = slots.clone();
                let reject_remaining = remaining.clone();
                let reject_resolve = resolve.clone();
                adopt(event_loop, input).then(
                    move |value| {
                        finish_slot(
                            &fulfil_slots,
                            &fulfil_remaining,
                            &fulfil_resolve,
                            index,
                            Value::Outcome(Box::new(SettledOutcome::fulfilled(value))),
                        );
                        Ok(Value::Undefined)
                    },
                    move |error| {
                        finish_slot(
                            &reject_slots,
                            &reject_remaining,
                            &reject_resolve,
                            index,
                            Value::Outcome(Box::new(SettledOutcome::rejected(error))),
                        );
                        Ok(Value::Undefined)
                    },
                );
            }
            Ok(())
        })
    }

    /// Settle with whichever input settles first; the rest are ignored. An
    /// empty input never settles.
    pub fn race(event_loop: &EventLoop, inputs: Vec<Value>) -> Promise {
        Promise::new(event_loop, move |resolve, reject| {
            for input in inputs {
                let resolve = resolve.clone();
                let reject = reject.clone();
                adopt(event_loop, input).then(
                    move |value| {
                        resolve.resolve(value);
                        Ok(Value::Undefined)
                    },
                    move |error| {
                        reject.reject(error);
                        Ok(Value::Undefined)
                    },
                );
            }
            Ok(())
        })
    }

    /// Fulfill with the first input to fulfill. If every input rejects, the
    /// result rejects with an aggregate of all reasons in observation order.
    /// An empty input rejects immediately with an empty aggregate.
    pub fn any(event_loop: &EventLoop, inputs: Vec<Value>) -> Promise {
        Promise::new(event_loop, move |resolve, reject| {
            if inputs.is_empty() {
                reject.reject(Value::Aggregate(AggregateError::new(Vec::new())));
                return Ok(());
            }
            let total = inputs.len();
            let errors = Rc::new(RefCell::new(Vec::with_capacity(total)));
            for input in inputs {
                let resolve = resolve.clone();
                let reject = reject.clone();
                let errors = errors.clone();
                adopt(event_loop, input).then(
                    move |value| {
                        resolve.resolve(value);
                        Ok(Value::Undefined)
                    },
                    move |error| {
                        let mut seen = errors.borrow_mut();
                        seen.push(error);
                        if seen.len() == total {
                            let aggregate = AggregateError::new(seen.clone());
                            drop(seen);
                            reject.reject(Value::Aggregate(aggregate));
                        }
                        Ok(Value::Undefined)
                    },
                );
            }
            Ok(())
        })
    }
}
