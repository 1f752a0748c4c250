mod combinators;
mod state;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::event_loop::{EventLoop, Microtask};
use crate::value::Value;

pub use combinators::{SettleStatus, SettledOutcome};
pub use state::PromiseState;

/// Continuation handler. `Err` is the failure path and feeds the derived
/// promise's rejection.
pub type Handler = Box<dyn FnOnce(Value) -> Result<Value, Value>>;

pub struct PromiseReaction {
    pub(crate) on_fulfilled: Option<Handler>,
    pub(crate) on_rejected: Option<Handler>,
    pub(crate) next: Promise,
}

impl PromiseReaction {
    pub(crate) fn run(self, is_reject: bool, value: Value) {
        let handler = if is_reject {
            self.on_rejected
        } else {
            self.on_fulfilled
        };
        match handler {
            Some(handler) => invoke_and_settle(handler, value, &self.next),
            // No handler: pass the outcome through unchanged.
            None if is_reject => self.next.reject(value),
            None => self.next.resolve(value),
        }
    }
}

/// Shared trap for every continuation wrapper: a handler's return feeds
/// resolve, its failure feeds reject, so nothing escapes a chain link
/// synchronously.
fn invoke_and_settle(handler: Handler, input: Value, next: &Promise) {
    match handler(input) {
        Ok(value) => next.resolve(value),
        Err(error) => next.reject(error),
    }
}

struct PromiseCell {
    state: PromiseState,
    reactions: Vec<PromiseReaction>,
}

impl PromiseCell {
    fn pending() -> Self {
        Self {
            state: PromiseState::Pending,
            reactions: Vec::new(),
        }
    }
}

/// Container for the eventual single outcome of an asynchronous computation.
/// Cheap to clone; clones share the same settlement.
#[derive(Clone)]
pub struct Promise {
    cell: Rc<RefCell<PromiseCell>>,
    event_loop: EventLoop,
}

/// Fulfillment capability handed to an executor. Calls after the first
/// settlement write are no-ops.
#[derive(Clone)]
pub struct Resolver {
    promise: Promise,
}

impl Resolver {
    pub fn resolve(&self, value: impl Into<Value>) {
        self.promise.resolve(value.into());
    }
}

/// Rejection capability handed to an executor.
#[derive(Clone)]
pub struct Rejector {
    promise: Promise,
}

impl Rejector {
    pub fn reject(&self, error: impl Into<Value>) {
        self.promise.reject(error.into());
    }
}

impl Promise {
    /// Run `executor` synchronously with the resolve/reject capabilities for
    /// a fresh pending promise. An executor failure rejects the promise
    /// instead of propagating.
    pub fn new<E>(event_loop: &EventLoop, executor: E) -> Promise
    where
        E: FnOnce(Resolver, Rejector) -> Result<(), Value>,
    {
        let promise = Promise::pending(event_loop);
        let resolver = Resolver {
            promise: promise.clone(),
        };
        let rejector = Rejector {
            promise: promise.clone(),
        };
        if let Err(error) = executor(resolver, rejector) {
            promise.reject(error);
        }
        promise
    }

    pub fn resolved(event_loop: &EventLoop, value: impl Into<Value>) -> Promise {
        let value = value.into();
        Promise::new(event_loop, move |resolve, _reject| {
            resolve.resolve(value);
            Ok(())
        })
    }

    pub fn rejected(event_loop: &EventLoop, error: impl Into<Value>) -> Promise {
        let error = error.into();
        Promise::new(event_loop, move |_resolve, reject| {
            reject.reject(error);
            Ok(())
        })
    }

    fn pending(event_loop: &EventLoop) -> Promise {
        Promise {
            cell: Rc::new(RefCell::new(PromiseCell::pending())),
            event_loop: event_loop.clone(),
        }
    }

    pub fn state(&self) -> PromiseState {
        self.cell.borrow().state.clone()
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.cell.borrow().state, PromiseState::Pending)
    }

    pub fn event_loop(&self) -> &EventLoop {
        &self.event_loop
    }

    /// Identity comparison; `Value` equality for promises routes through
    /// this.
    pub fn ptr_eq(a: &Promise, b: &Promise) -> bool {
        Rc::ptr_eq(&a.cell, &b.cell)
    }

    /// Register continuations and return the derived promise. A settled
    /// source schedules the reaction as a new deferred task; it never runs
    /// inline with this call.
    pub fn then<F, G>(&self, on_fulfilled: F, on_rejected: G) -> Promise
    where
        F: FnOnce(Value) -> Result<Value, Value> + 'static,
        G: FnOnce(Value) -> Result<Value, Value> + 'static,
    {
        self.then_reaction(Some(Box::new(on_fulfilled)), Some(Box::new(on_rejected)))
    }

    pub fn catch<G>(&self, on_rejected: G) -> Promise
    where
        G: FnOnce(Value) -> Result<Value, Value> + 'static,
    {
        self.then_reaction(None, Some(Box::new(on_rejected)))
    }

    /// Run `on_finally` once the promise settles, on either path. The
    /// original value or error passes through unless the handler itself
    /// fails, which rejects the derived promise with that failure.
    pub fn finally<F>(&self, on_finally: F) -> Promise
    where
        F: Fn() -> Result<(), Value> + 'static,
    {
        let on_fulfilled = Rc::new(on_finally);
        let on_rejected = on_fulfilled.clone();
        self.then_reaction(
            Some(Box::new(move |value| (*on_fulfilled)().map(|_| value))),
            Some(Box::new(move |error| {
                (*on_rejected)()?;
                Err(error)
            })),
        )
    }

    fn then_reaction(
        &self,
        on_fulfilled: Option<Handler>,
        on_rejected: Option<Handler>,
    ) -> Promise {
        let next = Promise::pending(&self.event_loop);
        let reaction = PromiseReaction {
            on_fulfilled,
            on_rejected,
            next: next.clone(),
        };

        let settled = {
            let cell = self.cell.borrow();
            match &cell.state {
                PromiseState::Pending => None,
                PromiseState::Fulfilled(value) => Some((false, value.clone())),
                PromiseState::Rejected(value) => Some((true, value.clone())),
            }
        };

        if let Some((is_reject, value)) = settled {
            self.event_loop.enqueue_microtask(Microtask::Reaction {
                reaction,
                is_reject,
                value,
            });
        } else {
            self.cell.borrow_mut().reactions.push(reaction);
        }

        next
    }

    pub(crate) fn resolve(&self, value: Value) {
        if !self.is_pending() {
            return;
        }
        self.event_loop.enqueue_microtask(Microtask::Settle {
            promise: self.clone(),
            is_reject: false,
            value,
        });
    }

    pub(crate) fn reject(&self, error: Value) {
        if !self.is_pending() {
            return;
        }
        self.event_loop.enqueue_microtask(Microtask::Settle {
            promise: self.clone(),
            is_reject: true,
            value: error,
        });
    }

    /// Deferred settlement write. Both capabilities may have queued a write
    /// before either ran; the pending re-check here makes the first one win
    /// and every later write a no-op.
    pub(crate) fn complete(&self, is_reject: bool, value: Value) {
        let reactions = {
            let mut cell = self.cell.borrow_mut();
            if !matches!(cell.state, PromiseState::Pending) {
                return;
            }
            cell.state = if is_reject {
                PromiseState::Rejected(value.clone())
            } else {
                PromiseState::Fulfilled(value.clone())
            };
            std::mem::take(&mut cell.reactions)
        };

        for reaction in reactions {
            reaction.run(is_reject, value.clone());
        }
    }
}

impl fmt::Debug for Promise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cell.borrow().state {
            PromiseState::Pending => write!(f, "Promise {{ <pending> }}"),
            PromiseState::Fulfilled(value) => write!(f, "Promise {{ <fulfilled>: {value} }}"),
            PromiseState::Rejected(value) => write!(f, "Promise {{ <rejected>: {value} }}"),
        }
    }
}
