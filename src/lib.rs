pub mod errors;
pub mod event_loop;
pub mod promise;
pub mod value;

pub use errors::{AggregateError, DeferralError, ValueError};
pub use event_loop::EventLoop;
pub use promise::{Promise, PromiseState, Rejector, Resolver, SettleStatus, SettledOutcome};
pub use value::Value;

/// Convenience function to run a single executor-driven promise to
/// settlement on a fresh realtime event loop.
pub fn run<E>(executor: E) -> PromiseState
where
    E: FnOnce(Resolver, Rejector) -> Result<(), Value>,
{
    let event_loop = EventLoop::new_with_realtime(true);
    let promise = Promise::new(&event_loop, executor);
    event_loop.run_until_settled(&promise)
}
