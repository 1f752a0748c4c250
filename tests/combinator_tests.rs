use deferral::{AggregateError, EventLoop, Promise, PromiseState, SettledOutcome, Value};

fn delayed_resolve(event_loop: &EventLoop, delay_ms: u64, value: Value) -> Value {
    Value::Promise(Promise::new(event_loop, |resolve, _reject| {
        event_loop.schedule_timer(move || resolve.resolve(value), delay_ms);
        Ok(())
    }))
}

fn delayed_reject(event_loop: &EventLoop, delay_ms: u64, error: Value) -> Value {
    Value::Promise(Promise::new(event_loop, |_resolve, reject| {
        event_loop.schedule_timer(move || reject.reject(error), delay_ms);
        Ok(())
    }))
}

#[test]
fn all_preserves_input_order_regardless_of_arrival_order() {
    let event_loop = EventLoop::new();
    let promise = Promise::all(
        &event_loop,
        vec![
            delayed_resolve(&event_loop, 50, Value::from("slow")),
            delayed_resolve(&event_loop, 5, Value::from("fast")),
            Value::from(3i64),
        ],
    );

    event_loop.run_until_idle();
    assert_eq!(
        promise.state(),
        PromiseState::Fulfilled(Value::List(vec![
            Value::from("slow"),
            Value::from("fast"),
            Value::from(3i64),
        ]))
    );
}

#[test]
fn all_mixes_promises_and_plain_values() {
    let event_loop = EventLoop::new();
    let promise = Promise::all(
        &event_loop,
        vec![
            Value::Promise(Promise::resolved(&event_loop, 1i64)),
            Value::Promise(Promise::resolved(&event_loop, 2i64)),
            Value::from(3i64),
        ],
    );

    event_loop.run_until_idle();
    assert_eq!(
        promise.state(),
        PromiseState::Fulfilled(Value::List(vec![
            Value::from(1i64),
            Value::from(2i64),
            Value::from(3i64),
        ]))
    );
}

#[test]
fn all_rejects_with_the_first_error_observed() {
    let event_loop = EventLoop::new();
    let promise = Promise::all(
        &event_loop,
        vec![
            delayed_reject(&event_loop, 50, Value::from("late")),
            delayed_reject(&event_loop, 5, Value::from("early")),
        ],
    );

    event_loop.run_until_idle();
    assert_eq!(promise.state(), PromiseState::Rejected(Value::from("early")));
}

#[test]
fn all_with_an_immediate_rejection() {
    let event_loop = EventLoop::new();
    let promise = Promise::all(
        &event_loop,
        vec![
            Value::Promise(Promise::resolved(&event_loop, 1i64)),
            Value::Promise(Promise::rejected(&event_loop, "x")),
        ],
    );

    event_loop.run_until_idle();
    assert_eq!(promise.state(), PromiseState::Rejected(Value::from("x")));
}

#[test]
fn all_of_nothing_fulfills_with_an_empty_list() {
    let event_loop = EventLoop::new();
    let promise = Promise::all(&event_loop, Vec::new());

    event_loop.run_until_idle();
    assert_eq!(promise.state(), PromiseState::Fulfilled(Value::List(Vec::new())));
}

#[test]
fn all_settled_reports_every_outcome_and_never_rejects() {
    let event_loop = EventLoop::new();
    let promise = Promise::all_settled(
        &event_loop,
        vec![
            Value::Promise(Promise::resolved(&event_loop, 1i64)),
            Value::Promise(Promise::rejected(&event_loop, "x")),
        ],
    );

    event_loop.run_until_idle();
    assert_eq!(
        promise.state(),
        PromiseState::Fulfilled(Value::List(vec![
            Value::Outcome(Box::new(SettledOutcome::fulfilled(Value::from(1i64)))),
            Value::Outcome(Box::new(SettledOutcome::rejected(Value::from("x")))),
        ]))
    );
}

#[test]
fn all_settled_aligns_records_to_input_order() {
    let event_loop = EventLoop::new();
    let promise = Promise::all_settled(
        &event_loop,
        vec![
            delayed_reject(&event_loop, 50, Value::from("late")),
            delayed_resolve(&event_loop, 5, Value::from("fast")),
        ],
    );

    event_loop.run_until_idle();
    assert_eq!(
        promise.state(),
        PromiseState::Fulfilled(Value::List(vec![
            Value::Outcome(Box::new(SettledOutcome::rejected(Value::from("late")))),
            Value::Outcome(Box::new(SettledOutcome::fulfilled(Value::from("fast")))),
        ]))
    );
}

#[test]
fn all_settled_of_nothing_fulfills_with_an_empty_list() {
    let event_loop = EventLoop::new();
    let promise = Promise::all_settled(&event_loop, Vec::new());

    event_loop.run_until_idle();
    assert_eq!(promise.state(), PromiseState::Fulfilled(Value::List(Vec::new())));
}

#[test]
fn race_settles_with_the_fastest_input() {
    let event_loop = EventLoop::new();
    let promise = Promise::race(
        &event_loop,
        vec![
            delayed_resolve(&event_loop, 50, Value::from("slow")),
            delayed_resolve(&event_loop, 5, Value::from("fast")),
        ],
    );

    event_loop.run_until_idle();
    assert_eq!(promise.state(), PromiseState::Fulfilled(Value::from("fast")));
}

#[test]
fn race_can_be_won_by_a_rejection() {
    let event_loop = EventLoop::new();
    let promise = Promise::race(
        &event_loop,
        vec![
            delayed_resolve(&event_loop, 50, Value::from("slow")),
            delayed_reject(&event_loop, 5, Value::from("lost")),
        ],
    );

    event_loop.run_until_idle();
    assert_eq!(promise.state(), PromiseState::Rejected(Value::from("lost")));
}

#[test]
fn race_treats_a_plain_value_as_already_fulfilled() {
    let event_loop = EventLoop::new();
    let promise = Promise::race(
        &event_loop,
        vec![
            Value::from(3i64),
            delayed_resolve(&event_loop, 5, Value::from("timer")),
        ],
    );

    event_loop.run_until_idle();
    assert_eq!(promise.state(), PromiseState::Fulfilled(Value::from(3i64)));
}

#[test]
fn any_fulfills_with_the_first_fulfillment() {
    let event_loop = EventLoop::new();
    let promise = Promise::any(
        &event_loop,
        vec![
            Value::Promise(Promise::rejected(&event_loop, "a")),
            Value::Promise(Promise::resolved(&event_loop, 2i64)),
        ],
    );

    event_loop.run_until_idle();
    assert_eq!(promise.state(), PromiseState::Fulfilled(Value::from(2i64)));
}

#[test]
fn any_aggregates_all_rejections_in_input_order_when_settled_same_turn() {
    let event_loop = EventLoop::new();
    let promise = Promise::any(
        &event_loop,
        vec![
            Value::Promise(Promise::rejected(&event_loop, "a")),
            Value::Promise(Promise::rejected(&event_loop, "b")),
        ],
    );

    event_loop.run_until_idle();
    assert_eq!(
        promise.state(),
        PromiseState::Rejected(Value::Aggregate(AggregateError::new(vec![
            Value::from("a"),
            Value::from("b"),
        ])))
    );
}

#[test]
fn any_aggregates_rejections_in_observation_order() {
    let event_loop = EventLoop::new();
    let promise = Promise::any(
        &event_loop,
        vec![
            delayed_reject(&event_loop, 50, Value::from("slow")),
            delayed_reject(&event_loop, 5, Value::from("fast")),
        ],
    );

    event_loop.run_until_idle();
    assert_eq!(
        promise.state(),
        PromiseState::Rejected(Value::Aggregate(AggregateError::new(vec![
            Value::from("fast"),
            Value::from("slow"),
        ])))
    );
}

#[test]
fn any_of_nothing_rejects_with_an_empty_aggregate() {
    let event_loop = EventLoop::new();
    let promise = Promise::any(&event_loop, Vec::new());

    event_loop.run_until_idle();
    assert_eq!(
        promise.state(),
        PromiseState::Rejected(Value::Aggregate(AggregateError::new(Vec::new())))
    );
}

#[test]
fn race_of_nothing_stays_pending() {
    let event_loop = EventLoop::new();
    let promise = Promise::race(&event_loop, Vec::new());

    event_loop.run_until_idle();
    assert_eq!(promise.state(), PromiseState::Pending);
}
