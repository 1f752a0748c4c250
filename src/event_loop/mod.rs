mod microtask_queue;
mod task_queue;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::promise::{Promise, PromiseReaction, PromiseState};
use crate::value::Value;

pub use microtask_queue::MicrotaskQueue;
pub use task_queue::{TaskQueue, TimerTask};

pub enum Microtask {
    /// A deferred settlement write. Whether it still applies is checked when
    /// the task runs, so the first scheduled write wins.
    Settle {
        promise: Promise,
        is_reject: bool,
        value: Value,
    },
    /// A continuation registered against an already-settled promise.
    Reaction {
        reaction: PromiseReaction,
        is_reject: bool,
        value: Value,
    },
    /// A bare deferred callback.
    Callback(Box<dyn FnOnce()>),
}

struct LoopState {
    now_ms: u64,
    next_timer_id: u64,
    realtime: bool,
    runtime: Option<tokio::runtime::Runtime>,
    microtasks: MicrotaskQueue,
    tasks: TaskQueue,
}

/// Cheap-clone handle to a single-threaded cooperative scheduler. Every
/// promise created against a handle shares its queues, and all deferred
/// callbacks run in FIFO order when the loop is driven.
#[derive(Clone)]
pub struct EventLoop {
    state: Rc<RefCell<LoopState>>,
}

impl EventLoop {
    pub fn new() -> Self {
        Self::new_with_realtime(false)
    }

    pub fn new_with_realtime(realtime: bool) -> Self {
        let runtime = if realtime {
            tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .ok()
        } else {
            None
        };

        Self {
            state: Rc::new(RefCell::new(LoopState {
                now_ms: 0,
                next_timer_id: 1,
                realtime,
                runtime,
                microtasks: MicrotaskQueue::default(),
                tasks: TaskQueue::default(),
            })),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.state.borrow().now_ms
    }

    pub fn enqueue_microtask(&self, task: Microtask) {
        self.state.borrow_mut().microtasks.enqueue(task);
    }

    /// Defer a bare callback to the microtask queue.
    pub fn queue_microtask<F>(&self, callback: F)
    where
        F: FnOnce() + 'static,
    {
        self.enqueue_microtask(Microtask::Callback(Box::new(callback)));
    }

    pub fn schedule_timer<F>(&self, callback: F, delay_ms: u64) -> u64
    where
        F: FnOnce() + 'static,
    {
        let mut state = self.state.borrow_mut();
        let id = state.next_timer_id;
        state.next_timer_id += 1;
        let task = TimerTask {
            id,
            due_at: state.now_ms.saturating_add(delay_ms),
            callback: Box::new(callback),
            active: true,
        };
        state.tasks.add(task);
        id
    }

    pub fn clear_timer(&self, id: u64) {
        self.state.borrow_mut().tasks.clear(id);
    }

    pub fn has_microtasks(&self) -> bool {
        !self.state.borrow().microtasks.is_empty()
    }

    pub fn has_tasks(&self) -> bool {
        !self.state.borrow().tasks.is_empty()
    }

    /// Drive both queues until nothing remains scheduled.
    pub fn run_until_idle(&self) {
        while self.has_pending() {
            self.drain_microtasks();
            if self.has_tasks() {
                self.advance_to_next_task();
                if let Some(task) = self.pop_ready_task() {
                    if task.active {
                        (task.callback)();
                    }
                }
            }
        }
    }

    /// Drive the loop until the given promise settles or nothing remains
    /// scheduled, and report its state.
    pub fn run_until_settled(&self, promise: &Promise) -> PromiseState {
        while promise.is_pending() && self.has_pending() {
            self.drain_microtasks();
            if promise.is_pending() && self.has_tasks() {
                self.advance_to_next_task();
                if let Some(task) = self.pop_ready_task() {
                    if task.active {
                        (task.callback)();
                    }
                }
            }
        }
        promise.state()
    }

    fn has_pending(&self) -> bool {
        self.has_microtasks() || self.has_tasks()
    }

    fn drain_microtasks(&self) {
        while let Some(task) = self.pop_microtask() {
            match task {
                Microtask::Settle {
                    promise,
                    is_reject,
                    value,
                } => promise.complete(is_reject, value),
                Microtask::Reaction {
                    reaction,
                    is_reject,
                    value,
                } => reaction.run(is_reject, value),
                Microtask::Callback(callback) => callback(),
            }
        }
    }

    fn pop_microtask(&self) -> Option<Microtask> {
        self.state.borrow_mut().microtasks.pop()
    }

    fn advance_to_next_task(&self) {
        let next_due = self.state.borrow().tasks.next_due_time();
        if let Some(next_due) = next_due {
            let (now_ms, realtime) = {
                let state = self.state.borrow();
                (state.now_ms, state.realtime)
            };
            if realtime && next_due > now_ms {
                let sleep_for = Duration::from_millis(next_due - now_ms);
                let state = self.state.borrow();
                if let Some(runtime) = &state.runtime {
                    runtime.block_on(async {
                        tokio::time::sleep(sleep_for).await;
                    });
                } else {
                    std::thread::sleep(sleep_for);
                }
            }
            self.state.borrow_mut().now_ms = next_due;
        }
    }

    fn pop_ready_task(&self) -> Option<TimerTask> {
        let mut state = self.state.borrow_mut();
        let idx = state.tasks.next_ready_index(state.now_ms)?;
        Some(state.tasks.take(idx))
    }
}
