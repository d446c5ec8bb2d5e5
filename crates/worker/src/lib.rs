//! Execution contexts for `evts` dispatch.
//!
//! A context is a [`TaskQueue`] owned by one draining thread. Other threads
//! submit boxed tasks; the owner runs them in submission order. Declare a
//! static context with [`execution_context!`] and target it with
//! [`evts::ThreadDispatcher`].
//!
//! # Failure semantics
//!
//! Tasks run under `catch_unwind`. A panicking task is logged at `error`,
//! counted in [`DrainReport::panicked`] and does not stop the drain loop.
//! Submitting to a closed context drops the task with a `warn`.

mod class;
pub mod context;
mod panic;
mod queue;
mod spawn;

pub use class::TaskClass;
pub use context::MainThread;
pub use evts;
pub use panic::panic_message;
pub use queue::{DrainReport, StopSignal, SubmitError, TaskQueue};
pub use spawn::spawn_named_thread;
