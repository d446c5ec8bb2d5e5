//! Event handler registry with pluggable dispatch.
//!
//! An [`Event`] owns an ordered list of zero-argument handlers. Invoking the
//! event hands every handler, in registration order, to a [`Dispatcher`]
//! which decides where the body runs:
//!
//! * [`ImmediateDispatcher`] runs it inline on the invoking thread.
//! * [`ThreadDispatcher`] submits it to an [`ExecutionContext`], typically a
//!   task queue drained by another thread.
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicBool, Ordering};
//!
//! let done = Arc::new(AtomicBool::new(false));
//! let flag = Arc::clone(&done);
//!
//! let mut event = evts::Event::new("startup");
//! event
//! 	.add_handler(|| println!("A"))
//! 	.also(|| println!("B"))
//! 	.also(move || flag.store(true, Ordering::SeqCst));
//!
//! event.invoke();
//! assert!(done.load(Ordering::SeqCst));
//! ```
//!
//! # Threading
//!
//! An event is not internally synchronized. Registration needs `&mut Event`
//! and invocation `&Event`, so one owner (or an external lock) serializes
//! access. Cross-thread safety lives entirely in the execution context the
//! [`ThreadDispatcher`] targets.

/// Dispatch strategies and the execution-context capability.
pub mod dispatch;
/// Event and handler registration.
pub mod event;

pub use dispatch::{DefaultDispatcher, Dispatcher, ExecutionContext, ImmediateDispatcher, Task, ThreadDispatcher};
pub use event::{Event, Executor, Handler, HandlerRef};
