use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::event::Executor;

/// One-shot unit of work accepted by an [`ExecutionContext`].
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Task-submission capability of an execution context.
///
/// Implementors enqueue `task` for later execution on the context's own
/// thread and wake that thread if it is idle. Queue capacity, wake-up and
/// draining are the implementor's business, as is what happens when a task
/// panics.
pub trait ExecutionContext: 'static {
	/// Name used in trace output.
	const NAME: &'static str;

	/// Enqueues `task` on this context.
	fn submit(task: Task);
}

/// Strategy deciding which execution context runs a handler body.
///
/// Dispatchers are stateless and chosen per [`Event::invoke_with`] call.
///
/// [`Event::invoke_with`]: crate::Event::invoke_with
pub trait Dispatcher: 'static {
	/// Name used in trace output.
	const NAME: &'static str;

	/// Runs or schedules `executor`.
	fn dispatch(executor: &Executor);
}

/// Runs each body synchronously on the invoking thread.
///
/// Panics raised by a body unwind straight out of `invoke`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImmediateDispatcher;

/// Dispatcher used by [`Event::invoke`](crate::Event::invoke).
pub type DefaultDispatcher = ImmediateDispatcher;

impl Dispatcher for ImmediateDispatcher {
	const NAME: &'static str = "immediate";

	#[inline]
	fn dispatch(executor: &Executor) {
		executor();
	}
}

/// Forwards each body to the execution context `C`.
///
/// `dispatch` returns once the body has been submitted; it may run at any
/// later point on whichever thread drains `C`.
pub struct ThreadDispatcher<C: ExecutionContext> {
	_context: PhantomData<fn() -> C>,
}

impl<C: ExecutionContext> fmt::Debug for ThreadDispatcher<C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ThreadDispatcher").field("context", &C::NAME).finish()
	}
}

impl<C: ExecutionContext> Dispatcher for ThreadDispatcher<C> {
	const NAME: &'static str = C::NAME;

	fn dispatch(executor: &Executor) {
		let executor = Arc::clone(executor);
		tracing::trace!(context = C::NAME, "evts.dispatch.submit");
		C::submit(Box::new(move || executor()));
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Mutex;
	use std::sync::atomic::{AtomicUsize, Ordering};

	use super::*;

	#[test]
	fn immediate_runs_inline() {
		let hits = Arc::new(AtomicUsize::new(0));
		let counter = Arc::clone(&hits);
		let executor: Executor = Arc::new(move || {
			counter.fetch_add(1, Ordering::SeqCst);
		});

		ImmediateDispatcher::dispatch(&executor);
		ImmediateDispatcher::dispatch(&executor);

		assert_eq!(hits.load(Ordering::SeqCst), 2);
	}

	#[test]
	fn thread_dispatcher_defers_until_context_runs_task() {
		static PENDING: Mutex<Vec<Task>> = Mutex::new(Vec::new());

		struct Deferred;

		impl ExecutionContext for Deferred {
			const NAME: &'static str = "deferred";

			fn submit(task: Task) {
				PENDING.lock().unwrap().push(task);
			}
		}

		let hits = Arc::new(AtomicUsize::new(0));
		let counter = Arc::clone(&hits);
		let executor: Executor = Arc::new(move || {
			counter.fetch_add(1, Ordering::SeqCst);
		});

		ThreadDispatcher::<Deferred>::dispatch(&executor);
		assert_eq!(hits.load(Ordering::SeqCst), 0);

		let tasks: Vec<Task> = PENDING.lock().unwrap().drain(..).collect();
		assert_eq!(tasks.len(), 1);
		for task in tasks {
			task();
		}
		assert_eq!(hits.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn dispatcher_names_follow_context() {
		struct Named;

		impl ExecutionContext for Named {
			const NAME: &'static str = "named";

			fn submit(_task: Task) {}
		}

		assert_eq!(ImmediateDispatcher::NAME, "immediate");
		assert_eq!(<ThreadDispatcher<Named> as Dispatcher>::NAME, "named");
		assert_eq!(format!("{:?}", ThreadDispatcher::<Named> { _context: PhantomData }), "ThreadDispatcher { context: \"named\" }");
	}
}
