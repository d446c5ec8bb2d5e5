//! Thread-bound execution contexts.

use evts::Task;

use crate::TaskQueue;

/// Declares a zero-sized execution context backed by a process-wide
/// [`TaskQueue`](crate::TaskQueue).
///
/// The generated type implements [`evts::ExecutionContext`], so it can be
/// targeted with [`evts::ThreadDispatcher`]. Whichever thread calls
/// `Context::queue().run_until_stopped()` becomes that context's thread.
///
/// ```
/// evts_worker::execution_context! {
/// 	/// Render thread.
/// 	pub RenderThread => "render", evts_worker::TaskClass::Interactive
/// }
///
/// let mut event = evts::Event::new("frame");
/// event.add_handler(|| {});
/// event.invoke_with::<evts::ThreadDispatcher<RenderThread>>();
/// assert_eq!(RenderThread::queue().len(), 1);
/// ```
#[macro_export]
macro_rules! execution_context {
	($(#[$meta:meta])* $vis:vis $name:ident => $label:literal, $class:expr) => {
		$(#[$meta])*
		#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
		$vis struct $name;

		impl $name {
			/// Returns the queue backing this context.
			pub fn queue() -> &'static $crate::TaskQueue {
				static QUEUE: ::std::sync::LazyLock<$crate::TaskQueue> = ::std::sync::LazyLock::new(|| $crate::TaskQueue::new($label, $class));
				&QUEUE
			}
		}

		impl $crate::evts::ExecutionContext for $name {
			const NAME: &'static str = $label;

			fn submit(task: $crate::evts::Task) {
				$crate::context::submit_or_drop(Self::queue(), task);
			}
		}
	};
}

/// Submits `task`, dropping it with a warning if the queue is closed.
#[doc(hidden)]
pub fn submit_or_drop(queue: &TaskQueue, task: Task) {
	if let Err(err) = queue.submit(task) {
		tracing::warn!(error = %err, "worker.context.dropped_task");
	}
}

crate::execution_context! {
	/// Context drained by the process's main thread.
	pub MainThread => "main", crate::TaskClass::Interactive
}
