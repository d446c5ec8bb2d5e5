use std::collections::VecDeque;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use evts::Task;
use parking_lot::{Condvar, Mutex};
use thiserror::Error;

use crate::TaskClass;
use crate::panic::panic_message;

/// Task submission error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
	/// The queue was closed before the task arrived.
	#[error("task queue '{0}' is closed")]
	Closed(String),
}

/// Outcome of one drain pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
	/// Tasks taken off the queue and run, including ones that panicked.
	pub executed: usize,
	/// Tasks that panicked while running.
	pub panicked: usize,
	/// Tasks still queued when the pass ended.
	pub pending: usize,
	/// Whether the pass ended because a stop was requested.
	pub stopped: bool,
}

struct QueueState {
	tasks: VecDeque<Task>,
	closed: bool,
	stop_requested: bool,
}

struct QueueInner {
	name: String,
	class: TaskClass,
	state: Mutex<QueueState>,
	available: Condvar,
}

/// Unbounded FIFO of tasks drained by a single owning thread.
///
/// Any thread may submit; submission pushes and wakes the drainer without
/// waiting for the task to run. Tasks run in submission order on whichever
/// thread calls [`Self::run_until_stopped`] or [`Self::drain`].
///
/// A task that panics is caught, logged at `error` and counted in the
/// [`DrainReport`]; draining continues with the next task.
#[derive(Clone)]
pub struct TaskQueue {
	inner: Arc<QueueInner>,
}

impl std::fmt::Debug for TaskQueue {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TaskQueue")
			.field("name", &self.inner.name)
			.field("class", &self.inner.class)
			.field("pending", &self.len())
			.finish()
	}
}

impl TaskQueue {
	/// Creates an empty, open queue.
	pub fn new(name: impl Into<String>, class: TaskClass) -> Self {
		Self {
			inner: Arc::new(QueueInner {
				name: name.into(),
				class,
				state: Mutex::new(QueueState {
					tasks: VecDeque::new(),
					closed: false,
					stop_requested: false,
				}),
				available: Condvar::new(),
			}),
		}
	}

	/// Returns the queue name.
	pub fn name(&self) -> &str {
		&self.inner.name
	}

	/// Returns the queue's task class.
	pub fn class(&self) -> TaskClass {
		self.inner.class
	}

	/// Enqueues `task` and wakes the drainer.
	pub fn submit(&self, task: Task) -> Result<(), SubmitError> {
		let mut state = self.inner.state.lock();
		if state.closed {
			return Err(SubmitError::Closed(self.inner.name.clone()));
		}
		state.tasks.push_back(task);
		let pending = state.tasks.len();
		drop(state);
		self.inner.available.notify_one();
		tracing::trace!(queue = %self.inner.name, worker_class = self.inner.class.as_str(), pending, "worker.queue.submit");
		Ok(())
	}

	/// Pops the oldest task without waiting.
	pub fn try_recv(&self) -> Option<Task> {
		self.inner.state.lock().tasks.pop_front()
	}

	/// Waits for the next task.
	///
	/// Returns `None` once a stop is requested, or once the queue is closed
	/// and empty. Observing a stop request consumes it.
	pub fn recv(&self) -> Option<Task> {
		let mut state = self.inner.state.lock();
		loop {
			if state.stop_requested {
				state.stop_requested = false;
				return None;
			}
			if let Some(task) = state.tasks.pop_front() {
				return Some(task);
			}
			if state.closed {
				return None;
			}
			self.inner.available.wait(&mut state);
		}
	}

	/// Returns the number of queued tasks.
	pub fn len(&self) -> usize {
		self.inner.state.lock().tasks.len()
	}

	/// Returns `true` if no task is queued.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Rejects further submissions. Queued tasks can still be drained.
	pub fn close(&self) {
		self.inner.state.lock().closed = true;
		self.inner.available.notify_all();
		tracing::debug!(queue = %self.inner.name, "worker.queue.close");
	}

	/// Returns `true` once [`Self::close`] has been called.
	pub fn is_closed(&self) -> bool {
		self.inner.state.lock().closed
	}

	/// Returns a handle that ends [`Self::run_until_stopped`] from any thread.
	pub fn stop_signal(&self) -> StopSignal {
		StopSignal {
			inner: Arc::clone(&self.inner),
		}
	}

	/// Runs tasks on the calling thread until a stop is requested or the
	/// queue is closed and empty.
	///
	/// A stop requested by a running task takes effect once that task
	/// returns; tasks queued behind it stay queued.
	pub fn run_until_stopped(&self) -> DrainReport {
		tracing::debug!(queue = %self.inner.name, "worker.queue.run");
		let mut report = DrainReport::default();
		loop {
			let mut state = self.inner.state.lock();
			if state.stop_requested {
				state.stop_requested = false;
				report.stopped = true;
				break;
			}
			let Some(task) = state.tasks.pop_front() else {
				if state.closed {
					break;
				}
				self.inner.available.wait(&mut state);
				continue;
			};
			drop(state);
			self.run_task(task, &mut report);
		}
		report.pending = self.len();
		tracing::debug!(queue = %self.inner.name, executed = report.executed, panicked = report.panicked, pending = report.pending, "worker.queue.stopped");
		report
	}

	/// Runs every task queued at the time of the call, without waiting.
	///
	/// Tasks submitted while draining are left for the next pass.
	pub fn drain(&self) -> DrainReport {
		let batch: Vec<Task> = self.inner.state.lock().tasks.drain(..).collect();
		let mut report = DrainReport::default();
		for task in batch {
			self.run_task(task, &mut report);
		}
		report.pending = self.len();
		report
	}

	fn run_task(&self, task: Task, report: &mut DrainReport) {
		report.executed += 1;
		if let Err(payload) = catch_unwind(AssertUnwindSafe(task)) {
			report.panicked += 1;
			let msg = panic_message(&*payload).unwrap_or_else(|| "<unknown panic>".to_string());
			tracing::error!(queue = %self.inner.name, panic = %msg, "worker.queue.task_panicked");
		}
	}
}

/// Cloneable request to stop the loop draining a [`TaskQueue`].
#[derive(Clone)]
pub struct StopSignal {
	inner: Arc<QueueInner>,
}

impl std::fmt::Debug for StopSignal {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("StopSignal").field("queue", &self.inner.name).finish()
	}
}

impl StopSignal {
	/// Requests a stop and wakes the drainer.
	pub fn stop(&self) {
		self.inner.state.lock().stop_requested = true;
		self.inner.available.notify_all();
		tracing::trace!(queue = %self.inner.name, "worker.queue.stop_requested");
	}

	/// Returns `true` while a stop is requested but not yet observed.
	pub fn is_pending(&self) -> bool {
		self.inner.state.lock().stop_requested
	}
}
