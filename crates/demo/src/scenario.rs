//! Runner/main-thread handoff.
//!
//! The calling thread becomes the main thread: it drains [`MainThread`]
//! while a runner thread registers handlers and invokes the event.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, ThreadId};

use anyhow::{Context, anyhow};
use evts::{Event, ExecutionContext, ThreadDispatcher};
use evts_worker::{DrainReport, MainThread, StopSignal, TaskClass, panic_message, spawn_named_thread};
use tracing::{debug, info};

use crate::config::DemoConfig;

/// What ran where.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
	/// Completed invocations observed on the runner thread.
	pub inline: usize,
	/// Completed invocations observed on the main thread.
	pub on_main: usize,
	/// Main-thread drain report.
	pub report: DrainReport,
}

#[derive(Default)]
struct Tally {
	inline: AtomicUsize,
	on_main: AtomicUsize,
}

fn build_event(name: &str, main_id: ThreadId, tally: &Arc<Tally>) -> Event {
	let tally = Arc::clone(tally);
	let mut event = Event::new(name);
	event
		.add_handler(|| println!("event triggered"))
		.also(|| println!("second handler"))
		.also(move || {
			let counter = if thread::current().id() == main_id { &tally.on_main } else { &tally.inline };
			counter.fetch_add(1, Ordering::SeqCst);
		});
	event
}

/// Queues a stop for the main thread when dropped, including during unwind.
struct StopOnDrop(StopSignal);

impl Drop for StopOnDrop {
	fn drop(&mut self) {
		let stop = self.0.clone();
		// FIFO: the stop lands behind every handler submitted before it.
		MainThread::submit(Box::new(move || stop.stop()));
	}
}

/// Runs the scenario, blocking the calling thread until the runner is done
/// and every deferred handler has executed.
pub fn run(config: &DemoConfig) -> anyhow::Result<Summary> {
	run_with(config, build_event)
}

fn run_with<B>(config: &DemoConfig, build: B) -> anyhow::Result<Summary>
where
	B: FnOnce(&str, ThreadId, &Arc<Tally>) -> Event + Send + 'static,
{
	let main_id = thread::current().id();
	let tally = Arc::new(Tally::default());
	let stop = MainThread::queue().stop_signal();

	let runner = {
		let config = config.clone();
		let tally = Arc::clone(&tally);
		spawn_named_thread(TaskClass::Background, "evts-runner", move || {
			let _stop = StopOnDrop(stop);
			let event = build(&config.event_name, main_id, &tally);
			for round in 0..config.rounds {
				if config.dispatch.inline() {
					event.invoke();
				}
				if config.dispatch.deferred() {
					event.invoke_with::<ThreadDispatcher<MainThread>>();
				}
				debug!(round, event = event.name(), "runner.round");
			}
		})
		.context("failed to spawn runner thread")?
	};

	let report = MainThread::queue().run_until_stopped();
	runner.join().map_err(|payload| {
		let msg = panic_message(&*payload).unwrap_or_else(|| "<unknown panic>".to_string());
		anyhow!("runner thread panicked: {msg}")
	})?;

	let summary = Summary {
		inline: tally.inline.load(Ordering::SeqCst),
		on_main: tally.on_main.load(Ordering::SeqCst),
		report,
	};
	info!(inline = summary.inline, on_main = summary.on_main, executed = report.executed, "scenario.done");
	Ok(summary)
}
