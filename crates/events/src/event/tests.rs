use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;
use crate::dispatch::{ExecutionContext, ImmediateDispatcher, Task, ThreadDispatcher};

fn recorder() -> Arc<Mutex<Vec<&'static str>>> {
	Arc::new(Mutex::new(Vec::new()))
}

fn push(log: &Arc<Mutex<Vec<&'static str>>>, label: &'static str) -> impl Fn() + Send + Sync + 'static {
	let log = Arc::clone(log);
	move || log.lock().unwrap().push(label)
}

#[test]
fn new_event_is_empty() {
	let event = Event::new("name");
	assert_eq!(event.name(), "name");
	assert!(event.is_empty());
	assert_eq!(event.len(), 0);
}

#[test]
fn invoke_without_handlers_is_noop() {
	let event = Event::new("empty");
	event.invoke();
	event.invoke_with::<ImmediateDispatcher>();
	assert!(event.is_empty());
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(7)]
fn invoke_runs_every_handler_in_order(#[case] count: usize) {
	let seen = Arc::new(Mutex::new(Vec::new()));
	let mut event = Event::new("ordered");
	for i in 0..count {
		let seen = Arc::clone(&seen);
		event.add_handler(move || seen.lock().unwrap().push(i));
	}

	event.invoke();

	assert_eq!(*seen.lock().unwrap(), (0..count).collect::<Vec<_>>());
}

#[test]
fn also_appends_to_same_event() {
	let log = recorder();
	let mut event = Event::new("chain");
	let handler = event.add_handler(push(&log, "first"));
	assert_eq!(handler.index(), 0);
	let handler = handler.also(push(&log, "second"));
	assert_eq!(handler.index(), 1);
	assert_eq!(handler.event_name(), "chain");

	event.add_handler(push(&log, "third"));
	assert_eq!(event.len(), 3);

	event.invoke();
	assert_eq!(*log.lock().unwrap(), ["first", "second", "third"]);
}

#[test]
fn also_matches_add_handler() {
	let chained = recorder();
	let mut via_also = Event::new("also");
	via_also
		.add_handler(push(&chained, "a"))
		.also(push(&chained, "b"))
		.also(push(&chained, "c"));

	let direct = recorder();
	let mut via_add = Event::new("add");
	via_add.add_handler(push(&direct, "a"));
	via_add.add_handler(push(&direct, "b"));
	via_add.add_handler(push(&direct, "c"));

	via_also.invoke();
	via_add.invoke();

	assert_eq!(via_also.len(), via_add.len());
	assert_eq!(*chained.lock().unwrap(), *direct.lock().unwrap());
}

#[test]
fn long_chain_stays_flat() {
	let log = recorder();
	let mut event = Event::new("flat");
	let mut handler = event.add_handler(push(&log, "root")).also(push(&log, "h0"));
	for label in ["h1", "h2", "h3", "h4"] {
		handler = handler.also(push(&log, label));
	}
	assert_eq!(handler.index(), 5);

	event.add_handler(push(&log, "tail"));
	event.invoke();

	assert_eq!(*log.lock().unwrap(), ["root", "h0", "h1", "h2", "h3", "h4", "tail"]);
}

#[test]
fn duplicates_run_once_per_registration() {
	let log = recorder();
	let body = push(&log, "dup");
	let body = Arc::new(body);
	let mut event = Event::new("dup");
	for _ in 0..3 {
		let body = Arc::clone(&body);
		event.add_handler(move || body());
	}

	event.invoke();
	assert_eq!(log.lock().unwrap().len(), 3);
}

#[test]
fn reinvoke_runs_all_handlers_again() {
	let log = recorder();
	let mut event = Event::new("again");
	event.add_handler(push(&log, "A")).also(push(&log, "B"));

	event.invoke();
	event.invoke();

	assert_eq!(*log.lock().unwrap(), ["A", "B", "A", "B"]);
	assert_eq!(event.len(), 2);
}

#[test]
fn immediate_scenario_completes_before_invoke_returns() {
	let log = recorder();
	let flag = Arc::new(AtomicBool::new(false));
	let set = Arc::clone(&flag);

	let mut event = Event::new("name");
	event
		.add_handler(push(&log, "A"))
		.also(push(&log, "B"))
		.also(move || set.store(true, Ordering::SeqCst));

	event.invoke();

	assert_eq!(*log.lock().unwrap(), ["A", "B"]);
	assert!(flag.load(Ordering::SeqCst));
}

#[test]
fn immediate_panic_propagates_to_invoker() {
	let log = recorder();
	let mut event = Event::new("boom");
	event
		.add_handler(push(&log, "before"))
		.also(|| panic!("handler failed"))
		.also(push(&log, "after"));

	let result = catch_unwind(AssertUnwindSafe(|| event.invoke()));

	let payload = result.unwrap_err();
	assert_eq!(payload.downcast_ref::<&str>(), Some(&"handler failed"));
	assert_eq!(*log.lock().unwrap(), ["before"]);
}

#[test]
fn thread_dispatch_submits_in_registration_order() {
	static QUEUE: Mutex<Vec<Task>> = Mutex::new(Vec::new());

	struct Recording;

	impl ExecutionContext for Recording {
		const NAME: &'static str = "recording";

		fn submit(task: Task) {
			QUEUE.lock().unwrap().push(task);
		}
	}

	let log = recorder();
	let mut event = Event::new("deferred");
	event
		.add_handler(push(&log, "A"))
		.also(push(&log, "B"))
		.also(push(&log, "C"));

	event.invoke_with::<ThreadDispatcher<Recording>>();

	assert!(log.lock().unwrap().is_empty());
	let tasks: Vec<Task> = QUEUE.lock().unwrap().drain(..).collect();
	assert_eq!(tasks.len(), 3);
	for task in tasks {
		task();
	}
	assert_eq!(*log.lock().unwrap(), ["A", "B", "C"]);
}

#[test]
fn handlers_expose_executors() {
	let log = recorder();
	let mut event = Event::new("exec");
	let handler = event.add_handler(push(&log, "direct"));
	(handler.executor())();

	for handler in event.handlers() {
		(handler.executor())();
	}

	assert_eq!(*log.lock().unwrap(), ["direct", "direct"]);
}

#[test]
fn debug_output_reports_name_and_count() {
	let mut event = Event::new("dbg");
	event.add_handler(|| {}).also(|| {});
	assert_eq!(format!("{event:?}"), "Event { name: \"dbg\", handlers: 2 }");
}
