use std::fmt;
use std::sync::Arc;

use crate::dispatch::{DefaultDispatcher, Dispatcher};

/// Shared handler body handed to a [`Dispatcher`].
pub type Executor = Arc<dyn Fn() + Send + Sync + 'static>;

/// One registered callback.
///
/// Handlers are owned by their [`Event`] and never outlive it. They are
/// append-only: nothing edits or removes a handler once registered.
pub struct Handler {
	executor: Executor,
}

impl Handler {
	fn new(executor: Executor) -> Self {
		Self { executor }
	}

	/// Returns the wrapped body.
	pub fn executor(&self) -> &Executor {
		&self.executor
	}
}

impl fmt::Debug for Handler {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Handler").finish_non_exhaustive()
	}
}

/// Ordered, owning collection of handlers.
///
/// Registration order is invocation order. Duplicates are allowed; the
/// same closure registered twice runs twice.
pub struct Event {
	name: String,
	handlers: Vec<Handler>,
}

impl Event {
	/// Creates an event with no handlers.
	///
	/// The name is kept for diagnostics only.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			handlers: Vec::new(),
		}
	}

	/// Returns the event name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns the number of registered handlers.
	pub fn len(&self) -> usize {
		self.handlers.len()
	}

	/// Returns `true` if no handler has been registered.
	pub fn is_empty(&self) -> bool {
		self.handlers.is_empty()
	}

	/// Iterates handlers in registration order.
	pub fn handlers(&self) -> impl ExactSizeIterator<Item = &Handler> + '_ {
		self.handlers.iter()
	}

	/// Appends a handler and returns a reference to it for chaining.
	pub fn add_handler<F>(&mut self, body: F) -> HandlerRef<'_>
	where
		F: Fn() + Send + Sync + 'static,
	{
		let index = self.handlers.len();
		self.handlers.push(Handler::new(Arc::new(body)));
		tracing::trace!(event = %self.name, index, "evts.add_handler");
		HandlerRef { event: self, index }
	}

	/// Runs every handler on the [`DefaultDispatcher`].
	pub fn invoke(&self) {
		self.invoke_with::<DefaultDispatcher>();
	}

	/// Hands every handler, in registration order, to `D`.
	///
	/// Returns once `D` has accepted the last body. Whether the bodies have
	/// actually run by then depends on `D`.
	pub fn invoke_with<D: Dispatcher>(&self) {
		tracing::trace!(event = %self.name, handlers = self.handlers.len(), dispatcher = D::NAME, "evts.invoke");
		for handler in &self.handlers {
			D::dispatch(&handler.executor);
		}
	}
}

impl fmt::Debug for Event {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Event")
			.field("name", &self.name)
			.field("handlers", &self.handlers.len())
			.finish()
	}
}

/// Handle to a freshly registered handler.
///
/// Addresses the handler by its position in the owning event, so the handle
/// stays valid however the underlying storage grows.
pub struct HandlerRef<'e> {
	event: &'e mut Event,
	index: usize,
}

impl<'e> HandlerRef<'e> {
	/// Registers `body` as a sibling handler on the same event.
	///
	/// Equivalent to calling [`Event::add_handler`] on the owning event: the
	/// new handler is appended at the end of the sequence.
	pub fn also<F>(self, body: F) -> HandlerRef<'e>
	where
		F: Fn() + Send + Sync + 'static,
	{
		self.event.add_handler(body)
	}

	/// Returns the body of the referenced handler.
	pub fn executor(&self) -> &Executor {
		&self.event.handlers[self.index].executor
	}

	/// Returns the position of the referenced handler in its event.
	pub fn index(&self) -> usize {
		self.index
	}

	/// Returns the owning event's name.
	pub fn event_name(&self) -> &str {
		self.event.name()
	}
}

impl fmt::Debug for HandlerRef<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("HandlerRef")
			.field("event", &self.event.name)
			.field("index", &self.index)
			.finish()
	}
}

#[cfg(test)]
mod tests;
