//! Reactive Runtime
//!
//! This module provides the dependency tracker shared by every [`Signal`](crate::Signal)
//! and [`Effect`](crate::Effect) on the current thread.
//!
//! ## Architecture
//!
//! 1. **Observer Stack**: the effects currently executing, innermost last
//! 2. **Dependency Tracking**: `Signal::get()` records an edge from the signal to the
//!    innermost observer; `Signal::peek()` records nothing
//! 3. **Update Scheduling**: layout effects rerun synchronously, passive effects are
//!    queued until [`Runtime::flush_updates`] runs (directly or through a scheduler)
//!
//! Explicit change subscriptions (`Signal::subscribe`) do not go through the
//! runtime at all; they belong to the signal they observe.

use core::cell::RefCell;
use core::sync::atomic::{AtomicUsize, Ordering};

extern crate alloc;
use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;

/// Unique identifier for reactive nodes (Signals and Effects)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
	/// Create a new unique NodeId
	pub fn new() -> Self {
		static COUNTER: AtomicUsize = AtomicUsize::new(0);
		Self(COUNTER.fetch_add(1, Ordering::Relaxed))
	}
}

impl Default for NodeId {
	fn default() -> Self {
		Self::new()
	}
}

/// Type of reactive node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
	/// A Signal node (source of reactivity)
	Signal,
	/// An Effect node (computation that reruns when its dependencies change)
	Effect,
}

/// Effect execution timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EffectTiming {
	/// Reruns synchronously inside the `set()` that invalidated it
	Layout,
	/// Queued until the pending updates are flushed
	#[default]
	Passive,
}

/// Observer represents a currently executing Effect
#[derive(Debug, Clone)]
pub struct Observer {
	/// Unique identifier for this observer
	pub id: NodeId,
	/// Type of this observer
	pub node_type: NodeType,
	/// Effect execution timing
	pub timing: EffectTiming,
}

/// Dependency graph node
#[derive(Debug, Default)]
pub(crate) struct DependencyNode {
	/// IDs of nodes that depend on this node
	pub(crate) subscribers: Vec<NodeId>,
	/// IDs of nodes this node depends on
	pub(crate) dependencies: Vec<NodeId>,
}

/// Type for the task scheduler function
type SchedulerFn = Box<dyn Fn(Box<dyn FnOnce() + Send>) + Send + Sync>;

static SCHEDULER: std::sync::OnceLock<SchedulerFn> = std::sync::OnceLock::new();

/// Set the global scheduler used to flush passive effects.
///
/// Without a scheduler, passive effects stay queued until
/// [`Runtime::flush_updates`] is called explicitly. Layout effects never
/// need a scheduler.
pub fn set_scheduler<F>(scheduler: F)
where
	F: Fn(Box<dyn FnOnce() + Send>) + Send + Sync + 'static,
{
	let _ = SCHEDULER.set(Box::new(scheduler));
}

/// Thread-local reactive runtime
///
/// This struct manages the reactive dependency graph and update scheduling.
pub struct Runtime {
	/// Observer stack for tracking currently executing effects
	observer_stack: RefCell<Vec<Observer>>,
	/// Dependency graph: NodeId -> DependencyNode
	pub(crate) dependency_graph: RefCell<BTreeMap<NodeId, DependencyNode>>,
	/// Pending updates (passive effects that need to be re-executed)
	pub(crate) pending_updates: RefCell<Vec<NodeId>>,
	/// Whether a flush is currently scheduled
	pub(crate) update_scheduled: RefCell<bool>,
}

impl Runtime {
	/// Create a new Runtime instance
	pub fn new() -> Self {
		Self {
			observer_stack: RefCell::new(Vec::new()),
			dependency_graph: RefCell::new(BTreeMap::new()),
			pending_updates: RefCell::new(Vec::new()),
			update_scheduled: RefCell::new(false),
		}
	}

	/// Get the current observer (the innermost executing Effect)
	pub fn current_observer(&self) -> Option<NodeId> {
		self.observer_stack
			.borrow()
			.last()
			.map(|observer| observer.id)
	}

	/// Push an observer onto the stack
	pub fn push_observer(&self, observer: Observer) {
		self.observer_stack.borrow_mut().push(observer);
	}

	/// Pop an observer from the stack
	pub fn pop_observer(&self) -> Option<Observer> {
		self.observer_stack.borrow_mut().pop()
	}

	/// Record that the current observer read `signal_id`.
	///
	/// Does nothing when no observer is running.
	pub fn track_dependency(&self, signal_id: NodeId) {
		if let Some(observer_id) = self.current_observer() {
			let mut graph = self.dependency_graph.borrow_mut();

			let signal_node = graph.entry(signal_id).or_default();
			if !signal_node.subscribers.contains(&observer_id) {
				signal_node.subscribers.push(observer_id);
			}

			let observer_node = graph.entry(observer_id).or_default();
			if !observer_node.dependencies.contains(&signal_id) {
				observer_node.dependencies.push(signal_id);
			}
		}
	}

	/// Notify that a Signal has changed
	///
	/// Layout effects that depend on the signal are executed synchronously;
	/// passive effects are queued.
	pub fn notify_signal_change(&self, signal_id: NodeId) {
		let graph = self.dependency_graph.borrow();
		if let Some(node) = graph.get(&signal_id) {
			let mut layout_effects = Vec::new();
			let mut passive_effects = Vec::new();

			for &subscriber_id in &node.subscribers {
				match crate::effect::get_effect_timing(subscriber_id) {
					Some(EffectTiming::Layout) => layout_effects.push(subscriber_id),
					Some(EffectTiming::Passive) => passive_effects.push(subscriber_id),
					None => {}
				}
			}

			// Drop the borrow before executing effects
			drop(graph);

			for effect_id in layout_effects {
				crate::effect::Effect::execute_effect(effect_id);
			}

			for effect_id in passive_effects {
				self.schedule_update(effect_id);
			}
		}
	}

	/// Queue a node for the next flush
	pub fn schedule_update(&self, node_id: NodeId) {
		let mut pending = self.pending_updates.borrow_mut();
		if !pending.contains(&node_id) {
			pending.push(node_id);
		}

		if !*self.update_scheduled.borrow() {
			*self.update_scheduled.borrow_mut() = true;

			if let Some(scheduler) = SCHEDULER.get() {
				scheduler(Box::new(|| {
					RUNTIME.with(|rt| rt.flush_updates());
				}));
			}
		}
	}

	/// Clear dependencies for a node
	///
	/// Called before re-executing an Effect so that only the signals read
	/// during the new run are tracked.
	pub fn clear_dependencies(&self, node_id: NodeId) {
		let mut graph = self.dependency_graph.borrow_mut();

		if let Some(node) = graph.get(&node_id) {
			let dependencies = node.dependencies.clone();

			for &dep_id in &dependencies {
				if let Some(dep_node) = graph.get_mut(&dep_id) {
					dep_node.subscribers.retain(|&id| id != node_id);
				}
			}
		}

		if let Some(node) = graph.get_mut(&node_id) {
			node.dependencies.clear();
		}
	}

	/// Remove a node from the dependency graph
	pub fn remove_node(&self, node_id: NodeId) {
		self.clear_dependencies(node_id);
		self.dependency_graph.borrow_mut().remove(&node_id);
	}

	/// Check if a node exists in the dependency graph (for testing)
	pub fn has_node(&self, node_id: NodeId) -> bool {
		self.dependency_graph.borrow().contains_key(&node_id)
	}

	/// Get the number of effects depending on a node (for testing)
	pub fn subscriber_count(&self, node_id: NodeId) -> usize {
		self.dependency_graph
			.borrow()
			.get(&node_id)
			.map(|node| node.subscribers.len())
			.unwrap_or(0)
	}

	fn take_observers(&self) -> Vec<Observer> {
		core::mem::take(&mut *self.observer_stack.borrow_mut())
	}

	fn restore_observers(&self, mut saved: Vec<Observer>) {
		let mut stack = self.observer_stack.borrow_mut();
		saved.append(&mut stack);
		*stack = saved;
	}
}

impl Default for Runtime {
	fn default() -> Self {
		Self::new()
	}
}

thread_local! {
	static RUNTIME: Runtime = Runtime::new();
}

/// Run `f` with the thread's runtime.
pub fn with_runtime<F, R>(f: F) -> R
where
	F: FnOnce(&Runtime) -> R,
{
	RUNTIME.with(f)
}

/// Try to access the runtime (safe version for Drop implementations)
///
/// Returns None if the thread-local storage has been destroyed.
pub(crate) fn try_with_runtime<F, R>(f: F) -> Option<R>
where
	F: FnOnce(&Runtime) -> R,
{
	RUNTIME.try_with(f).ok()
}

/// Run `f` with no current observer, so that `get()` calls inside it do not
/// create dependencies on the enclosing effect.
pub fn untrack<F, R>(f: F) -> R
where
	F: FnOnce() -> R,
{
	struct Restore(Option<Vec<Observer>>);

	impl Drop for Restore {
		fn drop(&mut self) {
			if let Some(saved) = self.0.take() {
				let _ = try_with_runtime(|rt| rt.restore_observers(saved));
			}
		}
	}

	let _restore = Restore(Some(with_runtime(|rt| rt.take_observers())));
	f()
}
