//! Signal - Fine-grained Reactive Primitive
//!
//! `Signal<T>` holds a value that can change over time. It has two ways of
//! being observed:
//!
//! - **Dependency tracking**: [`Signal::get`] inside a running
//!   [`Effect`](crate::Effect) makes that effect rerun on change.
//!   [`Signal::peek`] reads the same value without recording anything.
//! - **Change subscriptions**: [`Signal::subscribe`] registers a callback that
//!   receives every new value, independently of any effect.
//!
//! ## Example
//!
//! ```
//! use tablebind_reactive::Signal;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let count = Signal::new(0);
//! let seen = Rc::new(RefCell::new(Vec::new()));
//!
//! let subscription = count.subscribe({
//! 	let seen = seen.clone();
//! 	move |value: &i32| seen.borrow_mut().push(*value)
//! });
//!
//! count.set(42);
//! count.update(|n| *n += 1);
//! drop(subscription);
//! count.set(0);
//!
//! assert_eq!(*seen.borrow(), vec![42, 43]);
//! assert_eq!(count.peek(), 0);
//! ```

use core::cell::{Cell, RefCell};
use core::fmt;

extern crate alloc;
use alloc::rc::Rc;
use alloc::vec::Vec;

use super::runtime::{NodeId, try_with_runtime, with_runtime};
use super::subscription::Subscription;

type Callback<T> = Rc<dyn Fn(&T) + 'static>;

struct SubscriberEntry<T> {
	id: u64,
	active: Rc<Cell<bool>>,
	callback: Callback<T>,
}

struct SubscriberList<T> {
	next_id: u64,
	entries: Vec<SubscriberEntry<T>>,
}

impl<T> Default for SubscriberList<T> {
	fn default() -> Self {
		Self {
			next_id: 0,
			entries: Vec::new(),
		}
	}
}

/// A reactive signal that holds a value, tracks dependencies and notifies
/// subscribers.
///
/// ## Cloning
///
/// All clones of the same Signal share the same value, the same node in the
/// dependency graph and the same subscriber list.
pub struct Signal<T: 'static> {
	id: NodeId,
	value: Rc<RefCell<T>>,
	subscribers: Rc<RefCell<SubscriberList<T>>>,
}

impl<T: 'static> Signal<T> {
	/// Create a new Signal with the given initial value
	pub fn new(value: T) -> Self {
		Self {
			id: NodeId::new(),
			value: Rc::new(RefCell::new(value)),
			subscribers: Rc::new(RefCell::new(SubscriberList::default())),
		}
	}

	/// Get the current value and record a dependency on the running effect.
	pub fn get(&self) -> T
	where
		T: Clone,
	{
		with_runtime(|rt| rt.track_dependency(self.id));
		self.peek()
	}

	/// Get the current value without tracking dependencies.
	pub fn peek(&self) -> T
	where
		T: Clone,
	{
		self.value.borrow().clone()
	}

	/// Borrow the current value without cloning or tracking it.
	pub fn with_peek<R>(&self, f: impl FnOnce(&T) -> R) -> R {
		f(&self.value.borrow())
	}

	/// Set the signal to a new value.
	///
	/// Subscribers are called first, in registration order, then dependent
	/// effects are notified.
	pub fn set(&self, value: T) {
		*self.value.borrow_mut() = value;
		self.notify();
	}

	/// Update the signal's value in place and notify once.
	pub fn update<F>(&self, f: F)
	where
		F: FnOnce(&mut T),
	{
		f(&mut *self.value.borrow_mut());
		self.notify();
	}

	/// Register a callback that receives every new value.
	///
	/// The callback runs synchronously inside `set()`/`update()`. It may read
	/// this signal but must not write to it. The registration lives as long as
	/// the returned [`Subscription`] is neither disposed nor dropped.
	pub fn subscribe<F>(&self, callback: F) -> Subscription
	where
		F: Fn(&T) + 'static,
	{
		let active = Rc::new(Cell::new(true));
		let id = {
			let mut list = self.subscribers.borrow_mut();
			let id = list.next_id;
			list.next_id += 1;
			list.entries.push(SubscriberEntry {
				id,
				active: active.clone(),
				callback: Rc::new(callback),
			});
			id
		};

		let list = Rc::downgrade(&self.subscribers);
		Subscription::new(move || {
			active.set(false);
			if let Some(list) = list.upgrade() {
				list.borrow_mut().entries.retain(|entry| entry.id != id);
			}
		})
	}

	/// Number of live change subscriptions.
	pub fn subscription_count(&self) -> usize {
		self.subscribers.borrow().entries.len()
	}

	/// Get the NodeId of this signal
	pub fn id(&self) -> NodeId {
		self.id
	}

	fn notify(&self) {
		self.notify_subscribers();
		with_runtime(|rt| rt.notify_signal_change(self.id));
	}

	fn notify_subscribers(&self) {
		// Snapshot so callbacks may dispose subscriptions (their own included)
		let entries: Vec<(Rc<Cell<bool>>, Callback<T>)> = self
			.subscribers
			.borrow()
			.entries
			.iter()
			.map(|entry| (entry.active.clone(), entry.callback.clone()))
			.collect();

		if entries.is_empty() {
			return;
		}

		let value = self.value.borrow();
		for (active, callback) in entries {
			if active.get() {
				callback(&value);
			}
		}
	}
}

impl<T: 'static> Clone for Signal<T> {
	fn clone(&self) -> Self {
		Self {
			id: self.id,
			value: Rc::clone(&self.value),
			subscribers: Rc::clone(&self.subscribers),
		}
	}
}

impl<T: 'static> Drop for Signal<T> {
	fn drop(&mut self) {
		// Only the last clone removes the node from the dependency graph
		if Rc::strong_count(&self.value) == 1 {
			let _ = try_with_runtime(|rt| rt.remove_node(self.id));
		}
	}
}

impl<T: fmt::Debug + 'static> fmt::Debug for Signal<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Signal")
			.field("id", &self.id)
			.field("value", &*self.value.borrow())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::runtime::{EffectTiming, NodeType, Observer};
	use rstest::rstest;
	use serial_test::serial;

	#[rstest]
	#[serial]
	fn test_signal_set_and_update() {
		let signal = Signal::new(0);

		signal.set(100);
		assert_eq!(signal.peek(), 100);

		signal.update(|n| *n *= 2);
		assert_eq!(signal.peek(), 200);
	}

	#[rstest]
	#[serial]
	fn test_signal_clone_shares_value() {
		let signal1 = Signal::new(42);
		let signal2 = signal1.clone();

		signal1.set(100);

		assert_eq!(signal2.peek(), 100);
		assert_eq!(signal1.id(), signal2.id());
	}

	#[rstest]
	#[serial]
	fn test_get_tracks_and_peek_does_not() {
		let tracked = Signal::new(1);
		let untracked = Signal::new(2);
		let observer_id = NodeId::new();

		with_runtime(|rt| {
			rt.push_observer(Observer {
				id: observer_id,
				node_type: NodeType::Effect,
				timing: EffectTiming::default(),
			});
		});
		let _ = tracked.get();
		let _ = untracked.peek();
		with_runtime(|rt| {
			rt.pop_observer();
			assert_eq!(rt.subscriber_count(tracked.id()), 1);
			assert_eq!(rt.subscriber_count(untracked.id()), 0);
			rt.remove_node(observer_id);
		});
	}

	#[rstest]
	#[serial]
	fn test_subscribers_fire_in_registration_order() {
		let signal = Signal::new(String::new());
		let log = Rc::new(RefCell::new(Vec::new()));

		let _first = signal.subscribe({
			let log = log.clone();
			move |value: &String| log.borrow_mut().push(format!("first:{value}"))
		});
		let _second = signal.subscribe({
			let log = log.clone();
			move |value: &String| log.borrow_mut().push(format!("second:{value}"))
		});

		signal.set("x".to_string());

		assert_eq!(*log.borrow(), vec!["first:x", "second:x"]);
	}

	#[rstest]
	#[serial]
	fn test_disposed_subscription_never_fires() {
		let signal = Signal::new(0);
		let fired = Rc::new(Cell::new(0));

		let mut subscription = signal.subscribe({
			let fired = fired.clone();
			move |_: &i32| fired.set(fired.get() + 1)
		});
		signal.set(1);
		subscription.dispose();
		subscription.dispose();
		signal.set(2);

		assert_eq!(fired.get(), 1);
		assert_eq!(signal.subscription_count(), 0);
	}

	#[rstest]
	#[serial]
	fn test_subscription_disposed_mid_notification_is_skipped() {
		let signal = Signal::new(0);
		let fired = Rc::new(Cell::new(0));
		let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

		let _killer = signal.subscribe({
			let victim = victim.clone();
			move |_: &i32| {
				victim.borrow_mut().take();
			}
		});
		*victim.borrow_mut() = Some(signal.subscribe({
			let fired = fired.clone();
			move |_: &i32| fired.set(fired.get() + 1)
		}));

		signal.set(1);

		assert_eq!(fired.get(), 0);
		assert_eq!(signal.subscription_count(), 1);
	}

	#[rstest]
	#[serial]
	fn test_subscription_outlives_signal() {
		let mut subscription = {
			let signal = Signal::new(0);
			signal.subscribe(|_: &i32| {})
		};

		subscription.dispose();
		assert!(!subscription.is_active());
	}
}
