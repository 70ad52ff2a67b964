//! Change-subscription handles and the scoped disposal registry.

use core::fmt;

extern crate alloc;
use alloc::boxed::Box;
use alloc::vec::Vec;

/// An owned registration created by [`Signal::subscribe`](crate::Signal::subscribe).
///
/// Disposing releases the registration; dropping the handle disposes it.
#[must_use = "dropping a Subscription disposes it immediately"]
pub struct Subscription {
	release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
	pub(crate) fn new(release: impl FnOnce() + 'static) -> Self {
		Self {
			release: Some(Box::new(release)),
		}
	}

	/// Release the registration. Later calls are no-ops.
	pub fn dispose(&mut self) {
		if let Some(release) = self.release.take() {
			release();
		}
	}

	/// Whether the subscription has not been disposed yet.
	pub fn is_active(&self) -> bool {
		self.release.is_some()
	}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		self.dispose();
	}
}

impl fmt::Debug for Subscription {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Subscription")
			.field("active", &self.is_active())
			.finish()
	}
}

/// A set of subscriptions released together, exactly once.
///
/// Subscriptions pushed after the set was disposed are released right away,
/// so nothing registered against a dead owner can fire.
#[derive(Default)]
pub struct SubscriptionSet {
	subscriptions: Vec<Subscription>,
	disposed: bool,
}

impl SubscriptionSet {
	/// Create an empty set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Take ownership of a subscription.
	pub fn push(&mut self, mut subscription: Subscription) {
		if self.disposed {
			subscription.dispose();
		} else {
			self.subscriptions.push(subscription);
		}
	}

	/// Number of subscriptions held.
	pub fn len(&self) -> usize {
		self.subscriptions.len()
	}

	/// Whether the set holds no subscriptions.
	pub fn is_empty(&self) -> bool {
		self.subscriptions.is_empty()
	}

	/// Whether [`dispose`](Self::dispose) already ran.
	pub fn is_disposed(&self) -> bool {
		self.disposed
	}

	/// Release every subscription. Returns how many were released by this
	/// call; zero on every call after the first.
	pub fn dispose(&mut self) -> usize {
		if self.disposed {
			return 0;
		}
		self.disposed = true;

		let released = self.subscriptions.len();
		for mut subscription in self.subscriptions.drain(..) {
			subscription.dispose();
		}
		tracing::debug!(released, "subscription set disposed");
		released
	}
}

impl Drop for SubscriptionSet {
	fn drop(&mut self) {
		self.dispose();
	}
}

impl fmt::Debug for SubscriptionSet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SubscriptionSet")
			.field("len", &self.subscriptions.len())
			.field("disposed", &self.disposed)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Signal;
	use rstest::rstest;
	use serial_test::serial;
	use std::cell::Cell;
	use std::rc::Rc;

	fn counting_subscription(signal: &Signal<i32>, counter: &Rc<Cell<u32>>) -> Subscription {
		let counter = counter.clone();
		signal.subscribe(move |_| counter.set(counter.get() + 1))
	}

	#[rstest]
	#[serial]
	fn test_set_disposes_all_exactly_once() {
		let a = Signal::new(0);
		let b = Signal::new(0);
		let fired = Rc::new(Cell::new(0));

		let mut set = SubscriptionSet::new();
		set.push(counting_subscription(&a, &fired));
		set.push(counting_subscription(&b, &fired));
		assert_eq!(set.len(), 2);

		assert_eq!(set.dispose(), 2);
		assert_eq!(set.dispose(), 0);
		assert!(set.is_disposed());

		a.set(1);
		b.set(1);
		assert_eq!(fired.get(), 0);
		assert_eq!(a.subscription_count(), 0);
	}

	#[rstest]
	#[serial]
	fn test_push_after_dispose_releases_immediately() {
		let signal = Signal::new(0);
		let fired = Rc::new(Cell::new(0));

		let mut set = SubscriptionSet::new();
		set.dispose();
		set.push(counting_subscription(&signal, &fired));

		signal.set(5);
		assert!(set.is_empty());
		assert_eq!(fired.get(), 0);
	}

	#[rstest]
	#[serial]
	fn test_drop_disposes() {
		let signal = Signal::new(0);
		let fired = Rc::new(Cell::new(0));

		{
			let mut set = SubscriptionSet::new();
			set.push(counting_subscription(&signal, &fired));
			signal.set(1);
		}
		signal.set(2);

		assert_eq!(fired.get(), 1);
	}
}
