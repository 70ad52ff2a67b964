//! Effect - Reactive Side Effects
//!
//! `Effect` represents a side effect that automatically re-runs when its
//! dependencies change. Any Signal read with `get()` inside the effect closure
//! becomes a dependency; signals read with `peek()` do not.
//!
//! ## Example
//!
//! ```
//! use tablebind_reactive::{Effect, Signal, with_runtime};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let count = Signal::new(0);
//! let log = Rc::new(RefCell::new(Vec::new()));
//!
//! let _effect = Effect::new({
//! 	let count = count.clone();
//! 	let log = log.clone();
//! 	move || log.borrow_mut().push(count.get())
//! });
//!
//! count.set(42);
//! with_runtime(|rt| rt.flush_updates());
//! assert_eq!(*log.borrow(), vec![0, 42]);
//! ```

use core::cell::{Cell, RefCell};

extern crate alloc;
use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::rc::Rc;

use super::runtime::{EffectTiming, NodeId, NodeType, Observer, try_with_runtime, with_runtime};

type EffectFn = Box<dyn FnMut() + 'static>;

struct EffectSlot {
	run: EffectFn,
	timing: EffectTiming,
	disposed: Rc<Cell<bool>>,
}

// Closures of every live Effect, keyed by node id. A slot is taken out of the
// map while it runs so that effects may create or dispose other effects.
thread_local! {
	static EFFECTS: RefCell<BTreeMap<NodeId, EffectSlot>> = const { RefCell::new(BTreeMap::new()) };
}

// Timing survives while the slot is checked out for a run.
thread_local! {
	static EFFECT_TIMING: RefCell<BTreeMap<NodeId, EffectTiming>> = const { RefCell::new(BTreeMap::new()) };
}

/// Get the timing for an effect by its ID.
///
/// Returns `None` if the node is not a live Effect.
pub(crate) fn get_effect_timing(effect_id: NodeId) -> Option<EffectTiming> {
	EFFECT_TIMING.with(|storage| storage.borrow().get(&effect_id).copied())
}

/// A reactive effect that automatically re-runs when its dependencies change
///
/// Effects run once when created. A [`EffectTiming::Layout`] effect reruns
/// synchronously inside the `set()` that invalidated it; a
/// [`EffectTiming::Passive`] effect waits for the next flush.
///
/// Dropping the handle disposes the effect.
pub struct Effect {
	id: NodeId,
	disposed: Rc<Cell<bool>>,
}

impl Effect {
	/// Create a passive Effect that runs the given function
	pub fn new<F>(f: F) -> Self
	where
		F: FnMut() + 'static,
	{
		Self::new_with_timing(f, EffectTiming::Passive)
	}

	/// Create a new Effect with the specified execution timing
	pub fn new_with_timing<F>(f: F, timing: EffectTiming) -> Self
	where
		F: FnMut() + 'static,
	{
		let id = NodeId::new();
		let disposed = Rc::new(Cell::new(false));

		EFFECTS.with(|storage| {
			storage.borrow_mut().insert(
				id,
				EffectSlot {
					run: Box::new(f),
					timing,
					disposed: disposed.clone(),
				},
			);
		});
		EFFECT_TIMING.with(|storage| {
			storage.borrow_mut().insert(id, timing);
		});

		Self::execute_effect(id);

		Self { id, disposed }
	}

	/// Execute an effect by its ID
	///
	/// This is called by the runtime when an effect needs to re-run.
	pub(crate) fn execute_effect(effect_id: NodeId) {
		let Some(mut slot) = EFFECTS.with(|storage| storage.borrow_mut().remove(&effect_id)) else {
			// Disposed, or already running further up the stack
			return;
		};

		if slot.disposed.get() {
			return;
		}

		tracing::trace!(effect = ?effect_id, timing = ?slot.timing, "running effect");

		with_runtime(|rt| {
			rt.clear_dependencies(effect_id);
			rt.push_observer(Observer {
				id: effect_id,
				node_type: NodeType::Effect,
				timing: slot.timing,
			});
		});

		(slot.run)();

		with_runtime(|rt| {
			rt.pop_observer();
		});

		if slot.disposed.get() {
			let _ = try_with_runtime(|rt| rt.remove_node(effect_id));
		} else {
			EFFECTS.with(|storage| {
				storage.borrow_mut().insert(effect_id, slot);
			});
		}
	}

	/// Get the NodeId of this effect
	pub fn id(&self) -> NodeId {
		self.id
	}

	/// Whether the effect has been disposed
	pub fn is_disposed(&self) -> bool {
		self.disposed.get()
	}

	/// Dispose this effect
	///
	/// After calling this, the effect will no longer run and its resources
	/// are released.
	pub fn dispose(&self) {
		if self.disposed.replace(true) {
			return;
		}

		let _ = try_with_runtime(|rt| rt.remove_node(self.id));
		let _ = EFFECT_TIMING.try_with(|storage| {
			storage.borrow_mut().remove(&self.id);
		});
		// Move the closure out before dropping it: its captures may touch the
		// storage again on drop.
		let slot = EFFECTS
			.try_with(|storage| storage.borrow_mut().remove(&self.id))
			.ok()
			.flatten();
		drop(slot);
	}
}

impl Drop for Effect {
	fn drop(&mut self) {
		self.dispose();
	}
}

impl super::runtime::Runtime {
	/// Execute every queued passive effect.
	pub fn flush_updates(&self) {
		*self.update_scheduled.borrow_mut() = false;

		let pending = core::mem::take(&mut *self.pending_updates.borrow_mut());

		for node_id in pending {
			Effect::execute_effect(node_id);
		}
	}
}
