//! Fine-grained reactive values for tablebind
//!
//! This crate provides the reactive-value abstraction the table binding is
//! built on:
//!
//! - [`Signal`]: a shared value with a two-tier read API, [`Signal::get`]
//!   (tracked) and [`Signal::peek`] (untracked), plus explicit change
//!   subscriptions through [`Signal::subscribe`].
//! - [`Effect`]: a computation that reruns whenever a signal it read with
//!   `get()` changes.
//! - [`Subscription`] / [`SubscriptionSet`]: owned handles for change
//!   subscriptions, released exactly once on disposal or drop.
//! - [`Runtime`]: the thread-local dependency tracker.
//!
//! ## Tracked and untracked reads
//!
//! ```
//! use tablebind_reactive::{Effect, EffectTiming, Signal};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let structure = Signal::new(3);
//! let cell = Signal::new(1);
//! let runs = Rc::new(Cell::new(0));
//!
//! let _effect = Effect::new_with_timing(
//! 	{
//! 		let structure = structure.clone();
//! 		let cell = cell.clone();
//! 		let runs = runs.clone();
//! 		move || {
//! 			let _ = structure.get();
//! 			let _ = cell.peek();
//! 			runs.set(runs.get() + 1);
//! 		}
//! 	},
//! 	EffectTiming::Layout,
//! );
//!
//! cell.set(10);
//! assert_eq!(runs.get(), 1);
//! structure.set(2);
//! assert_eq!(runs.get(), 2);
//! ```

#![warn(missing_docs)]

pub mod effect;
pub mod runtime;
pub mod signal;
pub mod subscription;

pub use effect::Effect;
pub use runtime::{EffectTiming, NodeId, Runtime, set_scheduler, untrack, with_runtime};
pub use signal::Signal;
pub use subscription::{Subscription, SubscriptionSet};
