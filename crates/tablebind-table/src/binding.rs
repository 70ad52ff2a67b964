//! The table binding: renders options into an element and keeps it current.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use tablebind_dom::{Node, WeakNode, parse_fragment};
use tablebind_reactive::{Effect, EffectTiming};

use crate::error::{Result, TableError};
use crate::markup::build_markup;
use crate::options::TableOptions;
use crate::shape::resolve_shape;
use crate::wiring::wire_cells;

#[derive(Default)]
struct BindingState {
	render_count: Cell<usize>,
	last_error: RefCell<Option<Rc<TableError>>>,
	// The <tbody> of the latest successful render
	body: RefCell<WeakNode>,
}

/// A live table bound to an element.
///
/// Binding renders the options into the element immediately. The render
/// runs inside a layout effect: when an option read during the render
/// changes (a `data` signal, a reactive column count, a row signal...) the
/// whole table is rebuilt synchronously. A cell whose value is a signal is
/// instead patched in place when that signal changes.
///
/// Dropping the binding (or calling [`TableBinding::dispose`]) stops both
/// kinds of updates; the last rendered table stays in the element.
///
/// ## Example
///
/// ```
/// use tablebind_dom::Node;
/// use tablebind_reactive::Signal;
/// use tablebind_table::{TableBinding, TableOptions, Value};
///
/// let cell = Signal::new(Value::from(1));
/// let element = Node::element("table");
/// let binding = TableBinding::bind(
/// 	&element,
/// 	TableOptions::from(Value::list([Value::list([Value::from(cell.clone()), Value::from(2)])])),
/// )
/// .unwrap();
///
/// cell.set(Value::from(10));
/// assert_eq!(element.text_content(), "102");
/// assert_eq!(binding.render_count(), 1);
/// ```
pub struct TableBinding {
	element: Node,
	effect: Option<Effect>,
	state: Rc<BindingState>,
}

impl TableBinding {
	/// Binds `options` to `element` and renders the table.
	///
	/// The element's previous children are replaced (and disposed).
	///
	/// # Errors
	///
	/// Returns the error of the first render; the element is left untouched
	/// and nothing stays subscribed.
	pub fn bind(element: &Node, options: TableOptions) -> Result<Self> {
		let state = Rc::new(BindingState::default());
		let first_error: Rc<RefCell<Option<TableError>>> = Rc::default();

		let effect = Effect::new_with_timing(
			{
				let element = element.clone();
				let state = state.clone();
				let first_error = first_error.clone();
				let mut first_run = true;
				move || {
					let result = render_into(&element, &options);
					match result {
						Ok(body) => {
							state.render_count.set(state.render_count.get() + 1);
							*state.last_error.borrow_mut() = None;
							*state.body.borrow_mut() = body.as_ref().map(Node::downgrade).unwrap_or_default();
						}
						Err(error) if first_run => {
							*first_error.borrow_mut() = Some(error);
						}
						Err(error) => {
							tracing::error!(%error, "table rerender failed; keeping the previous table");
							*state.last_error.borrow_mut() = Some(Rc::new(error));
						}
					}
					first_run = false;
				}
			},
			EffectTiming::Layout,
		);

		if let Some(error) = first_error.take() {
			effect.dispose();
			return Err(error);
		}

		Ok(Self {
			element: element.clone(),
			effect: Some(effect),
			state,
		})
	}

	/// The bound element.
	pub fn element(&self) -> &Node {
		&self.element
	}

	/// Number of successful full renders, the initial one included.
	pub fn render_count(&self) -> usize {
		self.state.render_count.get()
	}

	/// The error of the latest rerender, if it failed.
	///
	/// Cleared by the next successful render.
	pub fn last_error(&self) -> Option<Rc<TableError>> {
		self.state.last_error.borrow().clone()
	}

	/// Whether the binding still reacts to changes.
	pub fn is_active(&self) -> bool {
		self.effect.is_some()
	}

	/// Stops rerendering and releases every cell subscription.
	///
	/// Only the `<tbody>` this binding rendered is cleaned; disposal work
	/// registered elsewhere in the element is left alone. Calling it again
	/// does nothing.
	pub fn dispose(&mut self) {
		if let Some(effect) = self.effect.take() {
			effect.dispose();
			if let Some(body) = self.state.body.take().upgrade() {
				body.clean();
			}
			tracing::debug!("table binding disposed");
		}
	}
}

impl Drop for TableBinding {
	fn drop(&mut self) {
		self.dispose();
	}
}

impl fmt::Debug for TableBinding {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TableBinding")
			.field("element", &self.element)
			.field("active", &self.is_active())
			.field("render_count", &self.render_count())
			.finish()
	}
}

// Resolve, build and parse before touching the element so that a failing
// render leaves the previous table in place.
fn render_into(element: &Node, options: &TableOptions) -> Result<Option<Node>> {
	let snapshot = options.snapshot();
	let grid = resolve_shape(&snapshot)?;
	let markup = build_markup(&snapshot, &grid);
	let nodes = parse_fragment(&markup.html)?;

	element.replace_children(nodes);

	let reactive_cells = markup.reactive_cells.len();
	let body = element.t_body();
	if let Some(body) = &body {
		wire_cells(element, body, markup.reactive_cells);
	}

	tracing::debug!(
		rows = grid.row_count(),
		columns = grid.column_count(),
		reactive_cells,
		"rendered table"
	);
	Ok(body)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::ConfigurationError;
	use crate::options::AxisSpec;
	use crate::value::Value;
	use rstest::rstest;
	use serial_test::serial;
	use tablebind_reactive::Signal;

	#[rstest]
	#[serial(reactive)]
	fn test_first_render_error_is_returned() {
		let element = Node::element("table");
		element.set_inner_html("<caption>old</caption>").unwrap();
		let columns = Signal::new(AxisSpec::Inferred);

		let result = TableBinding::bind(
			&element,
			TableOptions::from(Value::list([Value::record([("a", 1)])])).columns(columns.clone()),
		);

		assert!(matches!(
			result,
			Err(TableError::Configuration(ConfigurationError::MissingColumns))
		));
		assert_eq!(element.inner_html(), "<caption>old</caption>");

		// Torn down: a later fix does not render
		columns.set(AxisSpec::Count(1));
		assert_eq!(element.inner_html(), "<caption>old</caption>");
	}

	#[rstest]
	#[serial(reactive)]
	fn test_rerender_error_keeps_previous_table() {
		let element = Node::element("table");
		let rows = Signal::new(AxisSpec::Count(1));
		let binding = TableBinding::bind(
			&element,
			TableOptions::new().data(Value::record([("0", Value::list(["a"]))])).rows(rows.clone()).columns(AxisSpec::Count(1)),
		)
		.unwrap();
		assert_eq!(element.text_content(), "a");

		rows.set(AxisSpec::Inferred);
		assert_eq!(element.text_content(), "a");
		assert!(matches!(
			binding.last_error().as_deref(),
			Some(TableError::Configuration(ConfigurationError::MissingRows))
		));
		assert_eq!(binding.render_count(), 1);

		rows.set(AxisSpec::Count(1));
		assert!(binding.last_error().is_none());
		assert_eq!(binding.render_count(), 2);
	}

	#[rstest]
	#[serial(reactive)]
	fn test_dispose_stops_updates() {
		let element = Node::element("table");
		let cell = Signal::new(Value::from(1));
		let columns = Signal::new(1usize);
		let mut binding = TableBinding::bind(
			&element,
			TableOptions::from(Value::list([Value::list([Value::from(cell.clone())])])).columns(columns.clone()),
		)
		.unwrap();
		assert_eq!(cell.subscription_count(), 1);

		binding.dispose();
		binding.dispose();
		cell.set(Value::from(2));
		columns.set(0);

		assert!(!binding.is_active());
		assert_eq!(cell.subscription_count(), 0);
		assert_eq!(element.text_content(), "1");
		assert_eq!(binding.render_count(), 1);
	}

	#[rstest]
	#[serial(reactive)]
	fn test_dispose_leaves_other_bindings_on_the_element() {
		let element = Node::element("table");
		let mut first = TableBinding::bind(&element, TableOptions::from(Value::list([Value::list(["a"])]))).unwrap();
		let cell = Signal::new(Value::from(1));
		let _second = TableBinding::bind(
			&element,
			TableOptions::from(Value::list([Value::list([Value::from(cell.clone())])])),
		)
		.unwrap();

		first.dispose();
		cell.set(Value::from(2));

		assert_eq!(cell.subscription_count(), 1);
		assert_eq!(element.text_content(), "2");
	}

	#[rstest]
	#[serial(reactive)]
	fn test_drop_releases_subscriptions() {
		let element = Node::element("table");
		let cell = Signal::new(Value::from(1));
		let binding = TableBinding::bind(&element, TableOptions::from(Value::list([Value::list([Value::from(cell.clone())])])))
			.unwrap();

		drop(binding);

		assert_eq!(cell.subscription_count(), 0);
	}
}
