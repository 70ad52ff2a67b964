//! Cell patching.
//!
//! Each reactive cell gets one change subscription that rewrites that cell's
//! content in place. The subscriptions of a render live in one
//! [`SubscriptionSet`] released by the rendered `<tbody>` when it is removed
//! or cleaned.

use tablebind_dom::{Node, WeakNode};
use tablebind_reactive::SubscriptionSet;

use crate::markup::ReactiveCell;
use crate::safe::escape_value;
use crate::value::Value;

/// Subscribes every reactive cell of a render and ties the subscriptions to
/// `body`'s disposal.
///
/// Returns the number of subscriptions created.
pub fn wire_cells(element: &Node, body: &Node, cells: Vec<ReactiveCell>) -> usize {
	let mut subscriptions = SubscriptionSet::new();

	for ReactiveCell { row, column, signal } in cells {
		let patch = CellPatch {
			element: element.downgrade(),
			body: body.downgrade(),
			row,
			column,
		};
		subscriptions.push(signal.subscribe(move |value: &Value| patch.apply(value)));
	}

	let count = subscriptions.len();
	body.add_dispose_callback(move || {
		subscriptions.dispose();
	});
	count
}

struct CellPatch {
	element: WeakNode,
	body: WeakNode,
	row: usize,
	column: usize,
}

impl CellPatch {
	fn apply(&self, value: &Value) {
		let (Some(element), Some(body)) = (self.element.upgrade(), self.body.upgrade()) else {
			return;
		};
		// A later render owns the element now
		if !element.t_body().is_some_and(|current| current.ptr_eq(&body)) {
			return;
		}
		let Some(cell) = body
			.rows()
			.get(self.row)
			.and_then(|row| row.cells().get(self.column).cloned())
		else {
			return;
		};

		tracing::trace!(row = self.row, column = self.column, "patching table cell");

		if let Err(error) = cell.set_inner_html(&escape_value(value)) {
			tracing::warn!(
				row = self.row,
				column = self.column,
				%error,
				"safe cell markup could not be parsed; cell left unchanged"
			);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::safe::SafeString;
	use rstest::rstest;
	use serial_test::serial;
	use tablebind_reactive::Signal;

	fn table(markup: &str) -> (Node, Node) {
		let element = Node::element("table");
		element.set_inner_html(markup).unwrap();
		let body = element.t_body().unwrap();
		(element, body)
	}

	#[rstest]
	#[serial(reactive)]
	fn test_patch_rewrites_one_cell() {
		let (element, body) = table("<tbody class=\"test\"><tr><th>r</th><td>1</td><td>2</td></tr></tbody>");
		let signal = Signal::new(Value::from(1));
		let cells = vec![ReactiveCell {
			row: 0,
			column: 1,
			signal: signal.clone(),
		}];

		assert_eq!(wire_cells(&element, &body, cells), 1);
		signal.set(Value::from("<10>"));

		assert_eq!(
			element.inner_html(),
			"<tbody class=\"test\"><tr><th>r</th><td>&lt;10&gt;</td><td>2</td></tr></tbody>",
		);
	}

	#[rstest]
	#[serial(reactive)]
	fn test_safe_values_patch_as_markup() {
		let (element, body) = table("<tbody><tr><td>1</td></tr></tbody>");
		let signal = Signal::new(Value::from(1));
		wire_cells(&element, &body, vec![ReactiveCell { row: 0, column: 0, signal: signal.clone() }]);

		signal.set(Value::from(SafeString::new("<b>bold</b>")));
		assert_eq!(element.inner_html(), "<tbody><tr><td><b>bold</b></td></tr></tbody>");

		signal.set(Value::from(SafeString::new("<b")));
		assert_eq!(element.inner_html(), "<tbody><tr><td><b>bold</b></td></tr></tbody>");

		signal.set(Value::Null);
		assert_eq!(element.inner_html(), "<tbody><tr><td></td></tr></tbody>");
	}

	#[rstest]
	#[serial(reactive)]
	fn test_removing_body_disposes_subscriptions() {
		let (element, body) = table("<tbody><tr><td>1</td><td>2</td></tr></tbody>");
		let first = Signal::new(Value::from(1));
		let second = Signal::new(Value::from(2));
		wire_cells(
			&element,
			&body,
			vec![
				ReactiveCell { row: 0, column: 0, signal: first.clone() },
				ReactiveCell { row: 0, column: 1, signal: second.clone() },
			],
		);
		assert_eq!(first.subscription_count(), 1);

		element.clear_children();

		assert_eq!(first.subscription_count(), 0);
		assert_eq!(second.subscription_count(), 0);
		first.set(Value::from(10));
		assert_eq!(body.text_content(), "12");
	}

	#[rstest]
	#[serial(reactive)]
	fn test_patch_is_inert_once_body_is_not_owned() {
		let (element, body) = table("<tbody><tr><td>1</td></tr></tbody>");
		let signal = Signal::new(Value::from(1));
		wire_cells(&element, &body, vec![ReactiveCell { row: 0, column: 0, signal: signal.clone() }]);

		// Moved away without being removed: subscriptions stay alive
		let other = Node::element("table");
		other.append_child(&body);
		signal.set(Value::from(5));

		assert_eq!(signal.subscription_count(), 1);
		assert_eq!(body.text_content(), "1");
	}

	#[rstest]
	#[serial(reactive)]
	fn test_out_of_range_cell_is_ignored() {
		let (element, body) = table("<tbody><tr><td>1</td></tr></tbody>");
		let signal = Signal::new(Value::from(1));
		wire_cells(&element, &body, vec![ReactiveCell { row: 3, column: 0, signal: signal.clone() }]);

		signal.set(Value::from(2));

		assert_eq!(element.text_content(), "1");
	}
}
