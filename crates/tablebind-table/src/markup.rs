//! Markup building.
//!
//! Walks a resolved [`Grid`] and produces the `<thead>`/`<tbody>` markup of
//! a table. Reactive cells are rendered with their current value, read
//! without tracking, and reported back so the caller can patch them later.

use std::fmt::Write as _;

use tablebind_reactive::Signal;

use crate::error::Result;
use crate::options::{DataItem, Header, OptionsSnapshot, TableOptions};
use crate::safe::{escape, escape_value};
use crate::shape::{Grid, resolve_shape};
use crate::value::{Key, Value};

/// A rendered cell whose value is a signal.
#[derive(Debug, Clone)]
pub struct ReactiveCell {
	/// Body row position
	pub row: usize,
	/// Cell position within the row, counting a row header cell
	pub column: usize,
	/// The cell's value
	pub signal: Signal<Value>,
}

/// Output of [`build_markup`].
#[derive(Debug, Clone, Default)]
pub struct Markup {
	/// `<thead>` (if any) followed by `<tbody>`
	pub html: String,
	/// Cells to keep up to date, in render order
	pub reactive_cells: Vec<ReactiveCell>,
}

/// Builds table markup for a resolved grid.
pub fn build_markup(options: &OptionsSnapshot, grid: &Grid) -> Markup {
	let data = options.data.clone().unwrap_or_default();
	let rowheader = options.rowheader.as_ref().and_then(Value::as_list);
	let cell_offset = usize::from(rowheader.is_some());
	let accessor = cell_accessor(options.data_item.as_ref());

	let mut markup = Markup::default();
	let html = &mut markup.html;

	if let Some(header) = &options.header {
		html.push_str("<thead><tr>");
		if rowheader.is_some() {
			html.push_str("<th></th>");
		}
		for (position, column) in grid.columns.iter().enumerate() {
			let label = match header {
				Header::Labels(labels) => header_label(labels, column, position),
				Header::Function(f) => f(column),
				Header::Property(name) => column.property(name),
			};
			let _ = write!(html, "<th>{}</th>", escape_value(&label.track()));
		}
		html.push_str("</tr></thead>");
	}

	let even_class = options.even_class.as_deref().map(escape);

	html.push_str("<tbody>");
	for (row_index, row) in grid.rows.iter().enumerate() {
		match &even_class {
			Some(class) if row_index % 2 == 1 => {
				let _ = write!(html, "<tr class=\"{class}\">");
			}
			_ => html.push_str("<tr>"),
		}

		if let Some(labels) = rowheader {
			let label = labels.get(row_index).cloned().unwrap_or_default();
			let _ = write!(html, "<th>{}</th>", escape_value(&label.track()));
		}

		for (column_index, column) in grid.columns.iter().enumerate() {
			let value = accessor(row, column, &data);

			let class = options
				.class_item
				.as_deref()
				.map(|class_item| cell_class(&data, row, column, class_item))
				.filter(|class| !class.is_null());
			match class {
				Some(class) => {
					let _ = write!(html, "<td class=\"{}\">", escape_value(&class));
				}
				None => html.push_str("<td>"),
			}

			if let Value::Signal(signal) = &value {
				markup.reactive_cells.push(ReactiveCell {
					row: row_index,
					column: column_index + cell_offset,
					signal: signal.clone(),
				});
			}
			let _ = write!(html, "{}</td>", escape_value(&value));
		}
		html.push_str("</tr>");
	}
	html.push_str("</tbody>");

	markup
}

/// Renders a complete `<table>` element as a string.
///
/// No DOM and no subscriptions are involved; reactive cells are rendered
/// with their current values.
///
/// # Errors
///
/// Returns [`TableError::Configuration`](crate::TableError::Configuration)
/// when the options cannot be resolved into a grid.
pub fn render_to_string(options: &TableOptions) -> Result<String> {
	let snapshot = options.snapshot();
	let grid = resolve_shape(&snapshot)?;
	let markup = build_markup(&snapshot, &grid);
	Ok(format!("<table>{}</table>", markup.html))
}

type CellAccessor<'a> = Box<dyn Fn(&Key, &Key, &Value) -> Value + 'a>;

// Turns the configured strategy into one accessor per render.
fn cell_accessor(data_item: Option<&DataItem>) -> CellAccessor<'_> {
	match data_item {
		Some(DataItem::Function(f)) => Box::new(move |row: &Key, column: &Key, data: &Value| f(row, column, data)),
		Some(DataItem::Property(name)) => Box::new(move |row: &Key, column: &Key, data: &Value| {
			let field = Key::from_value(&column.property(name));
			data.get(row).get(&field)
		}),
		None => Box::new(|row: &Key, column: &Key, data: &Value| data.get(row).get(column)),
	}
}

// Index keys pick their own label; name and descriptor keys fall back to the
// column's position.
fn header_label(labels: &[Value], column: &Key, position: usize) -> Value {
	let index = column.index().unwrap_or(position);
	labels.get(index).cloned().unwrap_or_default()
}

// A signal class is read tracked: changing it rebuilds the table.
fn cell_class(data: &Value, row: &Key, column: &Key, class_item: &str) -> Value {
	let field = column.property(class_item);
	if field.is_null() {
		return Value::Null;
	}
	data.get(row).get(&Key::from_value(&field)).track()
}
