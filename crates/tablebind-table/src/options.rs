//! Binding options.
//!
//! [`TableOptions`] is the configuration of one table binding. Every option
//! is a [`Prop`], so any of them may be a plain value, a [`Signal`] or a
//! derived closure; the binding reads them with tracked reads on every render
//! and rerenders when one of them changes.
//!
//! ## Example
//!
//! ```
//! use tablebind_table::{AxisSpec, Header, TableOptions, Value, render_to_string};
//!
//! let options = TableOptions::new()
//! 	.data(Value::list([Value::list([1, 2]), Value::list([3, 4])]))
//! 	.columns(AxisSpec::Count(2))
//! 	.header(Header::labels(["a", "b"]))
//! 	.even_class("even");
//!
//! assert_eq!(
//! 	render_to_string(&options).unwrap(),
//! 	"<table><thead><tr><th>a</th><th>b</th></tr></thead>\
//! 	 <tbody><tr><td>1</td><td>2</td></tr><tr class=\"even\"><td>3</td><td>4</td></tr></tbody></table>",
//! );
//! ```

use std::fmt;
use std::rc::Rc;

use serde::Deserialize;
use tablebind_reactive::Signal;

use crate::error::TableError;
use crate::value::{Key, Value};

/// An option value that may change over time.
pub enum Prop<T: 'static> {
	/// A fixed value
	Static(T),
	/// A signal, read with a tracked `get()`
	Reactive(Signal<T>),
	/// A closure; signals it reads with `get()` are tracked
	Derived(Rc<dyn Fn() -> T>),
}

impl<T: Clone + 'static> Prop<T> {
	/// Builds a derived prop.
	pub fn derived(f: impl Fn() -> T + 'static) -> Self {
		Prop::Derived(Rc::new(f))
	}

	/// Reads the current value, tracking it if it is reactive.
	pub fn get(&self) -> T {
		match self {
			Prop::Static(value) => value.clone(),
			Prop::Reactive(signal) => signal.get(),
			Prop::Derived(f) => f(),
		}
	}
}

impl<T: Clone + 'static> Clone for Prop<T> {
	fn clone(&self) -> Self {
		match self {
			Prop::Static(value) => Prop::Static(value.clone()),
			Prop::Reactive(signal) => Prop::Reactive(signal.clone()),
			Prop::Derived(f) => Prop::Derived(f.clone()),
		}
	}
}

impl<T: fmt::Debug + 'static> fmt::Debug for Prop<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Prop::Static(value) => f.debug_tuple("Static").field(value).finish(),
			Prop::Reactive(signal) => f.debug_tuple("Reactive").field(signal).finish(),
			Prop::Derived(_) => f.write_str("Derived(..)"),
		}
	}
}

impl<T: 'static> From<T> for Prop<T> {
	fn from(value: T) -> Self {
		Prop::Static(value)
	}
}

impl<T: 'static> From<Signal<T>> for Prop<T> {
	fn from(signal: Signal<T>) -> Self {
		Prop::Reactive(signal)
	}
}

impl From<&str> for Prop<String> {
	fn from(value: &str) -> Self {
		Prop::Static(value.to_string())
	}
}

/// A reactive count of rows or columns.
impl From<Signal<usize>> for Prop<AxisSpec> {
	fn from(count: Signal<usize>) -> Self {
		Prop::derived(move || AxisSpec::Count(count.get()))
	}
}

/// How the rows or columns of a table are given.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AxisSpec {
	/// Explicit keys, rendered in order
	Explicit(Vec<Key>),
	/// A count `n`, expanding to the keys `0..n`
	Count(usize),
	/// Inferred from `header` or `data`
	#[default]
	Inferred,
}

/// Column specification
pub type ColumnSpec = AxisSpec;

/// Row specification
pub type RowSpec = AxisSpec;

impl AxisSpec {
	/// Explicit keys from anything convertible into [`Key`].
	pub fn keys<I, K>(keys: I) -> Self
	where
		I: IntoIterator<Item = K>,
		K: Into<Key>,
	{
		AxisSpec::Explicit(keys.into_iter().map(Into::into).collect())
	}

	/// Explicit keys from the elements of an array value.
	///
	/// Returns `None` if `value` is not an array.
	pub fn from_value(value: &Value) -> Option<Self> {
		value
			.as_list()
			.map(|items| AxisSpec::Explicit(items.iter().map(Key::from_value).collect()))
	}
}

impl From<usize> for AxisSpec {
	fn from(count: usize) -> Self {
		AxisSpec::Count(count)
	}
}

impl From<Vec<Key>> for AxisSpec {
	fn from(keys: Vec<Key>) -> Self {
		AxisSpec::Explicit(keys)
	}
}

type DataFn = dyn Fn(&Key, &Key, &Value) -> Value;
type HeaderFn = dyn Fn(&Key) -> Value;

/// How a cell value is obtained.
#[derive(Clone)]
pub enum DataItem {
	/// `f(row_key, column_key, data)`
	Function(Rc<DataFn>),
	/// `data[row_key][column_key[name]]`: the column descriptor names the
	/// row property to read
	Property(String),
}

impl DataItem {
	/// Builds a [`DataItem::Function`].
	pub fn function(f: impl Fn(&Key, &Key, &Value) -> Value + 'static) -> Self {
		DataItem::Function(Rc::new(f))
	}

	/// Builds a [`DataItem::Property`].
	pub fn property(name: impl Into<String>) -> Self {
		DataItem::Property(name.into())
	}
}

impl fmt::Debug for DataItem {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			DataItem::Function(_) => f.write_str("Function(..)"),
			DataItem::Property(name) => f.debug_tuple("Property").field(name).finish(),
		}
	}
}

/// Where header labels come from.
#[derive(Clone)]
pub enum Header {
	/// One label per column position
	Labels(Vec<Value>),
	/// `f(column_key)`
	Function(Rc<HeaderFn>),
	/// `column_key[name]`
	Property(String),
}

impl Header {
	/// Builds [`Header::Labels`].
	pub fn labels<I, V>(labels: I) -> Self
	where
		I: IntoIterator<Item = V>,
		V: Into<Value>,
	{
		Header::Labels(labels.into_iter().map(Into::into).collect())
	}

	/// Builds a [`Header::Function`].
	pub fn function(f: impl Fn(&Key) -> Value + 'static) -> Self {
		Header::Function(Rc::new(f))
	}

	/// Builds a [`Header::Property`].
	pub fn property(name: impl Into<String>) -> Self {
		Header::Property(name.into())
	}
}

impl fmt::Debug for Header {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Header::Labels(labels) => f.debug_tuple("Labels").field(labels).finish(),
			Header::Function(_) => f.write_str("Function(..)"),
			Header::Property(name) => f.debug_tuple("Property").field(name).finish(),
		}
	}
}

/// Options of one table binding.
///
/// Built like the other configuration types: start from [`TableOptions::new`]
/// (or [`Default`]) and chain setters. A bare array converts directly through
/// `From<Value>`.
#[derive(Debug, Clone, Default)]
pub struct TableOptions {
	data: Option<Prop<Value>>,
	data_item: Option<Prop<DataItem>>,
	columns: Option<Prop<AxisSpec>>,
	rows: Option<Prop<AxisSpec>>,
	header: Option<Prop<Header>>,
	rowheader: Option<Prop<Value>>,
	even_class: Option<Prop<String>>,
	class_item: Option<Prop<String>>,
}

impl TableOptions {
	/// Create empty options
	pub fn new() -> Self {
		Self::default()
	}

	/// Set the data source: an array of rows or a record of keyed rows.
	///
	/// A [`Value::Signal`] makes the data reactive.
	pub fn data(mut self, data: impl Into<Value>) -> Self {
		self.data = Some(Prop::Static(data.into()));
		self
	}

	/// Set a data source computed by a closure
	pub fn data_with(mut self, f: impl Fn() -> Value + 'static) -> Self {
		self.data = Some(Prop::derived(f));
		self
	}

	/// Set how cell values are obtained
	pub fn data_item(mut self, data_item: impl Into<Prop<DataItem>>) -> Self {
		self.data_item = Some(data_item.into());
		self
	}

	/// Set the columns
	pub fn columns(mut self, columns: impl Into<Prop<AxisSpec>>) -> Self {
		self.columns = Some(columns.into());
		self
	}

	/// Set the rows
	pub fn rows(mut self, rows: impl Into<Prop<AxisSpec>>) -> Self {
		self.rows = Some(rows.into());
		self
	}

	/// Enable the header row
	pub fn header(mut self, header: impl Into<Prop<Header>>) -> Self {
		self.header = Some(header.into());
		self
	}

	/// Enable per-row header cells; must be an array
	pub fn rowheader(mut self, rowheader: impl Into<Value>) -> Self {
		self.rowheader = Some(Prop::Static(rowheader.into()));
		self
	}

	/// Set the class of every second body row
	pub fn even_class(mut self, even_class: impl Into<Prop<String>>) -> Self {
		self.even_class = Some(even_class.into());
		self
	}

	/// Set the column descriptor property naming each cell's class field
	pub fn class_item(mut self, class_item: impl Into<Prop<String>>) -> Self {
		self.class_item = Some(class_item.into());
		self
	}

	/// Parses declarative JSON options.
	///
	/// Accepts a bare array (the data shorthand) or an object with `data`,
	/// `dataItem` (a property name), `columns`, `rows` (arrays or counts),
	/// `header` (an array or a property name), `rowheader`, `evenClass` and
	/// `classItem`. Unknown fields are rejected.
	///
	/// # Errors
	///
	/// Returns [`TableError::InvalidOptions`] if the input does not parse.
	pub fn from_json(json: &str) -> Result<Self, TableError> {
		let raw: RawOptions = serde_json::from_str(json)?;
		Ok(raw.into())
	}

	/// Reads every option once, with tracked reads.
	///
	/// Signals wrapped in `data` and `rowheader` are unwrapped, so the
	/// running effect depends on them.
	pub fn snapshot(&self) -> OptionsSnapshot {
		OptionsSnapshot {
			data: self.data.as_ref().map(|data| data.get().track()),
			data_item: self.data_item.as_ref().map(Prop::get),
			columns: self.columns.as_ref().map(Prop::get).unwrap_or_default(),
			rows: self.rows.as_ref().map(Prop::get).unwrap_or_default(),
			header: self.header.as_ref().map(Prop::get),
			rowheader: self.rowheader.as_ref().map(|rowheader| rowheader.get().track()),
			even_class: self
				.even_class
				.as_ref()
				.map(Prop::get)
				.filter(|class| !class.is_empty()),
			class_item: self
				.class_item
				.as_ref()
				.map(Prop::get)
				.filter(|name| !name.is_empty()),
		}
	}
}

/// The bare-array shorthand: `value` is the data source.
impl From<Value> for TableOptions {
	fn from(data: Value) -> Self {
		TableOptions::new().data(data)
	}
}

/// Options as read for one render.
#[derive(Debug, Clone, Default)]
pub struct OptionsSnapshot {
	/// Data source, signals unwrapped
	pub data: Option<Value>,
	/// Cell value strategy
	pub data_item: Option<DataItem>,
	/// Column specification
	pub columns: ColumnSpec,
	/// Row specification
	pub rows: RowSpec,
	/// Header strategy
	pub header: Option<Header>,
	/// Row header labels, signals unwrapped
	pub rowheader: Option<Value>,
	/// Class for every second body row
	pub even_class: Option<String>,
	/// Column descriptor property naming each cell's class field
	pub class_item: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOptions {
	Shorthand(Vec<serde_json::Value>),
	Descriptor(RawDescriptor),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawDescriptor {
	data: Option<serde_json::Value>,
	data_item: Option<String>,
	columns: Option<RawAxis>,
	rows: Option<RawAxis>,
	header: Option<RawHeader>,
	rowheader: Option<serde_json::Value>,
	even_class: Option<String>,
	class_item: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAxis {
	Count(usize),
	Keys(Vec<serde_json::Value>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawHeader {
	Labels(Vec<serde_json::Value>),
	Property(String),
}

impl From<RawAxis> for AxisSpec {
	fn from(raw: RawAxis) -> Self {
		match raw {
			RawAxis::Count(count) => AxisSpec::Count(count),
			RawAxis::Keys(keys) => AxisSpec::Explicit(
				keys.into_iter()
					.map(|key| Key::from_value(&Value::from(key)))
					.collect(),
			),
		}
	}
}

impl From<RawHeader> for Header {
	fn from(raw: RawHeader) -> Self {
		match raw {
			RawHeader::Labels(labels) => Header::labels(labels),
			RawHeader::Property(name) => Header::Property(name),
		}
	}
}

impl From<RawOptions> for TableOptions {
	fn from(raw: RawOptions) -> Self {
		match raw {
			RawOptions::Shorthand(rows) => TableOptions::from(Value::list(rows)),
			RawOptions::Descriptor(raw) => {
				let mut options = TableOptions::new();
				if let Some(data) = raw.data {
					options = options.data(data);
				}
				if let Some(name) = raw.data_item {
					options = options.data_item(DataItem::Property(name));
				}
				if let Some(columns) = raw.columns {
					options = options.columns(AxisSpec::from(columns));
				}
				if let Some(rows) = raw.rows {
					options = options.rows(AxisSpec::from(rows));
				}
				if let Some(header) = raw.header {
					options = options.header(Header::from(header));
				}
				if let Some(rowheader) = raw.rowheader {
					options = options.rowheader(rowheader);
				}
				if let Some(even_class) = raw.even_class {
					options = options.even_class(even_class);
				}
				if let Some(class_item) = raw.class_item {
					options = options.class_item(class_item);
				}
				options
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serial_test::serial;

	#[rstest]
	fn test_shorthand_array() {
		let snapshot = TableOptions::from(Value::list([Value::list([1, 2])])).snapshot();

		assert_eq!(snapshot.data, Some(Value::list([Value::list([1, 2])])));
		assert_eq!(snapshot.columns, AxisSpec::Inferred);
		assert_eq!(snapshot.rows, AxisSpec::Inferred);
		assert!(snapshot.header.is_none());
	}

	#[rstest]
	fn test_empty_class_names_are_unset() {
		let snapshot = TableOptions::new().even_class("").class_item("").snapshot();

		assert_eq!(snapshot.even_class, None);
		assert_eq!(snapshot.class_item, None);
	}

	#[rstest]
	fn test_from_json_descriptor() {
		let options = TableOptions::from_json(
			r#"{
				"data": [{"col1": 1}],
				"columns": [{"heading": "a", "datavalue": "col1"}],
				"rows": 1,
				"header": "heading",
				"dataItem": "datavalue",
				"rowheader": ["r"],
				"evenClass": "even",
				"classItem": "cls"
			}"#,
		)
		.unwrap();
		let snapshot = options.snapshot();

		assert_eq!(snapshot.rows, AxisSpec::Count(1));
		assert_eq!(
			snapshot.columns,
			AxisSpec::from_value(&Value::list([Value::record([("heading", "a"), ("datavalue", "col1")])])).unwrap(),
		);
		assert!(matches!(snapshot.header, Some(Header::Property(name)) if name == "heading"));
		assert!(matches!(snapshot.data_item, Some(DataItem::Property(name)) if name == "datavalue"));
		assert_eq!(snapshot.rowheader, Some(Value::list(["r"])));
		assert_eq!(snapshot.even_class.as_deref(), Some("even"));
		assert_eq!(snapshot.class_item.as_deref(), Some("cls"));
	}

	#[rstest]
	fn test_from_json_shorthand_and_header_labels() {
		let shorthand = TableOptions::from_json("[[1, 2], [3, 4]]").unwrap().snapshot();
		let labelled = TableOptions::from_json(r#"{"data": [], "header": ["a", "b"]}"#)
			.unwrap()
			.snapshot();

		assert_eq!(shorthand.data, Some(Value::list([Value::list([1, 2]), Value::list([3, 4])])));
		assert!(matches!(labelled.header, Some(Header::Labels(labels)) if labels.len() == 2));
	}

	#[rstest]
	#[case(r#"{"data": [], "colums": 3}"#)]
	#[case(r#"{"data": [], "columns": -1}"#)]
	#[case(r#"{"dataItem": 5}"#)]
	#[case("not json")]
	fn test_from_json_rejects_invalid_options(#[case] json: &str) {
		assert!(matches!(TableOptions::from_json(json), Err(TableError::InvalidOptions(_))));
	}

	#[rstest]
	#[serial(reactive)]
	fn test_reactive_props_read_current_values() {
		let columns = Signal::new(3usize);
		let class = Signal::new("even".to_string());
		let options = TableOptions::new()
			.data(Value::list(Vec::<Value>::new()))
			.columns(columns.clone())
			.even_class(class.clone());

		columns.set(2);
		class.set("odd".to_string());
		let snapshot = options.snapshot();

		assert_eq!(snapshot.columns, AxisSpec::Count(2));
		assert_eq!(snapshot.even_class.as_deref(), Some("odd"));
	}

	#[rstest]
	#[serial(reactive)]
	fn test_signal_data_is_unwrapped() {
		let rows = Signal::new(Value::list([Value::list([1])]));
		let options = TableOptions::new().data(rows.clone());

		rows.update(|rows| {
			if let Value::List(items) = rows {
				items.push(Value::list([2]));
			}
		});

		assert_eq!(options.snapshot().data, Some(Value::list([Value::list([1]), Value::list([2])])));
	}
}
