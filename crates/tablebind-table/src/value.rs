//! Dynamic values and keys.
//!
//! Table data is heterogeneous: rows may be arrays or records, cells may be
//! numbers, strings, safe markup or reactive signals. [`Value`] models that
//! data, [`Key`] models the row and column keys used to index into it.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use tablebind_reactive::Signal;

use crate::safe::SafeString;

/// A record: named fields in key order.
pub type Record = BTreeMap<String, Value>;

/// A dynamically typed table value.
#[derive(Debug, Clone, Default)]
pub enum Value {
	/// Missing value; renders as an empty string
	#[default]
	Null,
	/// Boolean
	Bool(bool),
	/// Integer
	Int(i64),
	/// Floating point number
	Float(f64),
	/// Text, escaped when rendered
	Text(String),
	/// Markup embedded verbatim
	Safe(SafeString),
	/// Array
	List(Vec<Value>),
	/// Object
	Record(Record),
	/// Reactive value
	Signal(Signal<Value>),
}

impl Value {
	/// Builds a [`Value::List`].
	pub fn list<I, V>(items: I) -> Self
	where
		I: IntoIterator<Item = V>,
		V: Into<Value>,
	{
		Value::List(items.into_iter().map(Into::into).collect())
	}

	/// Builds a [`Value::Record`].
	pub fn record<I, K, V>(fields: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<Value>,
	{
		Value::Record(
			fields
				.into_iter()
				.map(|(name, value)| (name.into(), value.into()))
				.collect(),
		)
	}

	/// Returns whether this is [`Value::Null`].
	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}

	/// Returns the items if this is a list.
	pub fn as_list(&self) -> Option<&[Value]> {
		match self {
			Value::List(items) => Some(items),
			_ => None,
		}
	}

	/// Returns the fields if this is a record.
	pub fn as_record(&self) -> Option<&Record> {
		match self {
			Value::Record(fields) => Some(fields),
			_ => None,
		}
	}

	/// Returns the signal if this is a reactive value.
	pub fn as_signal(&self) -> Option<&Signal<Value>> {
		match self {
			Value::Signal(signal) => Some(signal),
			_ => None,
		}
	}

	/// Returns the number if this is an integer or a float.
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Value::Int(n) => Some(*n as f64),
			Value::Float(n) => Some(*n),
			_ => None,
		}
	}

	/// Unwraps signals with a tracked read until a plain value is reached.
	///
	/// Inside an effect, this makes the effect depend on every signal that was
	/// unwrapped.
	pub fn track(self) -> Value {
		let mut value = self;
		while let Value::Signal(signal) = value {
			value = signal.get();
		}
		value
	}

	/// Looks up `key` in this value.
	///
	/// Lists are indexed by position (a numeric name works too), records by
	/// name (an index is looked up by its decimal form). A signal is read with
	/// a tracked `get()` before indexing, so replacing a container is seen by
	/// the running effect. The returned value itself is not unwrapped. Any
	/// other combination yields [`Value::Null`].
	pub fn get(&self, key: &Key) -> Value {
		match self {
			Value::Signal(signal) => signal.get().get(key),
			Value::List(items) => key
				.list_index()
				.and_then(|index| items.get(index))
				.cloned()
				.unwrap_or_default(),
			Value::Record(fields) => key
				.field_name()
				.and_then(|name| fields.get(&*name))
				.cloned()
				.unwrap_or_default(),
			_ => Value::Null,
		}
	}

	/// Looks up a named field. Shorthand for `get(&Key::Name(..))`.
	pub fn field(&self, name: &str) -> Value {
		self.get(&Key::Name(name.to_string()))
	}
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Value::Null, Value::Null) => true,
			(Value::Bool(a), Value::Bool(b)) => a == b,
			(Value::Int(a), Value::Int(b)) => a == b,
			(Value::Float(a), Value::Float(b)) => a == b,
			(Value::Text(a), Value::Text(b)) => a == b,
			(Value::Safe(a), Value::Safe(b)) => a == b,
			(Value::List(a), Value::List(b)) => a == b,
			(Value::Record(a), Value::Record(b)) => a == b,
			// Signals are equal when they are the same signal
			(Value::Signal(a), Value::Signal(b)) => a.id() == b.id(),
			_ => false,
		}
	}
}

/// The text form of a value, before escaping.
///
/// Lists are comma-joined and records have no text form. A signal shows its
/// current value without tracking it.
impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Null | Value::Record(_) => Ok(()),
			Value::Bool(b) => write!(f, "{b}"),
			Value::Int(n) => write!(f, "{n}"),
			Value::Float(n) => write_number(f, *n),
			Value::Text(text) => f.write_str(text),
			Value::Safe(safe) => f.write_str(safe.as_str()),
			Value::List(items) => {
				for (index, item) in items.iter().enumerate() {
					if index > 0 {
						f.write_str(",")?;
					}
					write!(f, "{item}")?;
				}
				Ok(())
			}
			Value::Signal(signal) => signal.with_peek(|value| write!(f, "{value}")),
		}
	}
}

// Number-to-text the way scripting hosts print numbers: no negative zero,
// `Infinity`, and exponent notation outside `1e-6 <= |n| < 1e21`.
fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
	if n == 0.0 {
		return f.write_str("0");
	}
	if n.is_infinite() {
		return f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" });
	}
	let magnitude = n.abs();
	if n.is_nan() || (1e-6..1e21).contains(&magnitude) {
		return write!(f, "{n}");
	}
	let exponent = format!("{n:e}");
	match exponent.split_once('e') {
		Some((mantissa, power)) if !power.starts_with('-') => write!(f, "{mantissa}e+{power}"),
		_ => f.write_str(&exponent),
	}
}

macro_rules! impl_from_int {
	($($ty:ty),*) => {
		$(
			impl From<$ty> for Value {
				fn from(n: $ty) -> Self {
					Value::Int(i64::from(n))
				}
			}
		)*
	};
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<usize> for Value {
	fn from(n: usize) -> Self {
		i64::try_from(n).map_or(Value::Float(n as f64), Value::Int)
	}
}

impl From<f64> for Value {
	fn from(n: f64) -> Self {
		Value::Float(n)
	}
}

impl From<bool> for Value {
	fn from(b: bool) -> Self {
		Value::Bool(b)
	}
}

impl From<&str> for Value {
	fn from(text: &str) -> Self {
		Value::Text(text.to_string())
	}
}

impl From<String> for Value {
	fn from(text: String) -> Self {
		Value::Text(text)
	}
}

impl From<SafeString> for Value {
	fn from(safe: SafeString) -> Self {
		Value::Safe(safe)
	}
}

impl From<Signal<Value>> for Value {
	fn from(signal: Signal<Value>) -> Self {
		Value::Signal(signal)
	}
}

impl From<Vec<Value>> for Value {
	fn from(items: Vec<Value>) -> Self {
		Value::List(items)
	}
}

impl From<Record> for Value {
	fn from(fields: Record) -> Self {
		Value::Record(fields)
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(value: Option<T>) -> Self {
		value.map_or(Value::Null, Into::into)
	}
}

impl From<serde_json::Value> for Value {
	fn from(json: serde_json::Value) -> Self {
		match json {
			serde_json::Value::Null => Value::Null,
			serde_json::Value::Bool(b) => Value::Bool(b),
			serde_json::Value::Number(n) => n
				.as_i64()
				.map(Value::Int)
				.unwrap_or_else(|| Value::Float(n.as_f64().unwrap_or(f64::NAN))),
			serde_json::Value::String(text) => Value::Text(text),
			serde_json::Value::Array(items) => Value::list(items),
			serde_json::Value::Object(fields) => Value::record(fields),
		}
	}
}

/// A row or column key.
///
/// Keys are what the shape resolver produces and what cell accessors,
/// header functions and `dataItem` functions receive.
#[derive(Debug, Clone, PartialEq)]
pub enum Key {
	/// Position in an array, or one step of an implicit `0..n` range
	Index(usize),
	/// Property name
	Name(String),
	/// Column or row descriptor object
	Descriptor(Record),
}

impl Key {
	/// Converts an element of a `columns`/`rows` array into a key.
	///
	/// Non-negative integers become indexes, records become descriptors and
	/// everything else is keyed by its text form.
	pub fn from_value(value: &Value) -> Key {
		match value {
			Value::Int(n) => usize::try_from(*n).map_or_else(|_| Key::Name(n.to_string()), Key::Index),
			Value::Float(n) if *n >= 0.0 && n.fract() == 0.0 && *n <= usize::MAX as f64 => {
				Key::Index(*n as usize)
			}
			Value::Text(name) => Key::Name(name.clone()),
			Value::Record(fields) => Key::Descriptor(fields.clone()),
			Value::Signal(signal) => Key::from_value(&signal.peek()),
			other => Key::Name(other.to_string()),
		}
	}

	/// The index, if this is an [`Key::Index`].
	pub fn index(&self) -> Option<usize> {
		match self {
			Key::Index(index) => Some(*index),
			_ => None,
		}
	}

	/// The name, if this is a [`Key::Name`].
	pub fn name(&self) -> Option<&str> {
		match self {
			Key::Name(name) => Some(name),
			_ => None,
		}
	}

	/// Reads a property of a descriptor key; other keys have no properties.
	pub fn property(&self, name: &str) -> Value {
		match self {
			Key::Descriptor(fields) => fields.get(name).cloned().unwrap_or_default(),
			_ => Value::Null,
		}
	}

	/// The key as a value, for passing to user functions.
	pub fn to_value(&self) -> Value {
		match self {
			Key::Index(index) => Value::from(*index),
			Key::Name(name) => Value::Text(name.clone()),
			Key::Descriptor(fields) => Value::Record(fields.clone()),
		}
	}

	fn list_index(&self) -> Option<usize> {
		match self {
			Key::Index(index) => Some(*index),
			Key::Name(name) => name.parse().ok(),
			Key::Descriptor(_) => None,
		}
	}

	fn field_name(&self) -> Option<Cow<'_, str>> {
		match self {
			Key::Index(index) => Some(Cow::Owned(index.to_string())),
			Key::Name(name) => Some(Cow::Borrowed(name)),
			Key::Descriptor(_) => None,
		}
	}
}

impl From<usize> for Key {
	fn from(index: usize) -> Self {
		Key::Index(index)
	}
}

impl From<&str> for Key {
	fn from(name: &str) -> Self {
		Key::Name(name.to_string())
	}
}

impl From<String> for Key {
	fn from(name: String) -> Self {
		Key::Name(name)
	}
}

impl From<Record> for Key {
	fn from(fields: Record) -> Self {
		Key::Descriptor(fields)
	}
}
