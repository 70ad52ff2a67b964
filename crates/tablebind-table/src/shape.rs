//! Shape resolution: from options to a rows × columns grid of keys.

use crate::error::ConfigurationError;
use crate::options::{AxisSpec, DataItem, Header, OptionsSnapshot};
use crate::value::{Key, Value};

/// The resolved grid: the row keys and column keys of one render, in order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Grid {
	/// Row keys
	pub rows: Vec<Key>,
	/// Column keys
	pub columns: Vec<Key>,
}

impl Grid {
	/// Number of body rows
	pub fn row_count(&self) -> usize {
		self.rows.len()
	}

	/// Number of data columns, not counting a row header
	pub fn column_count(&self) -> usize {
		self.columns.len()
	}
}

/// Resolves the rows and columns of a table.
///
/// Rows come from an explicit `rows` option, else from the length of an
/// array `data`. Columns come from an explicit `columns` option, else from
/// the length of a `header` array, else from the longest array row of an
/// array `data` (an empty `data` array gives zero columns).
///
/// # Errors
///
/// Checked in order: a missing data source (no `data` and no `dataItem`
/// function), unresolvable rows, unresolvable columns, and a `rowheader`
/// that is not an array.
pub fn resolve_shape(options: &OptionsSnapshot) -> Result<Grid, ConfigurationError> {
	let data = options.data.as_ref().filter(|data| !data.is_null());
	let has_data_function = matches!(options.data_item, Some(DataItem::Function(_)));
	if data.is_none() && !has_data_function {
		return Err(ConfigurationError::MissingDataSource);
	}

	let rows = resolve_axis(&options.rows)
		.or_else(|| data.and_then(Value::as_list).map(|items| indexes(items.len())))
		.ok_or(ConfigurationError::MissingRows)?;

	let columns = resolve_axis(&options.columns)
		.or_else(|| match &options.header {
			Some(Header::Labels(labels)) => Some(indexes(labels.len())),
			_ => None,
		})
		.or_else(|| data.and_then(Value::as_list).and_then(infer_column_count).map(indexes))
		.ok_or(ConfigurationError::MissingColumns)?;

	if let Some(rowheader) = &options.rowheader
		&& !rowheader.is_null()
		&& rowheader.as_list().is_none()
	{
		return Err(ConfigurationError::RowHeaderNotArray);
	}

	Ok(Grid { rows, columns })
}

fn resolve_axis(spec: &AxisSpec) -> Option<Vec<Key>> {
	match spec {
		AxisSpec::Explicit(keys) => Some(keys.clone()),
		AxisSpec::Count(count) => Some(indexes(*count)),
		AxisSpec::Inferred => None,
	}
}

fn indexes(count: usize) -> Vec<Key> {
	(0..count).map(Key::Index).collect()
}

// The widest array row. Rows may themselves be signals; reading them here
// makes a row replacement a structural change.
fn infer_column_count(rows: &[Value]) -> Option<usize> {
	if rows.is_empty() {
		return Some(0);
	}
	rows.iter()
		.filter_map(|row| row.clone().track().as_list().map(<[Value]>::len))
		.max()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::options::TableOptions;
	use proptest::prelude::*;
	use rstest::rstest;

	fn grid_of(rows: usize, columns: usize) -> Grid {
		Grid {
			rows: indexes(rows),
			columns: indexes(columns),
		}
	}

	fn nine() -> Value {
		Value::list([Value::list([1, 2, 3]), Value::list([4, 5, 6]), Value::list([7, 8, 9])])
	}

	#[rstest]
	fn test_infers_rows_and_columns_from_arrays() {
		let grid = resolve_shape(&TableOptions::from(nine()).snapshot()).unwrap();

		assert_eq!(grid, grid_of(3, 3));
	}

	#[rstest]
	fn test_ragged_rows_use_widest_row() {
		let data = Value::list([Value::list([1]), Value::list([1, 2, 3]), Value::from("x")]);

		let grid = resolve_shape(&TableOptions::from(data).snapshot()).unwrap();

		assert_eq!(grid.column_count(), 3);
		assert_eq!(grid.row_count(), 3);
	}

	#[rstest]
	fn test_explicit_options_win() {
		let options = TableOptions::from(nine())
			.columns(AxisSpec::keys([2usize, 0]))
			.rows(AxisSpec::Count(1))
			.header(Header::labels(["a", "b", "c", "d"]));

		let grid = resolve_shape(&options.snapshot()).unwrap();

		assert_eq!(grid.rows, vec![Key::Index(0)]);
		assert_eq!(grid.columns, vec![Key::Index(2), Key::Index(0)]);
	}

	#[rstest]
	fn test_header_labels_give_column_count() {
		let options = TableOptions::from(Value::list([Value::record([("a", 1)])]))
			.header(Header::labels(["a", "b"]));

		assert_eq!(resolve_shape(&options.snapshot()).unwrap(), grid_of(1, 2));
	}

	#[rstest]
	fn test_empty_data_has_no_columns() {
		let options = TableOptions::from(Value::list(Vec::<Value>::new()));

		assert_eq!(resolve_shape(&options.snapshot()).unwrap(), Grid::default());
	}

	#[rstest]
	fn test_data_function_needs_no_data() {
		let options = TableOptions::new()
			.data_item(DataItem::function(|_, _, _| Value::Null))
			.rows(AxisSpec::Count(2))
			.columns(AxisSpec::Count(4));

		assert_eq!(resolve_shape(&options.snapshot()).unwrap(), grid_of(2, 4));
	}

	#[rstest]
	#[case::no_data(TableOptions::new().columns(AxisSpec::Count(1)), ConfigurationError::MissingDataSource)]
	#[case::property_data_item_without_data(
		TableOptions::new().data_item(DataItem::property("p")).rows(AxisSpec::Count(1)),
		ConfigurationError::MissingDataSource
	)]
	#[case::keyed_data_without_rows(
		TableOptions::new().data(Value::record([("r", Value::list([1]))])).columns(AxisSpec::Count(1)),
		ConfigurationError::MissingRows
	)]
	#[case::function_without_rows(
		TableOptions::new().data_item(DataItem::function(|_, _, _| Value::Null)).columns(AxisSpec::Count(1)),
		ConfigurationError::MissingRows
	)]
	#[case::record_rows_without_columns(
		TableOptions::from(Value::list([Value::record([("a", 1)])])),
		ConfigurationError::MissingColumns
	)]
	#[case::header_function_without_columns(
		TableOptions::from(Value::list([Value::record([("a", 1)])])).header(Header::function(|_| Value::Null)),
		ConfigurationError::MissingColumns
	)]
	#[case::rowheader_not_array(
		TableOptions::from(Value::list([Value::list([1])])).rowheader("labels"),
		ConfigurationError::RowHeaderNotArray
	)]
	#[case::rows_checked_before_columns(
		TableOptions::new().data(Value::record([("r", 1)])),
		ConfigurationError::MissingRows
	)]
	fn test_configuration_errors(#[case] options: TableOptions, #[case] expected: ConfigurationError) {
		assert_eq!(resolve_shape(&options.snapshot()), Err(expected));
	}

	proptest! {
		#[test]
		fn explicit_counts_expand_to_ranges(rows in 0usize..64, columns in 0usize..64) {
			let options = TableOptions::from(Value::list(Vec::<Value>::new()))
				.rows(AxisSpec::Count(rows))
				.columns(AxisSpec::Count(columns));

			prop_assert_eq!(resolve_shape(&options.snapshot()).unwrap(), grid_of(rows, columns));
		}

		#[test]
		fn inferred_shape_matches_array_data(widths in prop::collection::vec(0usize..8, 1..16)) {
			let data = Value::list(widths.iter().map(|&width| Value::list(vec![0; width])));

			let grid = resolve_shape(&TableOptions::from(data).snapshot()).unwrap();

			prop_assert_eq!(grid.row_count(), widths.len());
			prop_assert_eq!(Some(grid.column_count()), widths.iter().copied().max());
		}
	}
}
