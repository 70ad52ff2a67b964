//! The facade crate exposes the member crates and a working prelude.

#![cfg(feature = "table")]

use rstest::rstest;
use serial_test::serial;
use tablebind::prelude::*;

#[rstest]
#[serial(reactive)]
fn test_prelude_binds_and_patches() {
	let stock = Signal::new(Value::from(3));
	let element = Node::element("table");
	let binding = TableBinding::bind(
		&element,
		TableOptions::new()
			.data(Value::list([Value::list([Value::from("pen"), Value::from(stock.clone())])]))
			.header(Header::labels(["item", "stock"]))
			.even_class("even"),
	)
	.unwrap();

	stock.set(Value::from(SafeString::new("<em>0</em>")));

	assert_eq!(
		element.inner_html(),
		"<thead><tr><th>item</th><th>stock</th></tr></thead>\
		 <tbody><tr><td>pen</td><td><em>0</em></td></tr></tbody>",
	);
	assert_eq!(binding.render_count(), 1);
}

#[rstest]
#[serial(reactive)]
fn test_configuration_errors_surface_through_facade() {
	let element = Node::element("table");

	let result = TableBinding::bind(&element, TableOptions::new().columns(AxisSpec::Count(2)));

	assert!(matches!(
		result,
		Err(TableError::Configuration(tablebind::table::ConfigurationError::MissingDataSource))
	));
}

#[rstest]
fn test_render_to_string_through_module_path() {
	let html = tablebind::table::render_to_string(&TableOptions::from(Value::list([Value::list([1])]))).unwrap();

	assert_eq!(html, "<table><tbody><tr><td>1</td></tr></tbody></table>");
	assert_eq!(tablebind::dom::parse_fragment(&html).unwrap().len(), 1);
}
