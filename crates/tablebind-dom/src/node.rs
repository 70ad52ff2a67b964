//! Element and text nodes.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::DomError;
use crate::html::{escape_attr, escape_text, is_void_element};
use crate::parser::parse_fragment;

type DisposeCallback = Box<dyn FnOnce() + 'static>;

/// What a node is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
	/// An element with a lowercase tag name and ordered attributes.
	Element {
		/// Tag name.
		tag: String,
		/// Attributes in insertion order.
		attributes: Vec<(String, String)>,
	},
	/// A text node.
	Text(String),
}

struct NodeData {
	kind: NodeKind,
	parent: Weak<RefCell<NodeData>>,
	children: Vec<Node>,
	dispose_callbacks: Vec<DisposeCallback>,
}

/// A shared handle to a DOM node.
///
/// Cloning the handle does not clone the node. Equality is identity.
#[derive(Clone)]
pub struct Node(Rc<RefCell<NodeData>>);

/// A non-owning handle to a DOM node.
#[derive(Clone, Default)]
pub struct WeakNode(Weak<RefCell<NodeData>>);

impl WeakNode {
	/// Upgrade to a [`Node`] if it is still alive.
	pub fn upgrade(&self) -> Option<Node> {
		self.0.upgrade().map(Node)
	}
}

impl fmt::Debug for WeakNode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("WeakNode").field(&self.upgrade()).finish()
	}
}

impl Node {
	fn from_kind(kind: NodeKind) -> Self {
		Self(Rc::new(RefCell::new(NodeData {
			kind,
			parent: Weak::new(),
			children: Vec::new(),
			dispose_callbacks: Vec::new(),
		})))
	}

	/// Create a detached element. The tag name is lowercased.
	pub fn element(tag: impl Into<String>) -> Self {
		Self::from_kind(NodeKind::Element {
			tag: tag.into().to_ascii_lowercase(),
			attributes: Vec::new(),
		})
	}

	/// Create a detached text node.
	pub fn text(content: impl Into<String>) -> Self {
		Self::from_kind(NodeKind::Text(content.into()))
	}

	/// A snapshot of what this node is.
	pub fn kind(&self) -> NodeKind {
		self.0.borrow().kind.clone()
	}

	/// Whether this is an element node.
	pub fn is_element(&self) -> bool {
		matches!(self.0.borrow().kind, NodeKind::Element { .. })
	}

	/// The tag name, for elements.
	pub fn tag_name(&self) -> Option<String> {
		match &self.0.borrow().kind {
			NodeKind::Element { tag, .. } => Some(tag.clone()),
			NodeKind::Text(_) => None,
		}
	}

	fn has_tag(&self, wanted: &[&str]) -> bool {
		match &self.0.borrow().kind {
			NodeKind::Element { tag, .. } => wanted.contains(&tag.as_str()),
			NodeKind::Text(_) => false,
		}
	}

	/// Read an attribute.
	pub fn attr(&self, name: &str) -> Option<String> {
		match &self.0.borrow().kind {
			NodeKind::Element { attributes, .. } => attributes
				.iter()
				.find(|(key, _)| key == name)
				.map(|(_, value)| value.clone()),
			NodeKind::Text(_) => None,
		}
	}

	/// Set an attribute, keeping its position if it already exists.
	///
	/// Ignored on text nodes.
	pub fn set_attr(&self, name: impl Into<String>, value: impl Into<String>) {
		let name = name.into().to_ascii_lowercase();
		let value = value.into();
		if let NodeKind::Element { attributes, .. } = &mut self.0.borrow_mut().kind {
			match attributes.iter_mut().find(|(key, _)| *key == name) {
				Some((_, existing)) => *existing = value,
				None => attributes.push((name, value)),
			}
		}
	}

	/// Remove an attribute, returning its previous value.
	pub fn remove_attr(&self, name: &str) -> Option<String> {
		if let NodeKind::Element { attributes, .. } = &mut self.0.borrow_mut().kind {
			let index = attributes.iter().position(|(key, _)| key == name)?;
			return Some(attributes.remove(index).1);
		}
		None
	}

	/// All attributes in order.
	pub fn attributes(&self) -> Vec<(String, String)> {
		match &self.0.borrow().kind {
			NodeKind::Element { attributes, .. } => attributes.clone(),
			NodeKind::Text(_) => Vec::new(),
		}
	}

	/// The parent node, if attached.
	pub fn parent(&self) -> Option<Node> {
		self.0.borrow().parent.upgrade().map(Node)
	}

	/// Child nodes in order.
	pub fn children(&self) -> Vec<Node> {
		self.0.borrow().children.clone()
	}

	/// Element children in order.
	pub fn child_elements(&self) -> Vec<Node> {
		self.0
			.borrow()
			.children
			.iter()
			.filter(|child| child.is_element())
			.cloned()
			.collect()
	}

	/// First child node.
	pub fn first_child(&self) -> Option<Node> {
		self.0.borrow().children.first().cloned()
	}

	/// Append `child`, moving it out of its current parent if it has one.
	///
	/// Moving is not a removal: no disposal callbacks run.
	pub fn append_child(&self, child: &Node) {
		child.detach();
		child.0.borrow_mut().parent = Rc::downgrade(&self.0);
		self.0.borrow_mut().children.push(child.clone());
	}

	fn detach(&self) {
		let Some(parent) = self.parent() else {
			return;
		};
		parent
			.0
			.borrow_mut()
			.children
			.retain(|sibling| !sibling.ptr_eq(self));
		self.0.borrow_mut().parent = Weak::new();
	}

	/// Detach this node from its parent and run the disposal callbacks of
	/// the whole subtree.
	pub fn remove(&self) {
		self.detach();
		self.clean();
	}

	/// Remove every child, running their disposal callbacks.
	pub fn clear_children(&self) {
		let removed = std::mem::take(&mut self.0.borrow_mut().children);
		for child in &removed {
			child.0.borrow_mut().parent = Weak::new();
		}
		for child in &removed {
			child.clean();
		}
	}

	/// Replace every child with `nodes`.
	pub fn replace_children(&self, nodes: impl IntoIterator<Item = Node>) {
		self.clear_children();
		for node in nodes {
			self.append_child(&node);
		}
	}

	/// Concatenated text of the subtree.
	pub fn text_content(&self) -> String {
		let mut output = String::new();
		self.collect_text(&mut output);
		output
	}

	fn collect_text(&self, output: &mut String) {
		let data = self.0.borrow();
		match &data.kind {
			NodeKind::Text(text) => output.push_str(text),
			NodeKind::Element { .. } => {
				for child in &data.children {
					child.collect_text(output);
				}
			}
		}
	}

	/// Replace the children with a single text node (or nothing when empty).
	///
	/// On a text node this replaces its content.
	pub fn set_text_content(&self, content: impl Into<String>) {
		let content = content.into();
		if let NodeKind::Text(text) = &mut self.0.borrow_mut().kind {
			*text = content;
			return;
		}
		self.clear_children();
		if !content.is_empty() {
			self.append_child(&Node::text(content));
		}
	}

	/// Serialized markup of the children.
	pub fn inner_html(&self) -> String {
		let mut output = String::new();
		for child in self.0.borrow().children.iter() {
			child.write_html(&mut output);
		}
		output
	}

	/// Serialized markup of this node.
	pub fn outer_html(&self) -> String {
		let mut output = String::new();
		self.write_html(&mut output);
		output
	}

	fn write_html(&self, output: &mut String) {
		let data = self.0.borrow();
		match &data.kind {
			NodeKind::Text(text) => output.push_str(&escape_text(text)),
			NodeKind::Element { tag, attributes } => {
				output.push('<');
				output.push_str(tag);
				for (name, value) in attributes {
					output.push(' ');
					output.push_str(name);
					output.push_str("=\"");
					output.push_str(&escape_attr(value));
					output.push('"');
				}
				output.push('>');
				if is_void_element(tag) {
					return;
				}
				for child in &data.children {
					child.write_html(output);
				}
				output.push_str("</");
				output.push_str(tag);
				output.push('>');
			}
		}
	}

	/// Parse `markup` and make the result the new children.
	///
	/// Nothing is modified when the markup fails to parse.
	pub fn set_inner_html(&self, markup: &str) -> Result<(), DomError> {
		let nodes = parse_fragment(markup)?;
		self.replace_children(nodes);
		Ok(())
	}

	/// Register work to run once when this node is removed or cleaned.
	pub fn add_dispose_callback(&self, callback: impl FnOnce() + 'static) {
		self.0.borrow_mut().dispose_callbacks.push(Box::new(callback));
	}

	/// Number of pending disposal callbacks on this node.
	pub fn dispose_callback_count(&self) -> usize {
		self.0.borrow().dispose_callbacks.len()
	}

	/// Run and forget the disposal callbacks of this node and its
	/// descendants, without detaching anything.
	pub fn clean(&self) {
		let callbacks = std::mem::take(&mut self.0.borrow_mut().dispose_callbacks);
		if !callbacks.is_empty() {
			tracing::trace!(count = callbacks.len(), "running dispose callbacks");
		}
		for callback in callbacks {
			callback();
		}
		for child in self.children() {
			child.clean();
		}
	}

	/// Whether two handles point at the same node.
	pub fn ptr_eq(&self, other: &Node) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}

	/// A non-owning handle.
	pub fn downgrade(&self) -> WeakNode {
		WeakNode(Rc::downgrade(&self.0))
	}

	/// First `<thead>` child.
	pub fn t_head(&self) -> Option<Node> {
		self.child_elements()
			.into_iter()
			.find(|child| child.has_tag(&["thead"]))
	}

	/// First `<tbody>` child.
	pub fn t_body(&self) -> Option<Node> {
		self.child_elements()
			.into_iter()
			.find(|child| child.has_tag(&["tbody"]))
	}

	/// `<tr>` children.
	pub fn rows(&self) -> Vec<Node> {
		self.child_elements()
			.into_iter()
			.filter(|child| child.has_tag(&["tr"]))
			.collect()
	}

	/// `<td>` and `<th>` children.
	pub fn cells(&self) -> Vec<Node> {
		self.child_elements()
			.into_iter()
			.filter(|child| child.has_tag(&["td", "th"]))
			.collect()
	}
}

impl PartialEq for Node {
	fn eq(&self, other: &Self) -> bool {
		self.ptr_eq(other)
	}
}

impl Eq for Node {}

impl fmt::Debug for Node {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Node").field(&self.outer_html()).finish()
	}
}
