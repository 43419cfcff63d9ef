//! Node model: intrinsic elements, function components and fragments.

use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Attribute mapping of an intrinsic element.
///
/// Keys are unique and iteration follows insertion order, which is also the
/// order attributes are emitted in.
pub type Attributes = Map<String, Value>;

/// A renderable tree node.
#[derive(Debug, Clone)]
pub enum Node {
	/// A literal tag such as `div` or `img`.
	Element(Element),
	/// A function component, evaluated lazily at render time.
	Component(Component),
	/// Children rendered back to back with no wrapping tag.
	Fragment(Vec<Child>),
}

/// A child of an element, fragment or component.
///
/// `Bool` and `Null` render as nothing, so `cond.then(|| node)` and plain
/// booleans are valid child expressions. `List` nests arbitrarily and is
/// flattened before rendering.
///
/// Integers are kept exactly in `Integer`; only floating-point values go
/// through `Number`. A non-finite `Number` renders as `NaN`, `Infinity` or
/// `-Infinity`, while the same value passed to [`Element::attr`] converts to
/// JSON `null` and the attribute is omitted.
#[derive(Debug, Clone)]
pub enum Child {
	Text(String),
	Integer(i128),
	Number(f64),
	Bool(bool),
	Null,
	Node(Node),
	List(Vec<Child>),
}

/// An intrinsic element: tag name, ordered attributes and children.
#[derive(Debug, Clone)]
pub struct Element {
	tag: Cow<'static, str>,
	attrs: Attributes,
	children: Vec<Child>,
}

impl Element {
	/// Creates an element with no attributes or children.
	pub fn new(tag: impl Into<Cow<'static, str>>) -> Self {
		Self {
			tag: tag.into(),
			attrs: Attributes::new(),
			children: Vec::new(),
		}
	}

	/// Sets an attribute. Re-setting a key keeps its original position.
	///
	/// Values go through `serde_json`, so a non-finite float becomes `null`
	/// and the attribute is not emitted.
	pub fn attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.attrs.insert(key.into(), value.into());
		self
	}

	/// Sets several attributes in iteration order.
	pub fn attrs<I, K, V>(mut self, attrs: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<Value>,
	{
		for (key, value) in attrs {
			self.attrs.insert(key.into(), value.into());
		}
		self
	}

	/// Merges the entries of a JSON object into the attributes.
	///
	/// Non-object values are ignored.
	///
	/// ```
	/// use missive_markup::Element;
	/// use serde_json::json;
	///
	/// let link = Element::new("a").with_attrs(json!({ "href": "/docs", "title": "Docs" }));
	/// assert_eq!(link.attributes().len(), 2);
	/// ```
	pub fn with_attrs(mut self, attrs: Value) -> Self {
		if let Value::Object(map) = attrs {
			self.attrs.extend(map);
		}
		self
	}

	/// Sets the `className` attribute, emitted as `class`.
	pub fn class(self, class: impl Into<String>) -> Self {
		self.attr("className", class.into())
	}

	/// Sets the `id` attribute.
	pub fn id(self, id: impl Into<String>) -> Self {
		self.attr("id", id.into())
	}

	/// Sets the `style` attribute from a camelCase style object.
	pub fn style(self, style: Value) -> Self {
		self.attr("style", style)
	}

	/// Appends a child.
	pub fn child(mut self, child: impl IntoChild) -> Self {
		self.children.push(child.into_child());
		self
	}

	/// Appends several children.
	pub fn children(mut self, children: impl IntoIterator<Item = impl IntoChild>) -> Self {
		self.children
			.extend(children.into_iter().map(IntoChild::into_child));
		self
	}

	pub fn tag(&self) -> &str {
		&self.tag
	}

	pub fn attributes(&self) -> &Attributes {
		&self.attrs
	}

	pub fn child_nodes(&self) -> &[Child] {
		&self.children
	}
}

type RenderFn = dyn Fn(&[Child]) -> Node + Send + Sync;

/// A function component with its captured properties.
///
/// The function receives its properties together with the children the
/// component was given and returns anything convertible into a [`Node`].
///
/// ```
/// use missive_markup::{Child, Component, Element, render};
///
/// struct Greeting {
/// 	name: String,
/// }
///
/// fn greeting(props: &Greeting, children: &[Child]) -> Element {
/// 	Element::new("p")
/// 		.child(format!("Hello, {}!", props.name))
/// 		.children(children.to_vec())
/// }
///
/// let node = Component::new("Greeting", greeting, Greeting { name: "Ada".into() })
/// 	.child(" Welcome.");
/// assert_eq!(render(&node.into()), "<p>Hello, Ada! Welcome.</p>");
/// ```
#[derive(Clone)]
pub struct Component {
	name: Cow<'static, str>,
	render: Arc<RenderFn>,
	children: Vec<Child>,
}

impl Component {
	pub fn new<P, F, R>(name: impl Into<Cow<'static, str>>, func: F, props: P) -> Self
	where
		P: Send + Sync + 'static,
		F: Fn(&P, &[Child]) -> R + Send + Sync + 'static,
		R: IntoNode,
	{
		let render = move |children: &[Child]| func(&props, children).into_node();
		Self {
			name: name.into(),
			render: Arc::new(render),
			children: Vec::new(),
		}
	}

	/// Appends a child passed to the component function.
	pub fn child(mut self, child: impl IntoChild) -> Self {
		self.children.push(child.into_child());
		self
	}

	/// Appends several children passed to the component function.
	pub fn with_children(mut self, children: impl IntoIterator<Item = impl IntoChild>) -> Self {
		self.children
			.extend(children.into_iter().map(IntoChild::into_child));
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Invokes the component function with its properties and children.
	pub fn evaluate(&self) -> Node {
		(self.render)(&self.children)
	}
}

impl fmt::Debug for Component {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Component")
			.field("name", &self.name)
			.field("children", &self.children)
			.finish_non_exhaustive()
	}
}

impl Node {
	/// Creates an element node builder.
	pub fn element(tag: impl Into<Cow<'static, str>>) -> Element {
		Element::new(tag)
	}

	/// Creates a fragment node.
	pub fn fragment(children: impl IntoIterator<Item = impl IntoChild>) -> Self {
		Self::Fragment(children.into_iter().map(IntoChild::into_child).collect())
	}

	/// An empty fragment; renders as the empty string.
	pub fn empty() -> Self {
		Self::Fragment(Vec::new())
	}

	/// Renders this node to an HTML string.
	pub fn render_to_string(&self) -> String {
		crate::render::render(self)
	}
}

/// Shorthand for [`Element::new`].
pub fn h(tag: impl Into<Cow<'static, str>>) -> Element {
	Element::new(tag)
}

/// Shorthand for [`Node::fragment`].
pub fn fragment(children: impl IntoIterator<Item = impl IntoChild>) -> Node {
	Node::fragment(children)
}

/// Conversion into a [`Child`].
pub trait IntoChild {
	fn into_child(self) -> Child;
}

/// Conversion into a [`Node`], used for component return values.
pub trait IntoNode {
	fn into_node(self) -> Node;
}

impl IntoNode for Node {
	fn into_node(self) -> Node {
		self
	}
}

impl IntoNode for Element {
	fn into_node(self) -> Node {
		Node::Element(self)
	}
}

impl IntoNode for Component {
	fn into_node(self) -> Node {
		Node::Component(self)
	}
}

impl IntoNode for Child {
	fn into_node(self) -> Node {
		match self {
			Child::Node(node) => node,
			other => Node::Fragment(vec![other]),
		}
	}
}

impl From<Element> for Node {
	fn from(element: Element) -> Self {
		Node::Element(element)
	}
}

impl From<Component> for Node {
	fn from(component: Component) -> Self {
		Node::Component(component)
	}
}

impl IntoChild for Child {
	fn into_child(self) -> Child {
		self
	}
}

impl IntoChild for Node {
	fn into_child(self) -> Child {
		Child::Node(self)
	}
}

impl IntoChild for Element {
	fn into_child(self) -> Child {
		Child::Node(Node::Element(self))
	}
}

impl IntoChild for Component {
	fn into_child(self) -> Child {
		Child::Node(Node::Component(self))
	}
}

impl IntoChild for String {
	fn into_child(self) -> Child {
		Child::Text(self)
	}
}

impl IntoChild for &str {
	fn into_child(self) -> Child {
		Child::Text(self.to_owned())
	}
}

impl IntoChild for &String {
	fn into_child(self) -> Child {
		Child::Text(self.clone())
	}
}

impl IntoChild for Cow<'_, str> {
	fn into_child(self) -> Child {
		Child::Text(self.into_owned())
	}
}

impl IntoChild for bool {
	fn into_child(self) -> Child {
		Child::Bool(self)
	}
}

impl IntoChild for () {
	fn into_child(self) -> Child {
		Child::Null
	}
}

impl<T: IntoChild> IntoChild for Option<T> {
	fn into_child(self) -> Child {
		match self {
			Some(child) => child.into_child(),
			None => Child::Null,
		}
	}
}

impl<T: IntoChild> IntoChild for Vec<T> {
	fn into_child(self) -> Child {
		Child::List(self.into_iter().map(IntoChild::into_child).collect())
	}
}

macro_rules! integer_child {
	($($ty:ty),*) => {
		$(
			impl IntoChild for $ty {
				fn into_child(self) -> Child {
					Child::Integer(i128::from(self))
				}
			}
		)*
	};
}

integer_child!(i8, i16, i32, i64, u8, u16, u32, u64);

impl IntoChild for isize {
	fn into_child(self) -> Child {
		Child::Integer(self as i128)
	}
}

impl IntoChild for usize {
	fn into_child(self) -> Child {
		Child::Integer(self as i128)
	}
}

impl IntoChild for f32 {
	fn into_child(self) -> Child {
		Child::Number(f64::from(self))
	}
}

impl IntoChild for f64 {
	fn into_child(self) -> Child {
		Child::Number(self)
	}
}

// Tuples group heterogeneous children

impl<A: IntoChild, B: IntoChild> IntoChild for (A, B) {
	fn into_child(self) -> Child {
		Child::List(vec![self.0.into_child(), self.1.into_child()])
	}
}

impl<A: IntoChild, B: IntoChild, C: IntoChild> IntoChild for (A, B, C) {
	fn into_child(self) -> Child {
		Child::List(vec![
			self.0.into_child(),
			self.1.into_child(),
			self.2.into_child(),
		])
	}
}

impl<A: IntoChild, B: IntoChild, C: IntoChild, D: IntoChild> IntoChild for (A, B, C, D) {
	fn into_child(self) -> Child {
		Child::List(vec![
			self.0.into_child(),
			self.1.into_child(),
			self.2.into_child(),
			self.3.into_child(),
		])
	}
}
