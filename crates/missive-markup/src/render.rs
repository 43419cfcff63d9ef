//! Recursive node tree to HTML string rendering.

use crate::attrs::serialize_attrs;
use crate::escape::{escape_html, format_number};
use crate::node::{Child, Element, Node};

/// Elements that never have content or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
	"area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
	"source", "track", "wbr",
];

pub fn is_void_element(tag: &str) -> bool {
	VOID_ELEMENTS.contains(&tag)
}

/// Renders a node tree to an HTML string.
///
/// Evaluation is depth-first and left to right. Components are invoked as
/// they are reached; the output depends only on the tree.
///
/// # Examples
///
/// ```
/// use missive_markup::{Element, Node, render};
///
/// let node = Node::fragment(vec![Element::new("a"), Element::new("b")]);
/// assert_eq!(render(&node), "<a></a><b></b>");
///
/// let img = Element::new("img").attr("src", "logo.png").child("ignored");
/// assert_eq!(render(&img.into()), r#"<img src="logo.png" />"#);
/// ```
pub fn render(node: &Node) -> String {
	let mut output = String::new();
	render_node(node, &mut output);
	output
}

/// Renders a single child, including text, number and empty leaves.
pub fn render_child(child: &Child) -> String {
	let mut output = String::new();
	render_children(std::slice::from_ref(child), &mut output);
	output
}

/// Flattens nested child lists into their leaves, preserving order.
pub fn flatten_children(children: &[Child]) -> Vec<&Child> {
	let mut leaves = Vec::with_capacity(children.len());
	let mut stack: Vec<std::slice::Iter<'_, Child>> = vec![children.iter()];

	while let Some(top) = stack.last_mut() {
		match top.next() {
			Some(Child::List(nested)) => stack.push(nested.iter()),
			Some(leaf) => leaves.push(leaf),
			None => {
				stack.pop();
			}
		}
	}

	leaves
}

fn render_node(node: &Node, output: &mut String) {
	match node {
		Node::Element(el) => render_element(el, output),
		Node::Fragment(children) => render_children(children, output),
		Node::Component(component) => {
			let evaluated = component.evaluate();
			render_node(&evaluated, output);
		}
	}
}

fn render_element(el: &Element, output: &mut String) {
	output.push('<');
	output.push_str(el.tag());
	output.push_str(&serialize_attrs(el.attributes()));

	if is_void_element(el.tag()) {
		output.push_str(" />");
		return;
	}

	output.push('>');
	render_children(el.child_nodes(), output);
	output.push_str("</");
	output.push_str(el.tag());
	output.push('>');
}

fn render_children(children: &[Child], output: &mut String) {
	for leaf in flatten_children(children) {
		match leaf {
			Child::Text(text) => output.push_str(&escape_html(text)),
			Child::Integer(n) => output.push_str(&n.to_string()),
			Child::Number(n) => output.push_str(&format_number(*n)),
			Child::Bool(_) | Child::Null => {}
			Child::Node(node) => render_node(node, output),
			// flatten_children never yields lists
			Child::List(nested) => render_children(nested, output),
		}
	}
}
