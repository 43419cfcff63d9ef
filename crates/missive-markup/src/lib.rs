//! # Missive Markup
//!
//! Renders a component-structured node tree into an HTML string suitable for
//! email bodies.
//!
//! ## Features
//!
//! - **Node model**: intrinsic elements, function components and fragments
//! - **Deterministic output**: identical trees always produce identical bytes
//! - **Escaping**: every text leaf and attribute value is escaped exactly once
//! - **Attributes**: `className` mapping, boolean attributes, style objects
//! - **Void elements**: `<img />`, `<br />` and friends never get a closing tag
//! - **Documents**: doctype prefix and minimal `html`/`head`/`body` skeleton
//!
//! ## Example
//!
//! ```
//! use missive_markup::{Child, Component, h, render_document};
//! use serde_json::json;
//!
//! fn button(href: &String, children: &[Child]) -> missive_markup::Element {
//! 	h("a")
//! 		.attr("href", href.clone())
//! 		.style(json!({ "backgroundColor": "#1a73e8", "color": "#fff" }))
//! 		.children(children.to_vec())
//! }
//!
//! let body = h("div")
//! 	.child(h("h1").child("Welcome"))
//! 	.child(Component::new("Button", button, "https://example.com".to_string()).child("Start"));
//!
//! let html = render_document(&body.into());
//! assert!(html.contains("background-color: #1a73e8; color: #fff"));
//! ```

pub mod attrs;
pub mod document;
pub mod escape;
pub mod node;
pub mod render;

pub use attrs::{is_boolean_attribute, serialize_attrs, style_declarations, to_kebab_case};
pub use document::{DOCTYPE, has_html_root, render_document, wrap_document};
pub use escape::{escape_html, format_number};
pub use node::{
	Attributes, Child, Component, Element, IntoChild, IntoNode, Node, fragment, h,
};
pub use render::{flatten_children, is_void_element, render, render_child};
