//! Full HTML document output for rendered email bodies.

use crate::node::Node;
use crate::render::render;

pub const DOCTYPE: &str = "<!DOCTYPE html>\n";

const HEAD: &str = concat!(
	"<head>",
	r#"<meta charset="UTF-8" />"#,
	r#"<meta name="viewport" content="width=device-width, initial-scale=1.0" />"#,
	"</head>",
);

/// Renders a node and wraps it into a complete HTML document.
///
/// ```
/// use missive_markup::{h, render_document};
///
/// let html = render_document(&h("p").child("Hi").into());
/// assert!(html.starts_with("<!DOCTYPE html>\n<html><head>"));
/// assert!(html.ends_with("<body><p>Hi</p></body></html>"));
/// ```
pub fn render_document(node: &Node) -> String {
	wrap_document(&render(node))
}

/// Prefixes the doctype and, unless the markup already carries its own
/// `<html` tag, wraps it in a minimal `html`/`head`/`body` skeleton.
pub fn wrap_document(body: &str) -> String {
	if has_html_root(body) {
		format!("{}{}", DOCTYPE, body)
	} else {
		format!("{}<html>{}<body>{}</body></html>", DOCTYPE, HEAD, body)
	}
}

/// Case-insensitive substring test for `<html`.
///
/// This is not a structural check: any tag whose name starts with `html`
/// also matches.
pub fn has_html_root(markup: &str) -> bool {
	markup.to_ascii_lowercase().contains("<html")
}
