//! HTML to plain-text conversion for the text alternative of a message.

use html2text::render::text_renderer::RichAnnotation;
use scraper::node::Text;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::warn;

/// How an element matched by an [`ElementRule`] is converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementBehavior {
	/// Produces no text, including its descendants.
	Skip,
	/// Renders an anchor as its text, followed by ` [href]` unless the
	/// text already equals the href.
	HideHrefIfSameAsText,
}

/// Applies a behavior to every element matching a CSS selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRule {
	pub selector: String,
	pub behavior: ElementBehavior,
}

impl ElementRule {
	pub fn new(selector: impl Into<String>, behavior: ElementBehavior) -> Self {
		Self {
			selector: selector.into(),
			behavior,
		}
	}
}

/// Formatting hints for the text converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextOptions {
	/// Maximum line width; `0` disables wrapping.
	pub wrap_column: usize,
	pub element_rules: Vec<ElementRule>,
}

impl Default for TextOptions {
	fn default() -> Self {
		Self {
			wrap_column: 80,
			element_rules: Vec::new(),
		}
	}
}

impl TextOptions {
	/// The fixed options used for email bodies: anchors drop redundant hrefs
	/// and images produce no text.
	pub fn for_email(wrap_column: usize) -> Self {
		Self {
			wrap_column,
			element_rules: vec![
				ElementRule::new("a", ElementBehavior::HideHrefIfSameAsText),
				ElementRule::new("img", ElementBehavior::Skip),
			],
		}
	}

	pub fn with_rule(mut self, rule: ElementRule) -> Self {
		self.element_rules.push(rule);
		self
	}
}

/// Converts a finished HTML document to plain text.
pub trait TextConverter: Send + Sync {
	fn convert(&self, html: &str, options: &TextOptions) -> String;
}

/// [`TextConverter`] built on `html2text`.
///
/// Element rules are applied to the parsed document first: skipped
/// elements are detached and anchor targets are written out as text.
/// `html2text` then lays the result out, and image alt text is dropped
/// from its output.
///
/// ```
/// use missive_mail::{HtmlTextConverter, TextConverter, TextOptions};
///
/// let text = HtmlTextConverter.convert(
/// 	r#"<h1>Hi</h1><p>Visit <a href="https://x.test">our site</a>.</p>"#,
/// 	&TextOptions::for_email(80),
/// );
/// assert_eq!(text, "# Hi\n\nVisit our site [https://x.test].");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlTextConverter;

/// Width handed to `html2text` when wrapping is disabled.
const UNWRAPPED_WIDTH: usize = 10_000;

/// Elements whose content never reaches the text output.
const HIDDEN_SELECTOR: &str = "head, script, style, template, title";

impl TextConverter for HtmlTextConverter {
	fn convert(&self, html: &str, options: &TextOptions) -> String {
		let mut document = Html::parse_document(html);
		let rules = compile_rules(&options.element_rules);
		apply_rules(&mut document, &rules);

		let width = match options.wrap_column {
			0 => UNWRAPPED_WIDTH,
			column => column,
		};

		match layout(&document.html(), width) {
			Ok(text) => text,
			Err(e) => {
				warn!(error = %e, "html2text failed, falling back to bare document text");
				let text = document.root_element().text().collect::<String>();
				collapse_whitespace(&text)
			}
		}
	}
}

fn compile_rules(rules: &[ElementRule]) -> Vec<(Selector, ElementBehavior)> {
	let hidden = Selector::parse(HIDDEN_SELECTOR)
		.ok()
		.map(|selector| (selector, ElementBehavior::Skip));

	hidden
		.into_iter()
		.chain(rules.iter().filter_map(|rule| match Selector::parse(&rule.selector) {
			Ok(selector) => Some((selector, rule.behavior)),
			Err(err) => {
				warn!(
					selector = %rule.selector,
					error = %err,
					"Ignoring invalid text conversion selector"
				);
				None
			}
		}))
		.collect()
}

/// Rewrites the document so that `html2text` sees the rule outcomes.
///
/// Skipped elements are detached. Every remaining anchor with a usable
/// href gets ` [href]` appended after it, except when a
/// [`ElementBehavior::HideHrefIfSameAsText`] rule matches and the anchor
/// text equals the href. Remaining images get `[alt]` appended.
fn apply_rules(document: &mut Html, rules: &[(Selector, ElementBehavior)]) {
	let mut skipped = Vec::new();
	for (selector, behavior) in rules {
		if *behavior == ElementBehavior::Skip {
			skipped.extend(document.select(selector).map(|element| element.id()));
		}
	}
	for id in skipped {
		if let Some(mut node) = document.tree.get_mut(id) {
			node.detach();
		}
	}

	let mut insertions = Vec::new();
	for node in document.root_element().descendants() {
		let Some(element) = ElementRef::wrap(node) else {
			continue;
		};
		let suffix = match element.value().name() {
			"a" => anchor_suffix(element, rules),
			"img" => element
				.value()
				.attr("alt")
				.map(str::trim)
				.filter(|alt| !alt.is_empty())
				.map(|alt| format!("[{}]", alt)),
			_ => None,
		};
		if let Some(suffix) = suffix {
			insertions.push((element.id(), suffix));
		}
	}
	for (id, suffix) in insertions {
		if let Some(mut node) = document.tree.get_mut(id) {
			node.insert_after(Node::Text(Text { text: suffix.into() }));
		}
	}
}

fn anchor_suffix(anchor: ElementRef<'_>, rules: &[(Selector, ElementBehavior)]) -> Option<String> {
	let href = anchor.value().attr("href").map(str::trim)?;
	if href.is_empty() || href.starts_with('#') {
		return None;
	}

	let text = collapse_whitespace(&anchor.text().collect::<String>());
	let hide_same = rules.iter().any(|(selector, behavior)| {
		*behavior == ElementBehavior::HideHrefIfSameAsText && selector.matches(&anchor)
	});
	if hide_same && text == href {
		None
	} else if text.is_empty() {
		Some(href.to_string())
	} else {
		Some(format!(" [{}]", href))
	}
}

/// Lays the document out with `html2text` and flattens its tagged lines,
/// dropping image segments and trailing padding.
fn layout(html: &str, width: usize) -> Result<String, html2text::Error> {
	let lines = html2text::config::rich().lines_from_read(html.as_bytes(), width)?;

	let lines: Vec<String> = lines
		.iter()
		.map(|line| {
			let text: String = line
				.tagged_strings()
				.filter(|segment| {
					!segment
						.tag
						.iter()
						.any(|annotation| matches!(annotation, RichAnnotation::Image(_)))
				})
				.map(|segment| segment.s.as_str())
				.collect();
			text.trim_end().to_string()
		})
		.collect();

	let first = lines.iter().position(|line| !line.is_empty());
	let last = lines.iter().rposition(|line| !line.is_empty());
	Ok(match (first, last) {
		(Some(first), Some(last)) => lines[first..=last].join("\n"),
		_ => String::new(),
	})
}

fn collapse_whitespace(text: &str) -> String {
	text.split_whitespace().collect::<Vec<_>>().join(" ")
}
