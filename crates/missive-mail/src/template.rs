//! Email templates and the metadata they may declare.

use crate::address::{Addresses, EmailAddress};
use missive_markup::{Component, Element, IntoNode, Node};
use serde::{Deserialize, Serialize};

/// Message metadata declared by a template.
///
/// Every field is optional; per-call send options take precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
	pub subject: Option<String>,
	pub from: Option<EmailAddress>,
	pub reply_to: Option<Addresses>,
}

impl Meta {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
		self.subject = Some(subject.into());
		self
	}

	pub fn with_from(mut self, from: impl Into<EmailAddress>) -> Self {
		self.from = Some(from.into());
		self
	}

	pub fn with_reply_to(mut self, reply_to: impl Into<Addresses>) -> Self {
		self.reply_to = Some(reply_to.into());
		self
	}
}

/// A rendered body paired with optional metadata.
///
/// When used as a component's return value only the body is rendered.
#[derive(Debug, Clone)]
pub struct TemplateResult {
	pub body: Node,
	pub meta: Option<Meta>,
}

impl TemplateResult {
	pub fn new(body: impl IntoNode) -> Self {
		Self {
			body: body.into_node(),
			meta: None,
		}
	}

	pub fn with_meta(mut self, meta: Meta) -> Self {
		self.meta = Some(meta);
		self
	}
}

impl IntoNode for TemplateResult {
	fn into_node(self) -> Node {
		self.body
	}
}

/// What a template invocation produced: a bare node or a [`TemplateResult`].
#[derive(Debug, Clone)]
pub enum TemplateOutput {
	Node(Node),
	Result(TemplateResult),
}

impl TemplateOutput {
	/// Splits the output into the body to render and any declared metadata.
	///
	/// This is the only place that tells the two shapes apart.
	pub fn into_parts(self) -> (Node, Option<Meta>) {
		match self {
			Self::Node(node) => (node, None),
			Self::Result(TemplateResult { body, meta }) => (body, meta),
		}
	}
}

impl From<Node> for TemplateOutput {
	fn from(node: Node) -> Self {
		Self::Node(node)
	}
}

impl From<Element> for TemplateOutput {
	fn from(element: Element) -> Self {
		Self::Node(element.into())
	}
}

impl From<Component> for TemplateOutput {
	fn from(component: Component) -> Self {
		Self::Node(component.into())
	}
}

impl From<TemplateResult> for TemplateOutput {
	fn from(result: TemplateResult) -> Self {
		Self::Result(result)
	}
}

// A template that produces nothing renders an empty body
impl From<()> for TemplateOutput {
	fn from(_: ()) -> Self {
		Self::Node(Node::empty())
	}
}

impl<T: Into<TemplateOutput>> From<Option<T>> for TemplateOutput {
	fn from(output: Option<T>) -> Self {
		output.map_or_else(|| Self::Node(Node::empty()), Into::into)
	}
}

/// An email template: a function from properties to a node tree.
///
/// Implemented for every `Fn(P) -> R` where `R` converts into a
/// [`TemplateOutput`], so plain functions and closures are templates.
pub trait Template<P> {
	fn render(&self, props: P) -> TemplateOutput;

	/// Name used in log output.
	fn name(&self) -> &'static str {
		std::any::type_name::<Self>()
	}
}

impl<P, F, R> Template<P> for F
where
	F: Fn(P) -> R,
	R: Into<TemplateOutput>,
{
	fn render(&self, props: P) -> TemplateOutput {
		self(props).into()
	}
}
