//! Template compilation into HTML and plain-text bodies.

use crate::template::{Meta, Template};
use crate::text::{TextConverter, TextOptions};
use missive_markup::render_document;
use tracing::debug;

/// Output of one compile call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledEmail {
	/// Full HTML document, starting with `<!DOCTYPE html>`.
	pub html: String,
	/// Plain-text alternative derived from `html`.
	pub text: String,
	/// Metadata declared by the template, if it returned a `TemplateResult`.
	pub meta: Option<Meta>,
}

/// Invokes `template` with `props`, renders the body to a document and
/// derives its plain-text form.
///
/// Every call performs a full render; nothing is cached.
///
/// ```
/// use missive_mail::{HtmlTextConverter, Meta, TemplateResult, TextOptions, compile};
/// use missive_markup::h;
///
/// let welcome = |name: &str| {
/// 	TemplateResult::new(h("p").child(format!("Hi {}", name)))
/// 		.with_meta(Meta::new().with_subject("Welcome"))
/// };
///
/// let email = compile(&welcome, "Ada", &HtmlTextConverter, &TextOptions::for_email(80));
/// assert!(email.html.ends_with("<body><p>Hi Ada</p></body></html>"));
/// assert_eq!(email.text, "Hi Ada");
/// assert_eq!(email.meta.and_then(|m| m.subject).as_deref(), Some("Welcome"));
/// ```
pub fn compile<P, T>(
	template: &T,
	props: P,
	converter: &dyn TextConverter,
	options: &TextOptions,
) -> CompiledEmail
where
	T: Template<P> + ?Sized,
{
	let (body, meta) = template.render(props).into_parts();
	let html = render_document(&body);
	let text = converter.convert(&html, options);

	debug!(
		template = template.name(),
		html_len = html.len(),
		text_len = text.len(),
		has_meta = meta.is_some(),
		"Compiled email template"
	);

	CompiledEmail { html, text, meta }
}
