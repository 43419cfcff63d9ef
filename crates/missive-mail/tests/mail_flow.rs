//! Mail flow integration tests
//!
//! Exercises template compilation, header resolution and delivery through
//! the in-memory transport.

use missive_mail::{
	Addresses, EmailAddress, MailError, Mailer, MailerConfig, MemoryTransport, Meta, SendOptions,
	Template, TemplateOutput, TemplateResult, Transport,
};
use missive_markup::{Child, Component, Element, h};
use rstest::*;
use std::sync::Arc;

struct OrderShipped {
	customer: String,
	order_id: u32,
	items: Vec<&'static str>,
	tracking_url: Option<String>,
}

fn button(href: &String, children: &[Child]) -> Element {
	h("a")
		.attr("href", href.clone())
		.style(serde_json::json!({ "backgroundColor": "#222", "color": "#fff" }))
		.children(children.to_vec())
}

fn order_shipped(props: OrderShipped) -> TemplateResult {
	let tracking = props.tracking_url.map(|url| {
		Component::new("Button", button, url).child("Track your parcel")
	});

	let body = h("div")
		.child(h("h1").child(format!("Hi {},", props.customer)))
		.child(
			h("p")
				.child("Your order ")
				.child(h("b").child(format!("#{}", props.order_id)))
				.child(" has shipped."),
		)
		.child(h("ul").children(props.items.iter().map(|item| h("li").child(*item))))
		.child(tracking);

	TemplateResult::new(body).with_meta(
		Meta::new()
			.with_subject(format!("Order #{} shipped", props.order_id))
			.with_from(("Acme Shipping", "shipping@acme.test")),
	)
}

fn order(tracking_url: Option<&str>) -> OrderShipped {
	OrderShipped {
		customer: "Ada".to_string(),
		order_id: 1042,
		items: vec!["Keyboard", "Mouse & pad"],
		tracking_url: tracking_url.map(str::to_string),
	}
}

#[fixture]
fn config() -> MailerConfig {
	MailerConfig::builder()
		.default_from("noreply@acme.test")
		.subject_prefix("[Acme] ")
		.build()
		.unwrap()
}

/// Test: Order email is compiled, resolved and delivered
#[rstest]
#[tokio::test]
async fn test_order_email_end_to_end(config: MailerConfig) {
	// Arrange
	let transport = MemoryTransport::new();
	let mailer = Mailer::with_transport(config, transport.clone());
	let options = SendOptions::new(vec![
		EmailAddress::named("Ada Lovelace", "ada@example.com"),
		EmailAddress::named("Doe, John", "john@example.com"),
	])
	.with_bcc("audit@acme.test");

	// Act
	let receipt = mailer
		.send(&order_shipped, order(Some("https://acme.test/track?id=1042&c=ada")), options)
		.await
		.unwrap();

	// Assert
	let sent = transport.last_message().unwrap();
	assert_eq!(sent.subject, "[Acme] Order #1042 shipped");
	assert_eq!(sent.from.as_deref(), Some("Acme Shipping <shipping@acme.test>"));
	assert_eq!(sent.to, r#"Ada Lovelace <ada@example.com>, "Doe, John" <john@example.com>"#);
	assert_eq!(sent.bcc.as_deref(), Some("audit@acme.test"));
	assert_eq!(
		receipt.accepted,
		vec!["ada@example.com", "john@example.com", "audit@acme.test"]
	);
	assert!(sent.html.starts_with("<!DOCTYPE html>\n<html><head>"));
	assert!(sent.html.contains("<li>Mouse &amp; pad</li>"));
	assert!(sent.html.contains(r#"href="https://acme.test/track?id=1042&amp;c=ada""#));
	assert_eq!(
		sent.text,
		concat!(
			"# Hi Ada,\n\n",
			"Your order #1042 has shipped.\n\n",
			"* Keyboard\n",
			"* Mouse & pad\n\n",
			"Track your parcel [https://acme.test/track?id=1042&c=ada]",
		)
	);
}

/// Test: Absent tracking link leaves no markup or text behind
#[rstest]
fn test_optional_section_vanishes(config: MailerConfig) {
	// Arrange
	let mailer = Mailer::with_transport(config, MemoryTransport::new());

	// Act
	let email = mailer.compile(&order_shipped, order(None));

	// Assert
	assert!(!email.html.contains("<a "));
	assert!(!email.text.contains("Track"));
}

/// Test: Send options win over template metadata
#[rstest]
#[tokio::test]
async fn test_call_options_override_template_meta(config: MailerConfig) {
	// Arrange
	let transport = MemoryTransport::new();
	let mailer = Mailer::with_transport(config, transport.clone());
	let options = SendOptions::new("ada@example.com")
		.with_subject("Override")
		.with_from("billing@acme.test")
		.with_reply_to(["a@acme.test", "b@acme.test"]);

	// Act
	mailer.send(&order_shipped, order(None), options).await.unwrap();

	// Assert
	let sent = transport.last_message().unwrap();
	assert_eq!(sent.subject, "[Acme] Override");
	assert_eq!(sent.from.as_deref(), Some("billing@acme.test"));
	assert_eq!(sent.reply_to.as_deref(), Some("a@acme.test, b@acme.test"));
}

/// Test: Bare node templates need a subject from the send options
#[rstest]
#[tokio::test]
async fn test_bare_node_template_needs_call_subject(config: MailerConfig) {
	// Arrange
	let transport = MemoryTransport::new();
	let mailer = Mailer::with_transport(config, transport.clone());
	let notice = |text: &'static str| h("p").child(text);

	// Act
	let missing = mailer.send(&notice, "x", SendOptions::new("a@x.com")).await;
	let provided = mailer
		.send(&notice, "x", SendOptions::new("a@x.com").with_subject("Notice"))
		.await;

	// Assert
	assert!(matches!(missing, Err(MailError::Validation(_))));
	assert!(provided.is_ok());
	assert_eq!(transport.sent_messages().len(), 1);
	assert_eq!(
		transport.last_message().unwrap().from.as_deref(),
		Some("noreply@acme.test")
	);
}

/// Test: Full document templates keep a single html root
#[rstest]
fn test_full_document_template_is_not_double_wrapped(config: MailerConfig) {
	// Arrange
	let mailer = Mailer::with_transport(config, MemoryTransport::new());
	let document = |_: ()| {
		h("html")
			.attr("lang", "en")
			.child(h("head").child(h("title").child("Ignored in text")))
			.child(h("body").child(h("p").child("Full document")))
	};

	// Act
	let email = mailer.compile(&document, ());

	// Assert
	assert_eq!(email.html.matches("<html").count(), 1);
	assert!(email.html.starts_with("<!DOCTYPE html>\n<html lang=\"en\">"));
	assert_eq!(email.text, "Full document");
}

/// Test: Two mailers share one transport through Arc
#[rstest]
#[tokio::test]
async fn test_shared_transport_through_arc(config: MailerConfig) {
	// Arrange
	let transport = Arc::new(MemoryTransport::new());
	let first = Mailer::with_transport(config.clone(), Arc::clone(&transport));
	let second = Mailer::with_transport(config, Arc::clone(&transport) as Arc<dyn Transport>);

	// Act
	first
		.send(&order_shipped, order(None), SendOptions::new("a@x.com"))
		.await
		.unwrap();
	second
		.send(&order_shipped, order(None), SendOptions::new("b@x.com"))
		.await
		.unwrap();

	// Assert
	let recipients: Vec<String> = transport
		.sent_messages()
		.into_iter()
		.map(|m| m.to)
		.collect();
	assert_eq!(recipients, vec!["a@x.com", "b@x.com"]);
}

struct Digest {
	subject: &'static str,
}

impl Template<Vec<&'static str>> for Digest {
	fn render(&self, headlines: Vec<&'static str>) -> TemplateOutput {
		let body = h("ol").children(headlines.into_iter().map(|headline| h("li").child(headline)));
		TemplateResult::new(body)
			.with_meta(Meta::new().with_subject(self.subject))
			.into()
	}
}

/// Test: Struct templates compile like closures
#[rstest]
fn test_struct_template_compiles(config: MailerConfig) {
	// Arrange
	let mailer = Mailer::with_transport(config, MemoryTransport::new());
	let digest = Digest { subject: "Weekly digest" };

	// Act
	let email = mailer.compile(&digest, vec!["Rust 2024", "Email tips"]);

	// Assert
	assert_eq!(email.text, "1. Rust 2024\n2. Email tips");
	assert_eq!(email.meta.and_then(|m| m.subject).as_deref(), Some("Weekly digest"));
}

/// Test: Display names with commas or quotes are quoted
#[rstest]
#[case(EmailAddress::named("Doe, John", "j@x.com"), r#""Doe, John" <j@x.com>"#)]
#[case(EmailAddress::named(r#"A "B" C"#, "a@x.com"), r#""A \"B\" C" <a@x.com>"#)]
fn test_display_name_quoting(#[case] address: EmailAddress, #[case] expected: &str) {
	// Act / Assert
	assert_eq!(address.to_string(), expected);
}

/// Test: Address lists deserialize from mixed JSON
#[rstest]
fn test_address_list_deserializes_from_json() {
	// Arrange
	let json = r#"[{"name": "Alice", "email": "a@x"}, "b@x", {"name": "Bob", "email": "c@x"}]"#;

	// Act
	let list: Addresses = serde_json::from_str(json).unwrap();

	// Assert
	assert_eq!(list.to_string(), "Alice <a@x>, b@x, Bob <c@x>");
}
