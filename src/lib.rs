//! # Missive
//!
//! Component-based HTML email rendering with header resolution and delivery.
//!
//! Missive compiles a declarative node tree into an HTML document and a
//! derived plain-text alternative, resolves subject, sender and reply-to
//! from call options, template metadata and mailer defaults, and hands the
//! finished message to a transport.
//!
//! ## Feature Flags
//!
//! - `markup` - node model and HTML renderer ([`markup`])
//! - `mail` - templates, header resolution, text conversion and transports ([`mail`])
//! - `full` (default) - everything
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use missive::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), MailError> {
//! fn reset_password(link: String) -> TemplateResult {
//! 	TemplateResult::new(
//! 		h("div")
//! 			.child(h("p").child("Someone asked to reset your password."))
//! 			.child(h("a").attr("href", link).child("Choose a new password")),
//! 	)
//! 	.with_meta(Meta::new().with_subject("Reset your password"))
//! }
//!
//! let mailer = Mailer::new(MailerConfig::from_env()?)?;
//! mailer
//! 	.send(
//! 		&reset_password,
//! 		"https://acme.test/reset/abc".to_string(),
//! 		SendOptions::new(EmailAddress::named("Ada", "ada@example.com")),
//! 	)
//! 	.await?;
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "markup")]
pub use missive_markup as markup;

#[cfg(feature = "mail")]
pub use missive_mail as mail;

#[cfg(feature = "markup")]
pub use missive_markup::{
	Child, Component, Element, IntoChild, IntoNode, Node, fragment, h, render, render_document,
};

#[cfg(feature = "mail")]
pub use missive_mail::{
	Addresses, CompiledEmail, DeliveryReceipt, EmailAddress, MailError, MailResult, Mailer,
	MailerConfig, MemoryTransport, Meta, SendOptions, SmtpConfig, SmtpSecurity, SmtpTransport,
	Template, TemplateOutput, TemplateResult, Transport, compile,
};

/// Commonly used types and functions.
pub mod prelude {
	#[cfg(feature = "markup")]
	pub use crate::{
		Child, Component, Element, IntoChild, IntoNode, Node, fragment, h, render, render_document,
	};

	#[cfg(feature = "mail")]
	pub use crate::{
		Addresses, EmailAddress, MailError, MailResult, Mailer, MailerConfig, MemoryTransport, Meta,
		SendOptions, SmtpConfig, SmtpSecurity, Template, TemplateResult, Transport,
	};
}
