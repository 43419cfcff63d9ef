//! # Missive Mail
//!
//! Turns node-tree templates into deliverable email messages.
//!
//! ## Features
//!
//! - **Templates**: plain functions returning a node, optionally paired with
//!   subject, sender and reply-to metadata
//! - **Compilation**: HTML document plus a derived plain-text alternative
//! - **Header resolution**: per-field fallback from call options to template
//!   metadata to mailer defaults, with configurable subject affixes
//! - **Address formatting**: RFC 5322 display-name quoting
//! - **Transports**: SMTP via lettre (STARTTLS, implicit TLS or plain) and an
//!   in-memory transport for tests
//! - **Configuration**: builder, environment variables or TOML
//!
//! ## Example
//!
//! ```rust,no_run
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use missive_mail::{Mailer, MailerConfig, Meta, SendOptions, SmtpConfig, TemplateResult};
//! use missive_markup::h;
//!
//! struct Welcome {
//! 	name: String,
//! }
//!
//! fn welcome(props: Welcome) -> TemplateResult {
//! 	TemplateResult::new(h("p").child(format!("Hello, {}!", props.name)))
//! 		.with_meta(Meta::new().with_subject("Welcome aboard"))
//! }
//!
//! let config = MailerConfig::builder()
//! 	.smtp(SmtpConfig::new("smtp.example.com", 587).with_credentials("user", "secret"))
//! 	.default_from("Acme <noreply@acme.test>")
//! 	.subject_prefix("[Acme] ")
//! 	.build()?;
//! let mailer = Mailer::new(config)?;
//!
//! let receipt = mailer
//! 	.send(&welcome, Welcome { name: "Ada".into() }, SendOptions::new("ada@example.com"))
//! 	.await?;
//! println!("sent {}", receipt.message_id);
//! # Ok(())
//! # }
//! ```

pub mod address;
pub mod compile;
pub mod config;
pub mod mailer;
pub mod resolve;
pub mod template;
pub mod text;
pub mod transport;

use thiserror::Error;

pub use address::{Addresses, EmailAddress};
pub use compile::{CompiledEmail, compile};
pub use config::{MailerConfig, MailerConfigBuilder, SmtpConfig, SmtpSecurity};
pub use mailer::Mailer;
pub use resolve::{ResolvedHeaders, SendOptions, resolve};
pub use template::{Meta, Template, TemplateOutput, TemplateResult};
pub use text::{ElementBehavior, ElementRule, HtmlTextConverter, TextConverter, TextOptions};
pub use transport::{DeliveryReceipt, MemoryTransport, OutboundMessage, SmtpTransport, Transport};

#[derive(Debug, Error)]
pub enum MailError {
	#[error("Validation error: {0}")]
	Validation(String),

	#[error("Invalid email address: {0}")]
	InvalidAddress(String),

	#[error("Connection error: {0}")]
	Connection(String),

	#[error("Delivery error: {0}")]
	Delivery(String),

	#[error("Configuration error: {0}")]
	Config(String),
}

pub type MailResult<T> = std::result::Result<T, MailError>;
