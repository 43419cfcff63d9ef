//! The mailer: compile, resolve and deliver.

use crate::compile::{CompiledEmail, compile};
use crate::config::MailerConfig;
use crate::resolve::{SendOptions, resolve};
use crate::template::Template;
use crate::text::{HtmlTextConverter, TextConverter, TextOptions};
use crate::transport::{DeliveryReceipt, OutboundMessage, SmtpTransport, Transport};
use crate::MailResult;
use tracing::{info, warn};

/// Compiles templates and hands the resulting messages to a transport.
///
/// The configuration is fixed at construction; the mailer keeps no
/// per-message state, so concurrent sends are independent.
pub struct Mailer<T: Transport = SmtpTransport> {
	config: MailerConfig,
	transport: T,
	converter: Box<dyn TextConverter>,
}

impl Mailer<SmtpTransport> {
	/// Creates a mailer delivering over SMTP with the configured settings.
	pub fn new(config: MailerConfig) -> MailResult<Self> {
		let transport = SmtpTransport::new(config.smtp())?;
		Ok(Self::with_transport(config, transport))
	}
}

impl<T: Transport> Mailer<T> {
	pub fn with_transport(config: MailerConfig, transport: T) -> Self {
		Self {
			config,
			transport,
			converter: Box::new(HtmlTextConverter),
		}
	}

	/// Replaces the HTML to plain-text converter.
	pub fn with_converter(mut self, converter: impl TextConverter + 'static) -> Self {
		self.converter = Box::new(converter);
		self
	}

	pub fn config(&self) -> &MailerConfig {
		&self.config
	}

	pub fn transport(&self) -> &T {
		&self.transport
	}

	/// Text conversion options derived from the configuration.
	pub fn text_options(&self) -> TextOptions {
		TextOptions::for_email(self.config.text_wrap_column())
	}

	/// Renders a template without sending it.
	pub fn compile<P, Tpl>(&self, template: &Tpl, props: P) -> CompiledEmail
	where
		Tpl: Template<P> + ?Sized,
	{
		compile(template, props, self.converter.as_ref(), &self.text_options())
	}

	/// Compiles `template`, resolves the headers and delivers the message.
	///
	/// A missing subject fails with [`MailError::Validation`](crate::MailError::Validation)
	/// before the transport is touched. Transport failures are returned
	/// unmodified and never retried.
	pub async fn send<P, Tpl>(
		&self,
		template: &Tpl,
		props: P,
		options: SendOptions,
	) -> MailResult<DeliveryReceipt>
	where
		Tpl: Template<P> + ?Sized,
	{
		let email = self.compile(template, props);
		let headers = resolve(&options, email.meta.as_ref(), &self.config)?;
		let message = OutboundMessage::new(headers, email);

		match self.transport.send(&message).await {
			Ok(receipt) => {
				info!(
					template = template.name(),
					message_id = %receipt.message_id,
					accepted = receipt.accepted.len(),
					"Email sent"
				);
				Ok(receipt)
			}
			Err(e) => {
				warn!(template = template.name(), error = %e, "Email delivery failed");
				Err(e)
			}
		}
	}

	/// Checks transport connectivity; never fails.
	pub async fn verify(&self) -> bool {
		self.transport.verify().await
	}

	/// Releases transport resources. Safe to call more than once.
	pub async fn close(&self) {
		self.transport.close().await
	}
}
