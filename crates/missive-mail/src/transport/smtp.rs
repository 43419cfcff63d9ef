//! SMTP delivery through lettre's async transport.

use super::{
	DeliveryReceipt, OutboundMessage, Transport, generate_message_id, parse_mailbox,
	parse_mailboxes,
};
use crate::config::{SmtpConfig, SmtpSecurity};
use crate::{MailError, MailResult};
use async_trait::async_trait;
use lettre::message::MultiPart;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::fmt;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

type LettreTransport = AsyncSmtpTransport<Tokio1Executor>;

/// SMTP transport with pooled connections.
///
/// After [`Transport::close`] the pool is dropped and further sends fail
/// with [`MailError::Connection`].
pub struct SmtpTransport {
	inner: RwLock<Option<LettreTransport>>,
	host: String,
	port: u16,
}

impl SmtpTransport {
	/// Creates the transport. No connection is opened until the first send
	/// or verify.
	pub fn new(config: &SmtpConfig) -> MailResult<Self> {
		let transport = build_transport(config)?;
		debug!(
			host = %config.host,
			port = config.port,
			security = ?config.security,
			"Created SMTP transport"
		);

		Ok(Self {
			inner: RwLock::new(Some(transport)),
			host: config.host.clone(),
			port: config.port,
		})
	}
}

impl fmt::Debug for SmtpTransport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SmtpTransport")
			.field("host", &self.host)
			.field("port", &self.port)
			.finish_non_exhaustive()
	}
}

fn build_transport(config: &SmtpConfig) -> MailResult<LettreTransport> {
	let builder = match config.security {
		SmtpSecurity::None => LettreTransport::builder_dangerous(config.host.as_str()),
		SmtpSecurity::StartTls => LettreTransport::starttls_relay(&config.host).map_err(|e| {
			MailError::Connection(format!(
				"Failed to configure STARTTLS for {}: {}",
				config.host, e
			))
		})?,
		SmtpSecurity::Tls => LettreTransport::relay(&config.host).map_err(|e| {
			MailError::Connection(format!("Failed to configure TLS for {}: {}", config.host, e))
		})?,
	};

	let mut builder = builder.port(config.port);
	if let (Some(username), Some(password)) = (&config.username, &config.password) {
		builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
	}
	if let Some(timeout) = config.timeout {
		builder = builder.timeout(Some(timeout));
	}

	Ok(builder.build())
}

/// Builds a `multipart/alternative` message with plain text and HTML parts.
fn build_message(message: &OutboundMessage) -> MailResult<(Message, String)> {
	let from = message.from.as_deref().ok_or_else(|| {
		MailError::Validation(
			"No sender: set a from address in the send options, template metadata or mailer config"
				.to_string(),
		)
	})?;
	let from = parse_mailbox(from)?;
	let message_id = generate_message_id(Some(&from));

	let mut builder = Message::builder()
		.from(from)
		.subject(message.subject.as_str())
		.message_id(Some(message_id.clone()));

	for mailbox in parse_mailboxes(&message.to)? {
		builder = builder.to(mailbox);
	}
	if let Some(cc) = &message.cc {
		for mailbox in parse_mailboxes(cc)? {
			builder = builder.cc(mailbox);
		}
	}
	if let Some(bcc) = &message.bcc {
		for mailbox in parse_mailboxes(bcc)? {
			builder = builder.bcc(mailbox);
		}
	}
	if let Some(reply_to) = &message.reply_to {
		for mailbox in parse_mailboxes(reply_to)? {
			builder = builder.reply_to(mailbox);
		}
	}

	let email = builder
		.multipart(MultiPart::alternative_plain_html(
			message.text.clone(),
			message.html.clone(),
		))
		.map_err(|e| MailError::Validation(format!("Failed to build message: {}", e)))?;

	Ok((email, message_id))
}

#[async_trait]
impl Transport for SmtpTransport {
	async fn send(&self, message: &OutboundMessage) -> MailResult<DeliveryReceipt> {
		let (email, message_id) = build_message(message)?;
		let accepted: Vec<String> = email
			.envelope()
			.to()
			.iter()
			.map(ToString::to_string)
			.collect();

		let guard = self.inner.read().await;
		let transport = guard
			.as_ref()
			.ok_or_else(|| MailError::Connection("SMTP transport is closed".to_string()))?;

		let response = transport
			.send(email)
			.await
			.map_err(|e| MailError::Delivery(format!("SMTP send to {} failed: {}", self.host, e)))?;

		debug!(
			message_id = %message_id,
			code = %response.code(),
			recipients = accepted.len(),
			"SMTP server accepted message"
		);

		Ok(DeliveryReceipt {
			message_id,
			accepted,
			rejected: Vec::new(),
		})
	}

	async fn verify(&self) -> bool {
		let guard = self.inner.read().await;
		let Some(transport) = guard.as_ref() else {
			warn!(host = %self.host, "SMTP verify on closed transport");
			return false;
		};

		match transport.test_connection().await {
			Ok(true) => true,
			Ok(false) => {
				warn!(
					host = %self.host,
					port = self.port,
					"SMTP server did not accept the connection test"
				);
				false
			}
			Err(e) => {
				warn!(
					host = %self.host,
					port = self.port,
					error = %e,
					"SMTP connection check failed"
				);
				false
			}
		}
	}

	async fn close(&self) {
		if self.inner.write().await.take().is_some() {
			info!(host = %self.host, "Closed SMTP transport");
		}
	}
}
