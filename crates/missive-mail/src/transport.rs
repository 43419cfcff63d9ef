//! Outbound transports.
//!
//! A [`Transport`] receives a fully resolved [`OutboundMessage`] and either
//! delivers it or fails. Delivery is attempted at most once per call.

pub mod memory;
pub mod smtp;

pub use memory::MemoryTransport;
pub use smtp::SmtpTransport;

use crate::compile::CompiledEmail;
use crate::resolve::ResolvedHeaders;
use crate::{MailError, MailResult};
use async_trait::async_trait;
use lettre::message::{Mailbox, Mailboxes};
use std::sync::Arc;
use uuid::Uuid;

/// A message ready for delivery. Address fields are in wire format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
	pub from: Option<String>,
	pub to: String,
	pub cc: Option<String>,
	pub bcc: Option<String>,
	pub reply_to: Option<String>,
	pub subject: String,
	pub html: String,
	pub text: String,
}

impl OutboundMessage {
	pub fn new(headers: ResolvedHeaders, email: CompiledEmail) -> Self {
		Self {
			from: headers.from,
			to: headers.to,
			cc: headers.cc,
			bcc: headers.bcc,
			reply_to: headers.reply_to,
			subject: headers.subject,
			html: email.html,
			text: email.text,
		}
	}

	/// Envelope recipients: the addresses of `to`, `cc` and `bcc`, in order.
	pub fn recipients(&self) -> MailResult<Vec<String>> {
		let mut recipients = Vec::new();
		for header in std::iter::once(&self.to).chain(self.cc.iter()).chain(self.bcc.iter()) {
			recipients.extend(
				parse_mailboxes(header)?
					.into_iter()
					.map(|mailbox| mailbox.email.to_string()),
			);
		}
		Ok(recipients)
	}
}

/// Result of a successful delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
	pub message_id: String,
	pub accepted: Vec<String>,
	pub rejected: Vec<String>,
}

#[async_trait]
pub trait Transport: Send + Sync {
	/// Delivers one message. Failures are returned as-is, never retried.
	async fn send(&self, message: &OutboundMessage) -> MailResult<DeliveryReceipt>;

	/// Checks that the transport can reach its server.
	///
	/// Never fails: connection errors are reported as `false`.
	async fn verify(&self) -> bool;

	/// Releases connection resources. Calling it again has no effect.
	async fn close(&self);
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
	async fn send(&self, message: &OutboundMessage) -> MailResult<DeliveryReceipt> {
		(**self).send(message).await
	}

	async fn verify(&self) -> bool {
		(**self).verify().await
	}

	async fn close(&self) {
		(**self).close().await
	}
}

pub(crate) fn parse_mailbox(header: &str) -> MailResult<Mailbox> {
	header
		.parse::<Mailbox>()
		.map_err(|e| MailError::InvalidAddress(format!("{}: {}", header, e)))
}

pub(crate) fn parse_mailboxes(header: &str) -> MailResult<Mailboxes> {
	header
		.parse::<Mailboxes>()
		.map_err(|e| MailError::InvalidAddress(format!("{}: {}", header, e)))
}

/// Generates a `<uuid@domain>` message id, taking the domain from the
/// sender when there is one.
pub(crate) fn generate_message_id(from: Option<&Mailbox>) -> String {
	let domain = from.map_or("localhost", |mailbox| mailbox.email.domain());
	format!("<{}@{}>", Uuid::new_v4(), domain)
}
