//! In-memory transport for tests and local development.

use super::{DeliveryReceipt, OutboundMessage, Transport, generate_message_id, parse_mailbox};
use crate::{MailError, MailResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
struct MemoryState {
	sent: Vec<OutboundMessage>,
	fail_sends: bool,
	reachable: bool,
	closed: bool,
}

impl Default for MemoryState {
	fn default() -> Self {
		Self {
			sent: Vec::new(),
			fail_sends: false,
			reachable: true,
			closed: false,
		}
	}
}

/// Records every message instead of delivering it.
///
/// Clones share the same mailbox, so a test can keep a handle while the
/// mailer owns another.
///
/// ```
/// # #[tokio::main]
/// # async fn main() {
/// use missive_mail::{MemoryTransport, OutboundMessage, Transport};
///
/// let transport = MemoryTransport::new();
/// let message = OutboundMessage {
/// 	from: Some("noreply@acme.test".into()),
/// 	to: "ada@example.com".into(),
/// 	cc: None,
/// 	bcc: None,
/// 	reply_to: None,
/// 	subject: "Hi".into(),
/// 	html: "<p>Hi</p>".into(),
/// 	text: "Hi".into(),
/// };
///
/// let receipt = transport.send(&message).await.unwrap();
/// assert_eq!(receipt.accepted, vec!["ada@example.com"]);
/// assert_eq!(transport.sent_messages().len(), 1);
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
	state: Arc<Mutex<MemoryState>>,
}

impl MemoryTransport {
	pub fn new() -> Self {
		Self::default()
	}

	/// A transport whose sends always fail with [`MailError::Delivery`].
	pub fn failing() -> Self {
		let transport = Self::new();
		transport.state.lock().fail_sends = true;
		transport
	}

	/// A transport whose `verify` reports `false`.
	pub fn unreachable() -> Self {
		let transport = Self::new();
		transport.state.lock().reachable = false;
		transport
	}

	/// Messages sent so far, oldest first.
	pub fn sent_messages(&self) -> Vec<OutboundMessage> {
		self.state.lock().sent.clone()
	}

	pub fn last_message(&self) -> Option<OutboundMessage> {
		self.state.lock().sent.last().cloned()
	}

	pub fn clear(&self) {
		self.state.lock().sent.clear();
	}

	pub fn is_closed(&self) -> bool {
		self.state.lock().closed
	}
}

#[async_trait]
impl Transport for MemoryTransport {
	async fn send(&self, message: &OutboundMessage) -> MailResult<DeliveryReceipt> {
		let from = message.from.as_deref().map(parse_mailbox).transpose()?;
		let accepted = message.recipients()?;

		let mut state = self.state.lock();
		if state.closed {
			return Err(MailError::Connection("Transport is closed".to_string()));
		}
		if state.fail_sends {
			return Err(MailError::Delivery("Memory transport configured to fail".to_string()));
		}

		let message_id = generate_message_id(from.as_ref());
		state.sent.push(message.clone());
		debug!(message_id = %message_id, recipients = accepted.len(), "Stored message in memory");

		Ok(DeliveryReceipt {
			message_id,
			accepted,
			rejected: Vec::new(),
		})
	}

	async fn verify(&self) -> bool {
		let state = self.state.lock();
		state.reachable && !state.closed
	}

	async fn close(&self) {
		self.state.lock().closed = true;
	}
}
