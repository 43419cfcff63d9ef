//! Final header resolution from call options, template metadata and
//! mailer defaults.
//!
//! Each field runs through its own ordered fallback chain:
//!
//! | Field | Sources, highest priority first |
//! |-------|---------------------------------|
//! | subject | options, template meta (required) |
//! | from | options, template meta, config default |
//! | reply-to | options, template meta |
//! | to / cc / bcc | options only |

use crate::address::{Addresses, EmailAddress};
use crate::config::MailerConfig;
use crate::template::Meta;
use crate::{MailError, MailResult};
use tracing::debug;

/// Per-call send options. Recipients are only ever taken from here.
#[derive(Debug, Clone)]
pub struct SendOptions {
	pub to: Addresses,
	pub cc: Option<Addresses>,
	pub bcc: Option<Addresses>,
	pub subject: Option<String>,
	pub from: Option<EmailAddress>,
	pub reply_to: Option<Addresses>,
}

impl SendOptions {
	pub fn new(to: impl Into<Addresses>) -> Self {
		Self {
			to: to.into(),
			cc: None,
			bcc: None,
			subject: None,
			from: None,
			reply_to: None,
		}
	}

	pub fn with_cc(mut self, cc: impl Into<Addresses>) -> Self {
		self.cc = Some(cc.into());
		self
	}

	pub fn with_bcc(mut self, bcc: impl Into<Addresses>) -> Self {
		self.bcc = Some(bcc.into());
		self
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

/// Header values in wire format, ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedHeaders {
	/// Absent when no source names a sender; the transport may supply one.
	pub from: Option<String>,
	pub to: String,
	pub cc: Option<String>,
	pub bcc: Option<String>,
	pub reply_to: Option<String>,
	/// Subject with the configured prefix and suffix applied.
	pub subject: String,
}

/// Resolves the final headers of one message.
///
/// Fails with [`MailError::Validation`] when neither the options nor the
/// template metadata provide a subject.
pub fn resolve(
	options: &SendOptions,
	meta: Option<&Meta>,
	config: &MailerConfig,
) -> MailResult<ResolvedHeaders> {
	let subject = resolve_subject(options, meta)?;

	let headers = ResolvedHeaders {
		from: resolve_from(options, meta, config).map(ToString::to_string),
		to: options.to.to_string(),
		cc: format_optional(options.cc.as_ref()),
		bcc: format_optional(options.bcc.as_ref()),
		reply_to: format_optional(resolve_reply_to(options, meta)),
		subject: config.decorate_subject(subject),
	};

	debug!(
		subject = %headers.subject,
		from = headers.from.as_deref().unwrap_or("<transport default>"),
		recipients = options.to.len(),
		"Resolved message headers"
	);

	Ok(headers)
}

/// Undecorated subject: options, then template metadata.
pub fn resolve_subject<'a>(
	options: &'a SendOptions,
	meta: Option<&'a Meta>,
) -> MailResult<&'a str> {
	first_present([
		options.subject.as_deref(),
		meta.and_then(|m| m.subject.as_deref()),
	])
	.ok_or_else(|| {
		MailError::Validation(
			"Missing subject: provide one in the send options or the template metadata".to_string(),
		)
	})
}

pub fn resolve_from<'a>(
	options: &'a SendOptions,
	meta: Option<&'a Meta>,
	config: &'a MailerConfig,
) -> Option<&'a EmailAddress> {
	first_present([
		options.from.as_ref(),
		meta.and_then(|m| m.from.as_ref()),
		config.default_from(),
	])
}

pub fn resolve_reply_to<'a>(
	options: &'a SendOptions,
	meta: Option<&'a Meta>,
) -> Option<&'a Addresses> {
	first_present([
		options.reply_to.as_ref(),
		meta.and_then(|m| m.reply_to.as_ref()),
	])
}

fn first_present<T>(candidates: impl IntoIterator<Item = Option<T>>) -> Option<T> {
	candidates.into_iter().flatten().next()
}

// Empty lists are treated as absent headers
fn format_optional(addresses: Option<&Addresses>) -> Option<String> {
	addresses
		.filter(|a| !a.is_empty())
		.map(ToString::to_string)
}
