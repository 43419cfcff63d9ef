//! Email addresses and their wire formatting.

use crate::{MailError, MailResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single mailbox: a bare address or a display name with an address.
///
/// Deserializes from either a string or a `{ "name", "email" }` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmailAddress {
	Bare(String),
	Named { name: String, email: String },
}

impl EmailAddress {
	pub fn bare(email: impl Into<String>) -> Self {
		Self::Bare(email.into())
	}

	pub fn named(name: impl Into<String>, email: impl Into<String>) -> Self {
		Self::Named {
			name: name.into(),
			email: email.into(),
		}
	}

	/// The address part, without any display name.
	pub fn email(&self) -> &str {
		match self {
			Self::Bare(email) => email,
			Self::Named { email, .. } => email,
		}
	}

	pub fn name(&self) -> Option<&str> {
		match self {
			Self::Bare(_) => None,
			Self::Named { name, .. } => Some(name),
		}
	}
}

/// Formats the address for a header value.
///
/// Display names containing a comma or a double quote are quoted, with
/// inner double quotes escaped.
///
/// ```
/// use missive_mail::EmailAddress;
///
/// assert_eq!(EmailAddress::bare("a@x.com").to_string(), "a@x.com");
/// assert_eq!(EmailAddress::named("Ada", "a@x.com").to_string(), "Ada <a@x.com>");
/// assert_eq!(
/// 	EmailAddress::named("Doe, John", "j@x.com").to_string(),
/// 	r#""Doe, John" <j@x.com>"#
/// );
/// ```
impl fmt::Display for EmailAddress {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Bare(email) => f.write_str(email),
			Self::Named { name, email } if needs_quoting(name) => {
				write!(f, "\"{}\" <{}>", name.replace('"', "\\\""), email)
			}
			Self::Named { name, email } => write!(f, "{} <{}>", name, email),
		}
	}
}

fn needs_quoting(name: &str) -> bool {
	name.contains(',') || name.contains('"')
}

/// Parses `addr@host` or `Display Name <addr@host>`.
///
/// A quoted display name has its quotes removed and `\"` unescaped.
impl FromStr for EmailAddress {
	type Err = MailError;

	fn from_str(input: &str) -> MailResult<Self> {
		let input = input.trim();

		let (name, email) = match (input.rfind('<'), input.strip_suffix('>')) {
			(Some(open), Some(without_close)) => (
				input[..open].trim(),
				without_close[open + 1..].trim(),
			),
			_ => ("", input),
		};

		if email.is_empty() || !email.contains('@') || email.contains(char::is_whitespace) {
			return Err(MailError::InvalidAddress(input.to_string()));
		}

		let name = unquote(name);
		if name.is_empty() {
			Ok(Self::bare(email))
		} else {
			Ok(Self::named(name, email))
		}
	}
}

fn unquote(name: &str) -> String {
	match name
		.strip_prefix('"')
		.and_then(|rest| rest.strip_suffix('"'))
	{
		Some(inner) => inner.replace("\\\"", "\""),
		None => name.to_string(),
	}
}

impl From<&str> for EmailAddress {
	fn from(email: &str) -> Self {
		Self::bare(email)
	}
}

impl From<String> for EmailAddress {
	fn from(email: String) -> Self {
		Self::Bare(email)
	}
}

impl<N: Into<String>, E: Into<String>> From<(N, E)> for EmailAddress {
	fn from((name, email): (N, E)) -> Self {
		Self::named(name, email)
	}
}

/// One address or an ordered list of them.
///
/// Order is preserved and duplicates are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Addresses {
	One(EmailAddress),
	Many(Vec<EmailAddress>),
}

impl Addresses {
	pub fn as_slice(&self) -> &[EmailAddress] {
		match self {
			Self::One(address) => std::slice::from_ref(address),
			Self::Many(addresses) => addresses,
		}
	}

	pub fn is_empty(&self) -> bool {
		self.as_slice().is_empty()
	}

	pub fn len(&self) -> usize {
		self.as_slice().len()
	}
}

/// Joins the members with `", "`; an empty list formats as `""`.
///
/// ```
/// use missive_mail::{Addresses, EmailAddress};
///
/// let list = Addresses::from(vec![
/// 	EmailAddress::named("Alice", "a@x"),
/// 	EmailAddress::named("Bob", "b@x"),
/// ]);
/// assert_eq!(list.to_string(), "Alice <a@x>, Bob <b@x>");
/// ```
impl fmt::Display for Addresses {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, address) in self.as_slice().iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			write!(f, "{}", address)?;
		}
		Ok(())
	}
}

impl From<EmailAddress> for Addresses {
	fn from(address: EmailAddress) -> Self {
		Self::One(address)
	}
}

impl From<&str> for Addresses {
	fn from(email: &str) -> Self {
		Self::One(email.into())
	}
}

impl From<String> for Addresses {
	fn from(email: String) -> Self {
		Self::One(email.into())
	}
}

impl<T: Into<EmailAddress>> From<Vec<T>> for Addresses {
	fn from(addresses: Vec<T>) -> Self {
		Self::Many(addresses.into_iter().map(Into::into).collect())
	}
}

impl<T: Into<EmailAddress>, const N: usize> From<[T; N]> for Addresses {
	fn from(addresses: [T; N]) -> Self {
		Self::Many(addresses.into_iter().map(Into::into).collect())
	}
}
