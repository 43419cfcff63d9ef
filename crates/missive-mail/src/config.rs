//! Mailer configuration
//!
//! [`MailerConfig`] is built once and never mutated afterwards. It can be
//! assembled with [`MailerConfig::builder`], read from `MISSIVE_*`
//! environment variables, or parsed from TOML:
//!
//! ```toml
//! default_from = "Acme <noreply@acme.test>"
//! subject_prefix = "[Acme] "
//! text_wrap_column = 72
//!
//! [smtp]
//! host = "smtp.acme.test"
//! port = 2525
//! username = "mailer"
//! password = "secret"
//! security = "tls"      # none | starttls | tls
//! timeout = 10          # seconds
//! ```

use crate::address::EmailAddress;
use crate::{MailError, MailResult};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use zeroize::Zeroize;

const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_WRAP_COLUMN: usize = 80;

/// Transport security for the SMTP connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
	/// Plain connection, no TLS.
	None,
	/// Upgrade to TLS with STARTTLS.
	#[default]
	StartTls,
	/// TLS from the first byte (SMTPS).
	Tls,
}

impl FromStr for SmtpSecurity {
	type Err = MailError;

	fn from_str(s: &str) -> MailResult<Self> {
		match s.trim().to_ascii_lowercase().as_str() {
			"none" | "plain" => Ok(Self::None),
			"starttls" => Ok(Self::StartTls),
			"tls" | "ssl" => Ok(Self::Tls),
			other => Err(MailError::Config(format!(
				"Unknown SMTP security mode '{}', expected none, starttls or tls",
				other
			))),
		}
	}
}

/// SMTP connection parameters.
///
/// The password is redacted from `Debug` output and zeroized on drop.
#[derive(Clone, Deserialize)]
pub struct SmtpConfig {
	pub host: String,
	#[serde(default = "default_port")]
	pub port: u16,
	#[serde(default)]
	pub username: Option<String>,
	#[serde(default)]
	pub password: Option<String>,
	#[serde(default)]
	pub security: SmtpSecurity,
	/// Connection timeout; whole seconds in TOML.
	#[serde(default, deserialize_with = "timeout_secs")]
	pub timeout: Option<Duration>,
}

fn default_port() -> u16 {
	DEFAULT_SMTP_PORT
}

fn timeout_secs<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Duration>, D::Error> {
	Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_secs))
}

impl SmtpConfig {
	pub fn new(host: impl Into<String>, port: u16) -> Self {
		Self {
			host: host.into(),
			port,
			username: None,
			password: None,
			security: SmtpSecurity::default(),
			timeout: None,
		}
	}

	pub fn with_credentials(
		mut self,
		username: impl Into<String>,
		password: impl Into<String>,
	) -> Self {
		self.username = Some(username.into());
		self.password = Some(password.into());
		self
	}

	pub fn with_security(mut self, security: SmtpSecurity) -> Self {
		self.security = security;
		self
	}

	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = Some(timeout);
		self
	}
}

impl Default for SmtpConfig {
	fn default() -> Self {
		Self::new("localhost", DEFAULT_SMTP_PORT)
	}
}

impl fmt::Debug for SmtpConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SmtpConfig")
			.field("host", &self.host)
			.field("port", &self.port)
			.field("username", &self.username)
			.field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
			.field("security", &self.security)
			.field("timeout", &self.timeout)
			.finish()
	}
}

impl Drop for SmtpConfig {
	fn drop(&mut self) {
		if let Some(password) = self.password.as_mut() {
			password.zeroize();
		}
	}
}

/// Immutable mailer configuration.
#[derive(Debug, Clone)]
pub struct MailerConfig {
	smtp: SmtpConfig,
	default_from: Option<EmailAddress>,
	subject_prefix: String,
	subject_suffix: String,
	text_wrap_column: usize,
}

impl MailerConfig {
	pub fn builder() -> MailerConfigBuilder {
		MailerConfigBuilder::default()
	}

	pub fn smtp(&self) -> &SmtpConfig {
		&self.smtp
	}

	/// Sender used when neither the call nor the template names one.
	pub fn default_from(&self) -> Option<&EmailAddress> {
		self.default_from.as_ref()
	}

	pub fn subject_prefix(&self) -> &str {
		&self.subject_prefix
	}

	pub fn subject_suffix(&self) -> &str {
		&self.subject_suffix
	}

	pub fn text_wrap_column(&self) -> usize {
		self.text_wrap_column
	}

	/// Wraps a subject in the configured prefix and suffix.
	pub fn decorate_subject(&self, subject: &str) -> String {
		format!("{}{}{}", self.subject_prefix, subject, self.subject_suffix)
	}

	/// Loads configuration from `MISSIVE_*` environment variables.
	///
	/// | Variable | Required | Description |
	/// |----------|----------|-------------|
	/// | `MISSIVE_SMTP_HOST` | Yes | SMTP server hostname |
	/// | `MISSIVE_SMTP_PORT` | No | Port (default: 587) |
	/// | `MISSIVE_SMTP_USERNAME` | No | Username for authentication |
	/// | `MISSIVE_SMTP_PASSWORD` | No | Password for authentication |
	/// | `MISSIVE_SMTP_SECURITY` | No | `starttls` (default), `tls` or `none` |
	/// | `MISSIVE_SMTP_TIMEOUT` | No | Connection timeout in seconds |
	/// | `MISSIVE_DEFAULT_FROM` | No | `Name <email>` or a bare address |
	/// | `MISSIVE_SUBJECT_PREFIX` | No | Prepended to every subject |
	/// | `MISSIVE_SUBJECT_SUFFIX` | No | Appended to every subject |
	/// | `MISSIVE_TEXT_WRAP` | No | Plain-text wrap column (default: 80) |
	pub fn from_env() -> MailResult<Self> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Loads configuration through `lookup`, which maps variable names to
	/// values the way [`std::env::var`] would.
	pub fn from_lookup<F>(lookup: F) -> MailResult<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		let var = |name: &str| lookup(&format!("MISSIVE_{}", name)).filter(|v| !v.is_empty());

		let host = var("SMTP_HOST")
			.ok_or_else(|| MailError::Config("MISSIVE_SMTP_HOST is not set".to_string()))?;
		let mut smtp = SmtpConfig::new(host, DEFAULT_SMTP_PORT);

		if let Some(port) = var("SMTP_PORT") {
			smtp.port = parse_number("MISSIVE_SMTP_PORT", &port)?;
		}
		if let Some(username) = var("SMTP_USERNAME") {
			smtp.username = Some(username);
		}
		if let Some(password) = var("SMTP_PASSWORD") {
			smtp.password = Some(password);
		}
		if let Some(security) = var("SMTP_SECURITY") {
			smtp.security = security.parse()?;
		}
		if let Some(timeout) = var("SMTP_TIMEOUT") {
			let secs = parse_number("MISSIVE_SMTP_TIMEOUT", &timeout)?;
			smtp.timeout = Some(Duration::from_secs(secs));
		}

		let mut builder = Self::builder().smtp(smtp);
		if let Some(from) = var("DEFAULT_FROM") {
			builder = builder.default_from(from);
		}
		if let Some(prefix) = var("SUBJECT_PREFIX") {
			builder = builder.subject_prefix(prefix);
		}
		if let Some(suffix) = var("SUBJECT_SUFFIX") {
			builder = builder.subject_suffix(suffix);
		}
		if let Some(wrap) = var("TEXT_WRAP") {
			builder = builder.text_wrap_column(parse_number("MISSIVE_TEXT_WRAP", &wrap)?);
		}

		builder.build()
	}

	/// Parses configuration from a TOML document.
	pub fn from_toml_str(source: &str) -> MailResult<Self> {
		let file: FileConfig = toml::from_str(source)
			.map_err(|e| MailError::Config(format!("TOML parse error: {}", e)))?;

		let mut builder = Self::builder()
			.smtp(file.smtp)
			.subject_prefix(file.subject_prefix)
			.subject_suffix(file.subject_suffix)
			.text_wrap_column(file.text_wrap_column);
		if let Some(from) = file.default_from {
			builder = builder.default_from(from);
		}

		builder.build()
	}
}

fn parse_number<T: FromStr>(name: &str, value: &str) -> MailResult<T> {
	value
		.trim()
		.parse()
		.map_err(|_| {
			MailError::Config(format!(
				"{} must be a non-negative integer, got '{}'",
				name, value
			))
		})
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
	smtp: SmtpConfig,
	#[serde(default)]
	default_from: Option<EmailAddress>,
	#[serde(default)]
	subject_prefix: String,
	#[serde(default)]
	subject_suffix: String,
	#[serde(default = "default_wrap_column")]
	text_wrap_column: usize,
}

fn default_wrap_column() -> usize {
	DEFAULT_WRAP_COLUMN
}

/// Builder for [`MailerConfig`].
#[derive(Debug, Default)]
pub struct MailerConfigBuilder {
	smtp: Option<SmtpConfig>,
	default_from: Option<EmailAddress>,
	subject_prefix: String,
	subject_suffix: String,
	text_wrap_column: Option<usize>,
}

impl MailerConfigBuilder {
	pub fn smtp(mut self, smtp: SmtpConfig) -> Self {
		self.smtp = Some(smtp);
		self
	}

	/// Default sender; a bare string is parsed as `Name <email>` or an address.
	pub fn default_from(mut self, from: impl Into<EmailAddress>) -> Self {
		self.default_from = Some(from.into());
		self
	}

	pub fn subject_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.subject_prefix = prefix.into();
		self
	}

	pub fn subject_suffix(mut self, suffix: impl Into<String>) -> Self {
		self.subject_suffix = suffix.into();
		self
	}

	/// Plain-text wrap column; `0` disables wrapping.
	pub fn text_wrap_column(mut self, column: usize) -> Self {
		self.text_wrap_column = Some(column);
		self
	}

	pub fn build(self) -> MailResult<MailerConfig> {
		let smtp = self.smtp.unwrap_or_default();
		if smtp.host.trim().is_empty() {
			return Err(MailError::Config("SMTP host must not be empty".to_string()));
		}

		let default_from = match self.default_from {
			Some(EmailAddress::Bare(raw)) => Some(
				raw.parse::<EmailAddress>()
					.map_err(|e| MailError::Config(format!("Invalid default sender: {}", e)))?,
			),
			other => other,
		};

		Ok(MailerConfig {
			smtp,
			default_from,
			subject_prefix: self.subject_prefix,
			subject_suffix: self.subject_suffix,
			text_wrap_column: self.text_wrap_column.unwrap_or(DEFAULT_WRAP_COLUMN),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::collections::HashMap;

	fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
		let vars: HashMap<String, String> = vars
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		move |name| vars.get(name).cloned()
	}

	/// Test: Builder defaults
	#[rstest]
	fn test_builder_defaults() {
		// Act
		let config = MailerConfig::builder().build().unwrap();

		// Assert
		assert_eq!(config.smtp().host, "localhost");
		assert_eq!(config.smtp().port, 587);
		assert_eq!(config.smtp().security, SmtpSecurity::StartTls);
		assert!(config.default_from().is_none());
		assert_eq!(config.subject_prefix(), "");
		assert_eq!(config.subject_suffix(), "");
		assert_eq!(config.text_wrap_column(), 80);
	}

	/// Test: Decorate subject
	#[rstest]
	fn test_decorate_subject() {
		// Arrange
		let config = MailerConfig::builder()
			.subject_prefix("[Acme] ")
			.subject_suffix(" (test)")
			.build()
			.unwrap();

		// Act / Assert
		assert_eq!(config.decorate_subject("Welcome"), "[Acme] Welcome (test)");
	}

	/// Test: Builder parses bare default from
	#[rstest]
	fn test_builder_parses_bare_default_from() {
		// Act
		let config = MailerConfig::builder()
			.default_from("Acme Team <noreply@acme.test>")
			.build()
			.unwrap();

		// Assert
		assert_eq!(
			config.default_from(),
			Some(&EmailAddress::named("Acme Team", "noreply@acme.test"))
		);
	}

	/// Test: Builder rejects invalid default from
	#[rstest]
	fn test_builder_rejects_invalid_default_from() {
		// Act
		let result = MailerConfig::builder().default_from("nobody").build();

		// Assert
		assert!(matches!(result, Err(MailError::Config(_))));
	}

	/// Test: Builder rejects empty host
	#[rstest]
	fn test_builder_rejects_empty_host() {
		// Act
		let result = MailerConfig::builder().smtp(SmtpConfig::new(" ", 25)).build();

		// Assert
		assert!(matches!(result, Err(MailError::Config(_))));
	}

	/// Test: From lookup reads all variables
	#[rstest]
	fn test_from_lookup_reads_all_variables() {
		// Arrange
		let vars = lookup(&[
			("MISSIVE_SMTP_HOST", "smtp.acme.test"),
			("MISSIVE_SMTP_PORT", "2525"),
			("MISSIVE_SMTP_USERNAME", "mailer"),
			("MISSIVE_SMTP_PASSWORD", "secret"),
			("MISSIVE_SMTP_SECURITY", "TLS"),
			("MISSIVE_SMTP_TIMEOUT", "15"),
			("MISSIVE_DEFAULT_FROM", "noreply@acme.test"),
			("MISSIVE_SUBJECT_PREFIX", "[Acme] "),
			("MISSIVE_SUBJECT_SUFFIX", "!"),
			("MISSIVE_TEXT_WRAP", "72"),
		]);

		// Act
		let config = MailerConfig::from_lookup(vars).unwrap();

		// Assert
		let smtp = config.smtp();
		assert_eq!(smtp.host, "smtp.acme.test");
		assert_eq!(smtp.port, 2525);
		assert_eq!(smtp.username.as_deref(), Some("mailer"));
		assert_eq!(smtp.password.as_deref(), Some("secret"));
		assert_eq!(smtp.security, SmtpSecurity::Tls);
		assert_eq!(smtp.timeout, Some(Duration::from_secs(15)));
		assert_eq!(config.default_from(), Some(&EmailAddress::bare("noreply@acme.test")));
		assert_eq!(config.decorate_subject("Hi"), "[Acme] Hi!");
		assert_eq!(config.text_wrap_column(), 72);
	}

	/// Test: From lookup requires host
	#[rstest]
	fn test_from_lookup_requires_host() {
		// Act
		let result = MailerConfig::from_lookup(lookup(&[("MISSIVE_SMTP_PORT", "25")]));

		// Assert
		assert!(matches!(result, Err(MailError::Config(msg)) if msg.contains("MISSIVE_SMTP_HOST")));
	}

	/// Test: From lookup rejects invalid values
	#[rstest]
	#[case("MISSIVE_SMTP_PORT", "not-a-port")]
	#[case("MISSIVE_SMTP_PORT", "70000")]
	#[case("MISSIVE_SMTP_TIMEOUT", "-1")]
	#[case("MISSIVE_SMTP_SECURITY", "ssh")]
	#[case("MISSIVE_TEXT_WRAP", "wide")]
	fn test_from_lookup_rejects_invalid_values(#[case] name: &str, #[case] value: &str) {
		// Arrange
		let vars = lookup(&[("MISSIVE_SMTP_HOST", "smtp.acme.test"), (name, value)]);

		// Act
		let result = MailerConfig::from_lookup(vars);

		// Assert
		assert!(matches!(result, Err(MailError::Config(_))));
	}

	/// Test: From toml str
	#[rstest]
	fn test_from_toml_str() {
		// Arrange
		let source = r#"
			default_from = { name = "Acme, Inc.", email = "noreply@acme.test" }
			subject_suffix = " [staging]"

			[smtp]
			host = "smtp.acme.test"
			security = "none"
			timeout = 5
		"#;

		// Act
		let config = MailerConfig::from_toml_str(source).unwrap();

		// Assert
		assert_eq!(config.smtp().port, 587);
		assert_eq!(config.smtp().security, SmtpSecurity::None);
		assert_eq!(config.smtp().timeout, Some(Duration::from_secs(5)));
		assert_eq!(
			config.default_from().map(ToString::to_string).as_deref(),
			Some(r#""Acme, Inc." <noreply@acme.test>"#)
		);
		assert_eq!(config.decorate_subject("Hi"), "Hi [staging]");
		assert_eq!(config.text_wrap_column(), 80);
	}

	/// Test: From toml str rejects unknown keys
	#[rstest]
	fn test_from_toml_str_rejects_unknown_keys() {
		// Act
		let result = MailerConfig::from_toml_str("subject_prefixx = \"x\"\n[smtp]\nhost = \"h\"\n");

		// Assert
		assert!(matches!(result, Err(MailError::Config(_))));
	}

	/// Test: Password is redacted in debug
	#[rstest]
	fn test_password_is_redacted_in_debug() {
		// Arrange
		let smtp = SmtpConfig::new("smtp.acme.test", 465).with_credentials("user", "hunter2");

		// Act
		let debug = format!("{:?}", smtp);

		// Assert
		assert!(debug.contains("[REDACTED]"));
		assert!(!debug.contains("hunter2"));
	}

	/// Test: Security parse
	#[rstest]
	#[case("none", SmtpSecurity::None)]
	#[case("StartTLS", SmtpSecurity::StartTls)]
	#[case("ssl", SmtpSecurity::Tls)]
	fn test_security_parse(#[case] input: &str, #[case] expected: SmtpSecurity) {
		// Act / Assert
		assert_eq!(input.parse::<SmtpSecurity>().unwrap(), expected);
	}
}
