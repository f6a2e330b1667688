use std::{fmt, time::Duration};

/// Default canned ACL of uploaded tiles.
pub const DEFAULT_ACL: &str = "public-read";

/// Default connect and read timeout per request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(2000);

/// Temporary or long-lived credentials that bypass the default provider chain.
#[derive(Clone, PartialEq, Eq)]
pub struct StaticCredentials {
	pub access_key_id: String,
	pub secret_access_key: String,
	pub session_token: Option<String>,
}

impl fmt::Debug for StaticCredentials {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("StaticCredentials")
			.field("access_key_id", &self.access_key_id)
			.field("secret_access_key", &"***")
			.field("session_token", &self.session_token.as_ref().map(|_| "***"))
			.finish()
	}
}

/// Everything needed to build an [`S3Sink`](crate::S3Sink).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct S3Config {
	pub bucket: String,
	pub acl: String,
	pub region: Option<String>,
	/// Custom endpoint, e.g. a MinIO server. Enables path-style addressing.
	pub endpoint: Option<String>,
	/// Named profile of the shared AWS config files.
	pub profile: Option<String>,
	pub credentials: Option<StaticCredentials>,
	pub timeout: Duration,
}

impl S3Config {
	pub fn new(bucket: impl Into<String>) -> S3Config {
		S3Config {
			bucket: bucket.into(),
			acl: DEFAULT_ACL.to_string(),
			region: None,
			endpoint: None,
			profile: None,
			credentials: None,
			timeout: DEFAULT_TIMEOUT,
		}
	}
}
