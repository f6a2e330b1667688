//! S3 compatible object store sink using the AWS SDK.
//!
//! Every tile becomes one `PutObject` request with the configured canned ACL, content type and
//! content encoding. The client keeps its connections pooled, applies a connect and read timeout
//! per request and never retries: a failed write is reported to the caller as is.

use super::S3Config;
use crate::TileSink;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, retry::RetryConfig, timeout::TimeoutConfig};
use aws_sdk_s3::{
	Client,
	config::Credentials,
	error::{DisplayErrorContext, SdkError},
	primitives::ByteStream,
	types::ObjectCannedAcl,
};
use tileshift_core::Blob;

/// Region used when neither the configuration nor the environment names one.
const FALLBACK_REGION: &str = "us-east-1";

pub struct S3Sink {
	client: Client,
	bucket: String,
	acl: ObjectCannedAcl,
}

impl S3Sink {
	/// Builds the S3 client. Credentials are resolved lazily on the first request.
	pub async fn new(config: &S3Config) -> Result<S3Sink> {
		log::debug!("create S3 client for bucket {:?}", config.bucket);

		let mut loader = aws_config::defaults(BehaviorVersion::latest());
		if let Some(profile) = &config.profile {
			loader = loader.profile_name(profile);
		}
		if let Some(region) = &config.region {
			loader = loader.region(Region::new(region.clone()));
		}
		let shared_config = loader.load().await;

		let mut builder = aws_sdk_s3::config::Builder::from(&shared_config)
			.timeout_config(
				TimeoutConfig::builder()
					.connect_timeout(config.timeout)
					.read_timeout(config.timeout)
					.build(),
			)
			.retry_config(RetryConfig::disabled());

		if shared_config.region().is_none() {
			builder = builder.region(Region::new(FALLBACK_REGION));
		}

		if let Some(endpoint) = &config.endpoint {
			builder = builder.endpoint_url(endpoint).force_path_style(true);
		}

		if let Some(credentials) = &config.credentials {
			builder = builder.credentials_provider(Credentials::new(
				&credentials.access_key_id,
				&credentials.secret_access_key,
				credentials.session_token.clone(),
				None,
				"tileshift",
			));
		}

		Ok(S3Sink {
			client: Client::from_conf(builder.build()),
			bucket: config.bucket.clone(),
			acl: ObjectCannedAcl::from(config.acl.as_str()),
		})
	}
}

/// SDK errors only print their innermost cause with `Display`; keep the whole context.
fn sdk_error<E, R>(err: SdkError<E, R>) -> anyhow::Error
where
	E: std::error::Error + Send + Sync + 'static,
	R: std::fmt::Debug + Send + Sync + 'static,
{
	anyhow!("{}", DisplayErrorContext(&err))
}

#[async_trait]
impl TileSink for S3Sink {
	async fn write(
		&self,
		key: &str,
		blob: Blob,
		content_type: Option<&str>,
		content_encoding: Option<&str>,
	) -> Result<()> {
		log::trace!("put s3://{}/{key}", self.bucket);

		self
			.client
			.put_object()
			.bucket(&self.bucket)
			.key(key)
			.acl(self.acl.clone())
			.set_content_type(content_type.map(str::to_string))
			.set_content_encoding(content_encoding.map(str::to_string))
			.body(ByteStream::from(blob.into_vec()))
			.send()
			.await
			.map_err(sdk_error)?;
		Ok(())
	}

	async fn contains_any(&self, prefix: &str) -> Result<bool> {
		let output = self
			.client
			.list_objects_v2()
			.bucket(&self.bucket)
			.prefix(prefix)
			.max_keys(1)
			.send()
			.await
			.map_err(sdk_error)?;
		Ok(!output.contents().is_empty())
	}

	fn location(&self, prefix: &str) -> String {
		format!("s3://{}/{prefix}", self.bucket)
	}
}

impl std::fmt::Debug for S3Sink {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("S3Sink")
			.field("bucket", &self.bucket)
			.field("acl", &self.acl)
			.finish_non_exhaustive()
	}
}
