//! Temporary credentials from assuming an IAM role, optionally guarded by MFA.

use crate::{args::Cli, prompt};
use anyhow::{Context, Result, anyhow};
use aws_config::{BehaviorVersion, Region};
use aws_sdk_sts::{error::DisplayErrorContext, types::Credentials};
use tileshift_container::StaticCredentials;

const ROLE_SESSION_NAME: &str = "tile-upload";

/// Assumes `role_arn` with the profile and region given on the command line.
///
/// With `--mfa-serial` the MFA code is read from the terminal first.
pub async fn assume_role(cli: &Cli, role_arn: &str) -> Result<StaticCredentials> {
	let mut loader = aws_config::defaults(BehaviorVersion::latest());
	if let Some(profile) = &cli.aws_profile {
		loader = loader.profile_name(profile);
	}
	if let Some(region) = &cli.region {
		loader = loader.region(Region::new(region.clone()));
	}
	let shared = loader.load().await;

	let mut request = aws_sdk_sts::Client::new(&shared)
		.assume_role()
		.role_arn(role_arn)
		.role_session_name(ROLE_SESSION_NAME);

	if let Some(serial) = &cli.mfa_serial {
		let token = prompt::mfa_token(serial)?;
		request = request.serial_number(serial).token_code(token);
	}

	log::debug!("assuming role {role_arn}");
	let output = request
		.send()
		.await
		.map_err(|e| anyhow!("{}", DisplayErrorContext(&e)))
		.with_context(|| format!("assuming role {role_arn:?}"))?;

	let credentials = output
		.credentials()
		.with_context(|| format!("assuming role {role_arn:?} returned no credentials"))?;

	Ok(to_static(credentials))
}

fn to_static(credentials: &Credentials) -> StaticCredentials {
	StaticCredentials {
		access_key_id: credentials.access_key_id().to_string(),
		secret_access_key: credentials.secret_access_key().to_string(),
		session_token: Some(credentials.session_token().to_string()),
	}
}
