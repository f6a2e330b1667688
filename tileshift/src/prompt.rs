//! Interactive questions on the terminal.

use anyhow::{Context, Result};
use dialoguer::{Confirm, Password};
use tileshift_container::ConfirmationGate;

const CONFIRM_PROMPT: &str = "Files already exist in that location, are you sure you want to continue?";

/// Asks on stderr whether to write into a destination that already holds files. Defaults to no.
pub struct TerminalConfirm;

impl ConfirmationGate for TerminalConfirm {
	fn confirm(&self, location: &str) -> Result<bool> {
		eprintln!("{location}");
		Confirm::new()
			.with_prompt(CONFIRM_PROMPT)
			.default(false)
			.interact()
			.context("asking for confirmation")
	}
}

pub fn mfa_token(serial: &str) -> Result<String> {
	Password::new()
		.with_prompt(format!("MFA code for {serial}"))
		.interact()
		.context("reading the MFA code")
}
