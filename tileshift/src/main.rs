//! Command line tool that moves the tiles of an MBTiles archive into an S3 bucket or a local
//! directory tree.

mod args;
mod credentials;
mod prompt;

use anyhow::Result;
use args::Cli;
use clap::Parser;
use colored::Colorize;
use tileshift_container::{AssumeYes, ConfirmationGate, Destination, TransferOutcome, run_transfer};
use tileshift_core::progress::get_progress_bar;

fn main() {
	let cli = Cli::parse();

	env_logger::Builder::new()
		.filter_level(cli.verbose.log_level_filter())
		.format_timestamp(None)
		.init();

	if let Err(err) = run(&cli) {
		eprintln!(
			"{}\n\n{err:#}",
			"❌ Sorry but we couldn't complete the operation - check the error message below.".red()
		);
		std::process::exit(1);
	}
}

#[tokio::main]
async fn run(cli: &Cli) -> Result<()> {
	let mut config = cli.transfer_config()?;

	if let (Destination::S3(s3), Some(role_arn)) = (&mut config.destination, &cli.role_arn) {
		s3.credentials = Some(credentials::assume_role(cli, role_arn).await?);
	}

	let gate: Box<dyn ConfirmationGate> = if cli.yes {
		Box::new(AssumeYes)
	} else {
		Box::new(prompt::TerminalConfirm)
	};

	let mut progress = get_progress_bar("Uploading");
	match run_transfer(&config, gate.as_ref(), progress.as_mut()).await? {
		TransferOutcome::Completed(summary) => {
			log::info!("{} tiles in {} pages", summary.processed, summary.pages);
			println!("🎉 All tiles written to {}", summary.destination);
		}
		TransferOutcome::Declined => eprintln!("nothing was written"),
	}

	Ok(())
}
