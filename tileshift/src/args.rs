use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{ErrorLevel, Verbosity};
use std::{path::PathBuf, time::Duration};
use tileshift_container::{
	DEFAULT_ACL, DEFAULT_MAX_OPERATIONS, DEFAULT_TILE_DIR, Destination, S3Config, TransferConfig,
};
use tileshift_core::TransferError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputType {
	/// upload into an S3 compatible bucket
	S3,
	/// write into a local directory
	Local,
}

#[derive(Parser, Debug)]
#[command(
	author,
	version,
	about,
	long_about = None,
	propagate_version = true,
)]
pub struct Cli {
	/// MBTiles archive to read the tiles from
	#[arg(long, short, value_name = "FILE", display_order = 0)]
	pub input: PathBuf,

	/// where to write the tiles
	#[arg(long, value_enum, default_value_t = OutputType::S3, display_order = 0)]
	pub output_type: OutputType,

	/// maximum number of concurrent writes, also the number of writes started per second and the default page size
	#[arg(long, value_name = "int", default_value_t = DEFAULT_MAX_OPERATIONS, display_order = 1)]
	pub max_operations: usize,

	/// number of rows read from the archive per page
	#[arg(long, value_name = "int", display_order = 1)]
	pub page_size: Option<u64>,

	/// minimum zoom level, defaults to "minzoom" of the archive metadata
	#[arg(long, value_name = "int", display_order = 2)]
	pub min_zoom: Option<u8>,

	/// maximum zoom level, defaults to "maxzoom" of the archive metadata
	#[arg(long, value_name = "int", display_order = 2)]
	pub max_zoom: Option<u8>,

	/// directory (or key prefix) below which the tiles are written
	#[arg(long, value_name = "DIR", default_value_t = DEFAULT_TILE_DIR.to_string(), display_order = 3)]
	pub tile_dir: String,

	/// write the tiles directly into the root, ignoring --tile-dir
	#[arg(long, display_order = 3)]
	pub in_root: bool,

	/// file extension of the tiles, overrides the one derived from the archive "format"
	#[arg(long, value_name = "EXT", display_order = 3)]
	pub file_extension: Option<String>,

	/// target bucket, required for --output-type s3
	#[arg(long, display_order = 4)]
	pub bucket: Option<String>,

	/// named profile of the AWS config files
	#[arg(long, value_name = "PROFILE", display_order = 4)]
	pub aws_profile: Option<String>,

	/// canned ACL of the uploaded tiles
	#[arg(long, default_value_t = DEFAULT_ACL.to_string(), display_order = 4)]
	pub acl: String,

	/// AWS region of the bucket
	#[arg(long, display_order = 4)]
	pub region: Option<String>,

	/// custom S3 endpoint, e.g. of a MinIO server
	#[arg(long, value_name = "URL", env = "AWS_S3_ENDPOINT", display_order = 4)]
	pub endpoint: Option<String>,

	/// connect and read timeout per request in milliseconds
	#[arg(long, value_name = "int", default_value_t = 2000, display_order = 4)]
	pub timeout_ms: u64,

	/// role to assume before uploading
	#[arg(long, value_name = "ARN", display_order = 5)]
	pub role_arn: Option<String>,

	/// serial number or ARN of the MFA device used when assuming --role-arn
	#[arg(long, value_name = "SERIAL", requires = "role_arn", display_order = 5)]
	pub mfa_serial: Option<String>,

	/// target directory, required for --output-type local
	#[arg(long, value_name = "DIR", display_order = 6)]
	pub local_out_dir: Option<PathBuf>,

	/// do not ask before writing into a destination that already contains files
	#[arg(long, short, display_order = 7)]
	pub yes: bool,

	#[command(flatten)]
	pub verbose: Verbosity<ErrorLevel>,
}

impl Cli {
	pub fn destination(&self) -> Result<Destination, TransferError> {
		match self.output_type {
			OutputType::S3 => {
				let Some(bucket) = &self.bucket else {
					return Err(TransferError::configuration(
						"--bucket is required when writing to S3",
					));
				};
				let mut config = S3Config::new(bucket);
				config.acl.clone_from(&self.acl);
				config.region.clone_from(&self.region);
				config.endpoint.clone_from(&self.endpoint);
				config.profile.clone_from(&self.aws_profile);
				config.timeout = Duration::from_millis(self.timeout_ms);
				Ok(Destination::S3(config))
			}
			OutputType::Local => match &self.local_out_dir {
				Some(dir) => Ok(Destination::Directory(dir.clone())),
				None => Err(TransferError::configuration(
					"--local-out-dir is required when writing to a local directory",
				)),
			},
		}
	}

	pub fn transfer_config(&self) -> Result<TransferConfig, TransferError> {
		let mut config = TransferConfig::new(&self.input, self.destination()?);
		config.min_zoom = self.min_zoom;
		config.max_zoom = self.max_zoom;
		config.tile_dir.clone_from(&self.tile_dir);
		config.in_root = self.in_root;
		config.max_operations = self.max_operations;
		config.page_size = self.page_size;
		config.file_extension.clone_from(&self.file_extension);
		config.validate()?;
		Ok(config)
	}
}
