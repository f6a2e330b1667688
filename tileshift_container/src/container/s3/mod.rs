//! Write tiles as objects into an S3 compatible bucket.

mod config;
mod sink;

pub use config::{DEFAULT_ACL, DEFAULT_TIMEOUT, S3Config, StaticCredentials};
pub use sink::S3Sink;
