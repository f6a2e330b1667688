//! Concrete tile stores and sinks.

mod directory;
pub use directory::*;

mod mbtiles;
pub use mbtiles::*;

mod s3;
pub use s3::*;
