//! Contains types like tile rows, zoom ranges, tile formats, key mapping and errors.

mod archive_metadata;
pub use archive_metadata::*;

mod blob;
pub use blob::*;

mod error;
pub use error::*;

mod tile_content;
pub use tile_content::*;

mod tile_format;
pub use tile_format::*;

mod tile_key;
pub use tile_key::*;

mod tile_row;
pub use tile_row::*;

mod zoom_range;
pub use zoom_range::*;
