//! `SQLite` file `*.mbtiles` as tile store
//!
//! Only reading is supported. Rows are exposed exactly as stored, including the bottom-up
//! (TMS) row numbering of the `tiles` table.

mod reader;

pub use reader::MBTilesReader;
