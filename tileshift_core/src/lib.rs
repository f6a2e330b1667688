//! Contains the tile row and archive metadata types, the key mapping rules, the error taxonomy
//! and progress indicators shared by the other tileshift crates.

pub mod progress;

pub mod types;
pub use types::*;
