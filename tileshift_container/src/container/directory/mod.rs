//! Write tiles into a local directory tree.

mod sink;

pub use sink::DirectorySink;
