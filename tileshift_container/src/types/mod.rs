mod tile_sink;
mod tile_store;

pub use tile_sink::TileSink;
pub use tile_store::{TileRowStream, TileStore};
