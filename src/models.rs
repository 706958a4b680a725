pub mod detection;
pub mod tile;

pub use detection::Detection;
pub use tile::Tile;
