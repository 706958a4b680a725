pub mod builder;
pub mod collision;
pub mod format;
pub mod scoring;

use log::info;
use std::cmp::Ordering;

use crate::board::collision::CollisionPolicy;
use crate::board::format::Field;
use crate::board::scoring::Region;
use crate::error::BoardError;
use crate::models::Tile;

/// The lattice a board was inferred on.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
  pub min_x: f64,
  pub min_y: f64,
  pub cell_width: f64,
  pub cell_height: f64,
  pub x_dim: usize,
  pub y_dim: usize,
}

impl Geometry {
  /// Expected center of grid cell `(col, row)`.
  pub fn cell_center(&self, col: usize, row: usize) -> (f64, f64) {
    (
      self.min_x + self.cell_width * col as f64,
      self.min_y + self.cell_height * row as f64,
    )
  }

  /// Nearest lattice coordinates of a tile's center, possibly off the board.
  pub fn lattice_position(&self, tile: &Tile) -> (f64, f64) {
    (
      ((tile.x_mid - self.min_x) / self.cell_width).round(),
      ((tile.y_mid - self.min_y) / self.cell_height).round(),
    )
  }

  /// Row-major ordering: by lattice row, then by x within the row.
  /// Total for any tiles, however jittered.
  pub fn row_major_cmp(&self, a: &Tile, b: &Tile) -> Ordering {
    let (_, row_a) = self.lattice_position(a);
    let (_, row_b) = self.lattice_position(b);
    row_a.total_cmp(&row_b).then(a.x_mid.total_cmp(&b.x_mid))
  }
}

/// A dense, scored board.
#[derive(Debug)]
pub struct Board {
  tiles: Vec<Tile>,
  geometry: Geometry,
  regions: Vec<Region>,
  total_score: u32,
}

impl Board {
  /// Builds the dense grid from raw detections and scores it.
  pub fn new(tiles: Vec<Tile>, policy: &mut dyn CollisionPolicy) -> Result<Board, BoardError> {
    let (mut tiles, geometry) = builder::build(tiles, policy)?;
    let regions = scoring::score_tiles(&mut tiles, &geometry);
    let total_score = tiles.iter().map(|t| t.score()).sum();
    info!(
      "Scored {}x{} board: {} regions, {} points",
      geometry.x_dim,
      geometry.y_dim,
      regions.len(),
      total_score
    );
    Ok(Board { tiles, geometry, regions, total_score })
  }

  pub fn dimensions(&self) -> (usize, usize) {
    (self.geometry.x_dim, self.geometry.y_dim)
  }

  pub fn tiles(&self) -> &[Tile] {
    &self.tiles
  }

  pub fn regions(&self) -> &[Region] {
    &self.regions
  }

  pub fn total_score(&self) -> u32 {
    self.total_score
  }

  pub fn get_tile(&self, x: usize, y: usize) -> Option<&Tile> {
    if x >= self.geometry.x_dim || y >= self.geometry.y_dim {
      return None;
    }
    self.tiles.get(x + y * self.geometry.x_dim)
  }

  pub fn display_tiles(&self, width: usize) -> String {
    format::render(&self.tiles, self.geometry.x_dim, Field::Label, width)
  }

  pub fn display_scores(&self, width: usize) -> String {
    format::render(&self.tiles, self.geometry.x_dim, Field::Score, width)
  }
}
