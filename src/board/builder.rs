use log::debug;

use crate::board::collision::{self, CollisionPolicy};
use crate::board::Geometry;
use crate::error::BoardError;
use crate::models::Tile;

/// Largest board side accepted. Real boards are at most 7 or 13 cells wide.
pub const MAX_CELLS_PER_SIDE: usize = 64;

/// Estimates the lattice the detections sit on: the extent of their centers
/// and one mean cell size for the whole board.
pub fn infer_geometry(tiles: &[Tile]) -> Result<Geometry, BoardError> {
  if tiles.is_empty() {
    return Err(BoardError::NoTiles);
  }

  let mut min_x = f64::INFINITY;
  let mut max_x = f64::NEG_INFINITY;
  let mut min_y = f64::INFINITY;
  let mut max_y = f64::NEG_INFINITY;
  let mut sum_width = 0.0;
  let mut sum_height = 0.0;
  for tile in tiles.iter() {
    min_x = min_x.min(tile.x_mid);
    max_x = max_x.max(tile.x_mid);
    min_y = min_y.min(tile.y_mid);
    max_y = max_y.max(tile.y_mid);
    sum_width += tile.width();
    sum_height += tile.height();
  }
  let cell_width = sum_width / tiles.len() as f64;
  let cell_height = sum_height / tiles.len() as f64;
  let degenerate = |v: f64| !v.is_finite() || v <= 0.0;
  if degenerate(cell_width) || degenerate(cell_height) {
    return Err(BoardError::DegenerateCell { width: cell_width, height: cell_height });
  }

  // float to usize casts saturate, so the bound check below cannot overflow
  let x_dim = ((max_x - min_x) / cell_width).round() as usize;
  let y_dim = ((max_y - min_y) / cell_height).round() as usize;
  if x_dim >= MAX_CELLS_PER_SIDE || y_dim >= MAX_CELLS_PER_SIDE {
    return Err(BoardError::TooManyCells {
      x_dim: x_dim.saturating_add(1),
      y_dim: y_dim.saturating_add(1),
      max: MAX_CELLS_PER_SIDE,
    });
  }

  Ok(Geometry {
    min_x,
    min_y,
    cell_width,
    cell_height,
    x_dim: x_dim + 1,
    y_dim: y_dim + 1,
  })
}

/// Turns raw detections into a dense row-major grid of `x_dim * y_dim` tiles.
pub fn build(
  mut tiles: Vec<Tile>,
  policy: &mut dyn CollisionPolicy,
) -> Result<(Vec<Tile>, Geometry), BoardError> {
  let geometry = infer_geometry(&tiles)?;
  debug!("Inferred geometry {:?}", geometry);

  let dropped = collision::resolve(&mut tiles, policy);
  if dropped > 0 {
    debug!("Dropped {} colliding detections", dropped);
  }

  add_empty_tiles(&mut tiles, &geometry);

  let expected = geometry.x_dim * geometry.y_dim;
  if tiles.len() != expected {
    return Err(BoardError::GeometryInconsistency {
      x_dim: geometry.x_dim,
      y_dim: geometry.y_dim,
      actual: tiles.len(),
    });
  }
  let board = place_row_major(tiles, &geometry)?;
  check_cells(&board, &geometry)?;
  Ok((board, geometry))
}

/// Puts every tile into the slot `row * x_dim + col` of its nearest lattice point.
fn place_row_major(tiles: Vec<Tile>, geometry: &Geometry) -> Result<Vec<Tile>, BoardError> {
  let mut slots: Vec<Option<Tile>> = vec![None; geometry.x_dim * geometry.y_dim];
  for tile in tiles {
    let (col, row) = geometry.lattice_position(&tile);
    let in_range = |v: f64, dim: usize| v >= 0.0 && v < dim as f64;
    if !in_range(col, geometry.x_dim) || !in_range(row, geometry.y_dim) {
      return Err(BoardError::CellConflict {
        col: col.max(0.0) as usize,
        row: row.max(0.0) as usize,
        reason: format!("outside the board for {}", tile),
      });
    }
    let (col, row) = (col as usize, row as usize);
    let slot = &mut slots[row * geometry.x_dim + col];
    if let Some(other) = slot {
      return Err(BoardError::CellConflict {
        col,
        row,
        reason: format!("claimed by both {} and {}", other, tile),
      });
    }
    *slot = Some(tile);
  }

  let mut board = Vec::with_capacity(slots.len());
  for (idx, slot) in slots.into_iter().enumerate() {
    match slot {
      Some(tile) => board.push(tile),
      None => {
        return Err(BoardError::CellConflict {
          col: idx % geometry.x_dim,
          row: idx / geometry.x_dim,
          reason: "not claimed by any tile".to_string(),
        })
      }
    }
  }
  Ok(board)
}

/// Each lattice point must be covered by exactly one tile, the one in its slot.
fn check_cells(board: &[Tile], geometry: &Geometry) -> Result<(), BoardError> {
  for row in 0..geometry.y_dim {
    for col in 0..geometry.x_dim {
      let (x, y) = geometry.cell_center(col, row);
      if !board[row * geometry.x_dim + col].contains_point(x, y) {
        return Err(BoardError::CellConflict {
          col,
          row,
          reason: "not covered by its own tile".to_string(),
        });
      }
      let covering = board.iter().filter(|t| t.contains_point(x, y)).count();
      if covering > 1 {
        return Err(BoardError::CellConflict {
          col,
          row,
          reason: format!("covered by {} tiles", covering),
        });
      }
    }
  }
  Ok(())
}

fn add_empty_tiles(tiles: &mut Vec<Tile>, geometry: &Geometry) {
  for row in 0..geometry.y_dim {
    for col in 0..geometry.x_dim {
      let (x, y) = geometry.cell_center(col, row);
      if tiles.iter().any(|t| t.contains_point(x, y)) {
        continue;
      }
      let tile = Tile::empty(x, y, geometry.cell_width, geometry.cell_height);
      debug!("Filling ({}, {}) with {}", col, row, tile);
      tiles.push(tile);
    }
  }
}
