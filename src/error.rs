use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum BoardError {
  #[error("no tiles to infer the board from")]
  NoTiles,

  #[error("invalid label '{label}': {reason}")]
  InvalidLabel { label: String, reason: String },

  #[error("unknown class index {index} ({count} classes loaded)")]
  UnknownClass { index: usize, count: usize },

  #[error("invalid tile geometry for '{label}': {reason}")]
  InvalidGeometry { label: String, reason: String },

  #[error("degenerate cell size {width}x{height}")]
  DegenerateCell { width: f64, height: f64 },

  #[error("inferred board of {x_dim}x{y_dim} cells exceeds {max} per side")]
  TooManyCells { x_dim: usize, y_dim: usize, max: usize },

  #[error("board has {actual} tiles, expected {x_dim}x{y_dim}")]
  GeometryInconsistency { x_dim: usize, y_dim: usize, actual: usize },

  #[error("cell ({col}, {row}) is {reason}")]
  CellConflict { col: usize, row: usize, reason: String },
}

impl BoardError {
  /// True for every error caused by the detections themselves rather than
  /// by the inferred grid.
  pub fn is_invalid_input(&self) -> bool {
    !matches!(
      self,
      BoardError::GeometryInconsistency { .. } | BoardError::CellConflict { .. }
    )
  }
}
