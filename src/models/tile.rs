use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::error::BoardError;

pub const EMPTY_LABEL: &str = "empty";

// region is everything before the last underscore, crowns the single trailing digit
static REGEX_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.+)_([0-9])$").unwrap());

/// A labeled cell of the board, either detected or synthesized.
///
/// Geometry is immutable once built. The only mutable state is the crown
/// total of the tile's region, which is written while scoring a board.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
  pub label: String,
  pub crowns: u32,
  pub confidence: Option<f64>,
  pub x_mid: f64,
  pub y_mid: f64,
  pub x_min: f64,
  pub x_max: f64,
  pub y_min: f64,
  pub y_max: f64,
  accumulated_crowns: u32,
}

impl Tile {
  /// Builds a tile from a detection whose center and size are fractions of
  /// a square reference image of `image_size` units.
  pub fn from_detection(
    label: &str,
    x_center: f64,
    y_center: f64,
    width: f64,
    height: f64,
    image_size: f64,
  ) -> Result<Tile, BoardError> {
    let crowns = parse_crowns(label)?;
    let values = [x_center, y_center, width, height, image_size];
    if values.iter().any(|v| !v.is_finite()) {
      return Err(BoardError::InvalidGeometry {
        label: label.to_string(),
        reason: "non-finite coordinate".to_string(),
      });
    }
    if width < 0.0 || height < 0.0 {
      return Err(BoardError::InvalidGeometry {
        label: label.to_string(),
        reason: format!("negative size {}x{}", width, height),
      });
    }

    let mut tile = Tile::at(
      label,
      x_center * image_size,
      y_center * image_size,
      width * image_size,
      height * image_size,
    );
    tile.crowns = crowns;
    Ok(tile)
  }

  /// Builds a synthesized empty cell directly in absolute coordinates.
  pub fn empty(x_mid: f64, y_mid: f64, width: f64, height: f64) -> Tile {
    Tile::at(EMPTY_LABEL, x_mid, y_mid, width, height)
  }

  fn at(label: &str, x_mid: f64, y_mid: f64, width: f64, height: f64) -> Tile {
    Tile {
      label: label.to_string(),
      crowns: 0,
      confidence: None,
      x_mid,
      y_mid,
      x_min: x_mid - width / 2.0,
      x_max: x_mid + width / 2.0,
      y_min: y_mid - height / 2.0,
      y_max: y_mid + height / 2.0,
      accumulated_crowns: 0,
    }
  }

  pub fn with_confidence(mut self, confidence: Option<f64>) -> Tile {
    self.confidence = confidence;
    self
  }

  pub fn is_empty(&self) -> bool {
    self.label == EMPTY_LABEL
  }

  /// Region kind of the tile, i.e. the label without its crown suffix.
  pub fn region(&self) -> &str {
    if self.is_empty() {
      return EMPTY_LABEL;
    }
    match self.label.rfind('_') {
      Some(idx) => &self.label[..idx],
      None => &self.label,
    }
  }

  pub fn width(&self) -> f64 {
    self.x_max - self.x_min
  }

  pub fn height(&self) -> f64 {
    self.y_max - self.y_min
  }

  pub fn contains_point(&self, px: f64, py: f64) -> bool {
    self.x_min <= px && px <= self.x_max && self.y_min <= py && py <= self.y_max
  }

  /// True if `other`'s center lies inside this tile's bounding box.
  pub fn contains(&self, other: &Tile) -> bool {
    self.contains_point(other.x_mid, other.y_mid)
  }

  /// Two tiles occupy the same cell when either box holds the other's center.
  pub fn same_cell(&self, other: &Tile) -> bool {
    self.contains(other) || other.contains(self)
  }

  /// Crowns of the whole region this tile belongs to, once scored.
  pub fn score(&self) -> u32 {
    self.accumulated_crowns
  }

  pub fn add_crowns(&mut self, amount: u32) {
    self.accumulated_crowns += amount;
  }
}

impl fmt::Display for Tile {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(
      f,
      "{} at ({}, {}), ({}, {})",
      self.label, self.x_min, self.y_min, self.x_max, self.y_max
    )
  }
}

fn parse_crowns(label: &str) -> Result<u32, BoardError> {
  if label == EMPTY_LABEL {
    return Ok(0);
  }
  let capture = match REGEX_LABEL.captures(label) {
    Some(c) => c,
    None => {
      return Err(BoardError::InvalidLabel {
        label: label.to_string(),
        reason: "expected <region>_<crowns>".to_string(),
      })
    }
  };
  capture[2].parse::<u32>().map_err(|err| BoardError::InvalidLabel {
    label: label.to_string(),
    reason: err.to_string(),
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn cave_3() -> Tile {
    Tile::from_detection("cave_3", 0.875, 0.875, 0.25, 0.25, 4.0).unwrap()
  }

  fn wheat_0() -> Tile {
    Tile::from_detection("wheat_0", 0.0, 0.0, 0.0, 0.0, 0.0).unwrap()
  }

  fn empty() -> Tile {
    Tile::empty(0.5, 0.5, 1.0, 1.0)
  }

  #[test]
  fn display_shows_label_and_corners() {
    assert_eq!(empty().to_string(), "empty at (0, 0), (1, 1)");
    assert_eq!(wheat_0().to_string(), "wheat_0 at (0, 0), (0, 0)");
    assert_eq!(cave_3().to_string(), "cave_3 at (3, 3), (4, 4)");
  }

  #[test]
  fn detection_is_scaled_to_image_size() {
    let tile = cave_3();
    assert_eq!((tile.x_mid, tile.y_mid), (3.5, 3.5));
    assert_eq!(tile.crowns, 3);
    assert_eq!(wheat_0().width(), 0.0);
    assert_eq!(empty().height(), 1.0);
    assert_eq!(empty().crowns, 0);
  }

  #[test]
  fn detected_empty_class_is_scaled() {
    let tile = Tile::from_detection("empty", 0.5, 0.25, 0.1, 0.1, 640.0).unwrap();
    assert_eq!((tile.x_mid, tile.y_mid), (320.0, 160.0));
    assert_eq!(tile.crowns, 0);
    assert!(tile.is_empty());
  }

  #[test]
  fn duplicate_detections_share_a_cell() {
    assert!(cave_3().same_cell(&cave_3()));
    assert!(!cave_3().same_cell(&empty()));
  }

  #[test]
  fn containment_is_directional() {
    assert!(!empty().contains(&cave_3()));
    assert!(!cave_3().contains(&empty()));
    assert!(empty().contains(&wheat_0()));
    assert!(!wheat_0().contains(&empty()));
    assert!(empty().same_cell(&wheat_0()));
  }

  #[test]
  fn accumulates_crowns() {
    let mut tile = cave_3();
    assert_eq!(tile.score(), 0);
    tile.add_crowns(3);
    assert_eq!(tile.score(), 3);
  }

  #[test]
  fn region_strips_crown_suffix() {
    assert_eq!(empty().region(), "empty");
    assert_eq!(wheat_0().region(), "wheat");
    assert_eq!(cave_3().region(), "cave");
    let castle = Tile::from_detection("dark_forest_2", 0.5, 0.5, 0.1, 0.1, 640.0).unwrap();
    assert_eq!(castle.region(), "dark_forest");
    assert_eq!(castle.crowns, 2);
  }

  #[test]
  fn rejects_unparseable_labels() {
    for label in ["cave", "cave_x", "cave_12", "_"] {
      let err = Tile::from_detection(label, 0.5, 0.5, 0.1, 0.1, 640.0).unwrap_err();
      assert!(matches!(err, BoardError::InvalidLabel { .. }), "{}", label);
    }
  }

  #[test]
  fn rejects_negative_size() {
    let err = Tile::from_detection("cave_1", 0.5, 0.5, -0.1, 0.1, 640.0).unwrap_err();
    assert!(matches!(err, BoardError::InvalidGeometry { .. }));
    assert!(err.is_invalid_input());
  }
}
