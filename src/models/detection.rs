use serde::Deserialize;

use crate::error::BoardError;
use crate::models::Tile;

/// One line of detector output: a class index and a box normalized to the
/// reference image, optionally followed by the detector's confidence.
#[derive(Debug, Deserialize, PartialEq)]
pub struct Detection {
  pub class: usize,
  pub x_center: f64,
  pub y_center: f64,
  pub width: f64,
  pub height: f64,
  pub confidence: Option<f64>,
}

impl Detection {
  pub fn to_tile(&self, classes: &[String], image_size: f64) -> Result<Tile, BoardError> {
    let label = classes.get(self.class).ok_or(BoardError::UnknownClass {
      index: self.class,
      count: classes.len(),
    })?;
    let tile = Tile::from_detection(
      label,
      self.x_center,
      self.y_center,
      self.width,
      self.height,
      image_size,
    )?;
    Ok(tile.with_confidence(self.confidence))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn classes() -> Vec<String> {
    vec!["empty".to_string(), "cave_0".to_string(), "cave_1".to_string()]
  }

  #[test]
  fn resolves_class_label() {
    let detection = Detection {
      class: 2,
      x_center: 0.5,
      y_center: 0.25,
      width: 0.1,
      height: 0.1,
      confidence: Some(0.9),
    };
    let tile = detection.to_tile(&classes(), 640.0).unwrap();
    assert_eq!(tile.label, "cave_1");
    assert_eq!(tile.crowns, 1);
    assert_eq!((tile.x_mid, tile.y_mid), (320.0, 160.0));
    assert_eq!(tile.confidence, Some(0.9));
  }

  #[test]
  fn unknown_class_is_rejected() {
    let detection = Detection {
      class: 7,
      x_center: 0.5,
      y_center: 0.5,
      width: 0.1,
      height: 0.1,
      confidence: None,
    };
    assert_eq!(
      detection.to_tile(&classes(), 640.0),
      Err(BoardError::UnknownClass { index: 7, count: 3 })
    );
  }
}
