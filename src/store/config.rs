use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;
use std::fs::read_to_string;

use crate::board::collision::PolicyKind;

pub const DEFAULT_IMAGE_SIZE: f64 = 640.0;
pub const DEFAULT_FIELD_WIDTH: usize = 11;

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Root {
  /// Side of the square image the detections are normalized against.
  pub image_size: f64,
  /// Width of one rendered grid cell.
  pub field_width: usize,
  pub collision: CollisionConfig,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct CollisionConfig {
  pub policy: PolicyKind,
  pub seed: Option<u64>,
}

impl Default for Root {
  fn default() -> Root {
    Root {
      image_size: DEFAULT_IMAGE_SIZE,
      field_width: DEFAULT_FIELD_WIDTH,
      collision: CollisionConfig::default(),
    }
  }
}

impl Default for CollisionConfig {
  fn default() -> CollisionConfig {
    CollisionConfig {
      policy: PolicyKind::Random,
      seed: None,
    }
  }
}

impl Root {
  pub fn load(path: Option<&str>) -> Result<Root> {
    let path = match path {
      Some(p) => p,
      None => return Ok(Root::default()),
    };
    let config_str = read_to_string(path)
      .with_context(|| format!("unable to read config file {}", path))?;
    let config = Root::parse(&config_str)
      .with_context(|| format!("unable to parse config file {}", path))?;
    debug!("Loaded config {:?}", config);
    Ok(config)
  }

  pub fn parse(config_str: &str) -> Result<Root> {
    let config: Root = serde_yaml::from_str(config_str)?;
    Ok(config)
  }
}
