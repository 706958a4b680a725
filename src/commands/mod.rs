use anyhow::Result;
use clap::Parser;

use crate::error::BoardError;
use crate::models::Tile;
use crate::store;
use crate::store::config;

pub mod score;
pub mod tiles;

#[derive(Parser)]
pub enum SubCommand {
  Score(score::ScoreCommand),
  Tiles(tiles::TilesCommand),
}

pub fn run_command(sub: SubCommand) -> Result<()> {
  match sub {
    SubCommand::Score(cmd) => cmd.execute(),
    SubCommand::Tiles(cmd) => cmd.execute(),
  }
}

/// Inputs shared by every command that reads detections.
#[derive(Parser)]
pub struct InputArgs {
  /// Class names, one per line, indexed by line number
  #[clap(long, required = true)]
  classes: String,

  /// YAML config file
  #[clap(long)]
  config: Option<String>,

  /// Side of the square image detections are normalized to
  #[clap(long)]
  image_size: Option<f64>,

  /// Detection files or glob patterns, one board per file
  #[clap(required = true, min_values = 1)]
  inputs: Vec<String>,
}

/// Everything a command needs once its arguments are resolved.
pub struct Inputs {
  pub config: config::Root,
  pub classes: Vec<String>,
  pub image_size: f64,
  pub paths: Vec<String>,
}

impl InputArgs {
  pub fn resolve(&self) -> Result<Inputs> {
    let config = config::Root::load(self.config.as_deref())?;
    let classes = store::load_classes(&self.classes)?;
    let image_size = self.image_size.unwrap_or(config.image_size);
    Ok(Inputs {
      config,
      classes,
      image_size,
      paths: store::expand_inputs(&self.inputs),
    })
  }
}

/// Reads one detection file and converts every record into a tile.
pub fn load_tiles(path: &str, classes: &[String], image_size: f64) -> Result<Vec<Tile>> {
  let detections = store::load_detections(path)?;
  let tiles = detections
    .iter()
    .map(|d| d.to_tile(classes, image_size))
    .collect::<Result<Vec<Tile>, BoardError>>()?;
  Ok(tiles)
}
