use anyhow::Result;
use clap::Parser;
use log::warn;

use crate::board::builder::infer_geometry;
use crate::commands::{load_tiles, InputArgs};
use crate::models::Tile;

/// Lists the parsed detections of each input in row-major order
#[derive(Parser)]
pub struct TilesCommand {
  #[clap(flatten)]
  input: InputArgs,
}

impl TilesCommand {
  pub fn execute(&self) -> Result<()> {
    let inputs = self.input.resolve()?;
    for path in inputs.paths.iter() {
      let tiles = match load_tiles(path, &inputs.classes, inputs.image_size) {
        Ok(t) => t,
        Err(err) => {
          warn!("{}: {:#}", path, err);
          continue
        }
      };
      println!("== {}", path);
      println!("{}", list_tiles(tiles));
    }
    Ok(())
  }
}

pub fn list_tiles(mut tiles: Vec<Tile>) -> String {
  match infer_geometry(&tiles) {
    Ok(geometry) => tiles.sort_by(|a, b| geometry.row_major_cmp(a, b)),
    Err(err) => {
      warn!("listing by raw position: {}", err);
      tiles.sort_by(|a, b| a.y_mid.total_cmp(&b.y_mid).then(a.x_mid.total_cmp(&b.x_mid)));
    }
  }
  tiles
    .iter()
    .map(|t| match t.confidence {
      Some(c) => format!("{} [{:.2}]", t, c),
      None => t.to_string(),
    })
    .collect::<Vec<String>>()
    .join("\n")
}
