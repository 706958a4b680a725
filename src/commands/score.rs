use anyhow::{bail, Result};
use clap::Parser;
use log::{debug, error, info};

use crate::board::collision::{make_policy, CollisionPolicy, PolicyKind};
use crate::board::Board;
use crate::commands::{load_tiles, InputArgs};

#[derive(Parser)]
pub struct ScoreCommand {
  #[clap(flatten)]
  input: InputArgs,

  /// How to pick between two detections of the same cell
  #[clap(long, arg_enum)]
  policy: Option<PolicyKind>,

  /// Seed for the random collision policy
  #[clap(long)]
  seed: Option<u64>,
}

impl ScoreCommand {
  pub fn execute(&self) -> Result<()> {
    let inputs = self.input.resolve()?;
    let kind = self.policy.unwrap_or(inputs.config.collision.policy);
    let seed = self.seed.or(inputs.config.collision.seed);
    let mut policy = make_policy(kind, seed);
    info!("Scoring {} boards with {:?} collision policy", inputs.paths.len(), kind);

    let mut failed = 0;
    for path in inputs.paths.iter() {
      let board = match score_file(path, &inputs.classes, inputs.image_size, policy.as_mut()) {
        Ok(b) => b,
        Err(err) => {
          error!("{}: {:#}", path, err);
          failed += 1;
          continue
        }
      };
      for region in board.regions() {
        debug!("{}: {} x {} crowns = {}", region.kind, region.tiles, region.crowns, region.score());
      }
      println!("{}", report(path, &board, inputs.config.field_width));
    }

    if failed > 0 {
      bail!("{} of {} boards could not be scored", failed, inputs.paths.len());
    }
    Ok(())
  }
}

pub fn score_file(
  path: &str,
  classes: &[String],
  image_size: f64,
  policy: &mut dyn CollisionPolicy,
) -> Result<Board> {
  let tiles = load_tiles(path, classes, image_size)?;
  match Board::new(tiles, policy) {
    Ok(board) => Ok(board),
    Err(err) if err.is_invalid_input() => bail!("invalid detections: {}", err),
    Err(err) => bail!("detections do not form a grid: {}", err),
  }
}

fn section(title: &str) -> String {
  let rule = "-".repeat(title.len());
  format!("{}\n{}\n{}", rule, title, rule)
}

/// The per-board printout: dimensions, labels, scores and the final score.
pub fn report(path: &str, board: &Board, width: usize) -> String {
  let (x_dim, y_dim) = board.dimensions();
  [
    format!("== {}", path),
    section("Board Dimensions"),
    format!("{} x {}", x_dim, y_dim),
    section("Board Values"),
    board.display_tiles(width),
    section("Board Scores"),
    board.display_scores(width),
    section("Final Score"),
    board.total_score().to_string(),
  ]
  .join("\n")
}
