use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use crate::models::Tile;

/// Which tile of a colliding pair is dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Discard {
  First,
  Second,
}

/// Decides which of two detections of the same cell survives.
pub trait CollisionPolicy {
  fn discard(&mut self, first: &Tile, second: &Tile) -> Discard;
}

/// Drops either tile of the pair with equal probability.
pub struct RandomDiscard<R: Rng> {
  rng: R,
}

impl RandomDiscard<StdRng> {
  pub fn seeded(seed: u64) -> Self {
    RandomDiscard { rng: StdRng::seed_from_u64(seed) }
  }

  pub fn from_entropy() -> Self {
    RandomDiscard { rng: StdRng::from_entropy() }
  }
}

impl<R: Rng> CollisionPolicy for RandomDiscard<R> {
  fn discard(&mut self, _first: &Tile, _second: &Tile) -> Discard {
    if self.rng.gen_bool(0.5) { Discard::First } else { Discard::Second }
  }
}

/// Keeps whichever detection was seen first.
pub struct KeepFirst;

impl CollisionPolicy for KeepFirst {
  fn discard(&mut self, _first: &Tile, _second: &Tile) -> Discard {
    Discard::Second
  }
}

/// Keeps the more confident detection, falling back to the first one seen
/// when confidences tie or are missing.
pub struct HighestConfidence;

impl CollisionPolicy for HighestConfidence {
  fn discard(&mut self, first: &Tile, second: &Tile) -> Discard {
    match (first.confidence, second.confidence) {
      (Some(a), Some(b)) if b > a => Discard::First,
      (None, Some(_)) => Discard::First,
      _ => Discard::Second,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, clap::ArgEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
  Random,
  KeepFirst,
  HighestConfidence,
}

pub fn make_policy(kind: PolicyKind, seed: Option<u64>) -> Box<dyn CollisionPolicy> {
  match kind {
    PolicyKind::Random => match seed {
      Some(s) => Box::new(RandomDiscard::seeded(s)),
      None => Box::new(RandomDiscard::from_entropy()),
    },
    PolicyKind::KeepFirst => Box::new(KeepFirst),
    PolicyKind::HighestConfidence => Box::new(HighestConfidence),
  }
}

/// Removes tiles until no two survivors share a cell. Returns how many were dropped.
///
/// Every pair `(i, j)` with `i < j` is checked once; when `i` itself is
/// dropped the tile shifted into its slot is checked against the rest.
pub fn resolve(tiles: &mut Vec<Tile>, policy: &mut dyn CollisionPolicy) -> usize {
  let mut removed = 0;
  let mut i = 0;
  while i < tiles.len() {
    let mut j = i + 1;
    let mut dropped_i = false;
    while j < tiles.len() {
      if !tiles[i].same_cell(&tiles[j]) {
        j += 1;
        continue;
      }
      removed += 1;
      match policy.discard(&tiles[i], &tiles[j]) {
        Discard::First => {
          debug!("Collision: dropping {} in favour of {}", tiles[i], tiles[j]);
          tiles.remove(i);
          dropped_i = true;
          break;
        }
        Discard::Second => {
          debug!("Collision: dropping {} in favour of {}", tiles[j], tiles[i]);
          tiles.remove(j);
        }
      }
    }
    if !dropped_i {
      i += 1;
    }
  }
  removed
}
