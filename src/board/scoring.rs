use log::debug;

use crate::board::Geometry;
use crate::models::Tile;

/// A maximal 4-connected group of same-kind tiles found while scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
  pub kind: String,
  pub tiles: usize,
  pub crowns: u32,
}

impl Region {
  pub fn score(&self) -> u32 {
    self.tiles as u32 * self.crowns
  }
}

/// Finds every region of the dense board and gives each member tile the
/// region's crown total. Summing tile scores then yields tiles * crowns
/// per region.
pub fn score_tiles(tiles: &mut [Tile], geometry: &Geometry) -> Vec<Region> {
  let mut assigned = vec![false; tiles.len()];
  let mut regions = Vec::new();

  for root in 0..tiles.len() {
    if assigned[root] || tiles[root].is_empty() {
      continue;
    }
    let kind = tiles[root].region().to_string();
    let mut members = Vec::new();
    let mut stack = vec![root];
    assigned[root] = true;

    while let Some(idx) = stack.pop() {
      members.push(idx);
      for next in adjacent(tiles, idx, geometry) {
        if assigned[next] || tiles[next].is_empty() || tiles[next].region() != kind {
          continue;
        }
        assigned[next] = true;
        stack.push(next);
      }
    }

    let crowns: u32 = members.iter().map(|&i| tiles[i].crowns).sum();
    for &i in members.iter() {
      tiles[i].add_crowns(crowns);
    }
    let region = Region { kind, tiles: members.len(), crowns };
    debug!("Region {:?} scores {}", region, region.score());
    regions.push(region);
  }
  regions
}

/// Tiles one cell step away in each cardinal direction, looked up by containment.
fn adjacent(tiles: &[Tile], idx: usize, geometry: &Geometry) -> Vec<usize> {
  let (x, y) = (tiles[idx].x_mid, tiles[idx].y_mid);
  let (w, h) = (geometry.cell_width, geometry.cell_height);
  [(x + w, y), (x - w, y), (x, y + h), (x, y - h)]
    .iter()
    .filter_map(|&(px, py)| tile_at(tiles, px, py))
    .collect()
}

fn tile_at(tiles: &[Tile], x: f64, y: f64) -> Option<usize> {
  tiles.iter().position(|t| t.contains_point(x, y))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::board::builder::build;
  use crate::board::collision::KeepFirst;

  fn tile(label: &str, x: f64, y: f64) -> Tile {
    Tile::from_detection(label, x, y, 1.0, 1.0, 1.0).unwrap()
  }

  fn scored(tiles: Vec<Tile>) -> (Vec<Tile>, Vec<Region>) {
    let (mut board, geometry) = build(tiles, &mut KeepFirst).unwrap();
    let regions = score_tiles(&mut board, &geometry);
    (board, regions)
  }

  fn total(board: &[Tile]) -> u32 {
    board.iter().map(|t| t.score()).sum()
  }

  #[test]
  fn connected_region_scores_area_times_crowns() {
    let (board, regions) = scored(vec![tile("cave_1", 0.0, 0.0), tile("cave_1", 1.0, 0.0), tile("cave_1", 0.0, 1.0)]);
    let scores: Vec<u32> = board.iter().map(|t| t.score()).collect();
    assert_eq!(scores, vec![3, 3, 3, 0]);
    assert_eq!(total(&board), 9);
    assert_eq!(regions, vec![Region { kind: "cave".to_string(), tiles: 3, crowns: 3 }]);
  }

  #[test]
  fn crowns_are_summed_across_variants() {
    let tiles = vec![
      Tile::from_detection("cave_3", 0.875, 0.875, 0.25, 0.25, 4.0).unwrap(),
      Tile::from_detection("cave_1", 0.625, 0.625, 0.25, 0.25, 4.0).unwrap(),
      Tile::from_detection("cave_0", 0.875, 0.625, 0.25, 0.25, 4.0).unwrap(),
    ];
    let (board, regions) = scored(tiles);
    assert_eq!(total(&board), 12);
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].score(), 12);
  }

  #[test]
  fn isolated_tile_without_crowns_scores_zero() {
    let (board, regions) = scored(vec![tile("wheat_0", 1.0, 1.0), tile("lake_1", 0.0, 0.0), tile("lake_1", 2.0, 2.0)]);
    let wheat = board.iter().find(|t| t.label == "wheat_0").unwrap();
    assert_eq!(wheat.score(), 0);
    assert_eq!(regions.iter().filter(|r| r.kind == "wheat").count(), 1);
    // the diagonal lakes are not 4-connected
    assert_eq!(regions.iter().filter(|r| r.kind == "lake").count(), 2);
    assert_eq!(total(&board), 2);
  }

  #[test]
  fn separated_clusters_score_independently() {
    let (board, regions) = scored(vec![
      tile("forest_1", 0.0, 0.0),
      tile("forest_2", 0.0, 1.0),
      tile("forest_0", 2.0, 0.0),
      tile("forest_1", 3.0, 0.0),
      tile("forest_0", 3.0, 1.0),
    ]);
    assert_eq!(regions.len(), 2);
    let scores: Vec<u32> = board.iter().map(|t| t.score()).collect();
    assert_eq!(scores, vec![3, 0, 1, 1, 3, 0, 0, 1]);
    assert_eq!(total(&board), 2 * 3 + 3 * 1);
  }

  #[test]
  fn empty_tiles_never_score() {
    let tiles = vec![Tile::empty(0.0, 0.0, 1.0, 1.0), Tile::empty(1.0, 1.0, 1.0, 1.0)];
    let (board, regions) = scored(tiles);
    assert_eq!(board.len(), 4);
    assert!(board.iter().all(|t| t.is_empty() && t.score() == 0));
    assert!(regions.is_empty());
  }

  #[test]
  fn regions_of_different_kinds_do_not_merge() {
    let (board, regions) = scored(vec![tile("lake_1", 0.0, 0.0), tile("wheat_1", 1.0, 0.0)]);
    assert_eq!(regions.len(), 2);
    assert_eq!(total(&board), 2);
  }

  #[test]
  fn rescoring_a_fresh_board_is_deterministic() {
    let tiles = vec![
      tile("forest_1", 0.0, 0.0),
      tile("forest_1", 1.0, 0.0),
      tile("lake_2", 2.0, 0.0),
      tile("forest_0", 1.0, 1.0),
      tile("lake_0", 2.0, 1.0),
    ];
    let (board, geometry) = build(tiles, &mut KeepFirst).unwrap();
    let mut reversed_first = board.clone();
    reversed_first.reverse();

    let mut a = board.clone();
    score_tiles(&mut a, &geometry);
    score_tiles(&mut reversed_first, &geometry);
    reversed_first.reverse();

    let scores = |b: &[Tile]| b.iter().map(|t| t.score()).collect::<Vec<u32>>();
    assert_eq!(scores(&a), scores(&reversed_first));
    assert_eq!(total(&a), 3 * 2 + 2 * 2);
  }
}
