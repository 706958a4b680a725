use crate::models::Tile;

/// What each rendered cell shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field {
  Label,
  Score,
}

/// Renders row-major tiles as `x_dim`-wide rows of centered fields.
pub fn render(tiles: &[Tile], x_dim: usize, field: Field, width: usize) -> String {
  tiles
    .chunks(x_dim.max(1))
    .map(|row| {
      row
        .iter()
        .map(|tile| {
          let text = match field {
            Field::Label => tile.label.clone(),
            Field::Score => tile.score().to_string(),
          };
          format!("{:^width$}", text, width = width)
        })
        .collect::<Vec<String>>()
        .join("\t")
    })
    .collect::<Vec<String>>()
    .join("\n")
}
