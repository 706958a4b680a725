pub mod config;

use anyhow::{bail, Context, Result};
use log::{debug, warn};
use std::fs::read_to_string;

use crate::models::Detection;

/// Reads the class list, one class name per line; the line number is the class index.
pub fn load_classes(path: &str) -> Result<Vec<String>> {
  let contents = read_to_string(path)
    .with_context(|| format!("unable to read classes file {}", path))?;
  let classes = parse_classes(&contents);
  if classes.is_empty() {
    bail!("classes file {} has no classes", path);
  }
  debug!("Loaded {} classes from {}", classes.len(), path);
  Ok(classes)
}

pub fn parse_classes(contents: &str) -> Vec<String> {
  let mut classes: Vec<String> = contents.lines().map(|l| l.trim().to_string()).collect();
  while classes.last().map_or(false, |c| c.is_empty()) {
    classes.pop();
  }
  classes
}

pub fn load_detections(path: &str) -> Result<Vec<Detection>> {
  let contents = read_to_string(path)
    .with_context(|| format!("unable to read detections file {}", path))?;
  Ok(parse_detections(&contents))
}

/// Parses detector output: space separated `class x y w h [conf]` records,
/// one per line or comma separated on a single line.
pub fn parse_detections(contents: &str) -> Vec<Detection> {
  let normalized = contents.replace(',', "\n");
  let mut reader = csv::ReaderBuilder::new()
    .delimiter(b' ')
    .has_headers(false)
    .flexible(true)
    .from_reader(normalized.as_bytes());

  let mut detections = Vec::new();
  for result in reader.deserialize::<Detection>() {
    let record = match result {
      Ok(r) => r,
      Err(err) => {
        warn!("error processing detection: {}", err);
        continue
      }
    };
    detections.push(record);
  }
  detections
}

/// Expands each input into matching paths. Inputs that are not glob
/// patterns, or match nothing, are passed through so the read reports them.
pub fn expand_inputs(inputs: &[String]) -> Vec<String> {
  let mut paths = Vec::new();
  for input in inputs.iter() {
    let matches: Vec<String> = match glob::glob(input) {
      Ok(entries) => entries
        .filter_map(|e| e.ok())
        .map(|p| p.to_string_lossy().into_owned())
        .collect(),
      Err(err) => {
        warn!("invalid pattern {}: {}", input, err);
        Vec::new()
      }
    };
    if matches.is_empty() {
      paths.push(input.clone());
    } else {
      paths.extend(matches);
    }
  }
  paths
}
