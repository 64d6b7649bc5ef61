//! Shortest-path game: jittered polylines between two fixed endpoints.
//!
//! All paths share the same start and end; each one bends through 2-3
//! waypoints pushed sideways by a per-path nominal offset so they stay
//! visually apart. The shortest one is the answer.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::PathCfg;
use crate::error::{GameError, GameResult};

/// Nominal lateral offsets, one per path slot.
const NOMINAL_OFFSETS: [f64; 5] = [-40.0, -20.0, 0.0, 20.0, 40.0];

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Point {
  pub x: f64,
  pub y: f64,
}

impl Point {
  pub const fn new(x: f64, y: f64) -> Self { Self { x, y } }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Path {
  pub id: usize,
  pub points: Vec<Point>,
  pub length: f64,
  pub is_correct: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PathQuestion {
  pub paths: Vec<Path>,
}

pub fn distance(p1: Point, p2: Point) -> f64 {
  ((p2.x - p1.x).powi(2) + (p2.y - p1.y).powi(2)).sqrt()
}

/// Sum of consecutive segment lengths; 0 for fewer than two points.
pub fn path_length(points: &[Point]) -> f64 {
  points.windows(2).map(|w| distance(w[0], w[1])).sum()
}

/// `waypoint_count` interior points between `start` and `end`, each jittered
/// and shifted by `lateral_offset`, then clamped to the canvas box.
pub fn generate_candidate_path<R: Rng + ?Sized>(
  rng: &mut R,
  start: Point,
  end: Point,
  waypoint_count: usize,
  lateral_offset: f64,
  cfg: &PathCfg,
) -> Vec<Point> {
  let mut points = Vec::with_capacity(waypoint_count + 2);
  points.push(start);

  for i in 0..waypoint_count {
    let t = (i + 1) as f64 / (waypoint_count + 1) as f64;
    let base_x = start.x + (end.x - start.x) * t;
    let base_y = start.y + (end.y - start.y) * t;

    let dx = (rng.gen::<f64>() - 0.5) * cfg.jitter_x + lateral_offset;
    let dy = (rng.gen::<f64>() - 0.5) * cfg.jitter_y + lateral_offset * 0.5;

    points.push(Point {
      x: (base_x + dx).clamp(cfg.min.x, cfg.max.x),
      y: (base_y + dy).clamp(cfg.min.y, cfg.max.y),
    });
  }

  points.push(end);
  points
}

/// Generate `n` (4 or 5) candidate paths and mark the shortest.
pub fn generate_path_set<R: Rng + ?Sized>(rng: &mut R, n: usize, cfg: &PathCfg) -> GameResult<PathQuestion> {
  if !(4..=NOMINAL_OFFSETS.len()).contains(&n) {
    return Err(GameError::invalid(format!("path set size must be 4 or 5, got {n}")));
  }
  let polylines = NOMINAL_OFFSETS[..n]
    .iter()
    .map(|&offset| {
      let waypoints = rng.gen_range(2..=3);
      generate_candidate_path(rng, cfg.start, cfg.end, waypoints, offset, cfg)
    })
    .collect();
  PathQuestion::from_polylines(polylines)
}

impl PathQuestion {
  /// Measure each polyline and mark the shortest as correct. On an exact tie
  /// the first polyline wins.
  pub fn from_polylines(polylines: Vec<Vec<Point>>) -> GameResult<Self> {
    if polylines.is_empty() {
      return Err(GameError::invalid("a path question needs at least one path"));
    }
    let mut paths: Vec<Path> = polylines
      .into_iter()
      .enumerate()
      .map(|(id, points)| {
        let length = path_length(&points);
        Path { id, points, length, is_correct: false }
      })
      .collect();

    let mut best = 0;
    for (i, p) in paths.iter().enumerate().skip(1) {
      if p.length < paths[best].length {
        best = i;
      }
    }
    paths[best].is_correct = true;
    Ok(Self { paths })
  }

  pub fn correct_id(&self) -> Option<usize> {
    self.paths.iter().find(|p| p.is_correct).map(|p| p.id)
  }

  pub fn is_correct(&self, path_id: usize) -> bool {
    self.correct_id() == Some(path_id)
  }
}
