//! Running score, accuracy and rank tiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Correct/total counters for one run. `correct <= total` always holds.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreState {
  pub correct: u32,
  pub total: u32,
}

impl ScoreState {
  pub fn summary(self) -> ScoreSummary {
    ScoreSummary { correct: self.correct, total: self.total, accuracy: accuracy(self) }
  }
}

/// Score as reported to callers and stored in session records.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreSummary {
  pub correct: u32,
  pub total: u32,
  /// Whole-number percentage, 0..=100.
  pub accuracy: u32,
}

impl ScoreSummary {
  pub fn rank(&self) -> Rank {
    rank_for(self.accuracy)
  }
}

/// Append one verdict. Pure.
pub fn record_answer(state: ScoreState, is_correct: bool) -> ScoreState {
  ScoreState {
    correct: state.correct + u32::from(is_correct),
    total: state.total + 1,
  }
}

/// Percentage of correct answers, rounded to the nearest integer; 0 when
/// nothing was answered.
pub fn accuracy(state: ScoreState) -> u32 {
  if state.total == 0 {
    return 0;
  }
  (100.0 * state.correct as f64 / state.total as f64).round() as u32
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
  Noob,
  Beginner,
  Good,
  Great,
  Expert,
  Mastermind,
}

impl fmt::Display for Rank {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Debug::fmt(self, f)
  }
}

/// Rank ladder, checked top-down; first threshold met wins.
const RANK_LADDER: [(u32, Rank); 5] = [
  (90, Rank::Mastermind),
  (80, Rank::Expert),
  (70, Rank::Great),
  (60, Rank::Good),
  (40, Rank::Beginner),
];

pub fn rank_for(accuracy: u32) -> Rank {
  RANK_LADDER
    .iter()
    .find(|(min, _)| accuracy >= *min)
    .map_or(Rank::Noob, |(_, rank)| *rank)
}
