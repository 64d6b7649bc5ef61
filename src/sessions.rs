//! Append-only log of completed game sessions and the statistics derived from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::GameType;
use crate::scoring::ScoreSummary;

/// One completed run of a single game. Never modified after it is logged.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionRecord {
  pub game_type: GameType,
  pub score: ScoreSummary,
  pub completed_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct GameStats {
  pub played_count: usize,
  /// Mean of the sessions' stored accuracies.
  pub average_accuracy: f64,
  pub best_accuracy: u32,
}

#[derive(Clone, Debug, Default)]
pub struct SessionLog {
  records: Vec<SessionRecord>,
}

impl SessionLog {
  pub fn new() -> Self { Self::default() }

  /// Restore a log previously persisted by the caller.
  pub fn from_records(records: Vec<SessionRecord>) -> Self {
    Self { records }
  }

  /// Append a record and return its sequence number (0-based, monotonic).
  pub fn append(&mut self, record: SessionRecord) -> usize {
    self.records.push(record);
    self.records.len() - 1
  }

  pub fn records(&self) -> &[SessionRecord] { &self.records }

  pub fn len(&self) -> usize { self.records.len() }

  pub fn is_empty(&self) -> bool { self.records.is_empty() }

  pub fn stats_for(&self, game: GameType) -> GameStats {
    compute_stats(self.records.iter().filter(|r| r.game_type == game))
  }

  pub fn overall_stats(&self) -> GameStats {
    compute_stats(self.records.iter())
  }
}

fn compute_stats<'a>(records: impl Iterator<Item = &'a SessionRecord>) -> GameStats {
  let (played_count, sum, best) = records.fold((0usize, 0u64, 0u32), |(n, sum, best), r| {
    (n + 1, sum + r.score.accuracy as u64, best.max(r.score.accuracy))
  });
  if played_count == 0 {
    return GameStats::default();
  }
  GameStats {
    played_count,
    average_accuracy: sum as f64 / played_count as f64,
    best_accuracy: best,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::scoring::ScoreState;

  fn record(game_type: GameType, correct: u32, total: u32) -> SessionRecord {
    SessionRecord {
      game_type,
      score: ScoreState { correct, total }.summary(),
      completed_at: Utc::now(),
    }
  }

  #[test]
  fn empty_log_has_zero_stats() {
    let log = SessionLog::new();
    assert_eq!(log.overall_stats(), GameStats { played_count: 0, average_accuracy: 0.0, best_accuracy: 0 });
    assert_eq!(log.stats_for(GameType::Path), GameStats::default());
  }

  #[test]
  fn append_returns_increasing_sequence_numbers() {
    let mut log = SessionLog::new();
    assert_eq!(log.append(record(GameType::Color, 1, 2)), 0);
    assert_eq!(log.append(record(GameType::Color, 2, 2)), 1);
    assert_eq!(log.len(), 2);
  }

  #[test]
  fn per_game_and_overall_stats() {
    let mut log = SessionLog::new();
    log.append(record(GameType::Calendar, 4, 5)); // 80
    log.append(record(GameType::Calendar, 3, 5)); // 60
    log.append(record(GameType::Memory, 6, 6)); // 100

    let cal = log.stats_for(GameType::Calendar);
    assert_eq!(cal.played_count, 2);
    assert_eq!(cal.average_accuracy, 70.0);
    assert_eq!(cal.best_accuracy, 80);

    assert_eq!(log.stats_for(GameType::Blink), GameStats::default());

    let all = log.overall_stats();
    assert_eq!(all.played_count, 3);
    assert_eq!(all.average_accuracy, 80.0);
    assert_eq!(all.best_accuracy, 100);
  }

  #[test]
  fn restored_log_keeps_order() {
    let records = vec![record(GameType::Path, 1, 10), record(GameType::Blink, 5, 5)];
    let log = SessionLog::from_records(records.clone());
    assert_eq!(log.records(), records.as_slice());
  }
}
