//! Domain vocabulary shared by the engine and the service: game types and difficulty.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which mini-game a question, run or session belongs to.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
  /// "What day is it N days after ...?"
  Calendar,
  /// Stroop: pick the ink color, not the word.
  Color,
  /// Pick the shortest of several drawn paths.
  Path,
  /// Shape flip: remember where the shape started.
  Attention,
  /// Repeat a sequence of blinking cells.
  Blink,
  /// Count characters entering and leaving a room.
  HeadCount,
  /// Find the 4 remembered items among 12.
  Memory,
}

impl GameType {
  pub const ALL: [GameType; 7] = [
    GameType::Calendar,
    GameType::Color,
    GameType::Path,
    GameType::Attention,
    GameType::Blink,
    GameType::HeadCount,
    GameType::Memory,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      GameType::Calendar => "calendar",
      GameType::Color => "color",
      GameType::Path => "path",
      GameType::Attention => "attention",
      GameType::Blink => "blink",
      GameType::HeadCount => "head_count",
      GameType::Memory => "memory",
    }
  }
}

impl fmt::Display for GameType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Difficulty chosen by the player; scales event and sequence counts.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
  Easy,
  Medium,
  Hard,
}

impl Default for Difficulty {
  fn default() -> Self { Difficulty::Medium }
}

impl fmt::Display for Difficulty {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Difficulty::Easy => "easy",
      Difficulty::Medium => "medium",
      Difficulty::Hard => "hard",
    })
  }
}
