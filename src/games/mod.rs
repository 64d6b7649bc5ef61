//! Question generators, one module per mini-game, and the tagged unions that
//! tie them together.
//!
//! A `Question` is immutable once generated and carries its own answer key.
//! Callers present it (optionally step by step through `reveal_at`) and then
//! submit a matching `Answer`.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::GamesConfig;
use crate::domain::{Difficulty, GameType};
use crate::error::{GameError, GameResult};
use crate::seeds::MEMORY_ITEMS;

pub mod attention;
pub mod calendar;
pub mod color;
pub mod headcount;
pub mod memory;
pub mod path;

use attention::{BlinkQuestion, FlipQuestion};
use calendar::CalendarQuestion;
use color::ColorQuestion;
use headcount::{HeadCountEvent, HeadCountQuestion};
use memory::MemoryQuestion;
use path::PathQuestion;

/// Result of checking an answer against a question.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
  /// Only blink guesses can be incomplete: fewer cells than the sequence.
  Incomplete,
  Correct,
  Wrong,
}

impl Verdict {
  pub fn from_bool(ok: bool) -> Self {
    if ok { Verdict::Correct } else { Verdict::Wrong }
  }

  pub fn is_final(self) -> bool {
    !matches!(self, Verdict::Incomplete)
  }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "game", rename_all = "snake_case")]
pub enum Question {
  Calendar(CalendarQuestion),
  Color(ColorQuestion),
  Path(PathQuestion),
  Attention(FlipQuestion),
  Blink(BlinkQuestion),
  HeadCount(HeadCountQuestion),
  Memory(MemoryQuestion),
}

/// A player's answer, tagged with the game it is meant for.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "game", rename_all = "snake_case")]
pub enum Answer {
  Calendar { option_index: usize },
  Color { option_index: usize },
  Path { path_id: usize },
  Attention { position: usize },
  Blink { cells: Vec<usize> },
  HeadCount { count: u32 },
  Memory { items: Vec<String> },
}

impl Answer {
  pub fn game_type(&self) -> GameType {
    match self {
      Answer::Calendar { .. } => GameType::Calendar,
      Answer::Color { .. } => GameType::Color,
      Answer::Path { .. } => GameType::Path,
      Answer::Attention { .. } => GameType::Attention,
      Answer::Blink { .. } => GameType::Blink,
      Answer::HeadCount { .. } => GameType::HeadCount,
      Answer::Memory { .. } => GameType::Memory,
    }
  }
}

/// What is shown at one presentation step.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Reveal {
  /// Blink: the cell that lights up.
  Cell { cell: usize },
  /// Flip: where the shape sits after this many moves.
  Position { cell: usize, shape: String },
  /// Head count: the next group entering or leaving.
  Event { event: HeadCountEvent },
  /// Memory: the items to remember.
  Items { items: Vec<String> },
}

impl Question {
  pub fn game_type(&self) -> GameType {
    match self {
      Question::Calendar(_) => GameType::Calendar,
      Question::Color(_) => GameType::Color,
      Question::Path(_) => GameType::Path,
      Question::Attention(_) => GameType::Attention,
      Question::Blink(_) => GameType::Blink,
      Question::HeadCount(_) => GameType::HeadCount,
      Question::Memory(_) => GameType::Memory,
    }
  }

  /// Number of presentation steps before the question can be answered.
  pub fn reveal_len(&self) -> usize {
    match self {
      Question::Attention(q) => q.moves.len() + 1,
      Question::Blink(q) => q.sequence.len(),
      Question::HeadCount(q) => q.events.len(),
      Question::Memory(_) => 1,
      Question::Calendar(_) | Question::Color(_) | Question::Path(_) => 0,
    }
  }

  /// Item shown at presentation step `n`.
  pub fn reveal_at(&self, n: usize) -> Option<Reveal> {
    match self {
      Question::Attention(q) => q.position_at(n).map(|cell| Reveal::Position { cell, shape: q.shape.clone() }),
      Question::Blink(q) => q.reveal_at(n).map(|cell| Reveal::Cell { cell }),
      Question::HeadCount(q) => q.events.get(n).map(|e| Reveal::Event { event: *e }),
      Question::Memory(q) if n == 0 => Some(Reveal::Items { items: q.target_items.clone() }),
      _ => None,
    }
  }

  /// Check `answer` against the answer key. Pure; single-use is enforced by
  /// the run that owns the question.
  pub fn evaluate(&self, answer: &Answer) -> GameResult<Verdict> {
    let verdict = match (self, answer) {
      (Question::Calendar(q), Answer::Calendar { option_index }) => Verdict::from_bool(q.is_correct(*option_index)),
      (Question::Color(q), Answer::Color { option_index }) => Verdict::from_bool(q.is_correct(*option_index)),
      (Question::Path(q), Answer::Path { path_id }) => Verdict::from_bool(q.is_correct(*path_id)),
      (Question::Attention(q), Answer::Attention { position }) => Verdict::from_bool(q.is_correct(*position)),
      (Question::Blink(q), Answer::Blink { cells }) => q.check(cells),
      (Question::HeadCount(q), Answer::HeadCount { count }) => Verdict::from_bool(q.is_correct(*count)),
      (Question::Memory(q), Answer::Memory { items }) => Verdict::from_bool(q.is_correct(items)),
      (q, a) => {
        return Err(GameError::AnswerMismatch {
          question: q.game_type().as_str(),
          answer: a.game_type().as_str(),
        })
      }
    };
    Ok(verdict)
  }
}

/// Generate one question for `game` using the configured tuning.
pub fn generate<R: Rng + ?Sized>(
  rng: &mut R,
  game: GameType,
  difficulty: Difficulty,
  cfg: &GamesConfig,
) -> GameResult<Question> {
  let q = match game {
    GameType::Calendar => Question::Calendar(calendar::generate_calendar_question(rng, &cfg.calendar, cfg.max_attempts)?),
    GameType::Color => Question::Color(color::generate_color_question(rng, cfg.color.option_count)?),
    GameType::Path => Question::Path(path::generate_path_set(rng, cfg.path.path_count, &cfg.path)?),
    GameType::Attention => Question::Attention(attention::generate_flip_question(rng, &cfg.attention, difficulty)?),
    GameType::Blink => Question::Blink(attention::generate_blink_question(rng, &cfg.attention, difficulty)?),
    GameType::HeadCount => Question::HeadCount(headcount::generate_round(rng, difficulty)?),
    GameType::Memory => Question::Memory(memory::generate_round(rng, &MEMORY_ITEMS)?),
  };
  Ok(q)
}
