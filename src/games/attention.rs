//! Sequence and attention games.
//!
//! Two variants share the same presentation flow
//! (`Ready -> Presenting -> Answering -> Scored`):
//! - blink: cells of a grid light up one after another, the player repeats
//!   the exact order;
//! - flip: a shape hops between cells, the player names the cell it
//!   started from.
//!
//! Timing belongs to the caller. The engine only answers "what is shown at
//! reveal step N" and tracks which phase a question is in.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::AttentionCfg;
use crate::domain::Difficulty;
use crate::error::{GameError, GameResult};

use super::Verdict;

pub const SHAPES: [&str; 9] = ["🔺", "🟦", "⭐", "🔴", "💚", "🟣", "🟡", "🟤", "⚫"];

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
  Ready,
  Presenting,
  Answering,
  Scored,
}

impl Phase {
  pub fn as_str(self) -> &'static str {
    match self {
      Phase::Ready => "ready",
      Phase::Presenting => "presenting",
      Phase::Answering => "answering",
      Phase::Scored => "scored",
    }
  }
}

/// Phase tracker for a question that is shown step by step before it can be
/// answered. A question with nothing to present starts in `Answering`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Presentation {
  phase: Phase,
  revealed: usize,
  len: usize,
}

impl Presentation {
  pub fn new(len: usize) -> Self {
    let phase = if len == 0 { Phase::Answering } else { Phase::Ready };
    Self { phase, revealed: 0, len }
  }

  pub fn phase(&self) -> Phase { self.phase }

  pub fn len(&self) -> usize { self.len }

  pub fn is_empty(&self) -> bool { self.len == 0 }

  pub fn is_complete(&self) -> bool { self.revealed >= self.len }

  /// Record that step `index` was shown. Steps may be re-shown while the
  /// presentation is running; nothing can be shown once answering started.
  pub fn reveal(&mut self, index: usize) -> GameResult<()> {
    match self.phase {
      Phase::Ready | Phase::Presenting => {
        if index >= self.len {
          return Err(GameError::invalid(format!("reveal index {index} out of range 0..{}", self.len)));
        }
        self.phase = Phase::Presenting;
        self.revealed = self.revealed.max(index + 1);
        Ok(())
      }
      other => Err(GameError::WrongPhase(other.as_str())),
    }
  }

  /// Enter the answering phase; only allowed after every step was shown.
  pub fn begin_answering(&mut self) -> GameResult<()> {
    match self.phase {
      Phase::Answering => Ok(()),
      Phase::Ready | Phase::Presenting if self.is_complete() => {
        self.phase = Phase::Answering;
        Ok(())
      }
      other => Err(GameError::WrongPhase(other.as_str())),
    }
  }

  pub fn finish(&mut self) -> GameResult<()> {
    match self.phase {
      Phase::Answering => {
        self.phase = Phase::Scored;
        Ok(())
      }
      other => Err(GameError::WrongPhase(other.as_str())),
    }
  }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlinkQuestion {
  pub sequence: Vec<usize>,
  pub grid_size: usize,
}

impl BlinkQuestion {
  /// Cell lit at reveal step `n`.
  pub fn reveal_at(&self, n: usize) -> Option<usize> {
    self.sequence.get(n).copied()
  }

  pub fn reveals(&self) -> impl Iterator<Item = usize> + '_ {
    self.sequence.iter().copied()
  }

  /// A guess shorter than the sequence is incomplete, not wrong.
  pub fn check(&self, guess: &[usize]) -> Verdict {
    if guess.len() < self.sequence.len() {
      Verdict::Incomplete
    } else if guess == self.sequence.as_slice() {
      Verdict::Correct
    } else {
      Verdict::Wrong
    }
  }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Move {
  pub from: usize,
  pub to: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlipQuestion {
  pub original_position: usize,
  pub moves: Vec<Move>,
  pub grid_size: usize,
  pub shape: String,
}

impl FlipQuestion {
  /// Position after `step` moves; step 0 is the starting cell.
  pub fn position_at(&self, step: usize) -> Option<usize> {
    match step {
      0 => Some(self.original_position),
      n => self.moves.get(n - 1).map(|m| m.to),
    }
  }

  pub fn final_position(&self) -> usize {
    self.moves.last().map_or(self.original_position, |m| m.to)
  }

  /// The question asks where the shape started, not where it ended.
  pub fn is_correct(&self, position: usize) -> bool {
    position == self.original_position
  }
}

fn blink_len_range(cfg: &AttentionCfg, difficulty: Difficulty) -> (usize, usize) {
  let (lo, hi) = (cfg.blink_min_len, cfg.blink_max_len);
  let mid = lo + (hi - lo) / 2;
  match difficulty {
    Difficulty::Easy => (lo, mid),
    Difficulty::Medium => (lo, hi),
    Difficulty::Hard => (mid, hi),
  }
}

pub fn generate_blink_question<R: Rng + ?Sized>(
  rng: &mut R,
  cfg: &AttentionCfg,
  difficulty: Difficulty,
) -> GameResult<BlinkQuestion> {
  if cfg.grid_size == 0 || cfg.blink_min_len == 0 || cfg.blink_min_len > cfg.blink_max_len {
    return Err(GameError::invalid("blink grid or length bounds are empty"));
  }
  let (lo, hi) = blink_len_range(cfg, difficulty);
  let len = rng.gen_range(lo..=hi);
  let sequence = (0..len).map(|_| rng.gen_range(0..cfg.grid_size)).collect();
  Ok(BlinkQuestion { sequence, grid_size: cfg.grid_size })
}

fn flip_move_count(difficulty: Difficulty) -> usize {
  match difficulty {
    Difficulty::Easy => 1,
    Difficulty::Medium => 2,
    Difficulty::Hard => 3,
  }
}

pub fn generate_flip_question<R: Rng + ?Sized>(
  rng: &mut R,
  cfg: &AttentionCfg,
  difficulty: Difficulty,
) -> GameResult<FlipQuestion> {
  if cfg.grid_size < 2 {
    return Err(GameError::invalid("flip grid needs at least two cells"));
  }
  let original_position = rng.gen_range(0..cfg.grid_size);
  let mut current = original_position;
  let mut moves = Vec::new();
  for _ in 0..flip_move_count(difficulty) {
    // Draw from the other cells only.
    let mut to = rng.gen_range(0..cfg.grid_size - 1);
    if to >= current {
      to += 1;
    }
    moves.push(Move { from: current, to });
    current = to;
  }
  let shape = SHAPES.choose(rng).copied().unwrap_or(SHAPES[0]).to_string();
  Ok(FlipQuestion { original_position, moves, grid_size: cfg.grid_size, shape })
}
