//! Engine error type.
//!
//! Generation and validation are pure computation, so the taxonomy is narrow:
//! bad configuration, bounded loops that ran out of attempts, and answers that
//! arrive for a question that can no longer accept them.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
  /// A generator or run was asked for something it cannot produce.
  #[error("invalid configuration: {0}")]
  InvalidConfig(String),

  /// A rejection-sampling loop hit its attempt bound.
  #[error("unable to generate distinct {what} after {attempts} attempts")]
  Exhausted { what: &'static str, attempts: usize },

  /// The question was already answered; questions are single-use.
  #[error("question {0} was already answered")]
  StaleQuestion(String),

  #[error("unknown question: {0}")]
  UnknownQuestion(String),

  #[error("unknown game run: {0}")]
  UnknownRun(String),

  /// Answer shape does not match the question's game.
  #[error("answer for {answer} submitted to a {question} question")]
  AnswerMismatch { question: &'static str, answer: &'static str },

  #[error("operation not allowed in phase {0}")]
  WrongPhase(&'static str),

  #[error("all {0} rounds of this run were already played")]
  RunComplete(u32),

  #[error("date arithmetic left the supported range")]
  DateOutOfRange,

  #[error("storage error: {0}")]
  Storage(String),
}

impl GameError {
  pub fn invalid(msg: impl Into<String>) -> Self {
    GameError::InvalidConfig(msg.into())
  }

  /// True when the caller referenced something that does not exist.
  pub fn is_not_found(&self) -> bool {
    matches!(self, GameError::UnknownQuestion(_) | GameError::UnknownRun(_))
  }

  /// True when the request was well-formed but conflicts with current state.
  pub fn is_conflict(&self) -> bool {
    matches!(
      self,
      GameError::StaleQuestion(_) | GameError::WrongPhase(_) | GameError::RunComplete(_)
    )
  }
}

pub type GameResult<T> = Result<T, GameError>;
