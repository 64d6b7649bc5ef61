//! A game run: a fixed number of rounds of one game, played one question at a time.
//!
//! The run owns the random source, the pending question and the score. Each
//! question can be answered exactly once; presenting questions (blink, flip,
//! head count, memory) must be fully revealed before they accept an answer.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::config::GamesConfig;
use crate::domain::{Difficulty, GameType};
use crate::error::{GameError, GameResult};
use crate::games::attention::{Phase, Presentation};
use crate::games::{self, Answer, Question, Reveal, Verdict};
use crate::rng::{game_rng, GameRng};
use crate::scoring::{record_answer, ScoreState, ScoreSummary};
use crate::sessions::SessionRecord;

#[derive(Clone, Debug)]
struct PendingQuestion {
  id: String,
  question: Question,
  presentation: Presentation,
}

/// A question handed to the caller, with its position in the run.
#[derive(Clone, Debug)]
pub struct IssuedQuestion {
  pub id: String,
  /// 1-based round number.
  pub round: u32,
  pub rounds: u32,
  pub phase: Phase,
  pub reveal_len: usize,
  pub question: Question,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct AnswerOutcome {
  pub question_id: String,
  pub verdict: Verdict,
  pub score: ScoreSummary,
  pub run_complete: bool,
}

impl AnswerOutcome {
  pub fn is_correct(&self) -> bool {
    self.verdict == Verdict::Correct
  }
}

#[derive(Debug)]
pub struct GameRun {
  id: String,
  game_type: GameType,
  difficulty: Difficulty,
  rounds: u32,
  issued: u32,
  score: ScoreState,
  rng: GameRng,
  pending: Option<PendingQuestion>,
  answered: HashSet<String>,
  touched: Instant,
}

impl GameRun {
  pub fn new(game_type: GameType, difficulty: Difficulty, rounds: u32, seed: Option<u64>) -> GameResult<Self> {
    if rounds == 0 {
      return Err(GameError::invalid("a run needs at least one round"));
    }
    Ok(Self {
      id: Uuid::new_v4().to_string(),
      game_type,
      difficulty,
      rounds,
      issued: 0,
      score: ScoreState::default(),
      rng: game_rng(seed),
      pending: None,
      answered: HashSet::new(),
      touched: Instant::now(),
    })
  }

  pub fn id(&self) -> &str { &self.id }
  pub fn game_type(&self) -> GameType { self.game_type }
  pub fn difficulty(&self) -> Difficulty { self.difficulty }
  pub fn rounds(&self) -> u32 { self.rounds }
  pub fn score(&self) -> ScoreState { self.score }

  /// Mark the run as used at `now`.
  pub fn touch(&mut self, now: Instant) {
    self.touched = self.touched.max(now);
  }

  pub fn last_touched(&self) -> Instant { self.touched }

  pub fn idle_for(&self, now: Instant) -> Duration {
    now.saturating_duration_since(self.touched)
  }

  /// All rounds issued and answered.
  pub fn is_complete(&self) -> bool {
    self.issued >= self.rounds && self.pending.is_none()
  }

  /// The pending question, or a freshly generated one when the previous
  /// question was answered.
  pub fn next_question(&mut self, cfg: &GamesConfig) -> GameResult<IssuedQuestion> {
    if self.pending.is_none() {
      if self.issued >= self.rounds {
        return Err(GameError::RunComplete(self.rounds));
      }
      let question = games::generate(&mut self.rng, self.game_type, self.difficulty, cfg)?;
      let presentation = Presentation::new(question.reveal_len());
      let id = Uuid::new_v4().to_string();
      self.issued += 1;
      debug!(target: "game", run = %self.id, question = %id, game = %self.game_type, round = self.issued, "Generated question");
      self.pending = Some(PendingQuestion { id, question, presentation });
    }
    let p = self.pending.as_ref().ok_or(GameError::RunComplete(self.rounds))?;
    Ok(IssuedQuestion {
      id: p.id.clone(),
      round: self.issued,
      rounds: self.rounds,
      phase: p.presentation.phase(),
      reveal_len: p.presentation.len(),
      question: p.question.clone(),
    })
  }

  fn pending_mut(&mut self, question_id: &str) -> GameResult<&mut PendingQuestion> {
    if self.answered.contains(question_id) {
      return Err(GameError::StaleQuestion(question_id.to_string()));
    }
    match self.pending.as_mut() {
      Some(p) if p.id == question_id => Ok(p),
      _ => Err(GameError::UnknownQuestion(question_id.to_string())),
    }
  }

  /// Presentation step `index` of the pending question.
  pub fn reveal(&mut self, question_id: &str, index: usize) -> GameResult<Reveal> {
    let p = self.pending_mut(question_id)?;
    p.presentation.reveal(index)?;
    p.question
      .reveal_at(index)
      .ok_or_else(|| GameError::invalid(format!("nothing to reveal at step {index}")))
  }

  /// Validate `answer` against the pending question. An incomplete blink
  /// guess leaves the question open and the score untouched.
  pub fn submit(&mut self, question_id: &str, answer: &Answer) -> GameResult<AnswerOutcome> {
    let p = self.pending_mut(question_id)?;
    p.presentation.begin_answering()?;
    let verdict = p.question.evaluate(answer)?;

    if verdict.is_final() {
      p.presentation.finish()?;
      self.score = record_answer(self.score, verdict == Verdict::Correct);
      self.answered.insert(question_id.to_string());
      self.pending = None;
    }

    Ok(AnswerOutcome {
      question_id: question_id.to_string(),
      verdict,
      score: self.score.summary(),
      run_complete: self.is_complete(),
    })
  }

  /// Close the run and produce its session record. A run may be finished
  /// early (quit or time-up); the record holds the answers given so far.
  pub fn finish(self, completed_at: DateTime<Utc>) -> SessionRecord {
    SessionRecord { game_type: self.game_type, score: self.score.summary(), completed_at }
  }
}
