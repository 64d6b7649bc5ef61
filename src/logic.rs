//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! Each function drives `AppState` and converts the result into the public
//! protocol structs, so both transports answer with the same shapes.

use tracing::{info, instrument};

use crate::error::GameResult;
use crate::games::Answer;
use crate::protocol::{to_out, AnswerOut, GameStartedOut, QuestionOut, RevealOut, SessionOut, StartGameIn, StatsOut};
use crate::state::AppState;

#[instrument(level = "info", skip(state, req), fields(game = %req.game_type, difficulty = %req.difficulty))]
pub async fn start_game(state: &AppState, req: StartGameIn) -> GameResult<GameStartedOut> {
  let (run_id, rounds) = state.start_run(req.game_type, req.difficulty, req.rounds, req.seed).await?;
  Ok(GameStartedOut { run_id, game_type: req.game_type, difficulty: req.difficulty, rounds })
}

#[instrument(level = "debug", skip(state), fields(%run_id))]
pub async fn next_question(state: &AppState, run_id: &str) -> GameResult<QuestionOut> {
  let issued = state.next_question(run_id).await?;
  info!(target: "game", run = %run_id, question = %issued.id, round = issued.round, rounds = issued.rounds, "Question served");
  Ok(to_out(&issued))
}

#[instrument(level = "debug", skip(state), fields(%run_id, %question_id))]
pub async fn reveal_step(state: &AppState, run_id: &str, question_id: &str, index: usize) -> GameResult<RevealOut> {
  let reveal = state.reveal(run_id, question_id, index).await?;
  Ok(RevealOut { question_id: question_id.to_string(), index, reveal })
}

#[instrument(level = "info", skip(state, answer), fields(%run_id, %question_id))]
pub async fn submit_answer(state: &AppState, run_id: &str, question_id: &str, answer: &Answer) -> GameResult<AnswerOut> {
  let outcome = state.submit(run_id, question_id, answer).await?;
  info!(
    target: "game",
    run = %run_id,
    question = %question_id,
    verdict = ?outcome.verdict,
    correct = outcome.score.correct,
    total = outcome.score.total,
    "Answer evaluated"
  );
  Ok(outcome.into())
}

#[instrument(level = "info", skip(state), fields(%run_id))]
pub async fn finish_game(state: &AppState, run_id: &str) -> GameResult<SessionOut> {
  let (sequence, record) = state.finish_run(run_id).await?;
  Ok(SessionOut { sequence, rank: record.score.rank(), record })
}

pub async fn stats(state: &AppState, game_type: Option<crate::domain::GameType>) -> StatsOut {
  StatsOut { game_type, stats: state.stats(game_type).await }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use super::*;
  use crate::config::GamesConfig;
  use crate::domain::{Difficulty, GameType};
  use crate::error::GameError;
  use crate::protocol::QuestionView;
  use crate::storage::MemoryStore;

  fn state() -> AppState {
    AppState::with_parts(GamesConfig::default(), Arc::new(MemoryStore::new()))
  }

  #[tokio::test]
  async fn memory_game_through_shared_logic() {
    let s = state();
    let req = StartGameIn { game_type: GameType::Memory, difficulty: Difficulty::Easy, rounds: Some(1), seed: Some(12) };
    let started = start_game(&s, req).await.unwrap();
    assert_eq!(started.rounds, 1);

    let q = next_question(&s, &started.run_id).await.unwrap();
    assert_eq!(q.reveal_len, 1);
    assert!(matches!(q.question, QuestionView::Memory { ref all_items } if all_items.len() == 12));

    let shown = reveal_step(&s, &started.run_id, &q.id, 0).await.unwrap();
    let crate::games::Reveal::Items { items } = shown.reveal else { panic!("expected items") };

    let out = submit_answer(&s, &started.run_id, &q.id, &Answer::Memory { items }).await.unwrap();
    assert!(out.correct);
    assert!(out.run_complete);

    let done = finish_game(&s, &started.run_id).await.unwrap();
    assert_eq!(done.record.score.accuracy, 100);
    assert_eq!(done.rank, crate::scoring::Rank::Mastermind);
    assert_eq!(stats(&s, Some(GameType::Memory)).await.stats.played_count, 1);
  }

  #[tokio::test]
  async fn reveal_out_of_range_rejected() {
    let s = state();
    let req = StartGameIn { game_type: GameType::Blink, difficulty: Difficulty::Easy, rounds: Some(1), seed: Some(1) };
    let started = start_game(&s, req).await.unwrap();
    let q = next_question(&s, &started.run_id).await.unwrap();
    let err = reveal_step(&s, &started.run_id, &q.id, q.reveal_len).await.unwrap_err();
    assert!(matches!(err, GameError::InvalidConfig(_)));
  }
}
