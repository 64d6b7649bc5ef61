//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs its parameters and basic result info.

use std::sync::Arc;

use axum::{
  extract::{Path, Query, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use tracing::{info, instrument, warn};

use crate::error::GameError;
use crate::logic;
use crate::protocol::*;
use crate::state::AppState;
use crate::storage::{Profile, Settings};

/// `GameError` as an HTTP response: status from the error kind, `{ "error": ... }` body.
#[derive(Debug)]
pub struct ApiError(pub GameError);

impl From<GameError> for ApiError {
  fn from(e: GameError) -> Self { Self(e) }
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match &self.0 {
      e if e.is_not_found() => StatusCode::NOT_FOUND,
      e if e.is_conflict() => StatusCode::CONFLICT,
      GameError::InvalidConfig(_) | GameError::AnswerMismatch { .. } => StatusCode::BAD_REQUEST,
      GameError::Exhausted { .. } | GameError::DateOutOfRange | GameError::Storage(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
      _ => StatusCode::BAD_REQUEST,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      warn!(target: "brainplay_backend", error = %self.0, "Request failed");
    }
    (status, Json(ErrorOut { error: self.0.to_string() })).into_response()
  }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state, body), fields(game = %body.game_type, difficulty = %body.difficulty))]
pub async fn http_start_game(
  State(state): State<Arc<AppState>>,
  Json(body): Json<StartGameIn>,
) -> ApiResult<GameStartedOut> {
  let out = logic::start_game(&state, body).await?;
  info!(target: "game", run = %out.run_id, rounds = out.rounds, "HTTP game started");
  Ok(Json(out))
}

#[instrument(level = "info", skip(state), fields(%run_id))]
pub async fn http_next_question(
  State(state): State<Arc<AppState>>,
  Path(run_id): Path<String>,
) -> ApiResult<QuestionOut> {
  Ok(Json(logic::next_question(&state, &run_id).await?))
}

#[instrument(level = "debug", skip(state))]
pub async fn http_reveal(
  State(state): State<Arc<AppState>>,
  Path((run_id, question_id, index)): Path<(String, String, usize)>,
) -> ApiResult<RevealOut> {
  Ok(Json(logic::reveal_step(&state, &run_id, &question_id, index).await?))
}

#[instrument(level = "info", skip(state, body), fields(%run_id, question_id = %body.question_id))]
pub async fn http_post_answer(
  State(state): State<Arc<AppState>>,
  Path(run_id): Path<String>,
  Json(body): Json<AnswerIn>,
) -> ApiResult<AnswerOut> {
  let out = logic::submit_answer(&state, &run_id, &body.question_id, &body.answer).await?;
  info!(target: "game", run = %run_id, correct = out.correct, "HTTP submit_answer evaluated");
  Ok(Json(out))
}

#[instrument(level = "info", skip(state), fields(%run_id))]
pub async fn http_finish_game(
  State(state): State<Arc<AppState>>,
  Path(run_id): Path<String>,
) -> ApiResult<SessionOut> {
  Ok(Json(logic::finish_game(&state, &run_id).await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_stats(
  State(state): State<Arc<AppState>>,
  Query(q): Query<StatsQuery>,
) -> impl IntoResponse {
  Json(logic::stats(&state, q.game_type).await)
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_profile(State(state): State<Arc<AppState>>) -> ApiResult<Profile> {
  Ok(Json(state.profile()?))
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_put_profile(
  State(state): State<Arc<AppState>>,
  Json(body): Json<Profile>,
) -> ApiResult<Profile> {
  state.save_profile(&body)?;
  Ok(Json(body))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_settings(State(state): State<Arc<AppState>>) -> ApiResult<Settings> {
  Ok(Json(state.settings()?))
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_put_settings(
  State(state): State<Arc<AppState>>,
  Json(body): Json<Settings>,
) -> ApiResult<Settings> {
  state.save_settings(&body)?;
  Ok(Json(body))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn error_status_mapping() {
    assert_eq!(ApiError(GameError::UnknownRun("r".into())).status(), StatusCode::NOT_FOUND);
    assert_eq!(ApiError(GameError::StaleQuestion("q".into())).status(), StatusCode::CONFLICT);
    assert_eq!(ApiError(GameError::WrongPhase("ready")).status(), StatusCode::CONFLICT);
    assert_eq!(
      ApiError(GameError::AnswerMismatch { question: "path", answer: "color" }).status(),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(ApiError(GameError::Storage("disk".into())).status(), StatusCode::INTERNAL_SERVER_ERROR);
  }
}
