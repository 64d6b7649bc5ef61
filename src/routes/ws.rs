//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{debug, error, info, instrument};

use crate::error::GameResult;
use crate::logic;
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::state::AppState;

#[instrument(level = "info", skip(ws, state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "brainplay_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "brainplay_backend", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "brainplay_backend", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state).await
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "brainplay_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "brainplay_backend", "WebSocket disconnected");
}

fn reply<T>(r: GameResult<T>, wrap: impl FnOnce(T) -> ServerWsMessage) -> ServerWsMessage {
  match r {
    Ok(v) => wrap(v),
    Err(e) => ServerWsMessage::Error { message: e.to_string() },
  }
}

#[instrument(level = "info", skip(state))]
pub async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::StartGame(req) => reply(logic::start_game(state, req).await, ServerWsMessage::GameStarted),

    ClientWsMessage::NextQuestion { run_id } => reply(logic::next_question(state, &run_id).await, |question| {
      ServerWsMessage::Question { question }
    }),

    ClientWsMessage::Reveal { run_id, question_id, index } => {
      reply(logic::reveal_step(state, &run_id, &question_id, index).await, ServerWsMessage::Reveal)
    }

    ClientWsMessage::SubmitAnswer { run_id, question_id, answer } => reply(
      logic::submit_answer(state, &run_id, &question_id, &answer).await,
      ServerWsMessage::AnswerResult,
    ),

    ClientWsMessage::FinishGame { run_id } => {
      reply(logic::finish_game(state, &run_id).await, ServerWsMessage::GameFinished)
    }

    ClientWsMessage::GetStats { game_type } => ServerWsMessage::Stats(logic::stats(state, game_type).await),

    ClientWsMessage::GetProfile => reply(state.profile(), |profile| ServerWsMessage::Profile { profile }),

    ClientWsMessage::SaveProfile { profile } => {
      reply(state.save_profile(&profile), |()| ServerWsMessage::Profile { profile })
    }

    ClientWsMessage::GetSettings => reply(state.settings(), |settings| ServerWsMessage::Settings { settings }),

    ClientWsMessage::SaveSettings { settings } => {
      reply(state.save_settings(&settings), |()| ServerWsMessage::Settings { settings })
    }
  }
}
