//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//!
//! Questions leave the server as `QuestionView`s: everything needed to draw
//! the puzzle, nothing that gives the answer away. Presentation steps are
//! fetched one at a time through the reveal endpoint.

use serde::{Deserialize, Serialize};

use crate::domain::{Difficulty, GameType};
use crate::games::attention::Phase;
use crate::games::calendar::{day_of_week, format_date};
use crate::games::color::ColorOption;
use crate::games::path::Point;
use crate::games::{Answer, Question, Reveal, Verdict};
use crate::play::{AnswerOutcome, IssuedQuestion};
use crate::scoring::{Rank, ScoreSummary};
use crate::sessions::{GameStats, SessionRecord};
use crate::storage::{Profile, Settings};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    StartGame(StartGameIn),
    NextQuestion {
        #[serde(rename = "runId")]
        run_id: String,
    },
    Reveal {
        #[serde(rename = "runId")]
        run_id: String,
        #[serde(rename = "questionId")]
        question_id: String,
        index: usize,
    },
    SubmitAnswer {
        #[serde(rename = "runId")]
        run_id: String,
        #[serde(rename = "questionId")]
        question_id: String,
        answer: Answer,
    },
    FinishGame {
        #[serde(rename = "runId")]
        run_id: String,
    },
    GetStats {
        #[serde(default, rename = "gameType")]
        game_type: Option<GameType>,
    },
    GetProfile,
    SaveProfile {
        profile: Profile,
    },
    GetSettings,
    SaveSettings {
        settings: Settings,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    GameStarted(GameStartedOut),
    Question {
        question: QuestionOut,
    },
    Reveal(RevealOut),
    AnswerResult(AnswerOut),
    GameFinished(SessionOut),
    Stats(StatsOut),
    Profile {
        profile: Profile,
    },
    Settings {
        settings: Settings,
    },
    Error {
        message: String,
    },
}

//
// Question views
//

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DateOptionView {
    pub date: String,
    pub day_of_week: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct PathView {
    pub id: usize,
    pub points: Vec<Point>,
}

/// Player-facing payload of a question; the answer key is left out.
#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "game", rename_all = "snake_case")]
pub enum QuestionView {
    Calendar {
        date: String,
        day: String,
        #[serde(rename = "daysToAdd")]
        days_to_add: u32,
        options: Vec<DateOptionView>,
    },
    Color {
        word: String,
        #[serde(rename = "inkHex")]
        ink_hex: String,
        options: Vec<ColorOption>,
    },
    Path {
        paths: Vec<PathView>,
    },
    Attention {
        #[serde(rename = "gridSize")]
        grid_size: usize,
        shape: String,
    },
    Blink {
        #[serde(rename = "gridSize")]
        grid_size: usize,
        length: usize,
    },
    HeadCount {
        #[serde(rename = "initialCount")]
        initial_count: u32,
        #[serde(rename = "eventCount")]
        event_count: usize,
        options: Vec<u32>,
    },
    Memory {
        #[serde(rename = "allItems")]
        all_items: Vec<String>,
    },
}

/// Convert a full `Question` (internal) to the public view.
pub fn to_view(q: &Question) -> QuestionView {
    match q {
        Question::Calendar(c) => QuestionView::Calendar {
            date: format_date(c.base_date),
            day: day_of_week(c.base_date).to_string(),
            days_to_add: c.days_to_add,
            options: c
                .options
                .iter()
                .map(|o| DateOptionView { date: o.date.clone(), day_of_week: o.day_of_week.clone() })
                .collect(),
        },
        Question::Color(c) => QuestionView::Color {
            word: c.displayed_word.clone(),
            ink_hex: c.rendered_hex.clone(),
            options: c.options.clone(),
        },
        Question::Path(p) => QuestionView::Path {
            paths: p.paths.iter().map(|p| PathView { id: p.id, points: p.points.clone() }).collect(),
        },
        Question::Attention(f) => QuestionView::Attention { grid_size: f.grid_size, shape: f.shape.clone() },
        Question::Blink(b) => QuestionView::Blink { grid_size: b.grid_size, length: b.sequence.len() },
        Question::HeadCount(h) => QuestionView::HeadCount {
            initial_count: h.initial_count,
            event_count: h.events.len(),
            options: h.options.clone(),
        },
        Question::Memory(m) => QuestionView::Memory { all_items: m.all_items.clone() },
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOut {
    pub id: String,
    pub game_type: GameType,
    pub round: u32,
    pub rounds: u32,
    pub phase: Phase,
    pub reveal_len: usize,
    pub question: QuestionView,
}

pub fn to_out(q: &IssuedQuestion) -> QuestionOut {
    QuestionOut {
        id: q.id.clone(),
        game_type: q.question.game_type(),
        round: q.round,
        rounds: q.rounds,
        phase: q.phase,
        reveal_len: q.reveal_len,
        question: to_view(&q.question),
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartGameIn {
    pub game_type: GameType,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub rounds: Option<u32>,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStartedOut {
    pub run_id: String,
    pub game_type: GameType,
    pub difficulty: Difficulty,
    pub rounds: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealOut {
    pub question_id: String,
    pub index: usize,
    pub reveal: Reveal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerIn {
    pub question_id: String,
    pub answer: Answer,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOut {
    pub question_id: String,
    pub verdict: Verdict,
    pub correct: bool,
    pub score: ScoreSummary,
    pub run_complete: bool,
}

impl From<AnswerOutcome> for AnswerOut {
    fn from(o: AnswerOutcome) -> Self {
        Self {
            correct: o.is_correct(),
            question_id: o.question_id,
            verdict: o.verdict,
            score: o.score,
            run_complete: o.run_complete,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOut {
    pub sequence: usize,
    pub rank: Rank,
    pub record: SessionRecord,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    pub game_type: Option<GameType>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsOut {
    pub game_type: Option<GameType>,
    pub stats: GameStats,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
