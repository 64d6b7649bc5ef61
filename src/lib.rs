//! BrainPlay: question generators, validation and scoring for a set of
//! children's mini-games, plus the Axum service that plays them.
//!
//! The engine (`games`, `play`, `scoring`, `sessions`) is pure and takes an
//! injected random source. `state`, `logic`, `protocol` and `routes` put it
//! behind HTTP and WebSocket endpoints.

pub mod config;
pub mod domain;
pub mod error;
pub mod games;
pub mod logic;
pub mod play;
pub mod protocol;
pub mod rng;
pub mod routes;
pub mod scoring;
pub mod seeds;
pub mod sessions;
pub mod state;
pub mod storage;
pub mod telemetry;

pub use error::{GameError, GameResult};
