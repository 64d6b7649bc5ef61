//! Application state: live game runs, the session log, and the persistence store.
//!
//! This module owns:
//!   - game runs in progress (by run id), dropped once idle past the configured TTL
//!     or when the live-run cap is reached
//!   - the session log (restored from the store at startup)
//!   - the key-value store (JSON file when STORE_PATH is set, memory otherwise)
//!   - the games config (from TOML or defaults)

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info, instrument, warn};

use crate::config::{load_games_config_from_env, GamesConfig, RunsCfg};
use crate::domain::{Difficulty, GameType};
use crate::error::{GameError, GameResult};
use crate::games::{Answer, Reveal};
use crate::play::{AnswerOutcome, GameRun, IssuedQuestion};
use crate::sessions::{GameStats, SessionLog, SessionRecord};
use crate::storage::{self, JsonFileStore, KeyValueStore, MemoryStore, Profile, Settings};

#[derive(Clone)]
pub struct AppState {
    pub config: GamesConfig,
    pub runs: Arc<RwLock<HashMap<String, GameRun>>>,
    pub sessions: Arc<RwLock<SessionLog>>,
    pub store: Arc<dyn KeyValueStore>,
    /// Serializes writes of the session history to the store, in log order.
    persist: Arc<Mutex<()>>,
}

/// Drop runs idle for longer than the TTL, then the least recently used ones
/// until there is room for one more. Returns how many runs were removed.
pub fn evict_runs(runs: &mut HashMap<String, GameRun>, cfg: &RunsCfg, now: Instant) -> usize {
    let ttl = Duration::from_secs(cfg.idle_ttl_secs);
    let before = runs.len();
    runs.retain(|_, run| run.idle_for(now) <= ttl);
    while runs.len() >= cfg.max_live {
        let Some(oldest) = runs
            .values()
            .min_by_key(|run| run.last_touched())
            .map(|run| run.id().to_string())
        else {
            break;
        };
        runs.remove(&oldest);
    }
    before - runs.len()
}

/// Look up a live run and mark it used. A run past its idle TTL is dropped
/// and reported as unknown.
fn live_run<'a>(
    runs: &'a mut HashMap<String, GameRun>,
    cfg: &RunsCfg,
    run_id: &str,
    now: Instant,
) -> GameResult<&'a mut GameRun> {
    let expired = runs
        .get(run_id)
        .is_some_and(|run| run.idle_for(now) > Duration::from_secs(cfg.idle_ttl_secs));
    if expired {
        runs.remove(run_id);
        info!(target: "game", run = %run_id, "Idle run expired");
    }
    let run = runs
        .get_mut(run_id)
        .ok_or_else(|| GameError::UnknownRun(run_id.to_string()))?;
    run.touch(now);
    Ok(run)
}

impl AppState {
    /// Build state from env: load config, open the store, restore session history.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let config = load_games_config_from_env();

        let store: Arc<dyn KeyValueStore> = match std::env::var("STORE_PATH") {
            Ok(path) if !path.trim().is_empty() => match JsonFileStore::open(&path) {
                Ok(s) => {
                    info!(target: "brainplay_backend", %path, "Using JSON file store");
                    Arc::new(s)
                }
                Err(e) => {
                    error!(target: "brainplay_backend", %path, error = %e, "Failed to open store; falling back to memory");
                    Arc::new(MemoryStore::new())
                }
            },
            _ => {
                info!(target: "brainplay_backend", "STORE_PATH not set. Progress is kept in memory only.");
                Arc::new(MemoryStore::new())
            }
        };

        Self::with_parts(config, store)
    }

    /// Assemble state from an explicit config and store.
    pub fn with_parts(config: GamesConfig, store: Arc<dyn KeyValueStore>) -> Self {
        let history = storage::load_sessions(store.as_ref()).unwrap_or_else(|e| {
            warn!(target: "storage", error = %e, "Stored session history unreadable; starting empty");
            Vec::new()
        });

        let log = SessionLog::from_records(history);
        for game in GameType::ALL {
            let s = log.stats_for(game);
            if s.played_count > 0 {
                info!(target: "game", %game, played = s.played_count, best = s.best_accuracy, "Restored session history");
            }
        }

        Self {
            config,
            runs: Arc::new(RwLock::new(HashMap::new())),
            sessions: Arc::new(RwLock::new(log)),
            store,
            persist: Arc::new(Mutex::new(())),
        }
    }

    /// Start a run. `rounds` falls back to the configured count for the game.
    #[instrument(level = "info", skip(self), fields(%game, %difficulty))]
    pub async fn start_run(
        &self,
        game: GameType,
        difficulty: Difficulty,
        rounds: Option<u32>,
        seed: Option<u64>,
    ) -> GameResult<(String, u32)> {
        let rounds = rounds.unwrap_or_else(|| self.config.rounds.for_game(game));
        let run = GameRun::new(game, difficulty, rounds, seed)?;
        let id = run.id().to_string();
        let mut runs = self.runs.write().await;
        let evicted = evict_runs(&mut runs, &self.config.runs, Instant::now());
        if evicted > 0 {
            info!(target: "game", evicted, live = runs.len(), "Dropped idle runs");
        }
        runs.insert(id.clone(), run);
        drop(runs);
        info!(target: "game", run = %id, %game, %difficulty, rounds, "Run started");
        Ok((id, rounds))
    }

    #[instrument(level = "debug", skip(self), fields(%run_id))]
    pub async fn next_question(&self, run_id: &str) -> GameResult<IssuedQuestion> {
        let mut runs = self.runs.write().await;
        live_run(&mut runs, &self.config.runs, run_id, Instant::now())?.next_question(&self.config)
    }

    #[instrument(level = "debug", skip(self), fields(%run_id, %question_id))]
    pub async fn reveal(&self, run_id: &str, question_id: &str, index: usize) -> GameResult<Reveal> {
        let mut runs = self.runs.write().await;
        live_run(&mut runs, &self.config.runs, run_id, Instant::now())?.reveal(question_id, index)
    }

    #[instrument(level = "debug", skip(self, answer), fields(%run_id, %question_id))]
    pub async fn submit(&self, run_id: &str, question_id: &str, answer: &Answer) -> GameResult<AnswerOutcome> {
        let mut runs = self.runs.write().await;
        live_run(&mut runs, &self.config.runs, run_id, Instant::now())?.submit(question_id, answer)
    }

    /// Close a run, append its record to the log and persist it. Returns the
    /// record with its sequence number in the log.
    ///
    /// The store write runs on the blocking pool after the log lock is
    /// released. A storage failure is logged but does not lose the record:
    /// the in-memory log stays authoritative for this process.
    #[instrument(level = "info", skip(self), fields(%run_id))]
    pub async fn finish_run(&self, run_id: &str) -> GameResult<(usize, SessionRecord)> {
        let run = self
            .runs
            .write()
            .await
            .remove(run_id)
            .ok_or_else(|| GameError::UnknownRun(run_id.to_string()))?;
        let record = run.finish(Utc::now());

        // Taken before the log lock so store appends follow log order.
        let _persist = self.persist.lock().await;
        let seq = self.sessions.write().await.append(record.clone());

        let store = Arc::clone(&self.store);
        let stored = record.clone();
        match tokio::task::spawn_blocking(move || storage::append_session(store.as_ref(), &stored)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => error!(target: "storage", error = %e, seq, "Failed to persist session record"),
            Err(e) => error!(target: "storage", error = %e, seq, "Session persist task failed"),
        }
        info!(
            target: "game",
            run = %run_id,
            game = %record.game_type,
            correct = record.score.correct,
            total = record.score.total,
            accuracy = record.score.accuracy,
            rank = %record.score.rank(),
            seq,
            "Run finished"
        );
        Ok((seq, record))
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn stats(&self, game: Option<GameType>) -> GameStats {
        let log = self.sessions.read().await;
        match game {
            Some(g) => log.stats_for(g),
            None => log.overall_stats(),
        }
    }

    pub fn profile(&self) -> GameResult<Profile> {
        Ok(storage::load_profile(self.store.as_ref())?)
    }

    #[instrument(level = "info", skip(self, profile))]
    pub fn save_profile(&self, profile: &Profile) -> GameResult<()> {
        if profile.name.trim().is_empty() {
            return Err(GameError::invalid("profile name must not be empty"));
        }
        storage::save_profile(self.store.as_ref(), profile)?;
        info!(target: "storage", name = %profile.name, "Profile saved");
        Ok(())
    }

    pub fn settings(&self) -> GameResult<Settings> {
        Ok(storage::load_settings(self.store.as_ref())?)
    }

    #[instrument(level = "info", skip(self))]
    pub fn save_settings(&self, settings: &Settings) -> GameResult<()> {
        storage::save_settings(self.store.as_ref(), settings)?;
        Ok(())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
