//! Loading game configuration (round counts + generator tuning) from TOML.
//!
//! See `GamesConfig` for the expected schema. Every section is optional and
//! falls back to the values the games were designed with.

use serde::Deserialize;
use tracing::{error, info, warn};

use crate::domain::GameType;
use crate::error::{GameError, GameResult};
use crate::games::path::Point;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GamesConfig {
  pub rounds: RoundsCfg,
  /// Bound for the distractor-date rejection-sampling loop.
  pub max_attempts: usize,
  pub calendar: CalendarCfg,
  pub color: ColorCfg,
  pub path: PathCfg,
  pub attention: AttentionCfg,
  pub runs: RunsCfg,
}

impl Default for GamesConfig {
  fn default() -> Self {
    Self {
      rounds: RoundsCfg::default(),
      max_attempts: 64,
      calendar: CalendarCfg::default(),
      color: ColorCfg::default(),
      path: PathCfg::default(),
      attention: AttentionCfg::default(),
      runs: RunsCfg::default(),
    }
  }
}

/// Questions per run, per game.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RoundsCfg {
  pub calendar: u32,
  pub color: u32,
  pub path: u32,
  pub attention: u32,
  pub blink: u32,
  pub head_count: u32,
  pub memory: u32,
}

impl Default for RoundsCfg {
  fn default() -> Self {
    Self { calendar: 5, color: 8, path: 10, attention: 5, blink: 5, head_count: 10, memory: 6 }
  }
}

impl RoundsCfg {
  pub fn for_game(&self, game: GameType) -> u32 {
    match game {
      GameType::Calendar => self.calendar,
      GameType::Color => self.color,
      GameType::Path => self.path,
      GameType::Attention => self.attention,
      GameType::Blink => self.blink,
      GameType::HeadCount => self.head_count,
      GameType::Memory => self.memory,
    }
  }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CalendarCfg {
  pub year_min: i32,
  pub year_max: i32,
  pub max_days_to_add: u32,
  pub distractors: usize,
}

impl Default for CalendarCfg {
  fn default() -> Self {
    Self { year_min: 2024, year_max: 2024, max_days_to_add: 15, distractors: 3 }
  }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ColorCfg {
  pub option_count: usize,
}

impl Default for ColorCfg {
  fn default() -> Self { Self { option_count: 6 } }
}

/// Canvas geometry for the path game. Waypoints never leave `[min, max]`.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PathCfg {
  pub start: Point,
  pub end: Point,
  pub min: Point,
  pub max: Point,
  /// Full width of the horizontal jitter window.
  pub jitter_x: f64,
  /// Full height of the vertical jitter window.
  pub jitter_y: f64,
  pub path_count: usize,
}

impl Default for PathCfg {
  fn default() -> Self {
    Self {
      start: Point::new(50.0, 150.0),
      end: Point::new(350.0, 150.0),
      min: Point::new(80.0, 80.0),
      max: Point::new(320.0, 220.0),
      jitter_x: 80.0,
      jitter_y: 60.0,
      path_count: 5,
    }
  }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AttentionCfg {
  pub grid_size: usize,
  pub blink_min_len: usize,
  pub blink_max_len: usize,
}

impl Default for AttentionCfg {
  fn default() -> Self {
    Self { grid_size: 9, blink_min_len: 4, blink_max_len: 6 }
  }
}

/// Limits on game runs held by the service. Runs idle for longer than
/// `idle_ttl_secs` are dropped; past `max_live`, the least recently used run goes.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RunsCfg {
  pub idle_ttl_secs: u64,
  pub max_live: usize,
}

impl Default for RunsCfg {
  fn default() -> Self {
    Self { idle_ttl_secs: 30 * 60, max_live: 10_000 }
  }
}

/// Number of wrong dates next to the correct one in a calendar question.
pub const CALENDAR_DISTRACTORS: usize = 3;

fn finite(p: Point) -> bool {
  p.x.is_finite() && p.y.is_finite()
}

impl GamesConfig {
  /// Reject values no generator could honor.
  pub fn validate(&self) -> GameResult<()> {
    for game in GameType::ALL {
      if self.rounds.for_game(game) == 0 {
        return Err(GameError::invalid(format!("rounds.{} must be at least 1", game)));
      }
    }
    if self.max_attempts == 0 {
      return Err(GameError::invalid("max_attempts must be at least 1"));
    }
    let cal = &self.calendar;
    if cal.year_min > cal.year_max {
      return Err(GameError::invalid("calendar.year_min is after calendar.year_max"));
    }
    if cal.max_days_to_add == 0 {
      return Err(GameError::invalid("calendar.max_days_to_add must be at least 1"));
    }
    if cal.distractors != CALENDAR_DISTRACTORS {
      return Err(GameError::invalid(format!("calendar.distractors must be {CALENDAR_DISTRACTORS}")));
    }
    if !(2..=8).contains(&self.color.option_count) {
      return Err(GameError::invalid("color.option_count must be within 2..=8"));
    }
    let p = &self.path;
    if ![p.start, p.end, p.min, p.max].into_iter().all(finite) || !p.jitter_x.is_finite() || !p.jitter_y.is_finite() {
      return Err(GameError::invalid("path coordinates and jitter must be finite numbers"));
    }
    if p.min.x > p.max.x || p.min.y > p.max.y {
      return Err(GameError::invalid("path canvas min corner exceeds max corner"));
    }
    if p.jitter_x < 0.0 || p.jitter_y < 0.0 {
      return Err(GameError::invalid("path jitter must be non-negative"));
    }
    if !(4..=5).contains(&p.path_count) {
      return Err(GameError::invalid("path.path_count must be 4 or 5"));
    }
    let a = &self.attention;
    if a.grid_size < 2 {
      return Err(GameError::invalid("attention.grid_size must be at least 2"));
    }
    if a.blink_min_len == 0 || a.blink_min_len > a.blink_max_len {
      return Err(GameError::invalid("attention blink length bounds are inconsistent"));
    }
    if self.runs.idle_ttl_secs == 0 || self.runs.max_live == 0 {
      return Err(GameError::invalid("runs.idle_ttl_secs and runs.max_live must be at least 1"));
    }
    Ok(())
  }
}

/// Attempt to load `GamesConfig` from GAMES_CONFIG_PATH. Any IO, parse or
/// validation error is logged and the defaults are used instead.
pub fn load_games_config_from_env() -> GamesConfig {
  let Ok(path) = std::env::var("GAMES_CONFIG_PATH") else {
    return GamesConfig::default();
  };
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_games_config(&s) {
      Ok(cfg) => {
        info!(target: "brainplay_backend", %path, "Loaded games config (TOML)");
        cfg
      }
      Err(e) => {
        error!(target: "brainplay_backend", %path, error = %e, "Rejected games config; using defaults");
        GamesConfig::default()
      }
    },
    Err(e) => {
      warn!(target: "brainplay_backend", %path, error = %e, "Failed to read games config file; using defaults");
      GamesConfig::default()
    }
  }
}

pub fn parse_games_config(s: &str) -> GameResult<GamesConfig> {
  let cfg: GamesConfig = toml::from_str(s).map_err(|e| GameError::invalid(e.to_string()))?;
  cfg.validate()?;
  Ok(cfg)
}
