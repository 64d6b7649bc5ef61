//! Head-count game: characters enter and leave a room; how many are left?

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::Difficulty;
use crate::error::{GameError, GameResult};

/// Largest group that enters or leaves in one event.
const MAX_GROUP: u32 = 3;
/// Distractors are drawn from `correct - SPREAD ..= correct + SPREAD`.
const SPREAD: i64 = 3;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
  Enter,
  Exit,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeadCountEvent {
  pub kind: EventKind,
  pub count: u32,
}

impl HeadCountEvent {
  /// Apply to a running total, never dropping below zero.
  pub fn apply(self, current: u32) -> u32 {
    match self.kind {
      EventKind::Enter => current + self.count,
      EventKind::Exit => current.saturating_sub(self.count),
    }
  }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeadCountQuestion {
  pub initial_count: u32,
  pub events: Vec<HeadCountEvent>,
  pub final_count: u32,
  pub options: Vec<u32>,
}

impl HeadCountQuestion {
  pub fn is_correct(&self, count: u32) -> bool {
    count == self.final_count
  }
}

pub fn event_count_for(difficulty: Difficulty) -> usize {
  match difficulty {
    Difficulty::Easy => 3,
    Difficulty::Medium => 4,
    Difficulty::Hard => 6,
  }
}

/// Clamped fold of `events` over `initial`.
pub fn replay(initial: u32, events: &[HeadCountEvent]) -> u32 {
  events.iter().fold(initial, |n, e| e.apply(n))
}

/// Running total after each event, in presentation order.
pub fn counts_after_each_event(initial: u32, events: &[HeadCountEvent]) -> Vec<u32> {
  events
    .iter()
    .scan(initial, |n, e| {
      *n = e.apply(*n);
      Some(*n)
    })
    .collect()
}

/// Build the event stream. Exits never ask for more people than are present;
/// an empty room always gets an enter event.
pub fn generate_events<R: Rng + ?Sized>(rng: &mut R, initial_count: u32, event_count: usize) -> Vec<HeadCountEvent> {
  let mut current = initial_count;
  let mut events = Vec::with_capacity(event_count);
  for _ in 0..event_count {
    let enter = current == 0 || rng.gen_bool(0.5);
    let event = if enter {
      HeadCountEvent { kind: EventKind::Enter, count: rng.gen_range(1..=MAX_GROUP) }
    } else {
      HeadCountEvent { kind: EventKind::Exit, count: rng.gen_range(1..=current.min(MAX_GROUP)) }
    };
    current = event.apply(current);
    events.push(event);
  }
  events
}

/// `n` distinct non-negative options around `correct`, correct included, shuffled.
/// Distractors are picked from the whole window at once, so a narrow window
/// (a count of zero) never depends on lucky draws.
pub fn generate_options<R: Rng + ?Sized>(rng: &mut R, correct: u32, n: usize) -> GameResult<Vec<u32>> {
  let lo = (correct as i64 - SPREAD).max(0);
  let hi = correct as i64 + SPREAD;
  let pool: Vec<u32> = (lo..=hi).map(|v| v as u32).filter(|&v| v != correct).collect();
  if pool.len() + 1 < n {
    return Err(GameError::invalid(format!("only {} head-count options exist around {correct}, {n} requested", pool.len() + 1)));
  }
  let mut options = vec![correct];
  options.extend(pool.choose_multiple(rng, n.saturating_sub(1)).copied());
  options.shuffle(rng);
  Ok(options)
}

pub fn generate_round<R: Rng + ?Sized>(rng: &mut R, difficulty: Difficulty) -> GameResult<HeadCountQuestion> {
  let initial_count = rng.gen_range(1..=5);
  let events = generate_events(rng, initial_count, event_count_for(difficulty));
  let final_count = replay(initial_count, &events);
  let options = generate_options(rng, final_count, 4)?;
  Ok(HeadCountQuestion { initial_count, events, final_count, options })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::rng::game_rng;
  use std::collections::HashSet;

  fn enter(count: u32) -> HeadCountEvent { HeadCountEvent { kind: EventKind::Enter, count } }
  fn exit(count: u32) -> HeadCountEvent { HeadCountEvent { kind: EventKind::Exit, count } }

  #[test]
  fn replay_clamps_at_zero() {
    let events = [exit(2), exit(3), enter(1)];
    assert_eq!(counts_after_each_event(2, &events), vec![0, 0, 1]);
    assert_eq!(replay(2, &events), 1);
  }

  #[test]
  fn exits_never_exceed_present() {
    for seed in 0..200 {
      let mut rng = game_rng(Some(seed));
      let events = generate_events(&mut rng, 1, 6);
      let mut current = 1;
      for e in &events {
        assert!((1..=3).contains(&e.count));
        if e.kind == EventKind::Exit {
          assert!(e.count <= current);
        }
        current = e.apply(current);
      }
    }
  }

  #[test]
  fn options_for_zero_stay_non_negative() {
    for seed in 0..500 {
      let mut rng = game_rng(Some(seed));
      let mut opts = generate_options(&mut rng, 0, 4).unwrap();
      opts.sort_unstable();
      assert_eq!(opts, vec![0, 1, 2, 3]);
    }
  }

  #[test]
  fn options_for_small_counts_never_fail() {
    for correct in 0..=3 {
      for seed in 0..200 {
        let mut rng = game_rng(Some(seed));
        let opts = generate_options(&mut rng, correct, 4).unwrap();
        let distinct: HashSet<u32> = opts.iter().copied().collect();
        assert_eq!(distinct.len(), 4);
        assert!(distinct.contains(&correct));
        assert!(opts.iter().all(|&o| o.abs_diff(correct) <= 3));
      }
    }
  }

  #[test]
  fn too_many_options_rejected() {
    let mut rng = game_rng(Some(5));
    // Seven values exist around 10; eight can never be found.
    let err = generate_options(&mut rng, 10, 8).unwrap_err();
    assert!(matches!(err, GameError::InvalidConfig(_)));
    assert_eq!(generate_options(&mut rng, 10, 7).unwrap().len(), 7);
  }

  #[test]
  fn rounds_fold_to_final_count() {
    for (seed, difficulty) in (0..150).zip([Difficulty::Easy, Difficulty::Medium, Difficulty::Hard].iter().cycle()) {
      let mut rng = game_rng(Some(seed));
      let q = generate_round(&mut rng, *difficulty).unwrap();
      assert!((1..=5).contains(&q.initial_count));
      assert_eq!(q.events.len(), event_count_for(*difficulty));
      assert_eq!(replay(q.initial_count, &q.events), q.final_count);
      let distinct: HashSet<u32> = q.options.iter().copied().collect();
      assert_eq!(distinct.len(), 4);
      assert!(distinct.contains(&q.final_count));
      assert!(q.is_correct(q.final_count));
    }
  }
}
