//! Memory game: four items are shown, then must be picked out of twelve.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};

pub const TARGET_COUNT: usize = 4;
pub const TOTAL_COUNT: usize = 12;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemoryQuestion {
  pub target_items: Vec<String>,
  pub all_items: Vec<String>,
}

impl MemoryQuestion {
  /// Exactly the four targets, in any order, nothing else.
  pub fn is_correct(&self, selection: &[String]) -> bool {
    if selection.len() != self.target_items.len() {
      return false;
    }
    let picked: HashSet<&str> = selection.iter().map(String::as_str).collect();
    let targets: HashSet<&str> = self.target_items.iter().map(String::as_str).collect();
    picked == targets
  }
}

pub fn generate_round<R: Rng + ?Sized, S: AsRef<str>>(rng: &mut R, pool: &[S]) -> GameResult<MemoryQuestion> {
  let mut seen = HashSet::new();
  let mut distinct: Vec<&str> = pool.iter().map(AsRef::<str>::as_ref).filter(|s| seen.insert(*s)).collect();
  if distinct.len() < TOTAL_COUNT {
    return Err(GameError::invalid(format!(
      "memory pool needs {TOTAL_COUNT} distinct items, got {}",
      distinct.len()
    )));
  }

  distinct.shuffle(rng);
  let target_items: Vec<String> = distinct[..TARGET_COUNT].iter().map(|s| s.to_string()).collect();
  let mut all_items: Vec<String> = distinct[..TOTAL_COUNT].iter().map(|s| s.to_string()).collect();
  all_items.shuffle(rng);

  Ok(MemoryQuestion { target_items, all_items })
}
