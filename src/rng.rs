//! Random source handed to every generator.
//!
//! Generators are generic over `rand::Rng`, so tests and replays pass a seeded
//! `ChaCha8Rng` while the service seeds from entropy unless a run asks for a seed.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub type GameRng = ChaCha8Rng;

/// Seeded when `seed` is given, from OS entropy otherwise.
pub fn game_rng(seed: Option<u64>) -> GameRng {
  match seed {
    Some(s) => ChaCha8Rng::seed_from_u64(s),
    None => ChaCha8Rng::from_entropy(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::Rng;

  #[test]
  fn same_seed_same_stream() {
    let mut a = game_rng(Some(7));
    let mut b = game_rng(Some(7));
    let xs: Vec<u32> = (0..8).map(|_| a.gen()).collect();
    let ys: Vec<u32> = (0..8).map(|_| b.gen()).collect();
    assert_eq!(xs, ys);
  }
}
