//! Stroop color game: a color name is printed in a different ink color and the
//! player must pick the ink.

use rand::seq::{IteratorRandom, SliceRandom};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaletteColor {
  pub name: &'static str,
  pub hex: &'static str,
}

pub const PALETTE: [PaletteColor; 8] = [
  PaletteColor { name: "Red", hex: "#EF4444" },
  PaletteColor { name: "Blue", hex: "#3B82F6" },
  PaletteColor { name: "Green", hex: "#10B981" },
  PaletteColor { name: "Yellow", hex: "#F59E0B" },
  PaletteColor { name: "Purple", hex: "#8B5CF6" },
  PaletteColor { name: "Orange", hex: "#F97316" },
  PaletteColor { name: "Pink", hex: "#EC4899" },
  PaletteColor { name: "Cyan", hex: "#06B6D4" },
];

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColorOption {
  pub name: String,
  pub hex: String,
}

impl From<PaletteColor> for ColorOption {
  fn from(c: PaletteColor) -> Self {
    Self { name: c.name.to_string(), hex: c.hex.to_string() }
  }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColorQuestion {
  /// The word shown to the player; always names a color other than the ink.
  pub displayed_word: String,
  /// The ink the word is rendered in. This is the answer.
  pub rendered_hex: String,
  pub options: Vec<ColorOption>,
  pub correct_option_index: usize,
}

impl ColorQuestion {
  pub fn is_correct(&self, option_index: usize) -> bool {
    option_index == self.correct_option_index
  }
}

/// Palette name for a hex value, if it is one of ours.
pub fn name_for_hex(hex: &str) -> Option<&'static str> {
  PALETTE.iter().find(|c| c.hex.eq_ignore_ascii_case(hex)).map(|c| c.name)
}

pub fn generate_color_question<R: Rng + ?Sized>(rng: &mut R, option_count: usize) -> GameResult<ColorQuestion> {
  if !(2..=PALETTE.len()).contains(&option_count) {
    return Err(GameError::invalid(format!(
      "color option count must be within 2..={}, got {option_count}",
      PALETTE.len()
    )));
  }

  let ink = *PALETTE.choose(rng).ok_or_else(|| GameError::invalid("empty palette"))?;
  let word = PALETTE
    .iter()
    .filter(|c| c.name != ink.name)
    .choose(rng)
    .copied()
    .ok_or_else(|| GameError::invalid("palette needs two colors"))?;

  let mut shown: Vec<PaletteColor> = PALETTE.choose_multiple(rng, option_count).copied().collect();
  if !shown.contains(&ink) {
    let slot = rng.gen_range(0..shown.len());
    shown[slot] = ink;
  }
  let correct_option_index = shown
    .iter()
    .position(|c| *c == ink)
    .ok_or_else(|| GameError::invalid("ink color missing from options"))?;

  Ok(ColorQuestion {
    displayed_word: word.name.to_string(),
    rendered_hex: ink.hex.to_string(),
    options: shown.into_iter().map(ColorOption::from).collect(),
    correct_option_index,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::rng::game_rng;
  use std::collections::HashSet;

  #[test]
  fn correct_index_points_at_ink_not_word() {
    for seed in 0..200 {
      let mut rng = game_rng(Some(seed));
      let q = generate_color_question(&mut rng, 6).unwrap();
      assert_eq!(q.options.len(), 6);
      assert_eq!(q.options[q.correct_option_index].hex, q.rendered_hex);
      let ink_name = name_for_hex(&q.rendered_hex).unwrap();
      assert_ne!(q.displayed_word, ink_name);
      let names: HashSet<&str> = q.options.iter().map(|o| o.name.as_str()).collect();
      assert_eq!(names.len(), 6, "options must be distinct");
      assert!(q.is_correct(q.correct_option_index));
    }
  }

  #[test]
  fn full_palette_option_set() {
    let mut rng = game_rng(Some(9));
    let q = generate_color_question(&mut rng, 8).unwrap();
    assert_eq!(q.options.len(), 8);
  }

  #[test]
  fn bad_option_count_rejected() {
    let mut rng = game_rng(Some(9));
    assert!(generate_color_question(&mut rng, 1).is_err());
    assert!(generate_color_question(&mut rng, 9).is_err());
  }
}
