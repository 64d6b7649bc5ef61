//! Built-in content: symbol pools the generators draw from.

/// Items for the memory game: fruit, animals, sports, vehicles.
pub const MEMORY_ITEMS: [&str; 40] = [
  "🍎", "🍌", "🍊", "🍇", "🍓", "🥝", "🍑", "🍒", "🥭", "🫐",
  "🐶", "🐱", "🐭", "🐹", "🐰", "🦊", "🐻", "🐼", "🐨", "🐯",
  "⚽", "🏀", "🏈", "🎾", "🏐", "🏓", "🥎", "🏸", "🏑", "🏒",
  "🚗", "🚕", "🚙", "🚌", "🚎", "🏎️", "🚓", "🚑", "🚒", "🚐",
];

/// Avatars a player can pick for their profile. The first one is the default.
pub const AVATARS: [&str; 12] = ["😊", "🌟", "🦄", "🐱", "🐶", "🦋", "🌈", "🎨", "🚀", "⭐", "🎈", "🧸"];

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashSet;

  #[test]
  fn pools_have_no_duplicates() {
    assert_eq!(MEMORY_ITEMS.iter().collect::<HashSet<_>>().len(), MEMORY_ITEMS.len());
    assert_eq!(AVATARS.iter().collect::<HashSet<_>>().len(), AVATARS.len());
  }
}
