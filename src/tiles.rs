use strum::IntoEnumIterator;
use strum_macros::{EnumCount, EnumIter, VariantArray};

/// Terrain kinds a cell may resolve to
///
/// `Error` is a sentinel: it is never a collapse candidate and never takes part in rule matching.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  EnumCount,
  EnumIter,
  VariantArray,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bevy", derive(bevy_reflect::Reflect))]
pub enum Tile {
  Grass,
  Tree,
  Water,
  ShoreIn,
  ShoreLeft,
  ShoreRight,
  ShoreAbove,
  ShoreBelow,
  Error,
}

impl Tile {
  pub fn is_error(&self) -> bool {
    *self == Self::Error
  }

  /// Every tile a fresh cell may become
  pub fn candidates() -> impl Iterator<Item = Tile> {
    Self::iter().filter(|tile| !tile.is_error())
  }

  pub fn glyph(&self) -> char {
    match self {
      Self::Grass => '.',
      Self::Tree => 'T',
      Self::Water => '~',
      Self::ShoreIn => 's',
      Self::ShoreLeft => '<',
      Self::ShoreRight => '>',
      Self::ShoreAbove => '^',
      Self::ShoreBelow => 'v',
      Self::Error => '!',
    }
  }

  pub fn from_glyph(glyph: char) -> Option<Self> {
    Self::iter().find(|tile| tile.glyph() == glyph)
  }
}
