//! Cardinal directions on a grid whose `y` axis grows downward

use crate::{cells::Cell, err::Error, util::IPos};
use strum_macros::{EnumCount, EnumIter, VariantArray};

#[derive(
  PartialEq, Eq, Hash, PartialOrd, Ord, EnumCount, EnumIter, VariantArray, Clone, Copy, Debug,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bevy", derive(bevy_reflect::Reflect))]
pub enum Direction {
  Up,
  Right,
  Down,
  Left,
}

impl Direction {
  /// The order neighbors are enumerated in, everywhere
  pub const SCAN_ORDER: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

  pub fn flip(&self) -> Self {
    match self {
      Self::Up => Self::Down,
      Self::Right => Self::Left,
      Self::Down => Self::Up,
      Self::Left => Self::Right,
    }
  }

  pub fn delta(&self) -> (isize, isize) {
    match self {
      Self::Up => (0, -1),
      Self::Right => (1, 0),
      Self::Down => (0, 1),
      Self::Left => (-1, 0),
    }
  }

  pub fn from_delta(dx: isize, dy: isize) -> Result<Self, Error> {
    match (dx, dy) {
      (0, -1) => Ok(Self::Up),
      (1, 0) => Ok(Self::Right),
      (0, 1) => Ok(Self::Down),
      (-1, 0) => Ok(Self::Left),
      _ => Err(Error::InvalidDelta { dx, dy }),
    }
  }

  /// Direction of the step leading from `from` to `to`
  pub fn between(from: IPos, to: IPos) -> Result<Self, Error> {
    Self::from_delta(to.x - from.x, to.y - from.y)
  }

  /// Direction of `to` as seen from `from`, the cells must be cardinal neighbors
  pub fn of(from: &Cell, to: &Cell) -> Result<Self, Error> {
    Self::between(from.position, to.position)
  }
}
