use crate::Direction;
use derive_more::derive::{Deref, DerefMut};
use nalgebra::Vector2;
use std::ops::Add;

/// Width and height of a grid
#[derive(Debug, Clone, Copy, Deref, DerefMut, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size(Vector2<usize>);

impl Default for Size {
  fn default() -> Self {
    Self(Vector2::zeros())
  }
}

impl Size {
  pub fn new(width: usize, height: usize) -> Self {
    Self(Vector2::new(width, height))
  }

  pub fn width(&self) -> usize {
    self.x
  }

  pub fn height(&self) -> usize {
    self.y
  }

  pub fn len(&self) -> usize {
    self.x * self.y
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn contains(&self, pos: &IPos) -> bool {
    pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.x && (pos.y as usize) < self.y
  }

  /// Positions in row-major order, matching cell indexes
  pub fn positions(&self) -> impl Iterator<Item = IPos> + use<> {
    let width = self.x;
    (0..self.len()).map(move |index| IPos::from_index(index, width))
  }
}

impl From<[usize; 2]> for Size {
  fn from([width, height]: [usize; 2]) -> Self {
    Self::new(width, height)
  }
}

impl From<(usize, usize)> for Size {
  fn from((width, height): (usize, usize)) -> Self {
    Self::new(width, height)
  }
}

/// Signed grid coordinate, `y` grows downward
#[derive(Debug, Clone, Copy, Deref, DerefMut, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IPos(pub Vector2<isize>);

impl Default for IPos {
  fn default() -> Self {
    Self(Vector2::zeros())
  }
}

impl IPos {
  pub fn new(x: isize, y: isize) -> Self {
    Self(Vector2::new(x, y))
  }

  pub fn from_index(index: usize, width: usize) -> Self {
    Self::new((index % width) as isize, (index / width) as isize)
  }

  /// Only meaningful for positions contained by `size`
  pub fn index(&self, size: Size) -> usize {
    self.y as usize * size.width() + self.x as usize
  }

  pub fn index_in(&self, size: Size) -> Option<usize> {
    size.contains(self).then(|| self.index(size))
  }
}

impl From<[isize; 2]> for IPos {
  fn from([x, y]: [isize; 2]) -> Self {
    Self::new(x, y)
  }
}

impl From<(isize, isize)> for IPos {
  fn from((x, y): (isize, isize)) -> Self {
    Self::new(x, y)
  }
}

impl Add<Direction> for IPos {
  type Output = Self;

  fn add(self, rhs: Direction) -> Self::Output {
    let (dx, dy) = rhs.delta();
    Self::new(self.x + dx, self.y + dy)
  }
}
