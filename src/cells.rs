use crate::{
  CellIndex, Direction, Tile,
  err::Error,
  util::{IPos, Size},
};
use derive_more::derive::Deref;
use ordermap::OrderSet;
use std::{
  collections::BTreeSet,
  fmt::{self, Display},
};
use strum::EnumCount;

/// The grid of superpositions a solver works on
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cells {
  pub size: Size,
  pub list: Vec<Cell>,

  pub entropy_cache: EntropyCache,
}

impl Cells {
  /// Every cell starts out able to become any candidate tile
  #[profiling::function]
  pub fn new(size: Size) -> Self {
    let all_possibilities = BTreeSet::from_iter(Tile::candidates());
    let mut entropy_cache = EntropyCache::new(all_possibilities.len());

    let list = size
      .positions()
      .enumerate()
      .map(|(i, position)| {
        let cell = Cell::new(position, all_possibilities.clone(), size);
        entropy_cache.insert(cell.entropy(), i);
        cell
      })
      .collect::<Vec<Cell>>();

    Self {
      size,
      list,
      entropy_cache,
    }
  }

  pub fn at(&self, index: CellIndex) -> &Cell {
    &self.list[index]
  }

  pub fn at_pos(&self, pos: &IPos) -> Option<&Cell> {
    pos.index_in(self.size).map(|index| &self.list[index])
  }

  pub fn index_of(&self, pos: &IPos) -> Result<CellIndex, Error> {
    pos
      .index_in(self.size)
      .ok_or(Error::OutOfBounds { position: *pos })
  }

  /// In-bounds cardinal neighbors of `pos`, ordered up, down, left, right
  pub fn neighbors_of(&self, pos: &IPos) -> Result<Vec<&Cell>, Error> {
    let index = self.index_of(pos)?;
    Ok(
      self.list[index]
        .neighbors
        .iter()
        .map(|(neighbor, _)| &self.list[*neighbor])
        .collect(),
    )
  }

  pub fn is_collapsed(&self) -> bool {
    self.list.iter().all(Cell::collapsed)
  }

  /// Swaps in a new superposition, keeping the entropy cache in step, and returns the old one
  pub fn replace(&mut self, index: CellIndex, superposition: BTreeSet<Tile>) -> BTreeSet<Tile> {
    let cell = &mut self.list[index];
    let starting_entropy = cell.entropy();
    let previous = std::mem::replace(&mut cell.superposition, superposition);
    self.entropy_cache.set(starting_entropy, index, cell.entropy());
    previous
  }

  pub fn lowest_entropy_indexes(&self) -> Option<&OrderSet<CellIndex>> {
    self.entropy_cache.lowest()
  }

  pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
    self.list.chunks(self.size.width().max(1))
  }

  /// The selected tile of each cell in row-major order, `None` where undetermined
  pub fn tiles(&self) -> Vec<Option<Tile>> {
    self.list.iter().map(Cell::tile).collect()
  }
}

impl Display for Cells {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for row in self.rows() {
      for cell in row {
        write!(f, "{}", cell.tile().map(|tile| tile.glyph()).unwrap_or('?'))?;
      }
      writeln!(f)?;
    }
    Ok(())
  }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
  pub position: IPos,
  pub superposition: BTreeSet<Tile>,
  /// In-bounds neighbors and the direction leading to them, in scan order
  pub neighbors: Vec<(CellIndex, Direction)>,
}

impl Cell {
  fn new(position: IPos, superposition: BTreeSet<Tile>, size: Size) -> Self {
    Self {
      position,
      superposition,
      neighbors: Self::neighbors(position, size),
    }
  }

  pub fn entropy(&self) -> usize {
    self.superposition.len()
  }

  pub fn collapsed(&self) -> bool {
    self.entropy() == 1
  }

  pub fn tile(&self) -> Option<Tile> {
    self
      .collapsed()
      .then(|| self.superposition.first().copied())
      .flatten()
  }

  fn neighbors(position: IPos, size: Size) -> Vec<(CellIndex, Direction)> {
    Direction::SCAN_ORDER
      .into_iter()
      .filter_map(|dir| (position + dir).index_in(size).map(|index| (index, dir)))
      .collect()
  }
}

/// Uncollapsed cell indexes bucketed by entropy
#[derive(Default, Debug, Clone, Deref)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntropyCache(Vec<OrderSet<CellIndex>>);

impl EntropyCache {
  fn new(max_entropy: usize) -> Self {
    Self(vec![OrderSet::new(); max_entropy.max(Tile::COUNT) + 1])
  }

  #[profiling::function]
  pub fn lowest(&self) -> Option<&OrderSet<CellIndex>> {
    self.iter().skip(2).find(|level| !level.is_empty())
  }

  fn insert(&mut self, entropy: usize, index: CellIndex) {
    if entropy > 1 {
      self.0[entropy].insert(index);
    }
  }

  pub fn set(&mut self, starting_entropy: usize, index: CellIndex, new_entropy: usize) {
    if starting_entropy == new_entropy {
      return;
    }
    if starting_entropy > 1 {
      self.0[starting_entropy].swap_remove(&index);
    }
    self.insert(new_entropy, index);
  }
}
