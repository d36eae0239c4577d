use crate::{Direction, Tile, util::IPos};

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("({dx}, {dy}) is not a unit step in a cardinal direction")]
  InvalidDelta { dx: isize, dy: isize },
  #[error("Cannot choose from an empty set of weights")]
  NoWeights,
  #[error("Weights sum to zero, nothing is selectable")]
  DegenerateWeights,
  #[error("Weights sum beyond the representable range")]
  NonFiniteWeights,
  #[error("Weight at index {index} is negative")]
  NegativeWeight { index: usize },
  #[error("No weight available for tile {tile:?}")]
  MissingWeight { tile: Tile },
  #[error("Grid dimensions must be positive, got {width}x{height}")]
  InvalidSize { width: usize, height: usize },
  #[error("Sample grid has no tiles")]
  EmptySample,
  #[error("Sample row {row} has {found} tiles, expected {expected}")]
  RaggedSample {
    row: usize,
    expected: usize,
    found: usize,
  },
  #[error("Sample size calls for {expected} tiles, found {found}")]
  SampleSizeMismatch { expected: usize, found: usize },
  #[error("Unknown tile glyph {glyph:?}")]
  UnknownGlyph { glyph: char },
  #[error(
    "Contradiction found at {position:?} with {neighbor:?} to the {direction:?} permitting only {permitted:?}"
  )]
  Contradiction {
    position: IPos,
    neighbor: IPos,
    direction: Direction,
    permitted: Vec<Tile>,
  },
  #[error("{tile:?} at {position:?} does not permit {neighbor_tile:?} to the {direction:?}")]
  Unsatisfied {
    position: IPos,
    tile: Tile,
    direction: Direction,
    neighbor_tile: Tile,
  },
  #[error("Position {position:?} lies outside of the grid")]
  OutOfBounds { position: IPos },
}

impl Error {
  /// Errors that only invalidate the grid in progress, a fresh attempt may succeed
  pub fn is_contradiction(&self) -> bool {
    matches!(self, Self::Contradiction { .. } | Self::Unsatisfied { .. })
  }

  pub fn is_invalid_input(&self) -> bool {
    !self.is_contradiction() && !matches!(self, Self::OutOfBounds { .. })
  }
}
