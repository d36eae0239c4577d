//! Learning rules and weights from a hand-made sample grid

use crate::{
  Direction, Rule, Rules, Tile, Weights,
  err::Error,
  util::{IPos, Size},
};
use itertools::iproduct;
use std::str::FromStr;

/// A fully determined, row-major tile grid
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sample {
  size: Size,
  tiles: Vec<Tile>,
}

impl Sample {
  pub fn new(tiles: impl Into<Vec<Tile>>, size: impl Into<Size>) -> Result<Self, Error> {
    let tiles = tiles.into();
    let size = size.into();

    if size.is_empty() {
      return Err(Error::EmptySample);
    }

    if tiles.len() != size.len() {
      return Err(Error::SampleSizeMismatch {
        expected: size.len(),
        found: tiles.len(),
      });
    }

    Ok(Self { size, tiles })
  }

  pub fn from_rows<R>(rows: impl IntoIterator<Item = R>) -> Result<Self, Error>
  where
    R: IntoIterator<Item = Tile>,
  {
    let mut width = None;
    let mut height = 0;
    let mut tiles = Vec::new();

    for (row, line) in rows.into_iter().enumerate() {
      let before = tiles.len();
      tiles.extend(line);
      let found = tiles.len() - before;

      let expected = *width.get_or_insert(found);
      if found != expected {
        return Err(Error::RaggedSample {
          row,
          expected,
          found,
        });
      }
      height += 1;
    }

    Self::new(tiles, [width.unwrap_or_default(), height])
  }

  pub fn size(&self) -> Size {
    self.size
  }

  pub fn tiles(&self) -> &[Tile] {
    &self.tiles
  }

  pub fn at(&self, pos: &IPos) -> Option<Tile> {
    pos.index_in(self.size).map(|index| self.tiles[index])
  }
}

impl FromStr for Sample {
  type Err = Error;

  /// One line per row, one glyph per tile, blank lines and surrounding whitespace ignored
  fn from_str(source: &str) -> Result<Self, Self::Err> {
    let rows = source
      .lines()
      .map(str::trim)
      .filter(|line| !line.is_empty())
      .map(|line| {
        line
          .chars()
          .map(|glyph| Tile::from_glyph(glyph).ok_or(Error::UnknownGlyph { glyph }))
          .collect::<Result<Vec<_>, _>>()
      })
      .collect::<Result<Vec<_>, _>>()?;

    Self::from_rows(rows)
  }
}

/// Every adjacency observed in the sample, in scan order and without duplicates
///
/// Only the rule in the observed direction is added. Pairs involving the error sentinel are skipped.
#[profiling::function]
pub fn infer_rules(sample: &Sample) -> Rules {
  let mut rules = Rules::default();

  for (y, x) in iproduct!(0..sample.size.height(), 0..sample.size.width()) {
    let pos = IPos::new(x as isize, y as isize);
    let Some(tile) = sample.at(&pos).filter(|tile| !tile.is_error()) else {
      continue;
    };

    for dir in Direction::SCAN_ORDER {
      let Some(neighbor) = sample.at(&(pos + dir)).filter(|tile| !tile.is_error()) else {
        continue;
      };
      rules.insert(Rule::new(tile, dir, neighbor));
    }
  }

  rules
}

/// How often each tile appears in the sample
pub fn infer_weights(sample: &Sample) -> Weights<usize> {
  let mut weights = Weights::default();
  for tile in sample.tiles.iter().filter(|tile| !tile.is_error()) {
    *weights.entry(*tile).or_insert(0) += 1;
  }
  weights
}

#[cfg(test)]
mod tests {
  use super::{Sample, infer_rules, infer_weights};
  use crate::{Direction, Rule, Tile, err::Error};
  use strum::IntoEnumIterator;

  const A: Tile = Tile::Grass;
  const B: Tile = Tile::Water;

  fn alternating() -> Sample {
    Sample::from_rows([[A, B, A, B], [A, B, A, B]]).unwrap()
  }

  #[test]
  fn parses_glyph_text() {
    let sample = "
      .T.
      ~~~
    "
    .parse::<Sample>()
    .unwrap();
    assert_eq!(sample.size().width(), 3);
    assert_eq!(sample.size().height(), 2);
    assert_eq!(
      sample.tiles(),
      &[
        Tile::Grass,
        Tile::Tree,
        Tile::Grass,
        Tile::Water,
        Tile::Water,
        Tile::Water
      ]
    );
  }

  #[test]
  fn rejects_bad_samples() {
    assert!(matches!("".parse::<Sample>(), Err(Error::EmptySample)));
    assert!(matches!(
      ".x".parse::<Sample>(),
      Err(Error::UnknownGlyph { glyph: 'x' })
    ));
    assert!(matches!(
      "..\n.".parse::<Sample>(),
      Err(Error::RaggedSample {
        row: 1,
        expected: 2,
        found: 1
      })
    ));
    assert!(matches!(
      Sample::new(vec![A; 5], [2, 2]),
      Err(Error::SampleSizeMismatch {
        expected: 4,
        found: 5
      })
    ));
    assert!(matches!(
      Sample::new(vec![A; 4], [2, 3]),
      Err(Error::SampleSizeMismatch {
        expected: 6,
        found: 4
      })
    ));
  }

  #[test]
  fn observed_adjacencies_are_learned() {
    let rules = infer_rules(&alternating());

    assert!(rules.permits(A, Direction::Right, B));
    assert!(rules.permits(A, Direction::Up, A));
    assert!(rules.permits(A, Direction::Down, A));
    assert!(!rules.permits(A, Direction::Right, A));
    assert!(!rules.permits(A, Direction::Left, A));
    assert!(!rules.permits(B, Direction::Right, B));
  }

  #[test]
  fn unobserved_adjacencies_are_not_learned() {
    let sample = Sample::from_rows([[A, B]]).unwrap();
    let rules = infer_rules(&sample);

    assert_eq!(
      rules.to_vec(),
      vec![
        Rule::new(A, Direction::Right, B),
        Rule::new(B, Direction::Left, A)
      ]
    );
    for dir in Direction::iter() {
      assert!(!rules.permits(A, dir, A));
    }
  }

  // Mirrors are never added on purpose, but since every cell of the sample is
  // visited each observed pair is also seen from its other side.
  #[test]
  fn inferred_rules_come_out_mirror_closed() {
    let sample = "
      ..TT~
      .s<~~
      .^^~~
    "
    .parse::<Sample>()
    .unwrap();

    let rules = infer_rules(&sample);
    assert!(rules.is_symmetric());
  }

  #[test]
  fn rules_are_deduplicated() {
    let rules = infer_rules(&alternating());
    let mut sorted = rules.to_vec();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), rules.len());
    // A-right-B, B-left-A, B-right-A, A-left-B, and vertical self adjacency for each
    assert_eq!(rules.len(), 8);
  }

  #[test]
  fn inference_is_stable() {
    assert_eq!(infer_rules(&alternating()), infer_rules(&alternating()));
    assert_eq!(
      infer_rules(&alternating())[0],
      Rule::new(A, Direction::Down, A)
    );
  }

  #[test]
  fn weights_count_occurrences() {
    let sample = "
      ..T
      ~.!
    "
    .parse::<Sample>()
    .unwrap();
    let weights = infer_weights(&sample);

    assert_eq!(weights.weight_of(&Tile::Grass), Some(3));
    assert_eq!(weights.weight_of(&Tile::Tree), Some(1));
    assert_eq!(weights.weight_of(&Tile::Water), Some(1));
    assert_eq!(weights.weight_of(&Tile::Error), None);
    assert_eq!(weights.len(), 3);
  }
}
