use crate::{Tile, Weight, err::Error};
use derive_more::derive::{Deref, DerefMut};
use rand::{
  Rng,
  distr::{Distribution, Uniform},
};
use std::{collections::HashMap, iter::FromIterator};

/// Relative likelihood of each tile being picked when a cell collapses
///
/// Tiles without an entry are never picked by the solver.
#[derive(Debug, Clone, PartialEq, Deref, DerefMut)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Weights<W: Weight = usize>(HashMap<Tile, W>);

impl<W: Weight> Default for Weights<W> {
  fn default() -> Self {
    Self(HashMap::new())
  }
}

impl<W: Weight> Weights<W> {
  pub fn new(weights: impl Into<HashMap<Tile, W>>) -> Self {
    Self(weights.into())
  }

  pub fn weight_of(&self, tile: &Tile) -> Option<W> {
    self.0.get(tile).copied()
  }
}

impl<W: Weight> From<HashMap<Tile, W>> for Weights<W> {
  fn from(value: HashMap<Tile, W>) -> Self {
    Self(value)
  }
}

#[cfg(feature = "bevy")]
impl<W: Weight> From<bevy_platform::collections::HashMap<Tile, W>> for Weights<W> {
  fn from(value: bevy_platform::collections::HashMap<Tile, W>) -> Self {
    Self(value.into_iter().collect())
  }
}

impl<W: Weight> FromIterator<(Tile, W)> for Weights<W> {
  fn from_iter<I: IntoIterator<Item = (Tile, W)>>(iter: I) -> Self {
    Self(HashMap::from_iter(iter))
  }
}

/// Samples an index with probability proportional to its weight
///
/// Zero weights are never selected. Fails when there is nothing to select from.
#[profiling::function]
pub fn weighted_index<W, R>(weights: &[W], rng: &mut R) -> Result<usize, Error>
where
  W: Weight,
  R: Rng + ?Sized,
{
  if weights.is_empty() {
    return Err(Error::NoWeights);
  }

  let zero = W::default();

  if let Some(index) = weights.iter().position(|weight| *weight < zero) {
    return Err(Error::NegativeWeight { index });
  }

  let total: W = weights.iter().copied().sum();

  // also rejects NaN totals
  if !(total > zero) {
    return Err(Error::DegenerateWeights);
  }

  let draw = Uniform::new(zero, total)
    .map_err(|_| Error::NonFiniteWeights)?
    .sample(rng);

  let mut cumulative = zero;
  for (index, weight) in weights.iter().enumerate() {
    if *weight == zero {
      continue;
    }

    cumulative += weight;
    if draw < cumulative {
      return Ok(index);
    }
  }

  // rounding left the draw beyond the accumulated sum
  weights
    .iter()
    .rposition(|weight| *weight != zero)
    .ok_or(Error::DegenerateWeights)
}

/// Picks one of `items`, each weighted by its entry in `weights`
pub fn weighted_choice<W, R>(items: &[Tile], weights: &Weights<W>, rng: &mut R) -> Result<Tile, Error>
where
  W: Weight,
  R: Rng + ?Sized,
{
  let projected = items
    .iter()
    .map(|tile| weights.weight_of(tile).ok_or(Error::MissingWeight { tile: *tile }))
    .collect::<Result<Vec<W>, Error>>()?;

  let index = weighted_index(&projected, rng)?;

  Ok(items[index])
}

#[cfg(test)]
mod tests {
  use super::{Weights, weighted_choice, weighted_index};
  use crate::{Tile, err::Error};
  use maplit::hashmap;
  use rand::SeedableRng;
  use rand_chacha::ChaCha20Rng;

  const SEED: u64 = 123;

  #[test]
  fn rejects_empty_and_zero_weights() {
    let mut rng = ChaCha20Rng::seed_from_u64(SEED);
    assert!(matches!(
      weighted_index::<usize, _>(&[], &mut rng),
      Err(Error::NoWeights)
    ));
    assert!(matches!(
      weighted_index(&[0usize, 0, 0], &mut rng),
      Err(Error::DegenerateWeights)
    ));
    assert!(matches!(
      weighted_index(&[1.0, -0.5], &mut rng),
      Err(Error::NegativeWeight { index: 1 })
    ));
  }

  #[test]
  fn rejects_weights_summing_past_the_float_range() {
    let mut rng = ChaCha20Rng::seed_from_u64(SEED);
    assert!(matches!(
      weighted_index(&[f64::MAX, f64::MAX], &mut rng),
      Err(Error::NonFiniteWeights)
    ));
    assert!(matches!(
      weighted_index(&[1.0, f64::INFINITY], &mut rng),
      Err(Error::NonFiniteWeights)
    ));
    assert!(weighted_index(&[f64::MAX, 0.0], &mut rng).is_ok());
  }

  #[test]
  fn zero_weights_are_never_selected() {
    let mut rng = ChaCha20Rng::seed_from_u64(SEED);
    for _ in 0..1000 {
      let index = weighted_index(&[0usize, 3, 0, 1, 0], &mut rng).unwrap();
      assert!(index == 1 || index == 3);
    }
  }

  #[test]
  fn single_candidate_is_always_selected() {
    let mut rng = ChaCha20Rng::seed_from_u64(SEED);
    for _ in 0..100 {
      assert_eq!(weighted_index(&[0.0, 0.0, 2.5], &mut rng).unwrap(), 2);
    }
  }

  #[test]
  fn frequencies_follow_weights() {
    let mut rng = ChaCha20Rng::seed_from_u64(SEED);
    let weights = [1usize, 2, 0, 7];
    let draws = 100_000;
    let mut counts = [0usize; 4];
    for _ in 0..draws {
      counts[weighted_index(&weights, &mut rng).unwrap()] += 1;
    }

    assert_eq!(counts[2], 0);
    let total = weights.iter().sum::<usize>() as f64;
    for (count, weight) in counts.iter().zip(weights) {
      let expected = weight as f64 / total;
      let observed = *count as f64 / draws as f64;
      assert!(
        (expected - observed).abs() < 0.01,
        "expected {expected}, observed {observed}"
      );
    }
  }

  #[test]
  fn choice_projects_through_the_table() {
    let mut rng = ChaCha20Rng::seed_from_u64(SEED);
    let weights = Weights::new(hashmap! {
      Tile::Grass => 0.0,
      Tile::Tree => 1.0,
    });

    for _ in 0..100 {
      assert_eq!(
        weighted_choice(&[Tile::Grass, Tile::Tree], &weights, &mut rng).unwrap(),
        Tile::Tree
      );
    }
  }

  #[test]
  fn choice_requires_every_item_weighted() {
    let mut rng = ChaCha20Rng::seed_from_u64(SEED);
    let weights = Weights::new(hashmap! { Tile::Grass => 1usize });

    assert!(matches!(
      weighted_choice(&[Tile::Grass, Tile::Water], &weights, &mut rng),
      Err(Error::MissingWeight { tile: Tile::Water })
    ));
  }
}
