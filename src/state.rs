use crate::{
  CellIndex, Direction, Observation, Tile, Weight, Weights,
  cells::{Cell, Cells},
  err::Error,
  rules::{Adjacency, Rules},
  util::{IPos, Size},
  weights,
};
use derive_more::derive::{Deref, DerefMut};
use rand::{Rng, RngCore, SeedableRng, seq::IteratorRandom};
use rand_chacha::ChaCha20Rng;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

/// Attempt cap for callers without a better idea
pub const DEFAULT_MAX_ATTEMPTS: usize = 100;

pub struct SolverBuilder<W: Weight = usize> {
  size: Size,
  rules: Rules,
  weights: Weights<W>,
  seed: Option<u64>,
}

impl<W: Weight> SolverBuilder<W> {
  pub fn new(
    size: impl Into<Size>,
    rules: impl Into<Rules>,
    weights: impl Into<Weights<W>>,
  ) -> Self {
    Self {
      size: size.into(),
      rules: rules.into(),
      weights: weights.into(),
      seed: None,
    }
  }

  pub fn with_seed(mut self, seed: u64) -> Self {
    self.seed = Some(seed);
    self
  }

  pub fn size(&self) -> &Size {
    &self.size
  }

  /// Builds a solver drawing from a `ChaCha20Rng`, seeded randomly unless a seed was given
  pub fn build(self) -> Result<Solver<W>, Error> {
    let seed = self.seed.unwrap_or_else(|| rand::rng().next_u64());
    let mut solver = self.build_with_rng(ChaCha20Rng::seed_from_u64(seed))?;
    solver.seed = Some(seed);
    Ok(solver)
  }

  pub fn build_with_rng<R: Rng>(self, rng: R) -> Result<Solver<W, R>, Error> {
    if self.size.is_empty() {
      return Err(Error::InvalidSize {
        width: self.size.width(),
        height: self.size.height(),
      });
    }

    Ok(Solver::new(self.size, self.rules, self.weights, rng))
  }
}

impl<W: Weight> Clone for SolverBuilder<W> {
  fn clone(&self) -> Self {
    Self {
      size: self.size,
      rules: self.rules.clone(),
      weights: self.weights.clone(),
      seed: self.seed,
    }
  }
}

/// Collapses a grid of superpositions into tiles satisfying a rule set
#[derive(Debug)]
pub struct Solver<W: Weight = usize, R: Rng = ChaCha20Rng> {
  cells: Cells,
  rules: Rules,
  adjacency: Adjacency,
  weights: Weights<W>,
  rng: R,
  seed: Option<u64>,
  allowed_cache: AllowedCache,
  attempts: usize,
}

impl<W: Weight, R: Rng> Solver<W, R> {
  fn new(size: Size, rules: Rules, weights: Weights<W>, rng: R) -> Self {
    Self {
      cells: Cells::new(size),
      adjacency: rules.adjacency(),
      rules,
      weights,
      rng,
      seed: None,
      allowed_cache: Default::default(),
      attempts: 0,
    }
  }

  /// Runs whole-grid attempts until one collapses fully, restarting after every contradiction
  ///
  /// Returns `None` once `max_attempts` attempts have failed. Errors other than
  /// contradictions are returned immediately.
  #[profiling::function]
  pub fn try_collapse(&mut self, max_attempts: usize) -> Result<Option<&Cells>, Error> {
    for attempt in 1..=max_attempts {
      self.attempts += 1;

      match self.collapse_grid() {
        Ok(()) => {
          tracing::debug!(attempt, "grid collapsed");
          return Ok(Some(&self.cells));
        }
        Err(err) if err.is_contradiction() => {
          tracing::debug!(attempt, %err, "restarting after contradiction");
          self.reset();
        }
        Err(err) => return Err(err),
      }
    }

    tracing::warn!(max_attempts, "no attempt produced a collapsed grid");
    Ok(None)
  }

  /// Observes and collapses a single cell, then propagates the outcome
  ///
  /// A contradiction leaves the grid unusable. Unlike [`Self::try_collapse`]
  /// nothing recovers from it here, call [`Self::reset`] before stepping again.
  #[profiling::function]
  pub fn step(&mut self) -> Result<Observation, Error> {
    if self.is_collapsed() {
      return Ok(Observation::Complete);
    }

    let Some(index) = self.select() else {
      // should be unreachable
      return Ok(Observation::Complete);
    };

    self.collapse(index)?;

    let working = self
      .cells
      .at(index)
      .neighbors
      .iter()
      .map(|(neighbor, _)| *neighbor)
      .collect();
    self.propagate(working, index)?;

    if self.is_collapsed() {
      Ok(Observation::Complete)
    } else {
      Ok(Observation::Incomplete(index))
    }
  }

  pub fn is_collapsed(&self) -> bool {
    self.cells.is_collapsed()
  }

  /// Discards the grid in favor of a fully uncollapsed one
  pub fn reset(&mut self) {
    self.cells = Cells::new(self.cells.size);
  }

  /// The in-bounds cardinal neighbors of `pos`, ordered up, down, left, right
  pub fn neighbors(&self, pos: impl Into<IPos>) -> Result<Vec<&Cell>, Error> {
    self.cells.neighbors_of(&pos.into())
  }

  /// Narrows a cell down to what all of its neighbors permit
  ///
  /// Returns the cell's neighbors when its superposition shrank, nothing otherwise.
  /// On contradiction the cell is left holding only [`Tile::Error`].
  #[profiling::function]
  pub fn restrict(&mut self, index: CellIndex) -> Result<Vec<CellIndex>, Error> {
    let cell = self.cells.at(index);
    if cell.collapsed() {
      return Ok(Vec::new());
    }

    let previous_entropy = cell.entropy();
    let mut superposition = cell.superposition.clone();

    for (neighbor_index, dir) in cell.neighbors.iter().copied() {
      let neighbor = self.cells.at(neighbor_index);
      let permitted = self.allowed_cache.lookup(
        &self.adjacency,
        &neighbor.superposition,
        dir.flip(),
      );

      superposition.retain(|tile| permitted.contains(tile));

      if superposition.is_empty() {
        let err = Error::Contradiction {
          position: cell.position,
          neighbor: neighbor.position,
          direction: dir,
          permitted: permitted.iter().copied().collect(),
        };
        self.cells.replace(index, BTreeSet::from([Tile::Error]));
        return Err(err);
      }
    }

    let new_entropy = superposition.len();
    let shrunk = new_entropy < previous_entropy;
    let neighbors: Vec<CellIndex> = shrunk
      .then(|| cell.neighbors.iter().map(|(n, _)| *n).collect())
      .unwrap_or_default();

    self.cells.replace(index, superposition);

    Ok(neighbors)
  }

  pub fn cells(&self) -> &Cells {
    &self.cells
  }

  pub fn data(&self) -> Vec<Option<Tile>> {
    self.cells.tiles()
  }

  pub fn size(&self) -> &Size {
    &self.cells.size
  }

  pub fn rules(&self) -> &Rules {
    &self.rules
  }

  pub fn weights(&self) -> &Weights<W> {
    &self.weights
  }

  /// The seed the solver's generator started from, unknown for injected generators
  pub fn seed(&self) -> Option<u64> {
    self.seed
  }

  /// Whole-grid attempts made by [`Self::try_collapse`] over the solver's lifetime
  pub fn attempts(&self) -> usize {
    self.attempts
  }

  fn collapse_grid(&mut self) -> Result<(), Error> {
    while !self.step()?.complete() {}
    self.verify()
  }

  /// Uniformly picks one of the uncollapsed cells with the fewest candidates
  fn select(&mut self) -> Option<CellIndex> {
    self
      .cells
      .lowest_entropy_indexes()?
      .iter()
      .choose(&mut self.rng)
      .copied()
  }

  #[profiling::function]
  fn collapse(&mut self, index: CellIndex) -> Result<Tile, Error> {
    let candidates = self
      .cells
      .at(index)
      .superposition
      .iter()
      .copied()
      .collect::<Vec<_>>();

    // tiles missing from the table are ineligible rather than an error
    let projected = candidates
      .iter()
      .map(|tile| self.weights.weight_of(tile).unwrap_or_default())
      .collect::<Vec<W>>();

    let tile = candidates[weights::weighted_index(&projected, &mut self.rng)?];
    self.cells.replace(index, BTreeSet::from([tile]));

    Ok(tile)
  }

  /// Breadth first pass restricting cells until no superposition shrinks any further
  #[profiling::function]
  fn propagate(&mut self, working: Vec<CellIndex>, visited: CellIndex) -> Result<(), Error> {
    let mut seen = HashSet::with_capacity(working.len() + 1);
    seen.insert(visited);
    seen.extend(working.iter().copied());

    let mut queue = VecDeque::from(working);

    while let Some(index) = queue.pop_front() {
      for neighbor in self.restrict(index)? {
        if seen.insert(neighbor) {
          queue.push_back(neighbor);
        }
      }
    }

    Ok(())
  }

  /// Checks every adjacent pair of a collapsed grid against the rules
  fn verify(&self) -> Result<(), Error> {
    for cell in &self.cells.list {
      let Some(tile) = cell.tile() else {
        continue;
      };

      for (neighbor_index, direction) in cell.neighbors.iter().copied() {
        let Some(neighbor_tile) = self.cells.at(neighbor_index).tile() else {
          continue;
        };

        if !self.adjacency.permits(tile, direction, neighbor_tile) {
          return Err(Error::Unsatisfied {
            position: cell.position,
            tile,
            direction,
            neighbor_tile,
          });
        }
      }
    }

    Ok(())
  }
}

type InnerAllowedCache = HashMap<(BTreeSet<Tile>, Direction), BTreeSet<Tile>>;

/// Memoizes which tiles a superposition permits toward a direction
#[derive(Default, Debug, Deref, DerefMut)]
struct AllowedCache(InnerAllowedCache);

impl AllowedCache {
  fn lookup(
    &mut self,
    adjacency: &Adjacency,
    superposition: &BTreeSet<Tile>,
    direction: Direction,
  ) -> &BTreeSet<Tile> {
    self
      .entry((superposition.clone(), direction))
      .or_insert_with(|| adjacency.allowed_from(superposition, direction))
  }
}
