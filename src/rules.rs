use crate::{Direction, Tile};
use derive_more::derive::{Deref, IntoIterator};
use derive_new::new;
use std::{
  collections::{BTreeSet, HashMap},
  iter::FromIterator,
};

/// A cell holding `on` permits `allowed` in its neighbor toward `direction`
#[derive(new, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bevy", derive(bevy_reflect::Reflect))]
pub struct Rule {
  pub on: Tile,
  pub direction: Direction,
  pub allowed: Tile,
}

impl Rule {
  /// The same adjacency seen from the other tile
  pub fn mirror(&self) -> Self {
    Self::new(self.allowed, self.direction.flip(), self.on)
  }

  pub fn adjacent_pair(on: Tile, allowed: Tile, direction: Direction) -> [Self; 2] {
    let rule = Self::new(on, direction, allowed);
    [rule, rule.mirror()]
  }

  /// `allowed` may sit on any side of `on`, mirrors are not added
  pub fn adjacent_any(on: Tile, allowed: Tile) -> [Self; 4] {
    [
      Direction::Up,
      Direction::Right,
      Direction::Down,
      Direction::Left,
    ]
    .map(|direction| Self::new(on, direction, allowed))
  }

  pub fn adjacent_any_of(on: Tile, alloweds: impl IntoIterator<Item = Tile>) -> Vec<Self> {
    alloweds
      .into_iter()
      .flat_map(|allowed| Self::adjacent_any(on, allowed))
      .collect()
  }

  fn matchable(&self) -> bool {
    !self.on.is_error() && !self.allowed.is_error()
  }
}

/// Concatenates rule families, duplicates are kept
#[derive(Default, Debug, Clone)]
pub struct RuleBuilder {
  rules: Vec<Rule>,
}

impl RuleBuilder {
  pub fn add_rules(&mut self, rules: impl IntoIterator<Item = Rule>) -> &mut Self {
    self.rules.extend(rules);
    self
  }

  pub fn with_rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
    self.add_rules(rules);
    self
  }

  pub fn next_to(self, on: Tile, allowed: Tile, direction: Direction) -> Self {
    self.with_rules(Rule::adjacent_pair(on, allowed, direction))
  }

  pub fn next_to_any(self, on: Tile, allowed: Tile) -> Self {
    self.with_rules(Rule::adjacent_any(on, allowed))
  }

  pub fn next_to_any_of(self, on: Tile, alloweds: impl IntoIterator<Item = Tile>) -> Self {
    self.with_rules(Rule::adjacent_any_of(on, alloweds))
  }

  pub fn build(self) -> Rules {
    self.into()
  }
}

/// Ordered sequence of rules
#[derive(Default, Debug, Clone, PartialEq, Eq, Deref, IntoIterator)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rules(#[into_iterator(owned, ref)] Vec<Rule>);

impl Rules {
  pub fn new(rules: impl Into<Vec<Rule>>) -> Self {
    Self(rules.into())
  }

  /// Appends the rule unless an equal one is present, returns whether it was added
  pub fn insert(&mut self, rule: Rule) -> bool {
    if self.0.contains(&rule) {
      return false;
    }
    self.0.push(rule);
    true
  }

  pub fn permits(&self, on: Tile, direction: Direction, allowed: Tile) -> bool {
    self.0.contains(&Rule::new(on, direction, allowed))
  }

  /// True when every rule's mirror is part of the set too
  pub fn is_symmetric(&self) -> bool {
    self.0.iter().all(|rule| self.0.contains(&rule.mirror()))
  }

  pub fn adjacency(&self) -> Adjacency {
    self.0.iter().collect()
  }
}

impl From<RuleBuilder> for Rules {
  fn from(builder: RuleBuilder) -> Self {
    Self(builder.rules)
  }
}

impl From<Vec<Rule>> for Rules {
  fn from(rules: Vec<Rule>) -> Self {
    Self(rules)
  }
}

impl FromIterator<Rule> for Rules {
  fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
    Self(Vec::from_iter(iter))
  }
}

impl Extend<Rule> for Rules {
  fn extend<I: IntoIterator<Item = Rule>>(&mut self, iter: I) {
    self.0.extend(iter);
  }
}

/// Rules indexed by the tile they apply to and the direction they point
#[derive(Default, PartialEq, Eq, Clone, Debug)]
pub struct Adjacency(HashMap<(Tile, Direction), BTreeSet<Tile>>);

impl Adjacency {
  pub fn allowed_by(&self, on: Tile, direction: Direction) -> Option<&BTreeSet<Tile>> {
    self.0.get(&(on, direction))
  }

  pub fn permits(&self, on: Tile, direction: Direction, allowed: Tile) -> bool {
    self
      .allowed_by(on, direction)
      .is_some_and(|alloweds| alloweds.contains(&allowed))
  }

  /// Every tile some candidate of `superposition` permits toward `direction`
  pub fn allowed_from(&self, superposition: &BTreeSet<Tile>, direction: Direction) -> BTreeSet<Tile> {
    superposition
      .iter()
      .filter_map(|on| self.allowed_by(*on, direction))
      .flatten()
      .copied()
      .collect()
  }
}

impl<'r> FromIterator<&'r Rule> for Adjacency {
  fn from_iter<I: IntoIterator<Item = &'r Rule>>(iter: I) -> Self {
    let mut table: HashMap<(Tile, Direction), BTreeSet<Tile>> = HashMap::new();
    for rule in iter.into_iter().filter(|rule| rule.matchable()) {
      table
        .entry((rule.on, rule.direction))
        .or_default()
        .insert(rule.allowed);
    }
    Self(table)
  }
}
