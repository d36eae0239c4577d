//! Ready made rule sets

use crate::{Direction, RuleBuilder, Rules, Tile, Weights};

/// Grass dotted with trees, bordering lakes through directional shore tiles
pub fn forest_beach_rules() -> Rules {
  use Direction::*;
  use Tile::*;

  RuleBuilder::default()
    .next_to_any_of(Grass, [Grass, Tree, ShoreIn])
    .next_to_any(Tree, Grass)
    .next_to_any(ShoreIn, Grass)
    .next_to_any(ShoreIn, ShoreIn)
    .next_to(ShoreIn, ShoreLeft, Right)
    .next_to(ShoreIn, ShoreLeft, Up)
    .next_to(ShoreIn, ShoreLeft, Down)
    .next_to(ShoreIn, ShoreRight, Left)
    .next_to(ShoreIn, ShoreRight, Up)
    .next_to(ShoreIn, ShoreRight, Down)
    .next_to(ShoreIn, ShoreAbove, Down)
    .next_to(ShoreIn, ShoreAbove, Left)
    .next_to(ShoreIn, ShoreAbove, Right)
    .next_to(ShoreIn, ShoreBelow, Up)
    .next_to(ShoreIn, ShoreBelow, Left)
    .next_to(ShoreIn, ShoreBelow, Right)
    .next_to_any(Water, Water)
    .next_to(ShoreLeft, Water, Right)
    .next_to(ShoreRight, Water, Left)
    .next_to(ShoreAbove, Water, Down)
    .next_to(ShoreAbove, Water, Left)
    .next_to(ShoreAbove, Water, Right)
    .next_to(ShoreBelow, Water, Up)
    .next_to(ShoreBelow, Water, Left)
    .next_to(ShoreBelow, Water, Right)
    .next_to(ShoreBelow, ShoreBelow, Left)
    .next_to(ShoreAbove, ShoreAbove, Left)
    .next_to(ShoreLeft, ShoreLeft, Up)
    .next_to(ShoreRight, ShoreRight, Up)
    .build()
}

pub fn forest_beach_weights() -> Weights {
  Weights::from_iter([
    (Tile::Grass, 200),
    (Tile::Tree, 50),
    (Tile::Water, 200),
    (Tile::ShoreIn, 50),
    (Tile::ShoreLeft, 20),
    (Tile::ShoreRight, 10),
    (Tile::ShoreAbove, 10),
    (Tile::ShoreBelow, 10),
  ])
}
