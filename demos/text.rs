use std::error::Error;
use wfc_tiles::prelude::*;

const STEP_BY_STEP: bool = false;

const ROWS: usize = 16;
const COLS: usize = 32;

fn main() -> Result<(), Box<dyn Error>> {
  #[cfg(feature = "profiling")]
  let _guards = wfc_tiles::perf::enable_profiling()?;

  let source = "
    ................
    ..~~~~~.....T...
    ..~~~~~.........
    ..~~~~~...T.....
    ........s.......
    ...T............
  ";

  let sample = match source.parse::<Sample>() {
    Ok(sample) => sample,
    Err(e) => {
      eprintln!("{e}");
      return Ok(());
    }
  };

  let args = std::env::args().collect::<Vec<_>>();

  let seed: Option<u64> = args.get(1).map(|arg| arg.parse()).transpose()?;

  println!("Inferred from sample:");
  run(infer_rules(&sample), infer_weights(&sample), seed)?;

  println!("\nForest beach:");
  run(prebuilt::forest_beach_rules(), prebuilt::forest_beach_weights(), seed)?;

  Ok(())
}

fn run(rules: Rules, weights: Weights, seed: Option<u64>) -> Result<(), Box<dyn Error>> {
  let mut builder = SolverBuilder::new([COLS, ROWS], rules, weights);
  if let Some(seed) = seed {
    builder = builder.with_seed(seed);
  }

  let solver = builder.build()?;
  if let Some(seed) = solver.seed() {
    println!("Seed: {seed}");
  }

  if STEP_BY_STEP {
    step_by_step(solver);
  } else {
    all_at_once(solver);
  }

  Ok(())
}

fn all_at_once(mut solver: Solver) {
  match solver.try_collapse(DEFAULT_MAX_ATTEMPTS) {
    Ok(Some(cells)) => println!("{cells}"),
    Ok(None) => eprintln!("no solution after {} attempts", solver.attempts()),
    Err(e) if e.is_invalid_input() => eprintln!("invalid input: {e}"),
    Err(e) => eprintln!("{e}"),
  }
}

fn step_by_step(mut solver: Solver) {
  loop {
    match solver.step() {
      Ok(observation @ Observation::Incomplete(_)) => {
        if let Some(index) = observation.last_observation() {
          let pos = solver.cells().at(index).position;
          println!("\ncollapsed ({}, {})", pos.x, pos.y);
        }
        println!("{}", solver.cells());
      }
      Ok(Observation::Complete) => {
        println!("\n{}", solver.cells());
        break;
      }
      Err(e) if e.is_contradiction() => {
        eprintln!("{e}, starting over");
        solver.reset();
      }
      Err(e) => {
        eprintln!("{e}");
        break;
      }
    }
  }
}
