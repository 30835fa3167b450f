//! Maze generation as a step-at-a-time state machine.
//!
//! The recursive backtracker is a randomized depth first search: starting from one cell it keeps
//! carving a passage into a uniformly chosen unvisited neighbour of the cell on top of its
//! frontier stack, backtracking (popping the stack) whenever the top cell is boxed in. Picking
//! uniformly among the candidates, without any heuristic, is what gives these mazes their long
//! winding corridors and low branching factor. The result is always a perfect maze: the passages
//! form a spanning tree over every cell.
//!
//! `RecursiveBacktracker::step` performs exactly one carve or one backtrack so a driver can render
//! every intermediate state. It never sleeps or looks at a clock.

use error_chain::bail;
use log::{debug, error, trace};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;

use crate::cells::{Cartesian2DCoordinate, CellFlags, CompassPrimary};
use crate::errors::{ErrorKind, Result};
use crate::grid::Grid;
use crate::units::{CellsCount, Height, Width};

/// The default, seedable random source of the generators.
pub type MazeRng = XorShiftRng;

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum GenerationState {
    /// Seeded, no step taken yet.
    Initialized,
    Generating,
    Complete,
    /// The frontier emptied before every cell was visited. Fatal.
    InvariantViolated,
}

/// What a single call to `step` did.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum StepOutcome {
    Carved {
        from: Cartesian2DCoordinate,
        to: Cartesian2DCoordinate,
        direction: CompassPrimary,
    },
    Backtracked {
        from: Cartesian2DCoordinate,
        to: Option<Cartesian2DCoordinate>,
    },
    /// Every cell was already visited, nothing changed.
    Complete,
}

pub struct RecursiveBacktracker<R: Rng = MazeRng> {
    grid: Grid,
    frontier: Vec<Cartesian2DCoordinate>,
    visited: usize,
    total: usize,
    steps: usize,
    invariant_violated: bool,
    rng: R,
}

impl RecursiveBacktracker<MazeRng> {
    /// A generator whose random source is seeded from `seed`; equal seeds give equal mazes.
    pub fn seeded(width: Width,
                  height: Height,
                  seed_cell: Option<Cartesian2DCoordinate>,
                  seed: u64)
                  -> Result<RecursiveBacktracker<MazeRng>> {
        RecursiveBacktracker::new(width, height, seed_cell, MazeRng::seed_from_u64(seed))
    }

    pub fn from_entropy(width: Width,
                        height: Height,
                        seed_cell: Option<Cartesian2DCoordinate>)
                        -> Result<RecursiveBacktracker<MazeRng>> {
        RecursiveBacktracker::new(width, height, seed_cell, MazeRng::from_entropy())
    }
}

impl<R: Rng> RecursiveBacktracker<R> {
    /// Allocate a `width` * `height` grid with all walls standing and seed the frontier.
    ///
    /// The start cell is `seed_cell` when given, otherwise a uniformly random cell drawn from `rng`.
    pub fn new(width: Width,
               height: Height,
               seed_cell: Option<Cartesian2DCoordinate>,
               rng: R)
               -> Result<RecursiveBacktracker<R>> {
        let grid = Grid::new(width, height)?;
        let CellsCount(total) = grid.size();
        let mut generator = RecursiveBacktracker {
            grid,
            frontier: Vec::new(),
            visited: 0,
            total,
            steps: 0,
            invariant_violated: false,
            rng,
        };
        generator.seed(seed_cell)?;
        Ok(generator)
    }

    /// Throw away the current maze and start again with the same dimensions.
    ///
    /// The random source carries on from where it was, so a reset generator produces a different
    /// maze unless a fixed seed cell and a fresh generator are used.
    pub fn reset(&mut self, seed_cell: Option<Cartesian2DCoordinate>) -> Result<()> {
        let (width, height) = (self.grid.width(), self.grid.height());
        if let Some(coord) = seed_cell {
            if !self.grid.is_valid_coordinate(coord) {
                bail!(ErrorKind::InvalidGridCoordinate(coord.x, coord.y));
            }
        }
        self.grid = Grid::new(width, height)?;
        self.frontier = Vec::new();
        self.visited = 0;
        self.steps = 0;
        self.invariant_violated = false;
        self.seed(seed_cell)
    }

    fn seed(&mut self, seed_cell: Option<Cartesian2DCoordinate>) -> Result<()> {
        let start = match seed_cell {
            Some(coord) => coord,
            None => self.random_cell(),
        };
        self.grid.mark_visited(start)?;
        self.frontier.push(start);
        self.visited = 1;

        let Width(w) = self.grid.width();
        let Height(h) = self.grid.height();
        debug!("Recursive backtracker seeded at {} on a {}x{} grid", start, w, h);
        Ok(())
    }

    fn random_cell(&mut self) -> Cartesian2DCoordinate {
        let index = self.rng.gen_range(0..self.total);
        Cartesian2DCoordinate::from_row_major_index(index, self.grid.width())
    }

    /// Advance the generation by one carve or one backtrack.
    ///
    /// Once every cell is visited this is a no-op returning `StepOutcome::Complete`.
    /// An empty frontier before that point is an internal bookkeeping failure: the run is aborted
    /// and every later call reports `ErrorKind::FrontierExhausted` as well.
    pub fn step(&mut self) -> Result<StepOutcome> {
        if self.invariant_violated {
            bail!(ErrorKind::FrontierExhausted(self.visited, self.total));
        }
        if self.is_complete() {
            return Ok(StepOutcome::Complete);
        }

        let current = match self.frontier.last() {
            Some(&coord) => coord,
            None => return self.abort(),
        };

        let candidates = self.grid.unvisited_neighbours(current);
        let chosen = candidates.choose(&mut self.rng).cloned();

        self.steps += 1;
        match chosen {
            Some((direction, _)) => {
                let next = self.grid.carve(current, direction)?;
                self.grid.mark_visited(next)?;
                self.frontier.push(next);
                self.visited += 1;
                trace!("Carved {:?} from {} to {}", direction, current, next);

                if self.is_complete() {
                    debug!("Maze complete after {} steps", self.steps);
                }
                Ok(StepOutcome::Carved {
                    from: current,
                    to: next,
                    direction,
                })
            }
            None => {
                self.frontier.pop();
                let top = self.frontier.last().cloned();
                trace!("Backtracked from {} to {:?}", current, top);
                if top.is_none() {
                    return self.abort();
                }
                Ok(StepOutcome::Backtracked {
                    from: current,
                    to: top,
                })
            }
        }
    }

    fn abort(&mut self) -> Result<StepOutcome> {
        self.invariant_violated = true;
        error!("Frontier emptied with {} of {} cells visited", self.visited, self.total);
        bail!(ErrorKind::FrontierExhausted(self.visited, self.total))
    }

    /// Step until every cell is visited. Returns the number of steps this call took.
    pub fn run_to_completion(&mut self) -> Result<usize> {
        let mut steps = 0;
        while !self.is_complete() {
            self.step()?;
            steps += 1;
        }
        Ok(steps)
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.visited >= self.total
    }

    pub fn state(&self) -> GenerationState {
        if self.invariant_violated {
            GenerationState::InvariantViolated
        } else if self.is_complete() {
            GenerationState::Complete
        } else if self.steps == 0 {
            GenerationState::Initialized
        } else {
            GenerationState::Generating
        }
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            grid: &self.grid,
            active_cell: self.frontier.last().cloned(),
            visited: self.visited,
            frontier_len: self.frontier.len(),
            state: self.state(),
        }
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn visited_count(&self) -> usize {
        self.visited
    }

    #[inline]
    pub fn total_cells(&self) -> CellsCount {
        CellsCount(self.total)
    }

    #[inline]
    pub fn steps_taken(&self) -> usize {
        self.steps
    }

    #[inline]
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Keep the maze, drop the generation bookkeeping.
    pub fn into_grid(self) -> Grid {
        self.grid
    }
}

/// Read-only view of a generator between steps, for renderers.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    grid: &'a Grid,
    active_cell: Option<Cartesian2DCoordinate>,
    visited: usize,
    frontier_len: usize,
    state: GenerationState,
}

impl<'a> Snapshot<'a> {
    /// A snapshot of a finished grid that is not attached to a generator.
    pub fn of_grid(grid: &'a Grid, active_cell: Option<Cartesian2DCoordinate>) -> Snapshot<'a> {
        let visited = grid.visited_count();
        let CellsCount(total) = grid.size();
        Snapshot {
            grid,
            active_cell,
            visited,
            frontier_len: active_cell.map_or(0, |_| 1),
            state: if visited >= total {
                GenerationState::Complete
            } else {
                GenerationState::Generating
            },
        }
    }

    #[inline]
    pub fn grid(&self) -> &'a Grid {
        self.grid
    }

    #[inline]
    pub fn cell(&self, coord: Cartesian2DCoordinate) -> Option<CellFlags> {
        self.grid.cell(coord)
    }

    /// The top of the frontier stack: the cell the maze is currently growing from.
    #[inline]
    pub fn active_cell(&self) -> Option<Cartesian2DCoordinate> {
        self.active_cell
    }

    #[inline]
    pub fn visited_count(&self) -> usize {
        self.visited
    }

    #[inline]
    pub fn frontier_len(&self) -> usize {
        self.frontier_len
    }

    #[inline]
    pub fn state(&self) -> GenerationState {
        self.state
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.state == GenerationState::Complete
    }

    /// Copy the grid out, e.g. to hand it to a renderer running elsewhere.
    pub fn to_grid(&self) -> Grid {
        self.grid.clone()
    }
}
