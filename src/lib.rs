//! Solver for the "parking lot" sliding puzzle: an M×N lot holding uniquely
//! numbered cars and a single empty slot, where a move slides a car
//! orthogonally adjacent to the empty slot into it.
//!
//! [`LotState`] is one arrangement of cars, [`ParkingLot`] fixes the
//! dimensions and cost mode and derives the canonical goal, and
//! [`ParkingLot::solve`] searches for a cheapest move sequence.
//!
//! ```
//! use parking_solver::{LotState, ParkingLot};
//!
//! let start = LotState::from_grid(vec![vec![1, 4, 2], vec![7, 6, 3], vec![8, 0, 5]])?;
//! let lot = ParkingLot::new(start, 3, 3, false)?;
//! assert!(lot.is_solvable());
//!
//! let solution = lot.solve()?;
//! assert_eq!(solution.total_cost, solution.cars.len() as u64);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use thiserror::Error;

mod lot;
mod solver;

pub use lot::{Move, ParkingLot};
pub use solver::{Solution, SolveError};

/// Identifier of a car; arbitrary positive integers chosen by the puzzle's
/// creator.
pub type CarId = u32;

/// (row, column) position inside the lot.
pub type Coord = (usize, usize);

/// Accumulated or per-move cost.
pub type Cost = u64;

/// Reserved identifier for the empty slot.
pub const EMPTY: CarId = 0;

/// A malformed start arrangement, rejected at construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LotError {
    #[error("grid has no cells")]
    EmptyGrid,
    #[error("row {row} has {got} columns, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        got: usize,
    },
    #[error("lot must be at least 2x2, got {rows}x{cols}")]
    GridTooSmall { rows: usize, cols: usize },
    #[error("expected {expected} entries for a {rows}x{cols} lot, got {got}")]
    WrongCarCount {
        rows: usize,
        cols: usize,
        expected: usize,
        got: usize,
    },
    #[error("car {0} appears more than once")]
    DuplicateCar(CarId),
    #[error("exactly one entry must use the empty-slot id 0")]
    MissingEmptySlot,
    #[error("coordinate ({0}, {1}) lies outside the lot")]
    OutOfBounds(usize, usize),
    #[error("two cars share coordinate ({0}, {1})")]
    DuplicateCoord(usize, usize),
}

/// One complete assignment of cars (and the empty slot) to coordinates.
///
/// Entries are kept sorted by car id, so the derived equality and hash are
/// canonical regardless of the order the state was built in, and the empty
/// slot is always the first entry of a valid state.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct LotState {
    cars: Vec<(CarId, Coord)>,
}

impl LotState {
    /// Convert a row-major grid of car ids into a state, with `0` marking
    /// the empty slot.
    pub fn from_grid(grid: Vec<Vec<CarId>>) -> Result<LotState, LotError> {
        let cols = grid.first().map_or(0, |row| row.len());
        if cols == 0 {
            return Err(LotError::EmptyGrid);
        }
        for (row, cells) in grid.iter().enumerate() {
            if cells.len() != cols {
                return Err(LotError::RaggedRows {
                    row,
                    expected: cols,
                    got: cells.len(),
                });
            }
        }

        let state: LotState = grid
            .iter()
            .enumerate()
            .flat_map(|(i, row)| row.iter().enumerate().map(move |(j, &car)| (car, (i, j))))
            .collect();

        if let Some(pair) = state.cars.windows(2).find(|pair| pair[0].0 == pair[1].0) {
            return Err(LotError::DuplicateCar(pair[0].0));
        }

        Ok(state)
    }

    /// The car occupying `coord`, if any entry claims it.
    pub fn car_at(&self, coord: Coord) -> Option<CarId> {
        self.cars
            .iter()
            .find(|&&(_, pos)| pos == coord)
            .map(|&(car, _)| car)
    }

    /// Where `car` currently sits.
    pub fn coord_of(&self, car: CarId) -> Option<Coord> {
        self.cars
            .binary_search_by_key(&car, |&(c, _)| c)
            .ok()
            .map(|ix| self.cars[ix].1)
    }

    /// All entries in ascending id order, the empty slot first.
    pub fn cars(&self) -> impl Iterator<Item = (CarId, Coord)> + '_ {
        self.cars.iter().copied()
    }

    pub(crate) fn entries(&self) -> &[(CarId, Coord)] {
        &self.cars
    }

    /// Coordinate of the empty slot. Valid states keep id 0 first.
    pub(crate) fn empty_slot(&self) -> Coord {
        debug_assert_eq!(self.cars[0].0, EMPTY);
        self.cars[0].1
    }

    /// Successor where the entry at `ix` and the empty slot have swapped
    /// coordinates; everything else is untouched.
    pub(crate) fn swap_with_empty(&self, ix: usize) -> LotState {
        let mut cars = self.cars.clone();
        let slot = cars[0].1;
        cars[0].1 = cars[ix].1;
        cars[ix].1 = slot;
        LotState { cars }
    }
}

impl FromIterator<(CarId, Coord)> for LotState {
    fn from_iter<T: IntoIterator<Item = (CarId, Coord)>>(iter: T) -> Self {
        let mut cars: Vec<_> = iter.into_iter().collect();
        cars.sort_unstable_by_key(|&(car, _)| car);
        LotState { cars }
    }
}
