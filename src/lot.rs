use std::collections::HashMap;

use itertools::Itertools;
use smallvec::SmallVec;

use crate::{CarId, Coord, Cost, LotError, LotState, EMPTY};

/// Probe order for the empty slot's neighbors: up, down, left, right.
const DELTAS: &[(i32, i32)] = &[(-1, 0), (1, 0), (0, -1), (0, 1)];

/// One legal move: the arrangement it leads to, the car that slides and
/// what the slide costs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Move {
    pub state: LotState,
    pub car: CarId,
    pub cost: Cost,
}

/// An immutable puzzle instance.
///
/// Construction validates the start arrangement, synthesizes the canonical
/// goal (car ids ascending row-major, empty slot last), derives the
/// per-car cost table and caches the parity-based solvability verdict.
#[derive(Clone, Debug)]
pub struct ParkingLot {
    start: LotState,
    rows: usize,
    cols: usize,
    consider_cost: bool,
    goal: LotState,
    costs: HashMap<CarId, Cost>,
    solvable: bool,
}

impl ParkingLot {
    pub fn new(
        start: LotState,
        rows: usize,
        cols: usize,
        consider_cost: bool,
    ) -> Result<ParkingLot, LotError> {
        if rows < 2 || cols < 2 {
            return Err(LotError::GridTooSmall { rows, cols });
        }

        let entries = start.entries();
        let expected = rows * cols;
        if entries.len() != expected {
            return Err(LotError::WrongCarCount {
                rows,
                cols,
                expected,
                got: entries.len(),
            });
        }
        if let Some(pair) = entries.windows(2).find(|pair| pair[0].0 == pair[1].0) {
            return Err(LotError::DuplicateCar(pair[0].0));
        }
        if entries[0].0 != EMPTY {
            return Err(LotError::MissingEmptySlot);
        }
        if let Some(&(_, (r, c))) = entries.iter().find(|&&(_, (r, c))| r >= rows || c >= cols) {
            return Err(LotError::OutOfBounds(r, c));
        }
        // ids are distinct and every coordinate is in bounds, so distinct
        // coordinates make the mapping a bijection onto the grid
        let coords: Vec<Coord> = entries.iter().map(|&(_, pos)| pos).sorted().collect();
        if let Some(pair) = coords.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(LotError::DuplicateCoord(pair[0].0, pair[0].1));
        }

        let goal = goal_state(rows, cols, entries);
        let costs = cost_entries(entries, consider_cost).collect();
        let solvable = check_solvable(&start, rows, cols);

        Ok(ParkingLot {
            start,
            rows,
            cols,
            consider_cost,
            goal,
            costs,
            solvable,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn consider_cost(&self) -> bool {
        self.consider_cost
    }

    pub fn start_state(&self) -> &LotState {
        &self.start
    }

    /// The canonical goal arrangement for this lot's car set.
    pub fn goal_state(&self) -> &LotState {
        &self.goal
    }

    /// Per-move cost of `car`, if it belongs to this lot.
    pub fn cost_of(&self, car: CarId) -> Option<Cost> {
        self.costs.get(&car).copied()
    }

    /// Whether the goal is reachable from the start arrangement. Decided
    /// once at construction from inversion parity, without searching.
    pub fn is_solvable(&self) -> bool {
        self.solvable
    }

    pub fn is_goal(&self, state: &LotState) -> bool {
        *state == self.goal
    }

    /// Enumerate the arrangements reachable by sliding one car into the
    /// empty slot, probing up, down, left, right.
    ///
    /// `state` must use this lot's car set. The input is never mutated;
    /// corners yield 2 moves, edges 3, interior cells 4.
    pub fn legal_moves(&self, state: &LotState) -> SmallVec<[Move; 4]> {
        let (row, col) = state.empty_slot();
        let mut moves = SmallVec::new();

        for &(dr, dc) in DELTAS {
            let (r, c) = (row as i32 + dr, col as i32 + dc);
            if r < 0 || r >= self.rows as i32 || c < 0 || c >= self.cols as i32 {
                continue;
            }
            let target = (r as usize, c as usize);
            if let Some(ix) = state.entries().iter().position(|&(_, pos)| pos == target) {
                let car = state.entries()[ix].0;
                moves.push(Move {
                    state: state.swap_with_empty(ix),
                    car,
                    cost: self.costs[&car],
                });
            }
        }

        moves
    }

    /// Sum of Manhattan distances from every car to its goal cell.
    ///
    /// Both arrangements are id-sorted over the same car set, so their
    /// entries align pairwise.
    pub(crate) fn heuristic(&self, state: &LotState) -> Cost {
        state
            .entries()
            .iter()
            .zip_eq(self.goal.entries())
            .filter(|&(&(car, _), _)| car != EMPTY)
            .map(|(&(_, (r, c)), &(_, (gr, gc)))| (r.abs_diff(gr) + c.abs_diff(gc)) as Cost)
            .sum()
    }

    /// Text rendering of `state` laid out on this lot's grid.
    pub fn render(&self, state: &LotState) -> String {
        let mut grid = vec![EMPTY; self.rows * self.cols];
        for (car, (r, c)) in state.cars() {
            grid[r * self.cols + c] = car;
        }

        let mut out = String::new();
        for row in grid.chunks(self.cols) {
            let line = row
                .iter()
                .map(|&car| {
                    if car == EMPTY {
                        "  ".to_string()
                    } else {
                        format!("{:2}", car)
                    }
                })
                .join(" | ");
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}

/// Cars in ascending id order fill the lot row-major; the empty slot takes
/// the last cell. A pure function of the car set and the dimensions.
fn goal_state(rows: usize, cols: usize, sorted: &[(CarId, Coord)]) -> LotState {
    sorted[1..]
        .iter()
        .enumerate()
        .map(|(k, &(car, _))| (car, (k / cols, k % cols)))
        .chain(std::iter::once((EMPTY, (rows - 1, cols - 1))))
        .collect()
}

/// Per-move cost of each id: flat 1, or the id's 0-based rank in the
/// ascending order of the whole set (the empty slot occupies rank 0, so
/// the smallest car pays 1 per move).
#[auto_enums::auto_enum(Iterator)]
fn cost_entries(
    sorted: &[(CarId, Coord)],
    consider_cost: bool,
) -> impl Iterator<Item = (CarId, Cost)> + '_ {
    match consider_cost {
        true => sorted
            .iter()
            .enumerate()
            .map(|(rank, &(car, _))| (car, rank as Cost)),
        false => sorted.iter().map(|&(car, _)| (car, 1)),
    }
}

/// Parity test: flatten row-major, count inversions among the car ids
/// (empty slot omitted). Odd row count: solvable iff inversions are even;
/// even row count: solvable iff inversions plus the empty slot's row index
/// are odd.
fn check_solvable(state: &LotState, rows: usize, cols: usize) -> bool {
    let mut grid = vec![EMPTY; rows * cols];
    for (car, (r, c)) in state.cars() {
        grid[r * cols + c] = car;
    }
    let empty_row = state.empty_slot().0;

    let inversions = grid
        .iter()
        .filter(|&&car| car != EMPTY)
        .tuple_combinations::<(_, _)>()
        .filter(|(a, b)| a > b)
        .count();

    if rows % 2 == 1 {
        inversions % 2 == 0
    } else {
        (inversions + empty_row) % 2 == 1
    }
}
