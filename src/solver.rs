use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use log::debug;
use thiserror::Error;

use crate::{CarId, Cost, LotState, ParkingLot};

/// Why [`ParkingLot::solve`] produced no move sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The start arrangement fails the parity test; the goal is
    /// unreachable and searching would only exhaust its component.
    #[error("the start arrangement cannot reach the goal")]
    Unsolvable,
    /// The frontier emptied before the goal was dequeued. Cannot happen
    /// for a solvable instance; indicates broken successor generation or
    /// state fingerprinting.
    #[error("search frontier exhausted without reaching the goal")]
    SearchExhausted,
}

/// A cheapest move sequence from the start arrangement to the goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// Sum of the per-move costs along `cars`.
    pub total_cost: Cost,
    /// Every arrangement after the start, one per move.
    pub states: Vec<LotState>,
    /// The car slid at each step.
    pub cars: Vec<CarId>,
}

struct Node {
    f: Cost,
    seq: u64,
    g: Cost,
    state: LotState,
    states: Vec<LotState>,
    cars: Vec<CarId>,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.seq == other.seq
    }
}

impl Eq for Node {}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Inverted so `BinaryHeap` pops the lowest f; `seq` keeps equal-f entries
/// in insertion order, making repeated runs pick identical paths.
impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        other.f.cmp(&self.f).then_with(|| other.seq.cmp(&self.seq))
    }
}

impl ParkingLot {
    /// Best-first search for a cheapest move sequence from the start
    /// arrangement to the goal.
    ///
    /// Refuses to search when the parity test already ruled the goal
    /// unreachable. An already-solved start returns cost 0 and empty
    /// paths.
    pub fn solve(&self) -> Result<Solution, SolveError> {
        if !self.is_solvable() {
            return Err(SolveError::Unsolvable);
        }
        a_star(self).ok_or(SolveError::SearchExhausted)
    }
}

fn a_star(lot: &ParkingLot) -> Option<Solution> {
    let mut frontier = BinaryHeap::new();
    let mut visited = HashSet::new();
    let mut seq = 0;
    let mut expanded = 0u64;
    let mut generated = 0u64;

    visited.insert(lot.start_state().clone());
    frontier.push(Node {
        f: 0,
        seq,
        g: 0,
        state: lot.start_state().clone(),
        states: Vec::new(),
        cars: Vec::new(),
    });

    while let Some(node) = frontier.pop() {
        if lot.is_goal(&node.state) {
            debug!(
                "goal dequeued at cost {} after expanding {} states ({} generated)",
                node.g, expanded, generated
            );
            return Some(Solution {
                total_cost: node.g,
                states: node.states,
                cars: node.cars,
            });
        }

        expanded += 1;
        for mv in lot.legal_moves(&node.state) {
            generated += 1;
            // membership is decided at push time; later, cheaper routes to
            // an already-queued arrangement are dropped
            if !visited.insert(mv.state.clone()) {
                continue;
            }

            let next_g = node.g + mv.cost;
            // the estimate is weighted by the cost of the arriving move,
            // so f depends on how an arrangement was entered, not only on
            // the arrangement itself
            let next_h = mv.cost * lot.heuristic(&mv.state);

            let mut states = node.states.clone();
            states.push(mv.state.clone());
            let mut cars = node.cars.clone();
            cars.push(mv.car);

            seq += 1;
            frontier.push(Node {
                f: next_g + next_h,
                seq,
                g: next_g,
                state: mv.state,
                states,
                cars,
            });
        }
    }

    debug!("frontier exhausted after expanding {} states", expanded);
    None
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    use crate::{LotError, EMPTY};

    use super::*;

    fn lot_from_grid(grid: Vec<Vec<CarId>>, consider_cost: bool) -> ParkingLot {
        let rows = grid.len();
        let cols = grid[0].len();
        let start = LotState::from_grid(grid).unwrap();
        ParkingLot::new(start, rows, cols, consider_cost).unwrap()
    }

    /// Replays the solution move by move, checking that each step swaps
    /// the named car with the empty slot across one grid edge and leaves
    /// every other car in place, and that the replay ends at the goal.
    fn assert_path_is_legal(lot: &ParkingLot, solution: &Solution) {
        assert_eq!(solution.states.len(), solution.cars.len());

        let mut current = lot.start_state().clone();
        for (state, &car) in solution.states.iter().zip(&solution.cars) {
            let from = current.coord_of(car).unwrap();
            let to = state.coord_of(car).unwrap();

            assert_eq!(current.coord_of(EMPTY).unwrap(), to);
            assert_eq!(state.coord_of(EMPTY).unwrap(), from);
            assert_eq!(from.0.abs_diff(to.0) + from.1.abs_diff(to.1), 1);

            for (other, pos) in current.cars() {
                if other != car && other != EMPTY {
                    assert_eq!(state.coord_of(other), Some(pos));
                }
            }
            current = state.clone();
        }
        assert!(lot.is_goal(&current));
    }

    #[test]
    fn solved_start_returns_empty_paths() {
        let lot = lot_from_grid(vec![vec![1, 2], vec![3, 0]], false);
        assert!(lot.is_goal(lot.start_state()));

        let solution = lot.solve().unwrap();
        assert_eq!(solution.total_cost, 0);
        assert!(solution.states.is_empty());
        assert!(solution.cars.is_empty());
    }

    #[test]
    fn unsolvable_lot_is_refused_without_searching() {
        let lot = lot_from_grid(vec![vec![2, 1, 3], vec![4, 5, 6], vec![7, 8, 0]], false);
        assert_eq!(lot.solve().unwrap_err(), SolveError::Unsolvable);
    }

    #[test]
    fn flat_solution_cost_counts_moves() {
        let lot = lot_from_grid(vec![vec![1, 4, 2], vec![7, 6, 3], vec![8, 0, 5]], false);
        let solution = lot.solve().unwrap();

        assert_eq!(solution.total_cost, solution.cars.len() as Cost);
        assert_path_is_legal(&lot, &solution);
    }

    #[test]
    fn ranked_solution_cost_sums_per_move_costs() {
        let lot = lot_from_grid(vec![vec![1, 4, 2], vec![7, 6, 3], vec![8, 0, 5]], true);
        let solution = lot.solve().unwrap();

        let summed: Cost = solution
            .cars
            .iter()
            .map(|&car| lot.cost_of(car).unwrap())
            .sum();
        assert_eq!(solution.total_cost, summed);
        assert_path_is_legal(&lot, &solution);
    }

    #[test]
    fn cost_modes_pick_different_paths() {
        let flat = lot_from_grid(vec![vec![1, 4, 2], vec![7, 6, 3], vec![8, 0, 5]], false);
        let ranked = lot_from_grid(vec![vec![1, 4, 2], vec![7, 6, 3], vec![8, 0, 5]], true);

        assert_ne!(flat.solve().unwrap().cars, ranked.solve().unwrap().cars);
    }

    #[test]
    fn repeated_solves_pick_the_same_path() {
        let lot = lot_from_grid(vec![vec![1, 4, 2], vec![7, 6, 3], vec![8, 0, 5]], false);
        let first = lot.solve().unwrap();
        let second = lot.solve().unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn random_instances_solve_consistently() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut flat: Vec<CarId> = (0..9).collect();
        let mut solved = 0;

        while solved < 8 {
            flat.shuffle(&mut rng);
            let start: LotState = flat
                .iter()
                .enumerate()
                .map(|(ix, &car)| (car, (ix / 3, ix % 3)))
                .collect();

            let lot = ParkingLot::new(start.clone(), 3, 3, false).unwrap();
            if !lot.is_solvable() {
                continue;
            }

            let solution = lot.solve().unwrap();
            assert_eq!(solution.total_cost, solution.cars.len() as Cost);
            assert_path_is_legal(&lot, &solution);

            let ranked = ParkingLot::new(start, 3, 3, true).unwrap();
            let solution = ranked.solve().unwrap();
            let summed: Cost = solution
                .cars
                .iter()
                .map(|&car| ranked.cost_of(car).unwrap())
                .sum();
            assert_eq!(solution.total_cost, summed);
            assert_path_is_legal(&ranked, &solution);

            solved += 1;
        }
    }

    #[test]
    fn malformed_grids_never_reach_the_solver() {
        let err = LotState::from_grid(vec![vec![1, 0, 2], vec![3, 4, 0], vec![5, 6, 7]]);
        assert_eq!(err.unwrap_err(), LotError::DuplicateCar(0));
    }
}
