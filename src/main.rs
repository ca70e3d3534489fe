use anyhow::Result;

use parking_solver::{LotState, ParkingLot};

// Each example is (rows, cols, row-major car ids); 0 marks the empty slot.
// The last one fails the parity test and has no solution.
const EXAMPLES: &[(usize, usize, &[&[u32]])] = &[
    (3, 3, &[&[1, 4, 2], &[7, 6, 3], &[8, 0, 5]]),
    (2, 2, &[&[1, 2], &[3, 0]]),
    (3, 3, &[&[2, 1, 3], &[4, 5, 6], &[7, 8, 0]]),
];

fn main() -> Result<()> {
    env_logger::init();

    for &(rows, cols, grid) in EXAMPLES {
        let grid: Vec<Vec<u32>> = grid.iter().map(|row| row.to_vec()).collect();
        let start = LotState::from_grid(grid)?;
        let lot = ParkingLot::new(start, rows, cols, false)?;

        println!("----");
        println!("Start ({}x{}):", rows, cols);
        print!("{}", lot.render(lot.start_state()));

        if !lot.is_solvable() {
            println!("No solution: the goal is unreachable from this arrangement.");
            continue;
        }

        for consider_cost in [false, true] {
            let lot = ParkingLot::new(lot.start_state().clone(), rows, cols, consider_cost)?;
            let solution = lot.solve()?;

            println!(
                "{} costs: {} moves, total cost {}",
                if consider_cost { "Ranked" } else { "Flat" },
                solution.cars.len(),
                solution.total_cost,
            );
            for (step, (state, car)) in solution.states.iter().zip(&solution.cars).enumerate() {
                println!("step {}: move car {}", step + 1, car);
                print!("{}", lot.render(state));
            }
        }
    }

    Ok(())
}
