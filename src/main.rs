mod common;
mod input;
mod judge;
mod map;
mod model;
mod solver;

use std::io::{self, BufReader, Write};
use std::time::Instant;

use proconio::source::line::LineSource;

use crate::input::Input;
use crate::judge::RemoteJudge;
use crate::solver::Solver;

pub trait ChangeMinMax {
    fn change_min(&mut self, v: Self) -> bool;
    fn change_max(&mut self, v: Self) -> bool;
}

impl<T: PartialOrd> ChangeMinMax for T {
    fn change_min(&mut self, v: T) -> bool {
        *self > v && {
            *self = v;
            true
        }
    }

    fn change_max(&mut self, v: T) -> bool {
        *self < v && {
            *self = v;
            true
        }
    }
}

fn main() {
    let mut source = LineSource::new(BufReader::new(io::stdin()));
    let input = Input::read(&mut source);

    eprintln!(
        "plot {0}x{0}, {1} sources, {2} houses, stamina {3}",
        input.map_size, input.source_count, input.house_count, input.stamina_constant
    );

    let mut judge = RemoteJudge::new(source);
    let mut solver = Solver::new(&input);

    match solver.solve(&mut judge) {
        Ok(stats) => {
            eprintln!("===== solved =====");
            eprintln!("connected : {}", stats.houses_connected);
            eprintln!("skipped   : {}", stats.houses_skipped);
            eprintln!("cells dug : {}", stats.cells_dug);
            eprintln!("max cell  : {}", stats.costliest_cell);
            eprintln!("power     : {}", stats.power_spent);
        }
        Err(err) => {
            eprintln!("aborted: {}", err);
        }
    }

    io::stdout().flush().ok();

    let elapsed = Instant::now() - input.since;
    eprintln!("{:.3}s", elapsed.as_secs_f64());
}
