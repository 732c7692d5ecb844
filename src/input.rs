use std::io::BufRead;
use std::time::Instant;

use proconio::{input, source::line::LineSource};

use crate::common::grid::Coordinate;

#[derive(Debug, Clone)]
pub struct Input {
    pub map_size: usize,
    pub source_count: usize,
    pub house_count: usize,
    pub stamina_constant: i64,
    pub sources: Vec<Coordinate>,
    pub houses: Vec<Coordinate>,
    pub since: Instant,
}

impl Input {
    pub fn read(mut source: &mut LineSource<impl BufRead>) -> Self {
        let since = Instant::now();

        input! {
            from &mut source,
            map_size: usize,
            source_count: usize,
            house_count: usize,
            stamina_constant: i64,
        }

        let mut sources = vec![];

        for _ in 0..source_count {
            input! {
                from &mut source,
                row: usize,
                col: usize,
            }

            sources.push(Coordinate::new(row, col));
        }

        let mut houses = vec![];

        for _ in 0..house_count {
            input! {
                from &mut source,
                row: usize,
                col: usize,
            }

            houses.push(Coordinate::new(row, col));
        }

        Self {
            map_size,
            source_count,
            house_count,
            stamina_constant,
            sources,
            houses,
            since,
        }
    }
}
