mod planner;
pub mod policy;

use itertools::{iproduct, Itertools};

use crate::common::grid::Coordinate;
use crate::input::Input;
use crate::judge::{Judge, PowerBudget, ProtocolError};
use crate::map::PlotState;
use crate::model::HardnessModel;
use crate::ChangeMinMax;

use self::policy::{Excavator, PredictedPolicy};

#[derive(Debug, Clone, Default)]
pub struct SolveStats {
    pub houses_connected: usize,
    pub houses_skipped: usize,
    pub cells_dug: usize,
    pub costliest_cell: u32,
    pub power_spent: u64,
}

pub struct Solver<'a> {
    input: &'a Input,
    plot: PlotState,
    model: HardnessModel,
    excavator: Excavator,
}

impl<'a> Solver<'a> {
    pub fn new(input: &'a Input) -> Self {
        Self {
            input,
            plot: PlotState::new(input.map_size, &input.sources),
            model: HardnessModel::new(input.map_size),
            excavator: Excavator::new(PowerBudget::new(None)),
        }
    }

    /// Connects every house to a source: plan all trenches first (closest
    /// houses first, so later routes can stop at trenches that already
    /// exist), then dig every selected cell in row-major order.
    pub fn solve(&mut self, judge: &mut dyn Judge) -> Result<SolveStats, ProtocolError> {
        let mut stats = SolveStats::default();

        for house in self.sorted_houses() {
            let connected = planner::plan_path(
                house,
                &self.input.sources,
                &mut self.plot,
                &mut self.model,
                judge,
                &mut self.excavator,
            )?;

            if connected {
                stats.houses_connected += 1;
            } else {
                stats.houses_skipped += 1;
                eprintln!(
                    "house ({}, {}) has no route to any source, skipping",
                    house.row, house.col
                );
            }
        }

        for (row, col) in iproduct!(0..self.input.map_size, 0..self.input.map_size) {
            let c = Coordinate::new(row, col);

            if !self.plot.is_selected(c) || self.plot.is_dug(c) {
                continue;
            }

            let estimate =
                self.model
                    .estimate_cost(c, &mut self.plot, judge, &mut self.excavator)?;
            let spent = self.excavator.break_cell(
                judge,
                &mut self.plot,
                c,
                &mut PredictedPolicy::new(estimate),
            )?;

            if spent > 0 {
                self.model.record_true_cost(c, spent);
            }

            stats.cells_dug += 1;
            stats.costliest_cell.change_max(spent);
        }

        stats.power_spent = self.excavator.budget().spent();
        Ok(stats)
    }

    fn sorted_houses(&self) -> Vec<Coordinate> {
        self.input
            .houses
            .iter()
            .copied()
            .sorted_by_key(|house| self.nearest_source_dist(*house))
            .collect_vec()
    }

    fn nearest_source_dist(&self, c: Coordinate) -> usize {
        self.input
            .sources
            .iter()
            .map(|source| c.dist(source))
            .min()
            .unwrap_or(usize::MAX)
    }

    #[cfg(test)]
    pub fn plot(&self) -> &PlotState {
        &self.plot
    }
}
