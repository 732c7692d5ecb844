use itertools::Itertools;

use crate::common::grid::{Coordinate, Map2d};
use crate::judge::{Judge, ProtocolError};
use crate::map::{PlotState, MAX_STURDINESS, MIN_STURDINESS};
use crate::solver::policy::{Excavator, IncreasingPolicy};

/// Pitch of the sensing lattice. Only cells with both coordinates on the
/// lattice are measured directly; everything in between is interpolated.
pub const SENSE_INTERVAL: usize = 20;

/// Sparse picture of the plot's sturdiness. Cells on the sensing lattice are
/// measured for real (which breaks them as a side effect); any other cell
/// gets an inverse-distance blend of the four nearest lattice measurements.
#[derive(Debug, Clone)]
pub struct HardnessModel {
    samples: Map2d<Option<u32>>,
    estimates: Map2d<Option<u32>>,
    lattice: Vec<Coordinate>,
}

impl HardnessModel {
    pub fn new(map_size: usize) -> Self {
        let lattice = (0..map_size)
            .step_by(SENSE_INTERVAL)
            .cartesian_product((0..map_size).step_by(SENSE_INTERVAL))
            .map(|(row, col)| Coordinate::new(row, col))
            .collect_vec();

        Self {
            samples: Map2d::new(vec![None; map_size * map_size], map_size),
            estimates: Map2d::new(vec![None; map_size * map_size], map_size),
            lattice,
        }
    }

    /// Best current belief about the power needed to break `c`. An open cell
    /// costs nothing; a measured cell answers with its true cost; everything
    /// else is estimated, sampling lattice neighbours on first need.
    pub fn estimate_cost(
        &mut self,
        c: Coordinate,
        plot: &mut PlotState,
        judge: &mut dyn Judge,
        excavator: &mut Excavator,
    ) -> Result<u32, ProtocolError> {
        if plot.is_dug(c) {
            return Ok(0);
        }

        if let Some(cost) = self.samples[c] {
            return Ok(cost);
        }

        if let Some(cost) = self.estimates[c] {
            return Ok(cost);
        }

        if Self::on_lattice(c) {
            return self.direct_sample(c, plot, judge, excavator);
        }

        let estimate = self.interpolate(c, plot, judge, excavator)?;
        self.estimates[c] = Some(estimate);
        Ok(estimate)
    }

    /// Measures `c` for real by probing it to breaking. The accumulated
    /// power is the cell's true cost and is authoritative from here on.
    pub fn direct_sample(
        &mut self,
        c: Coordinate,
        plot: &mut PlotState,
        judge: &mut dyn Judge,
        excavator: &mut Excavator,
    ) -> Result<u32, ProtocolError> {
        let spent = excavator.break_cell(judge, plot, c, &mut IncreasingPolicy::new())?;
        self.samples[c] = Some(spent);
        Ok(spent)
    }

    /// Feeds a breaking cost observed during plain excavation back into the
    /// cache. Direct measurements are never overwritten.
    pub fn record_true_cost(&mut self, c: Coordinate, spent: u32) {
        if self.samples[c].is_none() {
            self.samples[c] = Some(spent);
        }
    }

    fn on_lattice(c: Coordinate) -> bool {
        c.row % SENSE_INTERVAL == 0 && c.col % SENSE_INTERVAL == 0
    }

    fn interpolate(
        &mut self,
        c: Coordinate,
        plot: &mut PlotState,
        judge: &mut dyn Judge,
        excavator: &mut Excavator,
    ) -> Result<u32, ProtocolError> {
        let nearest = self
            .lattice
            .iter()
            .copied()
            .sorted_by_key(|&p| Self::euclid_sq(p, c))
            .take(4)
            .collect_vec();

        let mut weighted_sum = 0.0;
        let mut weight_total = 0.0;

        for p in nearest {
            let value = match self.samples[p] {
                Some(value) => value,
                None => self.direct_sample(p, plot, judge, excavator)?,
            };

            let weight = 1.0 / (Self::euclid_sq(p, c) as f64).sqrt();
            weighted_sum += weight * value as f64;
            weight_total += weight;
        }

        let estimate = (weighted_sum / weight_total).round() as u32;
        Ok(estimate.clamp(MIN_STURDINESS, MAX_STURDINESS))
    }

    fn euclid_sq(a: Coordinate, b: Coordinate) -> u64 {
        let dr = a.row.abs_diff(b.row) as u64;
        let dc = a.col.abs_diff(b.col) as u64;
        dr * dr + dc * dc
    }
}
