use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::common::grid::{Coordinate, Map2d, ADJACENTS};
use crate::judge::{Judge, ProtocolError};
use crate::map::PlotState;
use crate::model::HardnessModel;
use crate::solver::policy::Excavator;
use crate::ChangeMinMax;

const INF: u64 = u64::MAX / 2;

/// Routes `house` to the cheapest reachable source or existing trench cell
/// and marks the route selected. Best-first search over estimated costs; the
/// Manhattan-distance guide is not a true lower bound on hardness sums, so
/// the result is best-effort rather than provably optimal.
///
/// Returns false if the frontier empties without reaching a terminus, in
/// which case nothing is marked.
pub fn plan_path(
    house: Coordinate,
    sources: &[Coordinate],
    plot: &mut PlotState,
    model: &mut HardnessModel,
    judge: &mut dyn Judge,
    excavator: &mut Excavator,
) -> Result<bool, ProtocolError> {
    let n = plot.size();
    let mut g_scores = Map2d::new(vec![INF; n * n], n);
    let mut f_scores = Map2d::new(vec![INF; n * n], n);
    let mut from = Map2d::new(vec![Coordinate::EMPTY; n * n], n);
    let mut queue = BinaryHeap::new();

    g_scores[house] = 0;
    f_scores[house] = heuristic(house, sources);
    queue.push(Reverse((f_scores[house], house)));

    while let Some(Reverse((f, c))) = queue.pop() {
        if f_scores[c] < f {
            continue;
        }

        if plot.is_source(c) || plot.is_selected(c) {
            // The terminus is already connected; everything from its
            // predecessor back to the house becomes trench.
            let mut current = from[c];

            while current != Coordinate::EMPTY {
                plot.select(current);
                current = from[current];
            }

            return Ok(true);
        }

        for &adj in ADJACENTS.iter() {
            let next = c + adj;

            if !next.in_map(n) {
                continue;
            }

            let cost = model.estimate_cost(next, plot, judge, excavator)? as u64;
            let next_g = g_scores[c] + cost;

            if g_scores[next].change_min(next_g) {
                from[next] = c;
                f_scores[next] = next_g + heuristic(next, sources);
                queue.push(Reverse((f_scores[next], next)));
            }
        }
    }

    Ok(false)
}

fn heuristic(c: Coordinate, sources: &[Coordinate]) -> u64 {
    sources.iter().map(|s| c.dist(s)).min().unwrap_or(0) as u64
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::judge::{LocalJudge, PowerBudget};
    use crate::map::MIN_STURDINESS;

    fn count_selected(plot: &PlotState) -> usize {
        let n = plot.size();
        (0..n)
            .flat_map(|row| (0..n).map(move |col| Coordinate::new(row, col)))
            .filter(|&c| plot.is_selected(c))
            .count()
    }

    /// BFS over selected and source cells.
    fn reaches_source(plot: &PlotState, start: Coordinate) -> bool {
        let n = plot.size();
        let mut seen = Map2d::new(vec![false; n * n], n);
        let mut stack = vec![start];
        seen[start] = true;

        while let Some(c) = stack.pop() {
            if plot.is_source(c) {
                return true;
            }

            for &adj in ADJACENTS.iter() {
                let next = c + adj;

                if next.in_map(n)
                    && !seen[next]
                    && (plot.is_selected(next) || plot.is_source(next))
                {
                    seen[next] = true;
                    stack.push(next);
                }
            }
        }

        false
    }

    #[test]
    fn plans_a_manhattan_path_on_uniform_ground() {
        let source = Coordinate::new(0, 0);
        let house = Coordinate::new(4, 4);
        let mut judge = LocalJudge::uniform(5, MIN_STURDINESS, 1_000_000);
        let mut plot = PlotState::new(5, &[source]);
        let mut model = HardnessModel::new(5);
        let mut excavator = Excavator::new(PowerBudget::new(None));

        let connected = plan_path(
            house,
            &[source],
            &mut plot,
            &mut model,
            &mut judge,
            &mut excavator,
        )
        .unwrap();

        assert!(connected);
        // Both endpoints sit on the path; the source itself is already open
        // territory and is not selected.
        assert_eq!(count_selected(&plot), 8);
        assert!(plot.is_selected(house));
        assert!(!plot.is_selected(source));
        assert!(reaches_source(&plot, house));
    }

    #[test]
    fn later_plans_reuse_existing_trenches() {
        let source = Coordinate::new(0, 0);
        let houses = [Coordinate::new(4, 4), Coordinate::new(4, 0)];
        let mut judge = LocalJudge::uniform(5, MIN_STURDINESS, 1_000_000);
        let mut plot = PlotState::new(5, &[source]);
        let mut model = HardnessModel::new(5);
        let mut excavator = Excavator::new(PowerBudget::new(None));

        for house in houses {
            let connected = plan_path(
                house,
                &[source],
                &mut plot,
                &mut model,
                &mut judge,
                &mut excavator,
            )
            .unwrap();
            assert!(connected);
        }

        // Selection only ever grows and both houses end up connected.
        assert!(plot.is_selected(houses[0]));
        assert!(plot.is_selected(houses[1]));
        assert!(reaches_source(&plot, houses[0]));
        assert!(reaches_source(&plot, houses[1]));
    }

    #[test]
    fn routes_around_hard_ground() {
        // A hard band across the west side of the plot, sensed through the
        // lattice points (20, 0) and (20, 20). The straight route down
        // column 0 crosses the band; the planner should detour through the
        // soft east side instead.
        let size = 41;
        let mut hardness = Map2d::new(vec![25; size * size], size);
        for row in 10..=30 {
            for col in 0..=30 {
                hardness[Coordinate::new(row, col)] = 4900;
            }
        }

        let source = Coordinate::new(0, 0);
        let house = Coordinate::new(40, 0);
        let mut judge = LocalJudge::new(hardness, 1_000_000);
        let mut plot = PlotState::new(size, &[source]);
        let mut model = HardnessModel::new(size);
        let mut excavator = Excavator::new(PowerBudget::new(None));

        let connected = plan_path(
            house,
            &[source],
            &mut plot,
            &mut model,
            &mut judge,
            &mut excavator,
        )
        .unwrap();

        assert!(connected);
        assert!(reaches_source(&plot, house));
        for row in 12..=28 {
            assert!(!plot.is_selected(Coordinate::new(row, 0)));
        }
    }

    #[test]
    fn frontier_exhaustion_selects_nothing() {
        let house = Coordinate::new(2, 2);
        let mut judge = LocalJudge::uniform(5, MIN_STURDINESS, 1_000_000);
        let mut plot = PlotState::new(5, &[]);
        let mut model = HardnessModel::new(5);
        let mut excavator = Excavator::new(PowerBudget::new(None));

        let connected = plan_path(
            house,
            &[],
            &mut plot,
            &mut model,
            &mut judge,
            &mut excavator,
        )
        .unwrap();

        assert!(!connected);
        assert_eq!(count_selected(&plot), 0);
    }

    #[test]
    fn house_on_a_source_needs_no_trench() {
        let source = Coordinate::new(2, 2);
        let mut judge = LocalJudge::uniform(5, MIN_STURDINESS, 1_000_000);
        let mut plot = PlotState::new(5, &[source]);
        let mut model = HardnessModel::new(5);
        let mut excavator = Excavator::new(PowerBudget::new(None));

        let connected = plan_path(
            source,
            &[source],
            &mut plot,
            &mut model,
            &mut judge,
            &mut excavator,
        )
        .unwrap();

        assert!(connected);
        assert_eq!(count_selected(&plot), 0);
    }
}
