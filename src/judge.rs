use std::io::BufRead;

use proconio::{input, source::line::LineSource};
use thiserror::Error;

use crate::common::grid::Coordinate;
#[cfg(test)]
use crate::common::grid::Map2d;

/// Judge answer to a probe that the run can survive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    NotBroken,
    Broken,
}

/// Responses that end the run. Neither is retried.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("judge rejected the probe request")]
    Rejected,
    #[error("total power budget exhausted")]
    BudgetExhausted,
    #[error("unexpected judge response: {0}")]
    Unexpected(i32),
}

/// The probe oracle. One blocking round-trip per call.
pub trait Judge {
    fn probe(&mut self, c: Coordinate, power: u32) -> Result<ProbeOutcome, ProtocolError>;
}

/// Power spent so far across the whole run, charged on every probe whether or
/// not the cell broke. `limit` is `None` when the judge keeps its total
/// budget to itself and enforces it on its own side.
#[derive(Debug, Clone)]
pub struct PowerBudget {
    spent: u64,
    limit: Option<u64>,
}

impl PowerBudget {
    pub fn new(limit: Option<u64>) -> Self {
        Self { spent: 0, limit }
    }

    pub fn charge(&mut self, power: u32) {
        self.spent += power as u64;
    }

    pub fn spent(&self) -> u64 {
        self.spent
    }

    pub fn remaining(&self) -> Option<u64> {
        self.limit.map(|limit| limit.saturating_sub(self.spent))
    }
}

/// Speaks the real protocol: one `row col power` line out, one response code
/// back.
pub struct RemoteJudge<R: BufRead> {
    source: LineSource<R>,
}

impl<R: BufRead> RemoteJudge<R> {
    pub fn new(source: LineSource<R>) -> Self {
        Self { source }
    }
}

impl<R: BufRead> Judge for RemoteJudge<R> {
    fn probe(&mut self, c: Coordinate, power: u32) -> Result<ProbeOutcome, ProtocolError> {
        println!("{} {} {}", c.row, c.col, power);

        input! {
            from &mut self.source,
            response: i32,
        }

        match response {
            0 => Ok(ProbeOutcome::NotBroken),
            1 => Ok(ProbeOutcome::Broken),
            -1 => Err(ProtocolError::Rejected),
            2 => Err(ProtocolError::BudgetExhausted),
            code => Err(ProtocolError::Unexpected(code)),
        }
    }
}

/// In-memory judge over a known hardness map. Accumulates damage per cell,
/// enforces the total power budget and rejects malformed probes exactly like
/// the real judge, so solver tests exercise the full protocol.
#[cfg(test)]
pub struct LocalJudge {
    hardness: Map2d<u32>,
    damage: Map2d<u32>,
    broken: Map2d<bool>,
    probes: Map2d<u32>,
    limit: u64,
    spent: u64,
    probe_count: usize,
}

#[cfg(test)]
impl LocalJudge {
    pub fn new(hardness: Map2d<u32>, limit: u64) -> Self {
        let size = hardness.size;
        Self {
            hardness,
            damage: Map2d::new(vec![0; size * size], size),
            broken: Map2d::new(vec![false; size * size], size),
            probes: Map2d::new(vec![0; size * size], size),
            limit,
            spent: 0,
            probe_count: 0,
        }
    }

    pub fn uniform(size: usize, hardness: u32, limit: u64) -> Self {
        Self::new(
            Map2d::new(vec![hardness; size * size], size),
            limit,
        )
    }

    pub fn probe_count(&self) -> usize {
        self.probe_count
    }

    pub fn spent(&self) -> u64 {
        self.spent
    }

    pub fn is_broken(&self, c: Coordinate) -> bool {
        self.broken[c]
    }

    pub fn broken_count(&self) -> usize {
        let size = self.hardness.size;
        (0..size)
            .flat_map(|row| (0..size).map(move |col| Coordinate::new(row, col)))
            .filter(|&c| self.broken[c])
            .count()
    }

    pub fn probes_at(&self, c: Coordinate) -> u32 {
        self.probes[c]
    }
}

#[cfg(test)]
impl Judge for LocalJudge {
    fn probe(&mut self, c: Coordinate, power: u32) -> Result<ProbeOutcome, ProtocolError> {
        self.probe_count += 1;

        if power == 0 || !c.in_map(self.hardness.size) || self.broken[c] {
            return Err(ProtocolError::Rejected);
        }

        self.spent += power as u64;

        if self.spent > self.limit {
            return Err(ProtocolError::BudgetExhausted);
        }

        self.probes[c] += 1;
        self.damage[c] += power;

        if self.damage[c] >= self.hardness[c] {
            self.broken[c] = true;
            Ok(ProbeOutcome::Broken)
        } else {
            Ok(ProbeOutcome::NotBroken)
        }
    }
}
