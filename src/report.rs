use crate::common::PackageId;
use crate::simulation::engine::Simulation;
use crate::simulation::record::MovementRecord;
use crate::simulation::state::SimulationState;
use itertools::Itertools;
use std::fmt;

/// Renders a finished run as one line per hop followed by the total time.
pub struct Report<'a> {
    simulation: &'a Simulation,
}

impl<'a> Report<'a> {
    pub fn new(simulation: &'a Simulation) -> Self {
        Report { simulation }
    }

    pub fn line(&self, record: &'a MovementRecord) -> MovementLine<'a> {
        MovementLine {
            simulation: self.simulation,
            record,
        }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for record in self.simulation.movements() {
            writeln!(f, "{}", self.line(record))?;
        }
        write!(f, "Takes {} minutes total", self.simulation.total_time())
    }
}

pub struct MovementLine<'a> {
    simulation: &'a Simulation,
    record: &'a MovementRecord,
}

fn package_names(state: &SimulationState, packages: &[PackageId]) -> String {
    packages.iter().map(|&x| state.package(x).name()).join(",")
}

impl fmt::Display for MovementLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let network = self.simulation.network();
        let state = self.simulation.state();
        let record = self.record;
        write!(
            f,
            "W={}, T={}, N1={}, P1=[{}], N2={}, P2=[{}]",
            record.elapsed,
            state.train(record.train).name(),
            network.name(record.from),
            package_names(state, &record.picked),
            network.name(record.to),
            package_names(state, &record.dropped),
        )
    }
}
