use crate::common::{Distance, PackageId, TrainId};
use crate::simulation::config::SimulationConfig;
use crate::simulation::dispatch::select_train;
use crate::simulation::error::SimulationError;
use crate::simulation::movement::{Leg, move_train};
use crate::simulation::network::Network;
use crate::simulation::record::MovementRecord;
use crate::simulation::state::{PackageStatus, SimulationState};
use tracing::{debug, info, warn};

/// Owns everything a single run touches: the network, the entity state and the movement log.
pub struct Simulation {
    network: Network,
    state: SimulationState,
    config: SimulationConfig,
    movements: Vec<MovementRecord>,
    iterations: usize,
}

impl Simulation {
    pub fn new(network: Network, state: SimulationState, config: SimulationConfig) -> Self {
        Simulation {
            network,
            state,
            config,
            movements: Vec::new(),
            iterations: 0,
        }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn movements(&self) -> &[MovementRecord] {
        &self.movements
    }

    pub fn total_time(&self) -> Distance {
        self.state.total_time()
    }

    /// Drives deliveries until the backlog is empty and returns the total elapsed time.
    pub fn run(&mut self) -> Result<Distance, SimulationError> {
        info!(
            stations = self.network.len(),
            trains = self.state.trains().len(),
            packages = self.state.packages().len(),
            "starting deliveries"
        );
        while self.step()? {}

        let total = self.total_time();
        info!(hops = self.movements.len(), total, "deliveries complete");
        Ok(total)
    }

    /// Handles the package at the head of the backlog once. Returns `false` when nothing is left.
    pub fn step(&mut self) -> Result<bool, SimulationError> {
        let Some(package) = self.state.head() else {
            return Ok(false);
        };
        if self.iterations >= self.config.delivery_limit {
            warn!(package, iterations = self.iterations, "deliveries are not progressing");
            return Err(SimulationError::Livelock {
                iterations: self.iterations,
            });
        }
        self.iterations += 1;

        if self.state.package(package).status() == PackageStatus::Pickup {
            self.collect(package)?;
        }
        if self.state.package(package).status() == PackageStatus::Moving {
            let train = self
                .state
                .carrier(package)
                .ok_or(SimulationError::NotCarried { package })?;
            let target = self.state.package(package).destination();
            self.travel(Leg {
                train,
                target,
                reserve: 0,
            })?;
        }
        Ok(true)
    }

    /// Sends the best train towards the package origin, or loads it when the train is already there.
    fn collect(&mut self, package: PackageId) -> Result<(), SimulationError> {
        let train = select_train(&self.network, &self.state, package)?;
        let item = self.state.package(package);
        let (origin, weight) = (item.origin(), item.weight());

        if self.state.train(train).station() != origin {
            return self.travel(Leg {
                train,
                target: origin,
                reserve: weight,
            });
        }
        if self.state.remaining_capacity(train) < weight {
            return self.make_room(train, package);
        }
        debug!(train, package, station = origin, "loading in place");
        self.state.load(train, package);
        Ok(())
    }

    /// Delivers the train's oldest load so that the head package fits afterwards.
    fn make_room(&mut self, train: TrainId, package: PackageId) -> Result<(), SimulationError> {
        let carried = self.state.train(train);
        let oldest = self
            .state
            .backlog()
            .iter()
            .copied()
            .find(|&x| carried.carries(x))
            .ok_or(SimulationError::NoEligibleTrain {
                package,
                weight: self.state.package(package).weight(),
            })?;
        debug!(train, package, unloading = oldest, "making room");
        let target = self.state.package(oldest).destination();
        self.travel(Leg {
            train,
            target,
            reserve: 0,
        })
    }

    fn travel(&mut self, leg: Leg) -> Result<(), SimulationError> {
        move_train(
            &self.network,
            &mut self.state,
            &mut self.movements,
            leg,
            self.config.hop_limit,
        )?;
        Ok(())
    }
}
