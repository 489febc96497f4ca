use crate::common::{Distance, PackageId, StationId, TrainId, Weight};
use itertools::Itertools;
use std::collections::HashSet;

/// Delivery progress of a package. Transitions only go forward.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PackageStatus {
    Pickup,
    Moving,
    Delivered,
}

#[derive(Debug)]
pub struct Package {
    name: String,
    weight: Weight,
    origin: StationId,
    destination: StationId,
    status: PackageStatus,
}

impl Package {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> Weight {
        self.weight
    }

    pub fn origin(&self) -> StationId {
        self.origin
    }

    pub fn destination(&self) -> StationId {
        self.destination
    }

    pub fn status(&self) -> PackageStatus {
        self.status
    }
}

#[derive(Debug)]
pub struct Train {
    id: TrainId,
    name: String,
    capacity: Weight,
    station: StationId,
    /// Loaded packages in loading order.
    load: Vec<PackageId>,
    /// Cumulative traveled distance, doubles as the train's local clock.
    sequence: Distance,
}

impl Train {
    pub fn id(&self) -> TrainId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> Weight {
        self.capacity
    }

    pub fn station(&self) -> StationId {
        self.station
    }

    pub fn load(&self) -> &[PackageId] {
        &self.load
    }

    pub fn sequence(&self) -> Distance {
        self.sequence
    }

    pub fn carries(&self, package: PackageId) -> bool {
        self.load.contains(&package)
    }
}

/// Mutable entity state of one simulation run.
#[derive(Debug, Default)]
pub struct SimulationState {
    trains: Vec<Train>,
    packages: Vec<Package>,
    /// Undelivered packages in FIFO order.
    backlog: Vec<PackageId>,
    logged_pickups: HashSet<PackageId>,
}

impl SimulationState {
    pub fn add_train(&mut self, name: &str, capacity: Weight, station: StationId) -> TrainId {
        let id = self.trains.len();
        self.trains.push(Train {
            id,
            name: name.to_string(),
            capacity,
            station,
            load: Vec::new(),
            sequence: 0,
        });
        id
    }

    pub fn add_package(&mut self, name: &str, weight: Weight, origin: StationId, destination: StationId) -> PackageId {
        let id = self.packages.len();
        self.packages.push(Package {
            name: name.to_string(),
            weight,
            origin,
            destination,
            status: PackageStatus::Pickup,
        });
        self.backlog.push(id);
        id
    }

    pub fn train(&self, id: TrainId) -> &Train {
        &self.trains[id]
    }

    pub fn package(&self, id: PackageId) -> &Package {
        &self.packages[id]
    }

    pub fn trains(&self) -> std::slice::Iter<'_, Train> {
        self.trains.iter()
    }

    pub fn packages(&self) -> std::slice::Iter<'_, Package> {
        self.packages.iter()
    }

    pub fn backlog(&self) -> &[PackageId] {
        &self.backlog
    }

    pub fn head(&self) -> Option<PackageId> {
        self.backlog.first().copied()
    }

    pub fn load_weight(&self, train: TrainId) -> Weight {
        self.trains[train]
            .load
            .iter()
            .map(|&package| self.packages[package].weight)
            .sum()
    }

    pub fn remaining_capacity(&self, train: TrainId) -> Weight {
        self.trains[train].capacity.saturating_sub(self.load_weight(train))
    }

    pub fn carrier(&self, package: PackageId) -> Option<TrainId> {
        self.trains.iter().find(|x| x.carries(package)).map(|x| x.id)
    }

    /// Puts a waiting package on the train. Returns `false` if the package is not waiting.
    pub fn load(&mut self, train: TrainId, package: PackageId) -> bool {
        if self.packages[package].status != PackageStatus::Pickup {
            return false;
        }
        debug_assert!(self.remaining_capacity(train) >= self.packages[package].weight);
        self.packages[package].status = PackageStatus::Moving;
        self.trains[train].load.push(package);
        true
    }

    /// Takes the package off the train and out of the backlog. Returns `false` if the train does not carry it.
    pub fn drop_off(&mut self, train: TrainId, package: PackageId) -> bool {
        let load = &mut self.trains[train].load;
        let Some(index) = load.iter().position(|&x| x == package) else {
            return false;
        };
        load.remove(index);
        self.backlog.retain(|&x| x != package);
        self.packages[package].status = PackageStatus::Delivered;
        true
    }

    /// Packages loaded at the train's current station whose pickup has not been reported yet.
    pub fn take_unlogged_pickups(&mut self, train: TrainId) -> Vec<PackageId> {
        let train = &self.trains[train];
        let picked = train
            .load
            .iter()
            .copied()
            .filter(|&x| self.packages[x].origin == train.station && !self.logged_pickups.contains(&x))
            .collect_vec();
        self.logged_pickups.extend(picked.iter().copied());
        picked
    }

    pub fn advance(&mut self, train: TrainId, next: StationId, distance: Distance) {
        let train = &mut self.trains[train];
        train.sequence += distance;
        train.station = next;
    }

    /// Total elapsed time: the largest train clock.
    pub fn total_time(&self) -> Distance {
        self.trains.iter().map(|x| x.sequence).max().unwrap_or(0)
    }
}
