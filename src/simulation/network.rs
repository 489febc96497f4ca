use crate::common::{Distance, StationId};
use crate::scenario::SegmentData;
use crate::simulation::error::NetworkError;
use arrayvec::ArrayVec;
use std::collections::HashMap;

#[derive(Debug)]
pub struct Station {
    id: StationId,
    name: String,
    /// Neighbors in segment input order; the first one is the primary neighbor.
    neighbors: ArrayVec<StationId, 2>,
}

impl Station {
    fn new(id: StationId, name: String) -> Self {
        Station {
            id,
            name,
            neighbors: ArrayVec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn primary(&self) -> Option<StationId> {
        self.neighbors.first().copied()
    }

    pub fn alternate(&self) -> Option<StationId> {
        self.neighbors.get(1).copied()
    }
}

#[derive(Debug, Default)]
pub struct Network {
    stations: Vec<Station>,
    by_name: HashMap<String, StationId>,
    distances: HashMap<(StationId, StationId), Distance>,
    segment_count: usize,
}

impl Network {
    pub fn get(&self, id: StationId) -> Option<&Station> {
        self.stations.get(id)
    }

    pub fn find(&self, name: &str) -> Option<StationId> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, id: StationId) -> &str {
        self.stations.get(id).map_or("?", |x| x.name())
    }

    /// Proximity proxy: the station's place in the input ordering.
    pub fn position(&self, id: StationId) -> usize {
        id
    }

    pub fn distance(&self, from: StationId, to: StationId) -> Option<Distance> {
        self.distances.get(&(from, to)).copied()
    }

    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    fn add_station(&mut self, name: &str) -> StationId {
        let id = self.stations.len();
        self.stations.push(Station::new(id, name.to_string()));
        self.by_name.insert(name.to_string(), id);
        id
    }

    /// Connects two stations in both directions with the same distance.
    pub fn add_segment(&mut self, name: &str, a: StationId, b: StationId, distance: Distance) -> Result<(), NetworkError> {
        let needed = if a == b { 2 } else { 1 };
        for id in [a, b] {
            let station = self
                .stations
                .get(id)
                .ok_or_else(|| NetworkError::UnknownStation(id.to_string()))?;
            if station.neighbors.remaining_capacity() < needed {
                return Err(NetworkError::TooManyNeighbors {
                    station: station.name.clone(),
                    segment: name.to_string(),
                });
            }
        }
        self.stations[a].neighbors.push(b);
        self.stations[b].neighbors.push(a);
        self.distances.insert((a, b), distance);
        self.distances.insert((b, a), distance);
        self.segment_count += 1;
        Ok(())
    }

    pub fn from_iterable<'a, I, J>(station_names: I, segment_data: J) -> Result<Self, NetworkError>
    where
        I: IntoIterator<Item = &'a str>,
        J: IntoIterator<Item = &'a SegmentData>,
    {
        let mut network = Network::default();
        for name in station_names {
            network.add_station(name);
        }
        for segment in segment_data {
            let a = network
                .find(&segment.from)
                .ok_or_else(|| NetworkError::UnknownStation(segment.from.clone()))?;
            let b = network
                .find(&segment.to)
                .ok_or_else(|| NetworkError::UnknownStation(segment.to.clone()))?;
            network.add_segment(&segment.name, a, b, segment.distance)?;
        }
        Ok(network)
    }
}

#[cfg(test)]
pub(crate) fn build_line(names: &[&str], distances: &[Distance]) -> Network {
    let segments: Vec<SegmentData> = names
        .iter()
        .zip(names.iter().skip(1))
        .zip(distances)
        .enumerate()
        .map(|(i, ((from, to), &distance))| SegmentData {
            name: format!("E{}", i + 1),
            from: from.to_string(),
            to: to.to_string(),
            distance,
        })
        .collect();
    Network::from_iterable(names.iter().copied(), &segments).unwrap()
}
