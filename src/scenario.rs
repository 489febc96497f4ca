use crate::common::{Distance, Weight, split_record};
use crate::simulation::config::SimulationConfig;
use crate::simulation::engine::Simulation;
use crate::simulation::error::NetworkError;
use crate::simulation::network::Network;
use crate::simulation::state::SimulationState;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse scenario: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("malformed record {record:?}: {reason}")]
    Record { record: String, reason: String },
    #[error("{kind} {name:?} references unknown station {station:?}")]
    UnknownStation {
        kind: &'static str,
        name: String,
        station: String,
    },
    #[error(transparent)]
    Network(#[from] NetworkError),
}

/// Everything a run needs, as read from a scenario file.
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub stations: Vec<String>,
    #[serde(alias = "segments", deserialize_with = "records")]
    pub edges: Vec<SegmentData>,
    #[serde(deserialize_with = "records")]
    pub trains: Vec<TrainData>,
    #[serde(deserialize_with = "records")]
    pub deliveries: Vec<DeliveryData>,
    #[serde(default)]
    pub limits: SimulationConfig,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SegmentData {
    pub name: String,
    pub from: String,
    pub to: String,
    pub distance: Distance,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TrainData {
    pub name: String,
    pub capacity: Weight,
    pub start: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DeliveryData {
    pub name: String,
    pub weight: Weight,
    pub from: String,
    pub to: String,
}

fn malformed(record: &str, reason: impl ToString) -> ScenarioError {
    ScenarioError::Record {
        record: record.to_string(),
        reason: reason.to_string(),
    }
}

fn number<T: FromStr>(record: &str, field: &str) -> Result<T, ScenarioError>
where
    T::Err: ToString,
{
    field.parse().map_err(|e: T::Err| malformed(record, e))
}

/// `name,from,to,distance`
impl FromStr for SegmentData {
    type Err = ScenarioError;

    fn from_str(record: &str) -> Result<Self, Self::Err> {
        let [name, from, to, distance] = split_record(record).ok_or_else(|| malformed(record, "expected 4 fields"))?;
        Ok(SegmentData {
            name: name.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            distance: number(record, distance)?,
        })
    }
}

/// `name,capacity,start`
impl FromStr for TrainData {
    type Err = ScenarioError;

    fn from_str(record: &str) -> Result<Self, Self::Err> {
        let [name, capacity, start] = split_record(record).ok_or_else(|| malformed(record, "expected 3 fields"))?;
        Ok(TrainData {
            name: name.to_string(),
            capacity: number(record, capacity)?,
            start: start.to_string(),
        })
    }
}

/// `name,weight,from,to`
impl FromStr for DeliveryData {
    type Err = ScenarioError;

    fn from_str(record: &str) -> Result<Self, Self::Err> {
        let [name, weight, from, to] = split_record(record).ok_or_else(|| malformed(record, "expected 4 fields"))?;
        Ok(DeliveryData {
            name: name.to_string(),
            weight: number(record, weight)?,
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Entry<T> {
    Record(String),
    Table(T),
}

/// Accepts every entry either as a comma-delimited record or as a table.
fn records<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr<Err = ScenarioError>,
{
    Vec::<Entry<T>>::deserialize(deserializer)?
        .into_iter()
        .map(|entry| match entry {
            Entry::Record(record) => record.parse().map_err(D::Error::custom),
            Entry::Table(table) => Ok(table),
        })
        .collect()
}

impl FromStr for Scenario {
    type Err = ScenarioError;

    fn from_str(contents: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str::<Scenario>(contents)?)
    }
}

impl Scenario {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Scenario, ScenarioError> {
        fs::read_to_string(path)?.parse()
    }

    /// Resolves station names and sets up a fresh simulation.
    pub fn build(&self, config: SimulationConfig) -> Result<Simulation, ScenarioError> {
        let network = Network::from_iterable(self.stations.iter().map(String::as_str), &self.edges)?;
        let lookup = |kind: &'static str, name: &str, station: &str| {
            network.find(station).ok_or_else(|| ScenarioError::UnknownStation {
                kind,
                name: name.to_string(),
                station: station.to_string(),
            })
        };

        let mut state = SimulationState::default();
        for train in &self.trains {
            let start = lookup("train", &train.name, &train.start)?;
            state.add_train(&train.name, train.capacity, start);
        }
        for delivery in &self.deliveries {
            let origin = lookup("delivery", &delivery.name, &delivery.from)?;
            let destination = lookup("delivery", &delivery.name, &delivery.to)?;
            state.add_package(&delivery.name, delivery.weight, origin, destination);
        }

        Ok(Simulation::new(network, state, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORDS: &str = r#"
        stations = ["A", "B", "C"]
        edges = ["E1,A,B,30", "E2,B,C,10"]
        trains = ["Q1,6,B"]
        deliveries = ["K1,5,A,C"]
    "#;

    #[test]
    fn test_record_form() {
        let scenario: Scenario = RECORDS.parse().unwrap();
        assert_eq!(scenario.stations, ["A", "B", "C"]);
        assert_eq!(
            scenario.edges[1],
            SegmentData {
                name: "E2".to_string(),
                from: "B".to_string(),
                to: "C".to_string(),
                distance: 10,
            }
        );
        assert_eq!(scenario.trains[0].capacity, 6);
        assert_eq!(scenario.deliveries[0].to, "C");
        assert_eq!(scenario.limits, SimulationConfig::default());
    }

    #[test]
    fn test_table_form_and_limits() {
        let contents = r#"
            stations = ["A", "B"]
            deliveries = ["K1,5,A,B"]

            [[segments]]
            name = "E1"
            from = "A"
            to = "B"
            distance = 7

            [[trains]]
            name = "Q1"
            capacity = 9
            start = "A"

            [limits]
            delivery_limit = 50
        "#;
        let scenario: Scenario = contents.parse().unwrap();
        assert_eq!(scenario.edges[0].distance, 7);
        assert_eq!(scenario.trains[0].start, "A");
        assert_eq!(scenario.limits.delivery_limit, 50);
        assert_eq!(scenario.limits.hop_limit, 1000);
    }

    #[test]
    fn test_malformed_records() {
        for (record, field_error) in [("E1,A,B", true), ("E1,A,B,x", false)] {
            match record.parse::<SegmentData>() {
                Err(ScenarioError::Record { record: r, reason }) => {
                    assert_eq!(r, record);
                    assert_eq!(reason.contains("fields"), field_error);
                }
                other => panic!("unexpected {:?}", other),
            }
        }
        assert!("Q1,-3,A".parse::<TrainData>().is_err());

        let contents = RECORDS.replace("K1,5,A,C", "K1,five,A,C");
        assert!(matches!(contents.parse::<Scenario>(), Err(ScenarioError::Toml(_))));
    }

    #[test]
    fn test_build_resolves_names() {
        let scenario: Scenario = RECORDS.parse().unwrap();
        let simulation = scenario.build(SimulationConfig::default()).unwrap();
        let state = simulation.state();
        assert_eq!(state.train(0).name(), "Q1");
        assert_eq!(state.train(0).station(), 1);
        assert_eq!(state.package(0).origin(), 0);
        assert_eq!(state.package(0).destination(), 2);
        assert_eq!(simulation.network().distance(1, 2), Some(10));
    }

    #[test]
    fn test_build_rejects_unknown_station() {
        let contents = RECORDS.replace("K1,5,A,C", "K1,5,A,Z");
        let scenario: Scenario = contents.parse().unwrap();
        match scenario.build(SimulationConfig::default()) {
            Err(ScenarioError::UnknownStation { kind, name, station }) => {
                assert_eq!((kind, name.as_str(), station.as_str()), ("delivery", "K1", "Z"));
            }
            _ => panic!("expected an unknown station error"),
        }
    }

    #[test]
    fn test_build_rejects_branching() {
        let contents = r#"
            stations = ["A", "B", "C", "D"]
            edges = ["E1,A,B,1", "E2,A,C,1", "E3,A,D,1"]
            trains = []
            deliveries = []
        "#;
        let scenario: Scenario = contents.parse().unwrap();
        assert!(matches!(
            scenario.build(SimulationConfig::default()),
            Err(ScenarioError::Network(NetworkError::TooManyNeighbors { .. }))
        ));
    }
}
