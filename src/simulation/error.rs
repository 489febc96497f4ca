use crate::common::{PackageId, StationId, TrainId, Weight};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("station {0:?} is not part of the station list")]
    UnknownStation(String),
    /// Line and ring layouts only: a third neighbor means a branch.
    #[error("segment {segment:?} gives station {station:?} a third neighbor")]
    TooManyNeighbors { station: String, segment: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    #[error("train {train} did not reach station {target} within {hops} hops")]
    Unreachable {
        train: TrainId,
        target: StationId,
        hops: usize,
    },
    #[error("deliveries still pending after {iterations} dispatch iterations")]
    Livelock { iterations: usize },
    #[error("no train can carry package {package} of weight {weight}")]
    NoEligibleTrain { package: PackageId, weight: Weight },
    #[error("station {station} has no neighbors to move to")]
    Isolated { station: StationId },
    #[error("package {package} is in transit but no train carries it")]
    NotCarried { package: PackageId },
}
