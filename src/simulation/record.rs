use crate::common::{Distance, PackageId, StationId, TrainId};

/// One hop of one train, as it appears in the movement log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementRecord {
    /// Train clock when the hop starts.
    pub elapsed: Distance,
    pub train: TrainId,
    pub from: StationId,
    pub picked: Vec<PackageId>,
    pub to: StationId,
    pub dropped: Vec<PackageId>,
}
