use crate::common::{PackageId, TrainId};
use crate::simulation::error::SimulationError;
use crate::simulation::network::Network;
use crate::simulation::state::SimulationState;

/// Picks the train that should collect `package`.
///
/// Trains whose remaining capacity fits the package compete on index distance between their
/// station and the package origin; ties go to the train with the smaller clock. When nobody
/// with room is closer than the number of segments, the first train whose total capacity fits
/// is returned, even if it is currently too full.
pub fn select_train(network: &Network, state: &SimulationState, package: PackageId) -> Result<TrainId, SimulationError> {
    let item = state.package(package);
    let weight = item.weight();
    let fallback = state
        .trains()
        .find(|x| x.capacity() >= weight)
        .ok_or(SimulationError::NoEligibleTrain { package, weight })?;

    let origin = network.position(item.origin());
    let mut candidate = fallback.id();
    let mut distance = network.segment_count();

    for train in state.trains().filter(|x| state.remaining_capacity(x.id()) >= weight) {
        let proximity = origin.abs_diff(network.position(train.station()));
        let traveled_less = train.sequence() < state.train(candidate).sequence();
        if proximity < distance || (proximity == distance && traveled_less) {
            candidate = train.id();
            distance = proximity;
        }
    }

    Ok(candidate)
}
