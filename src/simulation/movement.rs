use crate::common::{Direction, StationId, TrainId, Weight};
use crate::simulation::error::SimulationError;
use crate::simulation::network::Network;
use crate::simulation::record::MovementRecord;
use crate::simulation::state::{PackageStatus, SimulationState};
use itertools::Itertools;
use tracing::{debug, warn};

/// A single routing request: bring `train` to `target`, keeping `reserve` weight units free
/// for the package that triggered the trip.
#[derive(Copy, Clone, Debug)]
pub struct Leg {
    pub train: TrainId,
    pub target: StationId,
    pub reserve: Weight,
}

/// Chooses the neighbor to move to from `from` when heading for `to`.
///
/// A station has a primary neighbor and at most one alternate. The primary is taken when it is
/// the target or when there is nothing else; the alternate is taken when it is the target or
/// when the target sits further along the station ordering.
pub fn next_hop(network: &Network, from: StationId, to: StationId) -> Result<(Direction, StationId), SimulationError> {
    let station = network.get(from).ok_or(SimulationError::Isolated { station: from })?;
    let primary = station.primary().ok_or(SimulationError::Isolated { station: from })?;
    let hop = match station.alternate() {
        None => (Direction::Leftward, primary),
        Some(_) if primary == to => (Direction::Leftward, primary),
        Some(alternate) if alternate == to || network.position(to) > network.position(from) => {
            (Direction::Rightward, alternate)
        }
        Some(_) => (Direction::Leftward, primary),
    };
    Ok(hop)
}

/// Loads waiting packages at the train's station in backlog order while they fit next to the reserve.
fn pickup_waiting(state: &mut SimulationState, train: TrainId, reserve: Weight) {
    let Some(mut space) = state.remaining_capacity(train).checked_sub(reserve) else {
        return;
    };
    let station = state.train(train).station();
    let waiting = state
        .backlog()
        .iter()
        .copied()
        .filter(|&x| {
            let package = state.package(x);
            package.status() == PackageStatus::Pickup && package.origin() == station
        })
        .collect_vec();

    for package in waiting {
        let weight = state.package(package).weight();
        if weight <= space {
            state.load(train, package);
            space -= weight;
        }
    }
}

/// Moves the train one hop at a time until it stands on the target, appending a record per hop.
/// Returns the number of hops made.
pub fn move_train(
    network: &Network,
    state: &mut SimulationState,
    log: &mut Vec<MovementRecord>,
    leg: Leg,
    hop_limit: usize,
) -> Result<usize, SimulationError> {
    let Leg { train, target, reserve } = leg;
    let mut hops = 0;

    while state.train(train).station() != target {
        if hops >= hop_limit {
            warn!(train, target, hops, "train is stuck, giving up");
            return Err(SimulationError::Unreachable { train, target, hops });
        }
        hops += 1;

        let from = state.train(train).station();
        let (direction, next) = next_hop(network, from, target)?;

        pickup_waiting(state, train, reserve);
        let picked = state.take_unlogged_pickups(train);
        let dropped = state
            .train(train)
            .load()
            .iter()
            .copied()
            .filter(|&x| state.package(x).destination() == next)
            .collect_vec();
        for &package in &dropped {
            state.drop_off(train, package);
        }

        let elapsed = state.train(train).sequence();
        debug!(
            train,
            from,
            to = next,
            %direction,
            elapsed,
            picked = ?picked,
            dropped = ?dropped,
            "hop"
        );
        log.push(MovementRecord {
            elapsed,
            train,
            from,
            picked,
            to: next,
            dropped,
        });

        let distance = network
            .distance(from, next)
            .ok_or(SimulationError::Isolated { station: from })?;
        state.advance(train, next, distance);
    }

    Ok(hops)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::network::build_line;

    #[test]
    fn test_next_hop_on_line() {
        let network = build_line(&["A", "B", "C"], &[30, 10]);
        assert_eq!(next_hop(&network, 0, 2), Ok((Direction::Leftward, 1)));
        assert_eq!(next_hop(&network, 1, 2), Ok((Direction::Rightward, 2)));
        assert_eq!(next_hop(&network, 1, 0), Ok((Direction::Leftward, 0)));
        assert_eq!(next_hop(&network, 2, 0), Ok((Direction::Leftward, 1)));
    }

    #[test]
    fn test_next_hop_uses_position() {
        let network = build_line(&["A", "B", "C", "D", "E"], &[1, 1, 1, 1]);
        // at C the primary neighbor is B and the alternate is D
        assert_eq!(next_hop(&network, 2, 4), Ok((Direction::Rightward, 3)));
        assert_eq!(next_hop(&network, 2, 0), Ok((Direction::Leftward, 1)));
    }

    #[test]
    fn test_next_hop_isolated() {
        let network = build_line(&["A", "B"], &[]);
        assert_eq!(next_hop(&network, 0, 1), Err(SimulationError::Isolated { station: 0 }));
    }

    #[test]
    fn test_move_with_opportunistic_pickup() {
        let network = build_line(&["A", "B", "C"], &[30, 10]);
        let mut state = SimulationState::default();
        let train = state.add_train("Q1", 10, 0);
        let first = state.add_package("K1", 3, 0, 2);
        let second = state.add_package("K2", 2, 1, 2);
        state.load(train, first);

        let mut log = Vec::new();
        let leg = Leg {
            train,
            target: 2,
            reserve: 0,
        };
        assert_eq!(move_train(&network, &mut state, &mut log, leg, 100), Ok(2));
        assert_eq!(
            log,
            vec![
                MovementRecord {
                    elapsed: 0,
                    train,
                    from: 0,
                    picked: vec![first],
                    to: 1,
                    dropped: vec![],
                },
                MovementRecord {
                    elapsed: 30,
                    train,
                    from: 1,
                    picked: vec![second],
                    to: 2,
                    dropped: vec![first, second],
                },
            ]
        );
        assert_eq!(state.train(train).sequence(), 40);
        assert!(state.backlog().is_empty());
        assert_eq!(state.package(second).status(), PackageStatus::Delivered);
    }

    #[test]
    fn test_pickup_respects_reserve() {
        let network = build_line(&["A", "B", "C"], &[5, 5]);
        let mut state = SimulationState::default();
        let train = state.add_train("Q1", 10, 0);
        let big = state.add_package("K1", 6, 0, 1);
        let small = state.add_package("K2", 3, 0, 1);
        let target = state.add_package("K3", 4, 2, 0);

        let mut log = Vec::new();
        let leg = Leg {
            train,
            target: 2,
            reserve: state.package(target).weight(),
        };
        move_train(&network, &mut state, &mut log, leg, 100).unwrap();

        // six units are free next to the reserve: K1 fits, K2 no longer does
        assert_eq!(log[0].picked, vec![big]);
        assert_eq!(log[0].dropped, vec![big]);
        assert_eq!(state.package(small).status(), PackageStatus::Pickup);
        assert_eq!(state.package(target).status(), PackageStatus::Pickup);
        assert_eq!(state.train(train).station(), 2);
    }

    #[test]
    fn test_pickup_skips_packages_that_do_not_fit() {
        let network = build_line(&["A", "B"], &[5]);
        let mut state = SimulationState::default();
        let train = state.add_train("Q1", 5, 0);
        let heavy = state.add_package("K1", 6, 0, 1);
        let light = state.add_package("K2", 5, 0, 1);

        let mut log = Vec::new();
        let leg = Leg {
            train,
            target: 1,
            reserve: 0,
        };
        move_train(&network, &mut state, &mut log, leg, 100).unwrap();
        assert_eq!(log[0].picked, vec![light]);
        assert_eq!(state.package(heavy).status(), PackageStatus::Pickup);
        assert!(state.load_weight(train) <= state.train(train).capacity());
    }

    #[test]
    fn test_no_hop_when_already_there() {
        let network = build_line(&["A", "B"], &[5]);
        let mut state = SimulationState::default();
        let train = state.add_train("Q1", 5, 1);
        let mut log = Vec::new();
        let leg = Leg {
            train,
            target: 1,
            reserve: 0,
        };
        assert_eq!(move_train(&network, &mut state, &mut log, leg, 100), Ok(0));
        assert!(log.is_empty());
    }

    #[test]
    fn test_hop_limit_is_an_error() {
        // track runs A-B-C-D but D is listed first, so from B the rule keeps bouncing towards A
        let names = ["D", "A", "B", "C"];
        let mut network = build_line(&names, &[]);
        let (d, a, b, c) = (0, 1, 2, 3);
        network.add_segment("E1", a, b, 1).unwrap();
        network.add_segment("E2", b, c, 1).unwrap();
        network.add_segment("E3", c, d, 1).unwrap();

        let mut state = SimulationState::default();
        let train = state.add_train("Q1", 5, b);
        let mut log = Vec::new();
        let leg = Leg {
            train,
            target: d,
            reserve: 0,
        };
        let result = move_train(&network, &mut state, &mut log, leg, 10);
        assert_eq!(
            result,
            Err(SimulationError::Unreachable {
                train,
                target: d,
                hops: 10
            })
        );
        assert_eq!(log.len(), 10);
        assert_eq!(state.train(train).sequence(), 10);
    }
}
