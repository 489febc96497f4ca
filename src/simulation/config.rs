use serde::Deserialize;

const DEFAULT_HOP_LIMIT: usize = 1000;
const DEFAULT_DELIVERY_LIMIT: usize = 1000;

/// Safety ceilings of a simulation run.
#[derive(Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Maximum number of hops a single train movement may take.
    pub hop_limit: usize,
    /// Maximum number of dispatch iterations for the whole run.
    pub delivery_limit: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            hop_limit: DEFAULT_HOP_LIMIT,
            delivery_limit: DEFAULT_DELIVERY_LIMIT,
        }
    }
}

impl SimulationConfig {
    pub fn with_hop_limit(mut self, hop_limit: usize) -> Self {
        self.hop_limit = hop_limit;
        self
    }

    pub fn with_delivery_limit(mut self, delivery_limit: usize) -> Self {
        self.delivery_limit = delivery_limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_limits() {
        let config: SimulationConfig = toml::from_str("hop_limit = 25").unwrap();
        assert_eq!(config, SimulationConfig::default().with_hop_limit(25));
        assert_eq!(config.delivery_limit, 1000);
    }

    #[test]
    fn test_unknown_limit_is_rejected() {
        assert!(toml::from_str::<SimulationConfig>("hops = 25").is_err());
    }
}
