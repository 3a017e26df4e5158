//! Planner configuration.
//!
//! Two layers:
//! - [`PlannerConfig`]: how to search (scoring, windows, guards, workers)
//! - [`ClusterConfig`]: what to search for, per datacenter

use std::collections::BTreeMap;

use replication::{StrategyKind, DEFAULT_LOOKAHEAD};
use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};
use crate::scorer::ScoringPolicy;

/// Search configuration shared by every rack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Imbalance score to minimize.
    pub scoring: ScoringPolicy,

    /// Replica window used by the ownership simulation.
    pub strategy: StrategyKind,

    /// Maximum ring entries a replica window inspects past its token.
    pub lookahead: usize,

    /// Racks larger than this are not searched.
    pub max_rack_size: usize,

    /// Maximum candidate sets evaluated per rack.
    pub max_combinations: u64,

    /// Worker threads per rack. 1 evaluates on the calling thread.
    pub workers: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringPolicy::default(),
            strategy: StrategyKind::default(),
            lookahead: DEFAULT_LOOKAHEAD,
            max_rack_size: 64,
            max_combinations: 200_000,
            workers: 1,
        }
    }
}

impl PlannerConfig {
    /// # Errors
    ///
    /// [`PlanError::InvalidConfig`] for a zero lookahead, rack size limit,
    /// combination limit or worker count.
    pub fn validate(&self) -> Result<()> {
        if self.lookahead == 0 {
            return Err(PlanError::InvalidConfig("lookahead must be at least 1".to_string()));
        }
        if self.max_rack_size == 0 {
            return Err(PlanError::InvalidConfig(
                "max_rack_size must be at least 1".to_string(),
            ));
        }
        if self.max_combinations == 0 {
            return Err(PlanError::InvalidConfig(
                "max_combinations must be at least 1".to_string(),
            ));
        }
        if self.workers == 0 {
            return Err(PlanError::InvalidConfig("workers must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Settings for one datacenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatacenterConfig {
    pub replication_factor: usize,
    /// Nodes to remove from each rack; 0 skips the datacenter's racks.
    pub removal_count: usize,
}

impl Default for DatacenterConfig {
    fn default() -> Self {
        Self {
            replication_factor: 3,
            removal_count: 2,
        }
    }
}

/// Per-datacenter settings, read-only to the planner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterConfig {
    datacenters: BTreeMap<String, DatacenterConfig>,
}

impl ClusterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// The same settings for every named datacenter.
    pub fn uniform<'a>(datacenters: impl IntoIterator<Item = &'a str>, config: DatacenterConfig) -> Self {
        datacenters
            .into_iter()
            .map(|dc| (dc.to_string(), config))
            .collect()
    }

    pub fn with_datacenter(mut self, name: impl Into<String>, config: DatacenterConfig) -> Self {
        self.insert(name, config);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, config: DatacenterConfig) {
        self.datacenters.insert(name.into(), config);
    }

    pub fn get(&self, datacenter: &str) -> Option<&DatacenterConfig> {
        self.datacenters.get(datacenter)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DatacenterConfig)> {
        self.datacenters.iter().map(|(name, config)| (name.as_str(), config))
    }

    pub fn len(&self) -> usize {
        self.datacenters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datacenters.is_empty()
    }
}

impl FromIterator<(String, DatacenterConfig)> for ClusterConfig {
    fn from_iter<I: IntoIterator<Item = (String, DatacenterConfig)>>(iter: I) -> Self {
        Self {
            datacenters: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(PlannerConfig::default().validate().is_ok());
        assert_eq!(DatacenterConfig::default().replication_factor, 3);
        assert_eq!(DatacenterConfig::default().removal_count, 2);
        assert_eq!(PlannerConfig::default().max_rack_size, 64);
        assert_eq!(PlannerConfig::default().max_combinations, 200_000);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let config = PlannerConfig {
            workers: 0,
            ..PlannerConfig::default()
        };
        assert!(matches!(config.validate(), Err(PlanError::InvalidConfig(_))));
    }

    #[test]
    fn test_planner_config_partial_json() {
        let config: PlannerConfig =
            serde_json::from_str(r#"{"scoring": "top_heavy", "workers": 4}"#).unwrap();
        assert_eq!(config.scoring, ScoringPolicy::TopHeavy);
        assert_eq!(config.workers, 4);
        assert_eq!(config.lookahead, DEFAULT_LOOKAHEAD);
    }

    #[test]
    fn test_uniform_cluster_config() {
        let config = ClusterConfig::uniform(["DC1", "DC2"], DatacenterConfig::default());
        assert_eq!(config.len(), 2);
        assert_eq!(config.get("DC2"), Some(&DatacenterConfig::default()));
        assert_eq!(config.get("DC3"), None);
    }
}
