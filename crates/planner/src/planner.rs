//! Per-rack orchestration.

use corelib::{RackGroup, TokenRing};
use tracing::{info, warn};

use crate::config::{ClusterConfig, DatacenterConfig, PlannerConfig};
use crate::error::{PlanError, Result};
use crate::optimizer::Optimizer;
use crate::report::{PlanReport, RackPlan};

/// Runs the optimizer over every rack of a ring.
#[derive(Debug, Clone, Default)]
pub struct DecommissionPlanner {
    config: PlannerConfig,
}

impl DecommissionPlanner {
    /// # Errors
    ///
    /// [`PlanError::InvalidConfig`] if `config` fails validation.
    pub fn new(config: PlannerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan removals for every rack of `ring`.
    ///
    /// Racks are independent: one that is too small or too large to search
    /// gets its own status and the rest are still planned.
    ///
    /// # Errors
    ///
    /// - [`PlanError::MissingDatacenterConfig`] for a datacenter without
    ///   settings
    /// - any error that is not specific to one rack
    pub fn plan(&self, ring: &TokenRing, cluster: &ClusterConfig) -> Result<PlanReport> {
        let topology = ring.topology();
        let optimizer = Optimizer::new(ring, &self.config);

        let mut racks = Vec::with_capacity(topology.rack_count());
        for group in topology.rack_groups() {
            let settings = cluster
                .get(&group.key.datacenter)
                .ok_or_else(|| PlanError::MissingDatacenterConfig(group.key.datacenter.clone()))?;
            racks.push(self.plan_rack(ring, &optimizer, &group, settings)?);
        }

        if topology.contains_leaving_nodes() {
            warn!("ring contains leaving nodes; plans assume their departure has not started");
        }
        info!(
            racks = racks.len(),
            planned = racks.iter().filter(|plan| plan.is_planned()).count(),
            "decommission plan complete"
        );

        Ok(PlanReport {
            racks,
            contains_leaving_nodes: topology.contains_leaving_nodes(),
            scoring: self.config.scoring,
            strategy: self.config.strategy,
        })
    }

    fn plan_rack(
        &self,
        ring: &TokenRing,
        optimizer: &Optimizer<'_>,
        group: &RackGroup,
        settings: &DatacenterConfig,
    ) -> Result<RackPlan> {
        let removal_count = settings.removal_count;
        if removal_count == 0 {
            info!(rack = %group.key, "removal count is zero, skipping rack");
            return Ok(RackPlan::skipped(group));
        }
        match optimizer.plan(group, removal_count, settings.replication_factor) {
            Ok(selection) => Ok(RackPlan::planned(ring, group, removal_count, &selection)),
            Err(err @ PlanError::InsufficientRackSize { .. }) => {
                warn!(rack = %group.key, error = %err, "rack cannot be planned");
                Ok(RackPlan::insufficient(group, removal_count))
            }
            Err(err @ PlanError::SearchSpaceTooLarge { .. }) => {
                warn!(rack = %group.key, error = %err, "rack cannot be planned");
                Ok(RackPlan::search_space_exceeded(group, removal_count))
            }
            Err(err) => Err(err),
        }
    }
}
