//! Planner output.
//!
//! Every rack of the ring gets exactly one [`RackPlan`], whatever happened to
//! it, so a reader can tell a skipped rack from a failed one.

use corelib::{NodeId, RackGroup, TokenRing};
use replication::StrategyKind;
use serde::{Deserialize, Serialize};

use crate::optimizer::{Candidate, RackSelection};
use crate::scorer::ScoringPolicy;

/// What happened to a rack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RackStatus {
    Planned,
    /// Not more nodes than the removal count.
    InsufficientNodes,
    /// Removal count of zero.
    Skipped,
    /// Too many combinations to search.
    SearchSpaceExceeded,
}

/// Recommendation for one rack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RackPlan {
    /// `datacenter:rack`.
    pub rack_id: String,
    pub datacenter: String,
    pub rack: String,
    pub node_count: usize,
    pub removal_count: usize,
    pub status: RackStatus,
    /// Addresses to remove, in address order.
    pub best_set: Option<Vec<String>>,
    pub runner_up_set: Option<Vec<String>>,
    pub best_score: Option<f64>,
    pub runner_up_score: Option<f64>,
    /// Candidate sets scored.
    pub trials: usize,
}

impl RackPlan {
    fn empty(group: &RackGroup, removal_count: usize, status: RackStatus) -> Self {
        Self {
            rack_id: group.key.to_string(),
            datacenter: group.key.datacenter.clone(),
            rack: group.key.rack.clone(),
            node_count: group.nodes.len(),
            removal_count,
            status,
            best_set: None,
            runner_up_set: None,
            best_score: None,
            runner_up_score: None,
            trials: 0,
        }
    }

    pub fn skipped(group: &RackGroup) -> Self {
        Self::empty(group, 0, RackStatus::Skipped)
    }

    pub fn insufficient(group: &RackGroup, removal_count: usize) -> Self {
        Self::empty(group, removal_count, RackStatus::InsufficientNodes)
    }

    pub fn search_space_exceeded(group: &RackGroup, removal_count: usize) -> Self {
        Self::empty(group, removal_count, RackStatus::SearchSpaceExceeded)
    }

    pub fn planned(
        ring: &TokenRing,
        group: &RackGroup,
        removal_count: usize,
        selection: &RackSelection,
    ) -> Self {
        let addresses = |candidate: &Candidate| addresses(ring, &candidate.nodes);
        Self {
            best_set: Some(addresses(&selection.best)),
            runner_up_set: selection.runner_up.as_ref().map(addresses),
            best_score: Some(selection.best.score.value()),
            runner_up_score: selection.runner_up.as_ref().map(|c| c.score.value()),
            trials: selection.trials.len(),
            ..Self::empty(group, removal_count, RackStatus::Planned)
        }
    }

    pub fn is_planned(&self) -> bool {
        self.status == RackStatus::Planned
    }
}

fn addresses(ring: &TokenRing, nodes: &[NodeId]) -> Vec<String> {
    nodes
        .iter()
        .filter_map(|id| ring.node(*id))
        .map(|node| node.address.clone())
        .collect()
}

/// Recommendations for the whole ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanReport {
    /// One entry per rack, in (datacenter, rack) order.
    pub racks: Vec<RackPlan>,
    /// Some node was already leaving when the ring was captured.
    pub contains_leaving_nodes: bool,
    pub scoring: ScoringPolicy,
    pub strategy: StrategyKind,
}

impl PlanReport {
    pub fn rack(&self, rack_id: &str) -> Option<&RackPlan> {
        self.racks.iter().find(|plan| plan.rack_id == rack_id)
    }

    pub fn planned(&self) -> impl Iterator<Item = &RackPlan> {
        self.racks.iter().filter(|plan| plan.is_planned())
    }
}
