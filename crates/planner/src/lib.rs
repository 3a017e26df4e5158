//! Combinatorial decommission planning.
//!
//! Given a [`corelib::TokenRing`] and per-datacenter configuration, this crate
//! picks, for every rack, the set of nodes whose removal leaves the rack's
//! ownership most balanced, plus a disjoint runner-up:
//! - [`scorer`]: imbalance score over owned widths
//! - [`optimizer`]: exhaustive search over one rack's removal combinations
//! - [`planner`]: per-rack orchestration into a [`PlanReport`]
//!
//! Nothing here touches a live cluster; every trial runs on a reduced copy of
//! the ring.

pub mod config;
pub mod error;
pub mod optimizer;
pub mod planner;
pub mod report;
pub mod scorer;

pub use config::{ClusterConfig, DatacenterConfig, PlannerConfig};
pub use error::{PlanError, Result};
pub use optimizer::{Candidate, Optimizer, RackSelection};
pub use planner::DecommissionPlanner;
pub use report::{PlanReport, RackPlan, RackStatus};
pub use scorer::{Score, ScoringPolicy};
