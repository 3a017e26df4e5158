//! Exhaustive search over one rack's removal combinations.
//!
//! # Algorithm
//!
//! 1. Sort the rack's nodes by id (address order) and enumerate every
//!    k-combination in lexicographic order. Order of removal does not change
//!    the reduced ring, so permutations are never generated.
//! 2. For each combination, reduce the ring, compute the owned width of every
//!    surviving rack node and score the widths.
//! 3. Best is the lowest score; runner-up is the lowest score among
//!    combinations sharing no node with best. Ties go to the combination
//!    enumerated first.
//!
//! # Concurrency
//!
//! With `workers > 1` the combination list is split into contiguous chunks,
//! each scored on a scoped thread. Chunks are joined in order, so the selected
//! candidates do not depend on which thread finishes first.

use corelib::{NodeId, RackGroup, TokenRing};
use itertools::Itertools;
use replication::OwnershipCalculator;
use tracing::{debug, info};

use crate::config::PlannerConfig;
use crate::error::{PlanError, Result};
use crate::scorer::Score;

/// One scored removal set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Nodes to remove, in address order.
    pub nodes: Vec<NodeId>,
    pub score: Score,
}

impl Candidate {
    pub fn is_disjoint(&self, other: &[NodeId]) -> bool {
        !self.nodes.iter().any(|node| other.contains(node))
    }
}

/// Outcome of searching one rack.
#[derive(Debug, Clone)]
pub struct RackSelection {
    pub best: Candidate,
    /// Best candidate sharing no node with `best`, if any exists.
    pub runner_up: Option<Candidate>,
    /// Every scored candidate, in enumeration order.
    pub trials: Vec<Candidate>,
}

/// Searches removal combinations against one immutable ring.
#[derive(Debug, Clone, Copy)]
pub struct Optimizer<'a> {
    ring: &'a TokenRing,
    config: &'a PlannerConfig,
}

impl<'a> Optimizer<'a> {
    pub fn new(ring: &'a TokenRing, config: &'a PlannerConfig) -> Self {
        Self { ring, config }
    }

    /// Find the best and runner-up sets of `removal_count` nodes to remove
    /// from `rack`.
    ///
    /// # Errors
    ///
    /// - [`PlanError::InvalidConfig`] for a zero removal count
    /// - [`PlanError::InsufficientRackSize`] if the rack has no more than
    ///   `removal_count` nodes
    /// - [`PlanError::SearchSpaceTooLarge`] if the rack or the combination
    ///   count exceeds the configured guards
    /// - ownership errors from the simulation
    pub fn plan(
        &self,
        rack: &RackGroup,
        removal_count: usize,
        replication_factor: usize,
    ) -> Result<RackSelection> {
        let rack_id = rack.key.to_string();
        if removal_count == 0 {
            return Err(PlanError::InvalidConfig(format!(
                "rack {rack_id}: removal count must be at least 1"
            )));
        }
        let mut nodes = rack.nodes.clone();
        nodes.sort_unstable();
        nodes.dedup();
        if nodes.len() <= removal_count {
            return Err(PlanError::InsufficientRackSize {
                rack: rack_id,
                available: nodes.len(),
                removal_count,
            });
        }
        let within_limit = nodes.len() <= self.config.max_rack_size
            && combination_count(nodes.len(), removal_count)
                .is_some_and(|count| count <= u128::from(self.config.max_combinations));
        if !within_limit {
            return Err(PlanError::SearchSpaceTooLarge {
                rack: rack_id,
                nodes: nodes.len(),
                removal_count,
            });
        }

        let strategy = self
            .config
            .strategy
            .build(replication_factor, self.config.lookahead);
        let calculator = OwnershipCalculator::new(strategy.as_ref());

        let combinations: Vec<Vec<NodeId>> =
            nodes.iter().copied().combinations(removal_count).collect();
        let scores = self.score_all(calculator, &nodes, &combinations)?;

        let trials: Vec<Candidate> = combinations
            .into_iter()
            .zip(scores)
            .map(|(nodes, score)| Candidate { nodes, score })
            .collect();

        let best_index = lowest(trials.iter().enumerate()).ok_or_else(|| {
            PlanError::InvalidConfig(format!("rack {rack_id}: no candidate sets"))
        })?;
        let best = trials[best_index].clone();
        let runner_up = lowest(
            trials
                .iter()
                .enumerate()
                .filter(|(_, candidate)| candidate.is_disjoint(&best.nodes)),
        )
        .map(|index| trials[index].clone());

        info!(
            rack = %rack_id,
            trials = trials.len(),
            best = %best.score,
            runner_up = ?runner_up.as_ref().map(|c| c.score.value()),
            "selected removal candidates"
        );

        Ok(RackSelection {
            best,
            runner_up,
            trials,
        })
    }

    /// Score one removal set against a fresh reduced view of the ring.
    pub fn score_removal(
        &self,
        calculator: OwnershipCalculator<'_>,
        rack_nodes: &[NodeId],
        removal: &[NodeId],
    ) -> Result<Score> {
        let view = self.ring.without(removal);
        let survivors: Vec<NodeId> = rack_nodes
            .iter()
            .copied()
            .filter(|node| !removal.contains(node))
            .collect();
        let ownership = calculator.ownership(&view, &survivors)?;
        let widths: Vec<u128> = ownership.values().copied().collect();
        let score = self.config.scoring.score(&widths);
        debug!(removal = ?removal, widths = ?widths, score = %score, "scored candidate");
        Ok(score)
    }

    fn score_all(
        &self,
        calculator: OwnershipCalculator<'_>,
        rack_nodes: &[NodeId],
        combinations: &[Vec<NodeId>],
    ) -> Result<Vec<Score>> {
        let workers = self.config.workers.clamp(1, combinations.len().max(1));
        if workers == 1 {
            return combinations
                .iter()
                .map(|removal| self.score_removal(calculator, rack_nodes, removal))
                .collect();
        }

        let chunk_size = combinations.len().div_ceil(workers);
        crossbeam::thread::scope(|scope| -> Result<Vec<Score>> {
            let handles: Vec<_> = combinations
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move |_| {
                        chunk
                            .iter()
                            .map(|removal| self.score_removal(calculator, rack_nodes, removal))
                            .collect::<Result<Vec<Score>>>()
                    })
                })
                .collect();

            let mut scores = Vec::with_capacity(combinations.len());
            for handle in handles {
                let chunk_scores = handle.join().map_err(|_| PlanError::WorkerPanicked)??;
                scores.extend(chunk_scores);
            }
            Ok(scores)
        })
        .map_err(|_| PlanError::WorkerPanicked)?
    }
}

/// Index of the lowest-scoring candidate; the earliest wins ties.
fn lowest<'c>(candidates: impl Iterator<Item = (usize, &'c Candidate)>) -> Option<usize> {
    let mut best: Option<(usize, &Score)> = None;
    for (index, candidate) in candidates {
        match best {
            Some((_, score)) if candidate.score >= *score => {}
            _ => best = Some((index, &candidate.score)),
        }
    }
    best.map(|(index, _)| index)
}

/// `C(n, k)`, or `None` on overflow.
pub fn combination_count(n: usize, k: usize) -> Option<u128> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    let mut count: u128 = 1;
    for i in 0..k {
        count = count.checked_mul((n - i) as u128)? / (i as u128 + 1);
    }
    Some(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::{NodeRecord, RackKey, RingBuilder};

    fn ring() -> TokenRing {
        RingBuilder::new()
            .add_record(NodeRecord::new("A", "DC1", "R1", [0, 100]))
            .add_record(NodeRecord::new("B", "DC1", "R1", [50, 150]))
            .add_record(NodeRecord::new("C", "DC1", "R1", [25, 125]))
            .build()
            .unwrap()
    }

    fn rack(ring: &TokenRing) -> RackGroup {
        ring.topology()
            .rack_group(&RackKey::new("DC1", "R1"))
            .unwrap()
    }

    #[test]
    fn test_combination_count() {
        assert_eq!(combination_count(5, 2), Some(10));
        assert_eq!(combination_count(3, 1), Some(3));
        assert_eq!(combination_count(4, 4), Some(1));
        assert_eq!(combination_count(2, 3), Some(0));
        assert_eq!(combination_count(64, 32), Some(1_832_624_140_942_590_534));
        assert_eq!(combination_count(200, 100), None);
    }

    #[test]
    fn test_lowest_prefers_first_on_tie() {
        let candidates = vec![
            Candidate { nodes: vec![NodeId(0)], score: Score::zero() },
            Candidate { nodes: vec![NodeId(1)], score: Score::zero() },
        ];
        assert_eq!(lowest(candidates.iter().enumerate()), Some(0));
        assert_eq!(lowest(std::iter::empty()), None);
    }

    #[test]
    fn test_one_trial_per_survivor() {
        let ring = ring();
        let config = PlannerConfig::default();
        let selection = Optimizer::new(&ring, &config).plan(&rack(&ring), 2, 3).unwrap();
        assert_eq!(selection.trials.len(), 3);
        // two of three removed: a single survivor always scores zero
        for trial in &selection.trials {
            assert_eq!(trial.score, Score::zero());
        }
        // first combination wins the tie; every other pair overlaps it
        assert_eq!(selection.best.nodes, vec![NodeId(0), NodeId(1)]);
        assert!(selection.runner_up.is_none());
    }

    #[test]
    fn test_insufficient_rack() {
        let ring = ring();
        let config = PlannerConfig::default();
        let err = Optimizer::new(&ring, &config).plan(&rack(&ring), 3, 3).unwrap_err();
        assert!(matches!(
            err,
            PlanError::InsufficientRackSize { available: 3, removal_count: 3, .. }
        ));
    }

    #[test]
    fn test_guards() {
        let ring = ring();
        let config = PlannerConfig {
            max_combinations: 2,
            ..PlannerConfig::default()
        };
        let err = Optimizer::new(&ring, &config).plan(&rack(&ring), 1, 3).unwrap_err();
        assert!(matches!(err, PlanError::SearchSpaceTooLarge { nodes: 3, .. }));

        let config = PlannerConfig {
            max_rack_size: 2,
            ..PlannerConfig::default()
        };
        let err = Optimizer::new(&ring, &config).plan(&rack(&ring), 1, 3).unwrap_err();
        assert!(matches!(err, PlanError::SearchSpaceTooLarge { .. }));
    }

    #[test]
    fn test_zero_removal_rejected() {
        let ring = ring();
        let config = PlannerConfig::default();
        let err = Optimizer::new(&ring, &config).plan(&rack(&ring), 0, 3).unwrap_err();
        assert!(matches!(err, PlanError::InvalidConfig(_)));
    }
}
