//! Command line configuration.

use std::io;
use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use planner::{PlannerConfig, ScoringPolicy};
use replication::StrategyKind;

use crate::commands;
use crate::options::{LinePrompter, Overrides};

/// Recommends which nodes to decommission from each rack of a vnode ring.
///
/// Reads `nodetool ring` output, simulates every removal set per rack and
/// reports the set leaving the rack's ownership most balanced.
#[derive(Debug, Clone, Parser)]
#[command(name = "vnode-decommission")]
#[command(author, version, about, long_about = None)]
pub struct CliConfig {
    /// File holding `nodetool ring` output.
    pub ring_file: PathBuf,

    /// Nodes to remove from each rack, for every datacenter.
    #[arg(short = 'n', long = "remove")]
    pub removal_count: Option<usize>,

    /// Replication factor, for every datacenter.
    #[arg(long)]
    pub rf: Option<usize>,

    /// Options file (default: `<ring-file>.options`).
    #[arg(long)]
    pub options: Option<PathBuf>,

    /// Never prompt; missing datacenters take the defaults.
    #[arg(short = 'y', long)]
    pub non_interactive: bool,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Imbalance score to minimize (stddev, top-heavy).
    #[arg(long, default_value_t = ScoringPolicy::StdDev)]
    pub scoring: ScoringPolicy,

    /// Replica window (rack-aware, simple).
    #[arg(long, default_value_t = StrategyKind::RackAware)]
    pub strategy: StrategyKind,

    /// Ring entries a replica window may inspect past its token.
    #[arg(long, default_value_t = replication::DEFAULT_LOOKAHEAD)]
    pub lookahead: usize,

    /// Worker threads per rack.
    #[arg(short, long, default_value_t = 1)]
    pub workers: usize,

    /// Racks with more nodes are not searched.
    #[arg(long, default_value_t = 64)]
    pub max_rack_size: usize,

    /// Maximum removal sets evaluated per rack.
    #[arg(long, default_value_t = 200_000)]
    pub max_combinations: u64,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

impl CliConfig {
    pub fn planner_config(&self) -> PlannerConfig {
        PlannerConfig {
            scoring: self.scoring,
            strategy: self.strategy,
            lookahead: self.lookahead,
            max_rack_size: self.max_rack_size,
            max_combinations: self.max_combinations,
            workers: self.workers,
        }
    }

    pub fn overrides(&self) -> Overrides {
        Overrides {
            replication_factor: self.rf,
            removal_count: self.removal_count,
        }
    }

    pub fn options_path(&self) -> PathBuf {
        self.options
            .clone()
            .unwrap_or_else(|| crate::options::OptionsFile::path_for(&self.ring_file))
    }

    /// Default log filter for the verbosity flag.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Plan and print to stdout, reading answers for unknown datacenters
    /// from stdin unless `--non-interactive` is set.
    pub fn run(&self) -> anyhow::Result<()> {
        let mut stdout = io::stdout().lock();

        if !self.non_interactive {
            let mut prompter = LinePrompter::new(io::stdin().lock(), io::stderr());
            commands::plan(self, Some(&mut prompter), &mut stdout)?;
        } else {
            commands::plan(self, None, &mut stdout)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::parse_from(["vnode-decommission", "ring.out"]);
        assert_eq!(config.planner_config(), PlannerConfig::default());
        assert_eq!(config.overrides(), Overrides::default());
        assert_eq!(config.options_path(), PathBuf::from("ring.out.options"));
        assert_eq!(config.format, OutputFormat::Text);
        assert_eq!(config.log_filter(), "warn");
    }

    #[test]
    fn test_flags() {
        let config = CliConfig::parse_from([
            "vnode-decommission",
            "ring.out",
            "--remove",
            "1",
            "--rf",
            "5",
            "--scoring",
            "top-heavy",
            "--strategy",
            "simple",
            "--format",
            "json",
            "-w",
            "4",
            "-vv",
        ]);
        assert_eq!(config.removal_count, Some(1));
        assert_eq!(config.rf, Some(5));
        assert_eq!(config.scoring, ScoringPolicy::TopHeavy);
        assert_eq!(config.strategy, StrategyKind::Simple);
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.planner_config().workers, 4);
        assert_eq!(config.log_filter(), "trace");
    }

    #[test]
    fn test_unknown_scoring_rejected() {
        let result = CliConfig::try_parse_from(["vnode-decommission", "ring.out", "--scoring", "median"]);
        assert!(result.is_err());
    }
}
