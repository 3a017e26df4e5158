//! The plan command.

use std::io::Write;

use anyhow::Context;
use planner::{DecommissionPlanner, PlanReport};
use tracing::info;

use crate::config::{CliConfig, OutputFormat};
use crate::options::{OptionsFile, Prompter};
use crate::report::render_text;
use crate::ring_output::RingSnapshot;

/// Read the ring file, resolve per-datacenter options, plan every rack and
/// write the report to `out`.
///
/// `prompter` answers for datacenters missing from the options file; `None`
/// takes the defaults.
pub fn plan(
    config: &CliConfig,
    prompter: Option<&mut dyn Prompter>,
    out: &mut dyn Write,
) -> anyhow::Result<PlanReport> {
    info!(ring_file = %config.ring_file.display(), "calculating");
    let snapshot = RingSnapshot::from_file(&config.ring_file)?;
    let datacenters: Vec<String> = snapshot
        .datacenters()
        .into_iter()
        .map(str::to_string)
        .collect();
    let ring = snapshot
        .into_ring()
        .with_context(|| format!("invalid ring in {}", config.ring_file.display()))?;

    let mut options = OptionsFile::load(config.options_path())?;
    let names: Vec<&str> = datacenters.iter().map(String::as_str).collect();
    let cluster = options.resolve(&names, config.overrides(), prompter)?;
    options.save()?;

    let planner_config = config.planner_config();
    let report = DecommissionPlanner::new(planner_config.clone())?.plan(&ring, &cluster)?;

    match config.format {
        OutputFormat::Text => render_text(out, &ring, &cluster, &planner_config, &report)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }
    }
    Ok(report)
}
