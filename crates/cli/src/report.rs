//! Text rendering of a plan.

use std::io::{self, Write};

use corelib::TokenRing;
use planner::{ClusterConfig, PlanReport, PlannerConfig, RackPlan, RackStatus};

/// Write the ring summary, the per-rack plan and any warnings.
pub fn render_text(
    out: &mut dyn Write,
    ring: &TokenRing,
    cluster: &ClusterConfig,
    config: &PlannerConfig,
    report: &PlanReport,
) -> io::Result<()> {
    let topology = ring.topology();

    writeln!(out, "node count: {}", topology.node_count())?;
    writeln!(out, "rack count: {}", topology.rack_count())?;
    writeln!(out, "rack descr:")?;
    for group in topology.rack_groups() {
        writeln!(out, "- {}: {}", group.key, group.nodes.len())?;
    }
    writeln!(out, "token count: {}", topology.token_count())?;
    for (dc, settings) in cluster.iter() {
        writeln!(
            out,
            "{dc}: rf {}, nodes to remove from each rack: {}",
            settings.replication_factor, settings.removal_count
        )?;
    }
    writeln!(
        out,
        "scoring: {}, strategy: {}, lookahead: {}",
        config.scoring, config.strategy, config.lookahead
    )?;

    writeln!(out)?;
    writeln!(out, "decommission plan:")?;
    for plan in &report.racks {
        writeln!(out, "=> {}: {}", plan.rack_id, describe(plan))?;
    }

    if report.contains_leaving_nodes {
        writeln!(out)?;
        writeln!(out, "WARNING: ring output contains leaving nodes")?;
        writeln!(
            out,
            "Wait until decommission is complete before decommissioning further nodes!!"
        )?;
    }
    Ok(())
}

fn describe(plan: &RackPlan) -> String {
    match plan.status {
        RackStatus::Planned => {
            let best = candidate(plan.best_set.as_deref(), plan.best_score);
            let next = match plan.runner_up_set.as_deref() {
                Some(nodes) => candidate(Some(nodes), plan.runner_up_score),
                None => "none".to_string(),
            };
            format!("{best} (next best: {next})")
        }
        RackStatus::InsufficientNodes => format!(
            "unable to remove {} nodes from this rack",
            plan.removal_count
        ),
        RackStatus::Skipped => "skipped, nothing to remove".to_string(),
        RackStatus::SearchSpaceExceeded => format!(
            "too many combinations to choose {} of {} nodes",
            plan.removal_count, plan.node_count
        ),
    }
}

fn candidate(nodes: Option<&[String]>, score: Option<f64>) -> String {
    let nodes = nodes.unwrap_or_default();
    let list = if nodes.len() < 2 {
        nodes.join("")
    } else {
        format!("first {}", nodes.join(", then "))
    };
    match score {
        Some(score) => format!("{list} [{}]", format_score(score)),
        None => list,
    }
}

/// Three significant digits with a signed two-digit exponent, e.g. `1.23e+04`.
fn format_score(value: f64) -> String {
    let formatted = format!("{value:.2e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => match exponent.parse::<i32>() {
            Ok(exp) => {
                let sign = if exp < 0 { '-' } else { '+' };
                format!("{mantissa}e{sign}{:02}", exp.unsigned_abs())
            }
            Err(_) => formatted,
        },
        None => formatted,
    }
}
