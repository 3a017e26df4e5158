//! Command line front end for the decommission planner.
//!
//! Provides:
//! - Parsing of `nodetool ring` output into node records
//! - Per-datacenter options, stored next to the ring file
//! - Text and JSON reports

pub mod commands;
pub mod config;
pub mod options;
pub mod report;
pub mod ring_output;

pub use config::{CliConfig, OutputFormat};
pub use options::{LinePrompter, OptionsFile, Overrides, Prompter};
pub use ring_output::{RingOutputError, RingSnapshot};
