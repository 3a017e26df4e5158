//! Per-datacenter options, persisted next to the ring file.
//!
//! The file is JSON keyed by datacenter name:
//!
//! ```json
//! { "DC1": { "rf": 3, "decommission_count": 2 } }
//! ```
//!
//! Datacenters missing from the file, or stored without an `rf`, are asked
//! for on stdin (or take the defaults when running non-interactively) and
//! written back.

use std::collections::BTreeMap;
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use planner::{ClusterConfig, DatacenterConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Stored settings for one datacenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatacenterOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rf: Option<usize>,
    #[serde(default = "default_decommission_count")]
    pub decommission_count: usize,
}

fn default_decommission_count() -> usize {
    DatacenterConfig::default().removal_count
}

impl DatacenterOptions {
    /// The planner settings, or `None` while `rf` is unknown.
    pub fn resolved(&self) -> Option<DatacenterConfig> {
        self.rf.map(|rf| DatacenterConfig {
            replication_factor: rf,
            removal_count: self.decommission_count,
        })
    }
}

/// Command line values that win over the file for every datacenter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overrides {
    pub replication_factor: Option<usize>,
    pub removal_count: Option<usize>,
}

impl Overrides {
    fn apply(&self, config: DatacenterConfig) -> DatacenterConfig {
        DatacenterConfig {
            replication_factor: self.replication_factor.unwrap_or(config.replication_factor),
            removal_count: self.removal_count.unwrap_or(config.removal_count),
        }
    }

    fn is_complete(&self) -> bool {
        self.replication_factor.is_some() && self.removal_count.is_some()
    }
}

/// Source of answers for datacenters missing from the options file.
pub trait Prompter {
    /// Ask for a number; an empty answer means `default`.
    fn ask(&mut self, question: &str, default: usize) -> Result<usize>;
}

/// Prompts on a writer and reads answers line by line.
#[derive(Debug)]
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn ask(&mut self, question: &str, default: usize) -> Result<usize> {
        loop {
            write!(self.output, "{question} (default {default}): ")?;
            self.output.flush()?;

            let mut answer = String::new();
            if self.input.read_line(&mut answer)? == 0 {
                return Ok(default);
            }
            let answer = answer.trim();
            if answer.is_empty() {
                return Ok(default);
            }
            match answer.parse() {
                Ok(value) => return Ok(value),
                Err(_) => writeln!(self.output, "not a number: {answer}")?,
            }
        }
    }
}

/// The options file and its entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionsFile {
    path: PathBuf,
    entries: BTreeMap<String, DatacenterOptions>,
    dirty: bool,
}

impl OptionsFile {
    /// `<ring file>.options`, next to the ring file.
    pub fn path_for(ring_file: &Path) -> PathBuf {
        let mut name = ring_file.as_os_str().to_owned();
        name.push(".options");
        PathBuf::from(name)
    }

    /// Load `path`, or start empty if it does not exist.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)
                .with_context(|| format!("invalid options file {}", path.display()))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no options file");
                BTreeMap::new()
            }
            Err(err) => {
                return Err(err).with_context(|| format!("failed to read {}", path.display()))
            }
        };
        Ok(Self {
            path,
            entries,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, datacenter: &str) -> Option<&DatacenterOptions> {
        self.entries.get(datacenter)
    }

    /// Build the cluster configuration for `datacenters`.
    ///
    /// Datacenters that are missing or lack an `rf` are asked for through
    /// `prompter`, or take the defaults when it is `None`; either way the
    /// answers are recorded. When `overrides` set both values nothing is asked
    /// or recorded.
    pub fn resolve(
        &mut self,
        datacenters: &[&str],
        overrides: Overrides,
        mut prompter: Option<&mut dyn Prompter>,
    ) -> Result<ClusterConfig> {
        let defaults = DatacenterConfig::default();
        let mut cluster = ClusterConfig::new();
        for &dc in datacenters {
            let stored = match self.entries.get(dc).and_then(DatacenterOptions::resolved) {
                Some(config) => config,
                None if overrides.is_complete() => defaults,
                None => {
                    let options = match prompter.as_deref_mut() {
                        Some(prompter) => ask(prompter, dc, overrides)?,
                        None => default_options(overrides),
                    };
                    let config = DatacenterConfig {
                        replication_factor: options.rf.unwrap_or(defaults.replication_factor),
                        removal_count: options.decommission_count,
                    };
                    info!(datacenter = dc, rf = config.replication_factor, count = config.removal_count, "recorded datacenter options");
                    self.entries.insert(dc.to_string(), options);
                    self.dirty = true;
                    config
                }
            };
            cluster.insert(dc, overrides.apply(stored));
        }
        Ok(cluster)
    }

    /// Write the entries back if `resolve` added any.
    pub fn save(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, json + "\n")
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        self.dirty = false;
        Ok(())
    }
}

fn default_options(overrides: Overrides) -> DatacenterOptions {
    let config = overrides.apply(DatacenterConfig::default());
    DatacenterOptions {
        rf: Some(config.replication_factor),
        decommission_count: config.removal_count,
    }
}

fn ask(prompter: &mut dyn Prompter, dc: &str, overrides: Overrides) -> Result<DatacenterOptions> {
    let defaults = DatacenterConfig::default();
    let rf = match overrides.replication_factor {
        Some(rf) => rf,
        None => prompter.ask(
            &format!("DC: {dc}, Enter replication factor (aka RF)"),
            defaults.replication_factor,
        )?,
    };
    let decommission_count = match overrides.removal_count {
        Some(count) => count,
        None => prompter.ask(
            &format!("DC: {dc}, Enter node count to decommission (per-rack)"),
            defaults.removal_count,
        )?,
    };
    Ok(DatacenterOptions {
        rf: Some(rf),
        decommission_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Answers from a fixed list, recording the questions.
    struct Scripted {
        answers: Vec<usize>,
        questions: Vec<String>,
    }

    impl Prompter for Scripted {
        fn ask(&mut self, question: &str, default: usize) -> Result<usize> {
            self.questions.push(question.to_string());
            Ok(if self.answers.is_empty() {
                default
            } else {
                self.answers.remove(0)
            })
        }
    }

    #[test]
    fn test_path_for_appends_suffix() {
        assert_eq!(
            OptionsFile::path_for(Path::new("/tmp/ring.out")),
            PathBuf::from("/tmp/ring.out.options")
        );
    }

    #[test]
    fn test_line_prompter() {
        let mut output = Vec::new();
        let mut prompter = LinePrompter::new(Cursor::new("\nabc\n5\n"), &mut output);
        assert_eq!(prompter.ask("rf", 3).unwrap(), 3);
        assert_eq!(prompter.ask("count", 2).unwrap(), 5);
        // end of input takes the default
        assert_eq!(prompter.ask("count", 2).unwrap(), 2);
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("rf (default 3): "));
        assert!(output.contains("not a number: abc"));
    }

    #[test]
    fn test_missing_datacenter_prompts_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ring.out.options");
        fs::write(&path, r#"{"DC1": {"rf": 5, "decommission_count": 1}}"#).unwrap();

        let mut options = OptionsFile::load(&path).unwrap();
        let mut prompter = Scripted {
            answers: vec![2, 4],
            questions: Vec::new(),
        };
        let cluster = options
            .resolve(&["DC1", "DC2"], Overrides::default(), Some(&mut prompter))
            .unwrap();

        assert_eq!(prompter.questions.len(), 2);
        assert!(prompter.questions[0].starts_with("DC: DC2"));
        assert_eq!(
            cluster.get("DC1"),
            Some(&DatacenterConfig { replication_factor: 5, removal_count: 1 })
        );
        assert_eq!(
            cluster.get("DC2"),
            Some(&DatacenterConfig { replication_factor: 2, removal_count: 4 })
        );

        options.save().unwrap();
        let reloaded = OptionsFile::load(&path).unwrap();
        assert_eq!(
            reloaded.get("DC2"),
            Some(&DatacenterOptions { rf: Some(2), decommission_count: 4 })
        );
    }

    #[test]
    fn test_non_interactive_takes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let mut options = OptionsFile::load(dir.path().join("missing.options")).unwrap();
        let cluster = options
            .resolve(&["DC1"], Overrides::default(), None)
            .unwrap();
        assert_eq!(cluster.get("DC1"), Some(&DatacenterConfig::default()));
        assert!(options.get("DC1").is_some());
    }

    #[test]
    fn test_overrides_win_and_skip_prompting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ring.out.options");
        fs::write(&path, r#"{"DC1": {"rf": 5}}"#).unwrap();

        let mut options = OptionsFile::load(&path).unwrap();
        assert_eq!(options.get("DC1").unwrap().decommission_count, 2);

        let overrides = Overrides {
            replication_factor: Some(3),
            removal_count: Some(1),
        };
        let mut prompter = Scripted {
            answers: Vec::new(),
            questions: Vec::new(),
        };
        let cluster = options
            .resolve(&["DC1", "DC2"], overrides, Some(&mut prompter))
            .unwrap();
        assert!(prompter.questions.is_empty());
        for dc in ["DC1", "DC2"] {
            assert_eq!(
                cluster.get(dc),
                Some(&DatacenterConfig { replication_factor: 3, removal_count: 1 })
            );
        }
        assert!(options.get("DC2").is_none());
    }

    #[test]
    fn test_entry_without_rf_is_asked_again() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ring.out.options");
        fs::write(&path, r#"{"DC1": {"decommission_count": 1}}"#).unwrap();

        let mut options = OptionsFile::load(&path).unwrap();
        assert_eq!(options.get("DC1").unwrap().rf, None);

        let mut prompter = Scripted {
            answers: vec![5, 3],
            questions: Vec::new(),
        };
        let cluster = options
            .resolve(&["DC1"], Overrides::default(), Some(&mut prompter))
            .unwrap();
        assert_eq!(prompter.questions.len(), 2);
        assert_eq!(
            cluster.get("DC1"),
            Some(&DatacenterConfig { replication_factor: 5, removal_count: 3 })
        );

        options.save().unwrap();
        let saved: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved["DC1"]["rf"], 5);
        assert_eq!(saved["DC1"]["decommission_count"], 3);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.options");
        fs::write(&path, "not json").unwrap();
        assert!(OptionsFile::load(&path).is_err());
    }
}
