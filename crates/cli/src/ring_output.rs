//! Parser for `nodetool ring` output.
//!
//! The output is grouped by datacenter:
//!
//! ```text
//! Datacenter: DC1
//! ==========
//! Address    Rack   Status State   Load      Owns    Token
//!                                                    9187343239835811839
//! 10.0.0.1   R1     Up     Normal  1.2 GiB   33.3%   -9223372036854775808
//! 10.0.0.2   R1     Up     Normal  1.1 GiB   33.3%   -3074457345618258603
//! ```
//!
//! Every node line carries one token; nodes with several vnodes appear once
//! per token and are merged by address when the ring is built.

use std::fs;
use std::path::Path;

use corelib::{Murmur3Token, NodeRecord, RingBuilder, TokenError, TokenRing};
use thiserror::Error;

/// Errors produced while reading ring output.
#[derive(Debug, Error)]
pub enum RingOutputError {
    #[error("line {line}: unrecognized line: {text}")]
    UnrecognizedLine { line: usize, text: String },

    #[error("line {line}: node line before any `Datacenter:` header")]
    MissingDatacenter { line: usize },

    #[error("line {line}: bad token")]
    InvalidToken {
        line: usize,
        #[source]
        source: TokenError,
    },

    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Node records captured from one ring listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RingSnapshot {
    /// One record per node line, in file order.
    pub records: Vec<NodeRecord>,
    /// Some line reported a node in the `Leaving` state.
    pub contains_leaving_nodes: bool,
}

impl RingSnapshot {
    pub fn from_file(path: &Path) -> Result<Self, RingOutputError> {
        let text = fs::read_to_string(path).map_err(|source| RingOutputError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, RingOutputError> {
        let mut snapshot = RingSnapshot::default();
        let mut datacenter: Option<String> = None;

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            if is_ignored(raw) {
                continue;
            }
            if let Some(name) = raw.strip_prefix("Datacenter:") {
                datacenter = Some(name.trim().to_string());
                continue;
            }
            if raw.contains("Leaving") {
                snapshot.contains_leaving_nodes = true;
                continue;
            }

            let unrecognized = || RingOutputError::UnrecognizedLine {
                line,
                text: raw.to_string(),
            };
            let fields: Vec<&str> = raw.split_whitespace().collect();
            let [address, rack, .., last] = fields.as_slice() else {
                return Err(unrecognized());
            };
            let token = match last.parse::<Murmur3Token>() {
                Ok(token) => token,
                Err(source) if is_integer(last) => {
                    return Err(RingOutputError::InvalidToken { line, source })
                }
                Err(_) => return Err(unrecognized()),
            };
            let Some(dc) = datacenter.as_deref() else {
                return Err(RingOutputError::MissingDatacenter { line });
            };
            snapshot
                .records
                .push(NodeRecord::new(*address, dc, *rack, [token.0]));
        }

        Ok(snapshot)
    }

    /// Datacenter names in first-seen order.
    pub fn datacenters(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for record in &self.records {
            if !names.contains(&record.datacenter.as_str()) {
                names.push(&record.datacenter);
            }
        }
        names
    }

    /// Merge records by address and build the ring.
    pub fn into_ring(self) -> corelib::Result<TokenRing> {
        RingBuilder::new()
            .add_records(self.records)
            .with_leaving_nodes(self.contains_leaving_nodes)
            .build()
    }
}

fn is_ignored(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty()
        || line.starts_with('=')
        || line.starts_with("Address")
        || trimmed.parse::<Murmur3Token>().is_ok()
        || trimmed.starts_with("Note:")
        || trimmed.starts_with("Warning:")
        || trimmed.starts_with("To view status")
}

/// Digits with an optional leading minus, of any length.
fn is_integer(field: &str) -> bool {
    let digits = field.strip_prefix('-').unwrap_or(field);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
