//! Balance scoring over owned widths.
//!
//! A [`Score`] carries two things:
//! - `value`, the policy's formula evaluated in `f64`, for reports
//! - an exact integer key, used for ranking
//!
//! Widths are on the order of 2^64, where neighbouring `f64` values are
//! thousands of tokens apart. Two candidates whose spreads differ by a few
//! hundred tokens would tie in `f64`; the exact key keeps them apart.
//!
//! Keys are only comparable between scores of the same policy over the same
//! number of values. The optimizer only ever compares candidates of one rack,
//! which always leave the same number of survivors.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use num_bigint::{BigInt, Sign};
use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// How a rack's owned widths are reduced to one imbalance number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringPolicy {
    /// Population standard deviation.
    #[default]
    StdDev,
    /// `(sum of top two) - median + |mean - median|`.
    TopHeavy,
}

impl ScoringPolicy {
    /// Score a set of owned widths. Lower is more balanced.
    ///
    /// One value (or none) scores zero: there is nothing to be unbalanced
    /// against.
    pub fn score(&self, values: &[u128]) -> Score {
        if values.len() <= 1 {
            return Score::zero();
        }
        match self {
            ScoringPolicy::StdDev => std_dev(values),
            ScoringPolicy::TopHeavy => top_heavy(values),
        }
    }
}

impl fmt::Display for ScoringPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringPolicy::StdDev => f.write_str("stddev"),
            ScoringPolicy::TopHeavy => f.write_str("top-heavy"),
        }
    }
}

impl FromStr for ScoringPolicy {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "stddev" | "std-dev" => Ok(ScoringPolicy::StdDev),
            "top-heavy" | "skew" => Ok(ScoringPolicy::TopHeavy),
            _ => Err(PlanError::InvalidConfig(format!(
                "unknown scoring policy {s:?} (expected stddev or top-heavy)"
            ))),
        }
    }
}

/// Imbalance score of one candidate.
#[derive(Debug, Clone)]
pub struct Score {
    value: f64,
    key: BigInt,
}

impl Score {
    pub fn zero() -> Self {
        Self {
            value: 0.0,
            key: BigInt::from(0u8),
        }
    }

    /// The policy's formula, in floating point.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Exact ranking key (a positive multiple of the score).
    pub fn key(&self) -> &BigInt {
        &self.key
    }
}

impl PartialEq for Score {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Score {}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2e}", self.value)
    }
}

fn big(value: u128) -> BigInt {
    BigInt::from(value)
}

fn abs(value: BigInt) -> BigInt {
    if value.sign() == Sign::Minus {
        -value
    } else {
        value
    }
}

/// Key: `n * sum(x^2) - sum(x)^2`, which is `n^2 * variance`.
fn std_dev(values: &[u128]) -> Score {
    let n = values.len();
    let sum: BigInt = values.iter().map(|&v| big(v)).sum();
    let squares: BigInt = values.iter().map(|&v| big(v) * big(v)).sum();
    let key = BigInt::from(n) * squares - &sum * &sum;

    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n as f64;
    let variance = values
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n as f64;

    Score {
        value: variance.sqrt(),
        key,
    }
}

/// Key: the score scaled by `2n`, so median and mean stay integral.
fn top_heavy(values: &[u128]) -> Score {
    let n = values.len();
    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let top_two = big(sorted[n - 1]) + big(sorted[n - 2]);
    // twice the median
    let median2 = if n % 2 == 1 {
        big(sorted[n / 2]) * BigInt::from(2u8)
    } else {
        big(sorted[n / 2 - 1]) + big(sorted[n / 2])
    };
    let sum: BigInt = sorted.iter().map(|&v| big(v)).sum();
    let n_big = BigInt::from(n);
    let two = BigInt::from(2u8);

    let skew = abs(&sum * &two - &n_big * &median2);
    let key = &n_big * &two * &top_two - &n_big * &median2 + skew;

    let median = if n % 2 == 1 {
        sorted[n / 2] as f64
    } else {
        (sorted[n / 2 - 1] as f64 + sorted[n / 2] as f64) / 2.0
    };
    let mean = sorted.iter().map(|&v| v as f64).sum::<f64>() / n as f64;
    let value = (sorted[n - 1] as f64 + sorted[n - 2] as f64) - median + (mean - median).abs();

    Score { value, key }
}
