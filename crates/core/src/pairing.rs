//! Pairing policies for batch comparison.
//!
//! A batch of N uploads does not have a single obvious comparison shape,
//! so the policy is an explicit choice rather than an implicit default:
//!
//! - [`BatchPairing::Adjacent`] compares each upload with the one before
//!   it, producing N-1 jobs.
//! - [`BatchPairing::AllPairs`] compares every unordered pair, producing
//!   N * (N-1) / 2 jobs.

use std::str::FromStr;

use serde::Deserialize;

/// How a flat list of uploads is turned into comparison pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BatchPairing {
    #[default]
    Adjacent,
    AllPairs,
}

impl BatchPairing {
    /// Index pairs `(i, j)` with `i < j` for a batch of `len` items.
    ///
    /// Returns an empty list for batches of fewer than two items.
    pub fn pairs(self, len: usize) -> Vec<(usize, usize)> {
        if len < 2 {
            return Vec::new();
        }
        match self {
            BatchPairing::Adjacent => (1..len).map(|i| (i - 1, i)).collect(),
            BatchPairing::AllPairs => {
                let mut out = Vec::with_capacity(len * (len - 1) / 2);
                for i in 0..len {
                    for j in (i + 1)..len {
                        out.push((i, j));
                    }
                }
                out
            }
        }
    }
}

impl FromStr for BatchPairing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "adjacent" => Ok(BatchPairing::Adjacent),
            "all-pairs" => Ok(BatchPairing::AllPairs),
            other => Err(format!(
                "Unknown pairing policy '{other}' (expected 'adjacent' or 'all-pairs')"
            )),
        }
    }
}
