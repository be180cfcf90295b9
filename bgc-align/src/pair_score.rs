use serde::{Deserialize, Serialize};

/// Full result of scoring one ordered pair of clusters within one BGC
/// class, see `SPEC_FULL.md` §3 (`PairScore`).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PairScore {
    pub cluster_a: usize,
    pub cluster_b: usize,
    pub distance: f64,
    pub jaccard: f64,
    pub dss: f64,
    pub adjacency: f64,
    pub dss_non_anchor: f64,
    pub dss_anchor: f64,
    pub non_anchor_domains: f64,
    pub anchor_domains: f64,
    pub lcs_start_a: usize,
    pub lcs_start_b: usize,
    pub seed_len: usize,
    pub reversed: bool,
}

impl PairScore {
    #[must_use]
    pub fn similarity(&self) -> f64 {
        1.0 - self.distance
    }
}
