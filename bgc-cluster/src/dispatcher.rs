//! All-pairs enumeration and dispatch across a worker pool, see
//! `SPEC_FULL.md` §4.4.

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use bgc_align::{AlignMode, PairScore, score_pair};
use bgc_core::{BgcClass, DomainStore};

/// Enumerate every unordered pair `(i, j)` with `i < j` among `members` and
/// score each one under `class`. With the `rayon` feature enabled this runs
/// across a work-stealing pool sized to `cores` (`0` means rayon's own
/// default width); otherwise it runs serially and `cores` is ignored. Row
/// order is unspecified, matching `SPEC_FULL.md` §5.
#[must_use]
pub fn dispatch_pairs(store: &DomainStore, members: &[usize], class: BgcClass, mode: AlignMode, cores: usize) -> Vec<PairScore> {
    let pairs = all_pairs(members);
    #[cfg(feature = "rayon")]
    {
        let score_all = move || {
            pairs
                .into_par_iter()
                .map(|(a, b)| score_pair(store, a, b, class, mode))
                .collect()
        };
        if cores == 0 {
            return score_all();
        }
        match rayon::ThreadPoolBuilder::new().num_threads(cores).build() {
            Ok(pool) => pool.install(score_all),
            Err(err) => {
                log::warn!("failed to build a {cores}-thread pool ({err}); using the default pool");
                score_all()
            }
        }
    }
    #[cfg(not(feature = "rayon"))]
    {
        let _ = cores;
        pairs
            .into_iter()
            .map(|(a, b)| score_pair(store, a, b, class, mode))
            .collect()
    }
}

fn all_pairs(members: &[usize]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::with_capacity(members.len() * members.len().saturating_sub(1) / 2);
    for (i, &a) in members.iter().enumerate() {
        for &b in &members[i + 1..] {
            pairs.push((a, b));
        }
    }
    pairs
}
