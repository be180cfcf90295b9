//! Family Caller: turns a per-cutoff sparse similarity matrix into GCF
//! (gene-cluster family) assignments via affinity propagation, see
//! `SPEC_FULL.md` §4.5.

use std::collections::HashMap;

use bgc_align::PairScore;

use crate::affinity_propagation;

/// One gene-cluster family: a label and the (global) cluster indices
/// assigned to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Family {
    pub label: usize,
    pub members: Vec<usize>,
}

/// Call families over `members` (global cluster indices in one BGC class's
/// working set) at distance cutoff `cutoff`, from the pair rows produced for
/// that class. `pair_scores` need not be restricted to `members`; rows
/// referencing clusters outside it are ignored.
#[must_use]
pub(crate) fn call_families(members: &[usize], pair_scores: &[PairScore], cutoff: f64) -> Vec<Family> {
    let n = members.len();
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![Family { label: 0, members: vec![members[0]] }];
    }

    let local: HashMap<usize, usize> = members.iter().enumerate().map(|(i, &g)| (g, i)).collect();

    let mut edges = Vec::new();
    let mut min_sim = f64::INFINITY;
    for row in pair_scores {
        let (Some(&i), Some(&j)) = (local.get(&row.cluster_a), local.get(&row.cluster_b)) else {
            continue;
        };
        if row.distance >= 1.0 {
            continue;
        }
        let sim = row.similarity();
        if sim > 1.0 - cutoff {
            let (lo, hi) = if i < j { (i, j) } else { (j, i) };
            edges.push((lo, hi, sim));
            min_sim = min_sim.min(sim);
        }
    }
    let preference = if min_sim.is_finite() { min_sim } else { 0.0 };

    let assignment = affinity_propagation::cluster(n, &edges, preference);
    reindex(members, &assignment)
}

/// Reindex raw AP exemplar labels to `0..F-1` in insertion order of
/// first-seen exemplar, per `SPEC_FULL.md` §4.5 step 3.
fn reindex(members: &[usize], assignment: &[usize]) -> Vec<Family> {
    let mut label_of_exemplar: HashMap<usize, usize> = HashMap::new();
    let mut families: Vec<Family> = Vec::new();
    for (local_idx, &exemplar) in assignment.iter().enumerate() {
        let label = *label_of_exemplar.entry(exemplar).or_insert_with(|| {
            let label = families.len();
            families.push(Family { label, members: Vec::new() });
            label
        });
        families[label].members.push(members[local_idx]);
    }
    families
}
