//! Clan Caller: an optional second affinity-propagation pass over a
//! family-vs-family similarity matrix, see `SPEC_FULL.md` §4.6.

use std::collections::HashMap;

use bgc_align::PairScore;

use crate::affinity_propagation;
use crate::family::Family;

/// One clan: a label and the family labels grouped under it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Clan {
    pub label: usize,
    pub families: Vec<usize>,
}

/// Call clans over `families` using the same classification-cutoff
/// similarity matrix `M` the Family Caller built (rebuilt here from
/// `pair_scores` at `classification_cutoff`), thresholded at
/// `clan_distance_cutoff`.
#[must_use]
pub(crate) fn call_clans(families: &[Family], pair_scores: &[PairScore], classification_cutoff: f64, clan_distance_cutoff: f64) -> Vec<Clan> {
    let f = families.len();
    if f == 0 {
        return Vec::new();
    }
    if f == 1 {
        return vec![Clan { label: 0, families: vec![families[0].label] }];
    }

    let m = similarity_matrix(pair_scores, classification_cutoff);

    let mut edges = Vec::new();
    let mut min_sim = f64::INFINITY;
    for i in 0..f {
        for j in (i + 1)..f {
            let sim = fam_sim(&m, &families[i], &families[j]);
            if sim > 1.0 - clan_distance_cutoff {
                edges.push((i, j, sim));
                min_sim = min_sim.min(sim);
            }
        }
    }
    let preference = if min_sim.is_finite() { min_sim } else { 0.0 };

    let assignment = affinity_propagation::cluster(f, &edges, preference);
    reindex(families, &assignment)
}

/// `M[i,j] = 1 - distance` for every pair included in the classification
/// cutoff's sparse matrix, keyed by unordered `(min, max)` cluster index.
fn similarity_matrix(pair_scores: &[PairScore], cutoff: f64) -> HashMap<(usize, usize), f64> {
    let mut m = HashMap::new();
    for row in pair_scores {
        if row.distance >= 1.0 {
            continue;
        }
        let sim = row.similarity();
        if sim > 1.0 - cutoff {
            let key = if row.cluster_a < row.cluster_b {
                (row.cluster_a, row.cluster_b)
            } else {
                (row.cluster_b, row.cluster_a)
            };
            m.insert(key, sim);
        }
    }
    m
}

fn lookup(m: &HashMap<(usize, usize), f64>, i: usize, j: usize) -> f64 {
    if i == j {
        return 1.0;
    }
    let key = if i < j { (i, j) } else { (j, i) };
    m.get(&key).copied().unwrap_or(0.0)
}

/// `fam_sim[I,J]` as described in `SPEC_FULL.md` §4.6: the mean, over
/// members of `i_fam`, of that member's mean similarity to `j_fam`,
/// prepended with a single 0 (i.e. divided by `|I|+1`). This is computed
/// from both directions and averaged to yield one symmetric edge weight
/// for the undirected affinity-propagation solver (see DESIGN.md).
fn fam_sim(m: &HashMap<(usize, usize), f64>, i_fam: &Family, j_fam: &Family) -> f64 {
    let one_way = |from: &Family, to: &Family| -> f64 {
        let sum: f64 = from
            .members
            .iter()
            .map(|&i| to.members.iter().map(|&j| lookup(m, i, j)).sum::<f64>() / to.members.len() as f64)
            .sum();
        sum / (from.members.len() as f64 + 1.0)
    };
    f64::midpoint(one_way(i_fam, j_fam), one_way(j_fam, i_fam))
}

fn reindex(families: &[Family], assignment: &[usize]) -> Vec<Clan> {
    let mut label_of_exemplar: HashMap<usize, usize> = HashMap::new();
    let mut clans: Vec<Clan> = Vec::new();
    for (local_idx, &exemplar) in assignment.iter().enumerate() {
        let label = *label_of_exemplar.entry(exemplar).or_insert_with(|| {
            let label = clans.len();
            clans.push(Clan { label, families: Vec::new() });
            label
        });
        clans[label].families.push(families[local_idx].label);
    }
    clans
}
