use std::collections::HashSet;

use bgc_core::{BgcClass, Cluster, DomainFamilyId, DomainStore};

use crate::fallback_align;
use crate::hungarian;
use crate::lcs::{self, AlignMode};
use crate::pair_score::PairScore;

/// Score one ordered pair of clusters under `class`'s weight table, see
/// `SPEC_FULL.md` §4.3.
#[must_use]
pub fn score_pair(store: &DomainStore, idx_a: usize, idx_b: usize, class: BgcClass, mode: AlignMode) -> PairScore {
    let a = store.cluster(idx_a);
    let b = store.cluster(idx_b);

    if a.is_domain_empty() || b.is_domain_empty() {
        log::warn!("empty domain list in pair ({idx_a}, {idx_b}); emitting sentinel row");
        return PairScore {
            cluster_a: idx_a,
            cluster_b: idx_b,
            distance: 1.0,
            jaccard: 0.0,
            dss: 0.0,
            adjacency: 0.0,
            dss_non_anchor: 0.0,
            dss_anchor: 0.0,
            non_anchor_domains: 1.0,
            anchor_domains: 1.0,
            lcs_start_a: 0,
            lcs_start_b: 0,
            seed_len: 0,
            reversed: false,
        };
    }

    let full_set_a: HashSet<DomainFamilyId> = a.domain_list.iter().copied().collect();
    let full_set_b: HashSet<DomainFamilyId> = b.domain_list.iter().copied().collect();
    if full_set_a.is_disjoint(&full_set_b) {
        let (s, s_anchor) = count_anchor_split(store, idx_a, &full_set_a, idx_b, &full_set_b);
        return PairScore {
            cluster_a: idx_a,
            cluster_b: idx_b,
            distance: 1.0,
            jaccard: 0.0,
            dss: 0.0,
            adjacency: 0.0,
            dss_non_anchor: 1.0,
            dss_anchor: 1.0,
            non_anchor_domains: s,
            anchor_domains: s_anchor,
            lcs_start_a: 0,
            lcs_start_b: 0,
            seed_len: 0,
            reversed: false,
        };
    }

    let slice = lcs::align_pair(a, b, mode);
    let (dom_start_a, dom_len_a) = a.domain_range_for_genes(slice.start_a, slice.len_a);
    let (dom_start_b, dom_len_b) = b.domain_range_for_genes(slice.start_b, slice.len_b);

    let set_a = store.domain_family_set(idx_a, dom_start_a, dom_len_a);
    let set_b = store.domain_family_set(idx_b, dom_start_b, dom_len_b);
    let union: HashSet<DomainFamilyId> = set_a.union(&set_b).copied().collect();
    let intersect: HashSet<DomainFamilyId> = set_a.intersection(&set_b).copied().collect();
    let not_intersect: HashSet<DomainFamilyId> = set_a.symmetric_difference(&set_b).copied().collect();

    let jaccard = if union.is_empty() {
        0.0
    } else {
        intersect.len() as f64 / union.len() as f64
    };

    let adjacency = adjacency_index(a, dom_start_a, dom_len_a, b, dom_start_b, dom_len_b);

    let weights = class.weights();
    let mut domain_diff = 0.0_f64;
    let mut domain_diff_anchor = 0.0_f64;
    let mut total = 0.0_f64;
    let mut total_anchor = 0.0_f64;

    for &family in &not_intersect {
        let count = if set_a.contains(&family) {
            family_slice_len(a, family, dom_start_a, dom_len_a)
        } else {
            family_slice_len(b, family, dom_start_b, dom_len_b)
        } as f64;
        if store.is_anchor(family) {
            domain_diff_anchor += count;
            total_anchor += count;
        } else {
            domain_diff += count;
            total += count;
        }
    }

    for &family in &intersect {
        let insts_a = family_slice(a, store, idx_a, family, dom_start_a, dom_len_a);
        let insts_b = family_slice(b, store, idx_b, family, dom_start_b, dom_len_b);
        let n_a = insts_a.len();
        let n_b = insts_b.len();
        let mut cost = vec![vec![0.0_f64; n_b]; n_a];
        for (i, inst_a) in insts_a.iter().enumerate() {
            for (j, inst_b) in insts_b.iter().enumerate() {
                let identity = match (
                    store.aligned_sequence(&inst_a.label),
                    store.aligned_sequence(&inst_b.label),
                ) {
                    (Some(sa), Some(sb)) => aligned_identity(sa.as_str(), sb.as_str()),
                    _ => {
                        log::warn!(
                            "missing aligned sequence for domain family {}; falling back to pairwise alignment",
                            store.domain_family_name(family)
                        );
                        let raw_a = store.raw_sequence(&inst_a.label).map(bgc_core::RawSequence::as_str).unwrap_or_default();
                        let raw_b = store.raw_sequence(&inst_b.label).map(bgc_core::RawSequence::as_str).unwrap_or_default();
                        fallback_align::identity_fraction(raw_a, raw_b)
                    }
                };
                cost[i][j] = 1.0 - identity;
            }
        }
        let acc = hungarian::min_cost_assignment(&cost);
        let diff = (n_a as f64 - n_b as f64).abs() + acc;
        let s_contribution = n_a.max(n_b) as f64;
        if store.is_anchor(family) {
            domain_diff_anchor += diff;
            total_anchor += s_contribution;
        } else {
            domain_diff += diff;
            total += s_contribution;
        }
    }

    let (dss, dss_non_anchor, dss_anchor) = if total > 0.0 && total_anchor > 0.0 {
        let non_anchor = domain_diff / total;
        let anchor = domain_diff_anchor / total_anchor;
        let p_non_anchor = total / (total + total_anchor);
        let p_anchor = 1.0 - p_non_anchor;
        let w_anchor = p_anchor * weights.anchor_boost / (p_anchor * weights.anchor_boost + p_non_anchor);
        let w_non_anchor = 1.0 - w_anchor;
        (1.0 - (w_non_anchor * non_anchor + w_anchor * anchor), non_anchor, anchor)
    } else if total_anchor == 0.0 {
        let non_anchor = domain_diff / total;
        (1.0 - non_anchor, non_anchor, 0.0)
    } else {
        let anchor = domain_diff_anchor / total_anchor;
        (1.0 - anchor, 0.0, anchor)
    };

    let raw_distance = 1.0 - weights.jaccard * jaccard - weights.dss * dss - weights.adjacency * adjacency;
    let distance = clamp_distance(raw_distance);

    PairScore {
        cluster_a: idx_a,
        cluster_b: idx_b,
        distance,
        jaccard,
        dss,
        adjacency,
        dss_non_anchor,
        dss_anchor,
        non_anchor_domains: total,
        anchor_domains: total_anchor,
        lcs_start_a: slice.seed_start_a,
        lcs_start_b: slice.seed_start_b,
        seed_len: slice.seed_len,
        reversed: slice.reversed,
    }
}

fn clamp_distance(d: f64) -> f64 {
    if d < 0.0 {
        if d < -1e-6 {
            log::warn!("composite distance underflowed to {d}; clamping to 0");
        }
        0.0
    } else if d > 1.0 {
        1.0
    } else {
        d
    }
}

fn count_anchor_split(
    store: &DomainStore,
    idx_a: usize,
    set_a: &HashSet<DomainFamilyId>,
    idx_b: usize,
    set_b: &HashSet<DomainFamilyId>,
) -> (f64, f64) {
    let mut s = 0.0_f64;
    let mut s_anchor = 0.0_f64;
    for &family in set_a {
        let count = store.instances_of_family(idx_a, family).len() as f64;
        if store.is_anchor(family) {
            s_anchor += count;
        } else {
            s += count;
        }
    }
    for &family in set_b {
        let count = store.instances_of_family(idx_b, family).len() as f64;
        if store.is_anchor(family) {
            s_anchor += count;
        } else {
            s += count;
        }
    }
    (s, s_anchor)
}

/// Aligned-sequence identity: fraction of non-gap-gap columns that match,
/// counted column-wise (`SPEC_FULL.md` §4.3 DSS). Differing column counts
/// are a warning and the shorter length is used.
fn aligned_identity(a: &str, b: &str) -> f64 {
    let a = a.as_bytes();
    let b = b.as_bytes();
    if a.len() != b.len() {
        log::warn!("aligned sequence length mismatch: {} vs {}", a.len(), b.len());
    }
    let len = a.len().min(b.len());
    let mut matches = 0usize;
    let mut gaps = 0usize;
    for i in 0..len {
        if a[i] == b'-' && b[i] == b'-' {
            gaps += 1;
        } else if a[i] == b[i] {
            matches += 1;
        }
    }
    let denom = len.saturating_sub(gaps);
    if denom == 0 {
        0.0
    } else {
        matches as f64 / denom as f64
    }
}

fn adjacency_index(
    a: &Cluster,
    dom_start_a: usize,
    dom_len_a: usize,
    b: &Cluster,
    dom_start_b: usize,
    dom_len_b: usize,
) -> f64 {
    if dom_len_a < 2 || dom_len_b < 2 {
        return 0.0;
    }
    let pairs_a = adjacent_family_pairs(&a.domain_list[dom_start_a..dom_start_a + dom_len_a]);
    let pairs_b = adjacent_family_pairs(&b.domain_list[dom_start_b..dom_start_b + dom_len_b]);
    let union: HashSet<_> = pairs_a.union(&pairs_b).collect();
    if union.is_empty() {
        return 0.0;
    }
    let intersect = pairs_a.intersection(&pairs_b).count();
    intersect as f64 / union.len() as f64
}

fn adjacent_family_pairs(domains: &[DomainFamilyId]) -> HashSet<(DomainFamilyId, DomainFamilyId)> {
    domains
        .windows(2)
        .map(|w| if w[0] <= w[1] { (w[0], w[1]) } else { (w[1], w[0]) })
        .collect()
}

fn family_positions(cluster: &Cluster, family: DomainFamilyId) -> Vec<usize> {
    cluster
        .domain_list
        .iter()
        .enumerate()
        .filter(|&(_, &f)| f == family)
        .map(|(p, _)| p)
        .collect()
}

fn family_slice_bounds(cluster: &Cluster, family: DomainFamilyId, dom_start: usize, dom_len: usize) -> (usize, usize) {
    let positions = family_positions(cluster, family);
    let bottom = positions.iter().filter(|&&p| p < dom_start).count();
    let within = positions
        .iter()
        .filter(|&&p| p >= dom_start && p < dom_start + dom_len)
        .count();
    (bottom, bottom + within)
}

fn family_slice_len(cluster: &Cluster, family: DomainFamilyId, dom_start: usize, dom_len: usize) -> usize {
    let (bottom, top) = family_slice_bounds(cluster, family, dom_start, dom_len);
    top - bottom
}

fn family_slice<'a>(
    cluster: &Cluster,
    store: &'a DomainStore,
    idx: usize,
    family: DomainFamilyId,
    dom_start: usize,
    dom_len: usize,
) -> &'a [bgc_core::DomainInstance] {
    let (bottom, top) = family_slice_bounds(cluster, family, dom_start, dom_len);
    &store.instances_of_family(idx, family)[bottom..top]
}

#[cfg(test)]
mod tests {
    use super::*;
    use bgc_core::{AlignedSequence, Orientation};
    use pretty_assertions::assert_eq;

    fn one_domain_cluster(store: &mut DomainStore, name: &str, family: DomainFamilyId, seq: &str) -> usize {
        let cluster = Cluster {
            name: name.to_string(),
            class: BgcClass::Others,
            contig_edge: false,
            domain_list: vec![family],
            domain_count_per_gene: vec![1],
            gene_orientation: vec![Orientation::Forward],
            core_biosynthetic_genes: vec![0],
        };
        let label = format!("{name}_0");
        let inst = bgc_core::DomainInstance {
            cluster: name.to_string(),
            family,
            label: label.clone(),
        };
        let idx = store.add_cluster(cluster, vec![inst]);
        store.set_aligned_sequence(label, AlignedSequence(seq.to_string()));
        idx
    }

    #[test]
    fn self_identity_is_zero_distance() {
        let mut store = DomainStore::new();
        let pf = store.intern_domain_family("PF00001");
        let idx = one_domain_cluster(&mut store, "bgc1", pf, "MKTAYIAK");
        let score = score_pair(&store, idx, idx, BgcClass::Nrps, AlignMode::Global);
        assert!((score.distance - 0.0).abs() < 1e-9);
        assert!((score.jaccard - 1.0).abs() < 1e-9);
        assert!((score.dss - 1.0).abs() < 1e-9);
    }

    #[test]
    fn disjoint_clusters_have_distance_one() {
        let mut store = DomainStore::new();
        let pf1 = store.intern_domain_family("PF00001");
        let pf2 = store.intern_domain_family("PF00002");
        let a = one_domain_cluster(&mut store, "a", pf1, "MKTAYIAK");
        let b = one_domain_cluster(&mut store, "b", pf2, "MKTAYIAK");
        let score = score_pair(&store, a, b, BgcClass::Nrps, AlignMode::Global);
        assert_eq!(score.distance, 1.0);
        assert_eq!(score.jaccard, 0.0);
        assert_eq!(score.dss, 0.0);
        assert_eq!(score.adjacency, 0.0);
    }

    #[test]
    fn empty_domain_list_yields_sentinel() {
        let mut store = DomainStore::new();
        let cluster = Cluster {
            name: "empty".to_string(),
            class: BgcClass::Others,
            contig_edge: false,
            domain_list: vec![],
            domain_count_per_gene: vec![],
            gene_orientation: vec![],
            core_biosynthetic_genes: vec![],
        };
        let idx = store.add_cluster(cluster, vec![]);
        let pf = store.intern_domain_family("PF00001");
        let other = one_domain_cluster(&mut store, "other", pf, "MKTAYIAK");
        let score = score_pair(&store, idx, other, BgcClass::Nrps, AlignMode::Global);
        assert_eq!(score.distance, 1.0);
        assert_eq!(score.non_anchor_domains, 1.0);
        assert_eq!(score.anchor_domains, 1.0);
    }
}
