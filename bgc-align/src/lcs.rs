//! Longest-Common-Subcluster seeding and bidirectional expansion over
//! gene-token sequences, see `SPEC_FULL.md` §4.2.

use bgc_core::{Cluster, DomainFamilyId};

const MATCH: i64 = 5;
const MISMATCH: i64 = -3;
const GAP: i64 = -2;

/// One gene's domain-family content, in the order used for gene-to-gene
/// comparison (reversed internally if the gene is on the minus strand).
type GeneToken = Vec<DomainFamilyId>;

/// How the Pair Aligner decides whether to run seed+expand+gate at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlignMode {
    /// Always use the full gene range on both sides.
    Global,
    /// Always seed, expand, and gate (when the seed is long enough).
    Lcs,
    /// Seed+expand+gate only if either cluster has `contig_edge = true`.
    Auto,
}

/// The gene-range result of aligning two clusters, see `SPEC_FULL.md` §3
/// (`PairDomainSlice`) for the instance-unit counterpart built from this.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeneSlice {
    pub start_a: usize,
    pub len_a: usize,
    pub start_b: usize,
    pub len_b: usize,
    pub reversed: bool,
    pub seed_start_a: usize,
    pub seed_start_b: usize,
    pub seed_len: usize,
}

fn gene_sequences(cluster: &Cluster) -> Vec<GeneToken> {
    (0..cluster.gene_count()).map(|g| cluster.gene_tokens(g)).collect()
}

/// Longest contiguous run of pairwise-equal gene tokens between `a` and `b`.
/// Ties among equal-length runs prefer the earliest match in `a`.
fn longest_common_gene_run(a: &[GeneToken], b: &[GeneToken]) -> (usize, usize, usize) {
    if a.is_empty() || b.is_empty() {
        return (0, 0, 0);
    }
    let mut dp = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    let mut best = (0usize, 0usize, 0usize);
    for i in 1..=a.len() {
        for j in 1..=b.len() {
            if a[i - 1] == b[j - 1] {
                dp[i][j] = dp[i - 1][j - 1] + 1;
                if dp[i][j] > best.2 {
                    best = (i - dp[i][j], j - dp[i][j], dp[i][j]);
                }
            }
        }
    }
    best
}

/// Score the expansion of driving sequence `x` against target `y`,
/// matching genes at-or-after the running pointer in `y`; see
/// `SPEC_FULL.md` §4.2 `score_expansion`. When `downstream` is false both
/// sequences are walked in reverse. Returns `(max_score, extent)` where
/// `extent` is the number of genes of `x` to keep.
fn score_expansion(x: &[GeneToken], y: &[GeneToken], downstream: bool) -> (i64, usize) {
    let x_fwd;
    let y_fwd;
    let (x, y): (&[GeneToken], &[GeneToken]) = if downstream {
        (x, y)
    } else {
        x_fwd = x.iter().rev().cloned().collect::<Vec<_>>();
        y_fwd = y.iter().rev().cloned().collect::<Vec<_>>();
        (&x_fwd, &y_fwd)
    };

    let mut score = 0i64;
    let mut best_score = 0i64;
    let mut best_extent = 0usize;
    let mut y_ptr = 0usize;

    for (idx, gene) in x.iter().enumerate() {
        match y[y_ptr..].iter().position(|g| g == gene) {
            Some(offset) => {
                score += MATCH + GAP * offset as i64;
                y_ptr += offset + 1;
            }
            None => {
                score += MISMATCH;
            }
        }
        if score >= best_score {
            best_score = score;
            best_extent = idx + 1;
        }
    }
    (best_score, best_extent)
}

/// One side (upstream or downstream) of the bidirectional expansion: the
/// side with fewer available genes is always consumed fully; the other
/// side drives a `score_expansion` against that full range and is extended
/// only as far as the match goes. Ties are broken by trying both
/// directions and keeping the better (or, on equal score, the longer)
/// expansion.
fn expand_side(
    avail_a: &[GeneToken],
    avail_b: &[GeneToken],
    downstream: bool,
) -> (usize, usize) {
    use std::cmp::Ordering;
    match avail_a.len().cmp(&avail_b.len()) {
        Ordering::Equal => {
            let (score_b, ext_b) = score_expansion(avail_b, avail_a, downstream);
            let (score_a, ext_a) = score_expansion(avail_a, avail_b, downstream);
            if score_a > score_b || (score_a == score_b && ext_a > ext_b) {
                (ext_a, avail_b.len())
            } else {
                (avail_a.len(), ext_b)
            }
        }
        Ordering::Less => {
            // A has fewer genes available: consume it fully, let B drive.
            let (_, ext_b) = score_expansion(avail_b, avail_a, downstream);
            (avail_a.len(), ext_b)
        }
        Ordering::Greater => {
            let (_, ext_a) = score_expansion(avail_a, avail_b, downstream);
            (ext_a, avail_b.len())
        }
    }
}

/// Seed, and if applicable expand and validity-gate, a pair of clusters.
/// `start_b`/`len_b` are always expressed in A's own reading frame of B,
/// i.e. remapped back to B's original (non-reversed) gene order when
/// `reversed` is true.
pub fn align_pair(a: &Cluster, b: &Cluster, mode: AlignMode) -> GeneSlice {
    let genes_a = gene_sequences(a);
    let genes_b = gene_sequences(b);
    let genes_b_rev: Vec<GeneToken> = genes_b.iter().rev().cloned().collect();

    let (fwd_a, fwd_b, fwd_len) = longest_common_gene_run(&genes_a, &genes_b);
    let (rev_a, rev_b, rev_len) = longest_common_gene_run(&genes_a, &genes_b_rev);

    let is_reversed = rev_len > fwd_len;
    let (mut start_a, mut start_b, seed_len) = if is_reversed {
        (rev_a, rev_b, rev_len)
    } else {
        (fwd_a, fwd_b, fwd_len)
    };
    let mut len_a = seed_len;
    let mut len_b = seed_len;
    let (seed_start_a, seed_start_b_frame) = (start_a, start_b);

    let genes_b_frame: &[GeneToken] = if is_reversed { &genes_b_rev } else { &genes_b };

    let should_expand = match mode {
        AlignMode::Global => false,
        AlignMode::Lcs => true,
        AlignMode::Auto => a.contig_edge || b.contig_edge,
    };

    if should_expand && seed_len >= 3 {
        // Upstream (left) side.
        let (up_a, up_b) = expand_side(&genes_a[..start_a], &genes_b_frame[..start_b], false);
        start_a -= up_a;
        len_a += up_a;
        start_b -= up_b;
        len_b += up_b;

        // Downstream (right) side.
        let down_avail_a = &genes_a[start_a + len_a..];
        let down_avail_b = &genes_b_frame[start_b + len_b..];
        let (down_a, down_b) = expand_side(down_avail_a, down_avail_b, true);
        len_a += down_a;
        len_b += down_b;
    }

    let seed_start_b = remap_start_b(seed_start_b_frame, seed_len, is_reversed, b.gene_count());

    if len_a.min(len_b) >= 5 {
        let remapped_start_b = remap_start_b(start_b, len_b, is_reversed, b.gene_count());
        let a_has_core = a
            .core_biosynthetic_genes
            .iter()
            .any(|&g| g >= start_a && g < start_a + len_a);
        let b_has_core = b
            .core_biosynthetic_genes
            .iter()
            .any(|&g| g >= remapped_start_b && g < remapped_start_b + len_b);
        if a_has_core && b_has_core {
            return GeneSlice {
                start_a,
                len_a,
                start_b: remapped_start_b,
                len_b,
                reversed: is_reversed,
                seed_start_a,
                seed_start_b,
                seed_len,
            };
        }
    }

    GeneSlice {
        start_a: 0,
        len_a: a.gene_count(),
        start_b: 0,
        len_b: b.gene_count(),
        reversed: is_reversed,
        seed_start_a,
        seed_start_b,
        seed_len,
    }
}

fn remap_start_b(start_b_frame: usize, len_b: usize, reversed: bool, gene_count_b: usize) -> usize {
    if reversed {
        gene_count_b - start_b_frame - len_b
    } else {
        start_b_frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bgc_core::{BgcClass, Orientation};

    fn cluster(name: &str, domains: Vec<Vec<u32>>, core: Vec<usize>, contig_edge: bool) -> Cluster {
        let mut domain_list = Vec::new();
        let mut counts = Vec::new();
        for gene in &domains {
            counts.push(gene.len());
            domain_list.extend(gene.iter().map(|&d| DomainFamilyId(d)));
        }
        Cluster {
            name: name.to_string(),
            class: BgcClass::Others,
            contig_edge,
            domain_list,
            domain_count_per_gene: counts,
            gene_orientation: vec![Orientation::Forward; domains.len()],
            core_biosynthetic_genes: core,
        }
    }

    #[test]
    fn identical_clusters_seed_the_whole_thing() {
        let a = cluster("a", vec![vec![1], vec![2], vec![3]], vec![1], false);
        let b = a.clone();
        let slice = align_pair(&a, &b, AlignMode::Global);
        assert_eq!(slice.len_a, 3);
        assert_eq!(slice.len_b, 3);
        assert!(!slice.reversed);
    }

    #[test]
    fn detects_reversed_gene_order() {
        let a = cluster("a", vec![vec![1], vec![2], vec![3]], vec![1], true);
        let b = cluster("b", vec![vec![3], vec![2], vec![1]], vec![1], true);
        let slice = align_pair(&a, &b, AlignMode::Lcs);
        assert!(slice.reversed);
        assert_eq!(slice.seed_len, 3);
    }

    #[test]
    fn global_mode_never_gates() {
        let a = cluster("a", vec![vec![1]], vec![], false);
        let b = cluster("b", vec![vec![9]], vec![], false);
        let slice = align_pair(&a, &b, AlignMode::Global);
        assert_eq!((slice.start_a, slice.len_a, slice.start_b, slice.len_b), (0, 1, 0, 1));
    }

    #[test]
    fn validity_gate_rejects_overlap_without_core_gene() {
        // Full-length identical overlap (>= 5 genes) but no core biosynthetic
        // gene anywhere: the gate must reject and fall back to full range
        // anyway (a no-op here, but exercises the rejection path directly).
        let genes: Vec<Vec<u32>> = vec![vec![1], vec![2], vec![3], vec![4], vec![5]];
        let a = cluster("a", genes.clone(), vec![], true);
        let b = cluster("b", genes, vec![], true);
        let slice = align_pair(&a, &b, AlignMode::Lcs);
        assert_eq!(slice.len_a, a.gene_count());
        assert_eq!(slice.len_b, b.gene_count());
    }

    #[test]
    fn expansion_accepted_when_core_gene_present() {
        let genes: Vec<Vec<u32>> = vec![vec![1], vec![2], vec![3], vec![4], vec![5]];
        let a = cluster("a", genes.clone(), vec![0], true);
        let b = cluster("b", genes, vec![0], true);
        let slice = align_pair(&a, &b, AlignMode::Lcs);
        assert_eq!(slice.len_a, 5);
        assert_eq!(slice.len_b, 5);
        assert_eq!(slice.start_a, 0);
        assert_eq!(slice.start_b, 0);
    }
}
