//! Sparse affinity propagation over a similarity graph, used by both the
//! Family Caller and the Clan Caller (`SPEC_FULL.md` §4.5, §4.6, §9).
//!
//! Only nonzero edges plus each node's self-similarity ("preference")
//! participate in message passing; nodes with no edges above the cutoff
//! become singleton exemplars of themselves.

use std::collections::HashMap;

/// damping = 0.8, `max_iter` = 500 and a 15-iteration stability window are the
/// reference clustering call's parameters, adopted as decided behavior (see
/// `SPEC_FULL.md` §10 OQ-4).
pub(crate) const DAMPING: f64 = 0.8;
pub(crate) const MAX_ITERATIONS: usize = 500;
pub(crate) const CONVERGENCE_WINDOW: usize = 15;

/// Two fully symmetric nodes (equal pairwise similarity, equal preference)
/// drive `a[k,k]+r[k,k]` to exactly zero for both at the fixed point, a
/// genuine degeneracy of the message-passing recursion rather than a
/// rounding artifact. Treating values within this tolerance as tied, broken
/// towards the lower node index, resolves that case (and its floating-point
/// near-equivalents) the same way every run.
const TIE_EPSILON: f64 = 1e-6;

/// Run affinity propagation over `n` nodes connected by `edges`
/// (undirected, `i < j`, similarity value). `preference` is the uniform
/// self-similarity used for every node, per the `preference = "min"`
/// convention: the minimum finite off-diagonal similarity in the graph.
///
/// Returns, for each node, the index of its exemplar.
#[must_use]
pub(crate) fn cluster(n: usize, edges: &[(usize, usize, f64)], preference: f64) -> Vec<usize> {
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![0];
    }

    let mut neighbors: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut sim: HashMap<(usize, usize), f64> = HashMap::new();
    for (i, nbrs) in neighbors.iter_mut().enumerate() {
        sim.insert((i, i), preference);
        nbrs.push(i);
    }
    for &(i, j, s) in edges {
        sim.insert((i, j), s);
        sim.insert((j, i), s);
        neighbors[i].push(j);
        neighbors[j].push(i);
    }

    let mut r: HashMap<(usize, usize), f64> = sim.keys().map(|&k| (k, 0.0)).collect();
    let mut a: HashMap<(usize, usize), f64> = sim.keys().map(|&k| (k, 0.0)).collect();

    let mut last_assignment = exemplars(n, &neighbors, &r, &a);
    let mut stable_for = 0usize;

    for _ in 0..MAX_ITERATIONS {
        update_responsibilities(&mut r, &a, &sim, &neighbors);
        update_availabilities(&mut a, &r, &neighbors);

        let assignment = exemplars(n, &neighbors, &r, &a);
        if assignment == last_assignment {
            stable_for += 1;
            if stable_for >= CONVERGENCE_WINDOW {
                return assignment;
            }
        } else {
            stable_for = 0;
        }
        last_assignment = assignment;
    }
    log::debug!("affinity propagation over {n} nodes hit the {MAX_ITERATIONS}-iteration ceiling without a stable exemplar assignment");
    last_assignment
}

fn update_responsibilities(
    r: &mut HashMap<(usize, usize), f64>,
    a: &HashMap<(usize, usize), f64>,
    sim: &HashMap<(usize, usize), f64>,
    neighbors: &[Vec<usize>],
) {
    for (i, nbrs) in neighbors.iter().enumerate() {
        for &k in nbrs {
            let mut max_other = f64::NEG_INFINITY;
            for &k_prime in nbrs {
                if k_prime == k {
                    continue;
                }
                let candidate = a[&(i, k_prime)] + sim[&(i, k_prime)];
                if candidate > max_other {
                    max_other = candidate;
                }
            }
            if max_other == f64::NEG_INFINITY {
                max_other = 0.0;
            }
            let new_r = sim[&(i, k)] - max_other;
            let old_r = r[&(i, k)];
            r.insert((i, k), DAMPING.mul_add(old_r, (1.0 - DAMPING) * new_r));
        }
    }
}

fn update_availabilities(a: &mut HashMap<(usize, usize), f64>, r: &HashMap<(usize, usize), f64>, neighbors: &[Vec<usize>]) {
    for (k, nbrs) in neighbors.iter().enumerate() {
        let mut sum_pos = 0.0_f64;
        for &i_prime in nbrs {
            if i_prime == k {
                continue;
            }
            sum_pos += r[&(i_prime, k)].max(0.0);
        }
        for &i in nbrs {
            let new_a = if i == k {
                sum_pos
            } else {
                let without_i = sum_pos - r[&(i, k)].max(0.0);
                (r[&(k, k)] + without_i).min(0.0)
            };
            let old_a = a[&(i, k)];
            a.insert((i, k), DAMPING.mul_add(old_a, (1.0 - DAMPING) * new_a));
        }
    }
}

/// Extract, for each node, the index it currently regards as its exemplar:
/// the neighbor (or itself) maximizing `a[i,k]+r[i,k]`, ties within
/// [`TIE_EPSILON`] broken towards the lower index. Breaking ties
/// deterministically this way (rather than by whichever candidate the
/// float comparison happens to visit last) is what keeps a clique of
/// equally-similar nodes converging on a single shared exemplar instead of
/// cycling between candidates forever.
fn exemplars(n: usize, neighbors: &[Vec<usize>], r: &HashMap<(usize, usize), f64>, a: &HashMap<(usize, usize), f64>) -> Vec<usize> {
    (0..n)
        .map(|i| {
            let mut best_k = i;
            let mut best_v = a[&(i, i)] + r[&(i, i)];
            for &k in &neighbors[i] {
                let v = a[&(i, k)] + r[&(i, k)];
                if v > best_v + TIE_EPSILON || ((v - best_v).abs() <= TIE_EPSILON && k < best_k) {
                    best_v = v;
                    best_k = k;
                }
            }
            best_k
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_node_is_its_own_exemplar() {
        let _ = env_logger::builder().is_test(true).try_init();
        assert_eq!(cluster(1, &[], 0.0), vec![0]);
    }

    #[test]
    fn tight_pair_shares_an_exemplar() {
        let assignment = cluster(2, &[(0, 1, 0.99)], -1.0);
        assert_eq!(assignment[0], assignment[1]);
    }

    #[test]
    fn disconnected_nodes_become_singletons() {
        let assignment = cluster(3, &[(0, 1, 0.9)], -5.0);
        assert_ne!(assignment[0], assignment[2]);
        assert_eq!(assignment[2], 2);
    }

    #[test]
    fn two_tight_clusters_separate() {
        let edges = vec![(0, 1, 0.95), (2, 3, 0.95)];
        let assignment = cluster(4, &edges, -2.0);
        assert_eq!(assignment[0], assignment[1]);
        assert_eq!(assignment[2], assignment[3]);
        assert_ne!(assignment[0], assignment[2]);
    }
}
