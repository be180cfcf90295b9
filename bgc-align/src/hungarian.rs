//! Minimum-cost bipartite assignment (Hungarian / Kuhn-Munkres algorithm),
//! used by the Scorer to match domain instances of a shared family between
//! two clusters (`SPEC_FULL.md` §4.3, §9: "any O(n^3) assignment-problem
//! solver suffices; matrices are small").

/// Solve the assignment problem on a rectangular cost matrix `cost[i][j]`
/// (rows = cluster A instances, cols = cluster B instances), returning the
/// minimum total cost of a one-to-one matching over `min(rows, cols)` pairs.
///
/// Non-square matrices are padded with zero-cost dummy rows/columns, which
/// does not change the minimum cost restricted to the real cells because a
/// matching against a dummy contributes nothing.
#[must_use]
pub(crate) fn min_cost_assignment(cost: &[Vec<f64>]) -> f64 {
    let rows = cost.len();
    if rows == 0 {
        return 0.0;
    }
    let cols = cost[0].len();
    if cols == 0 {
        return 0.0;
    }
    let n = rows.max(cols);

    // Pad to an n x n square matrix with zero cost for dummy cells.
    let mut a = vec![vec![0.0_f64; n + 1]; n + 1];
    for (i, row) in cost.iter().enumerate() {
        for (j, &c) in row.iter().enumerate() {
            a[i + 1][j + 1] = c;
        }
    }

    // Jonker-Volgenant style potential-based Hungarian algorithm, 1-indexed.
    let inf = f64::INFINITY;
    let mut u = vec![0.0_f64; n + 1];
    let mut v = vec![0.0_f64; n + 1];
    let mut p = vec![0usize; n + 1];
    let mut way = vec![0usize; n + 1];

    for i in 1..=n {
        p[0] = i;
        let mut j0 = 0usize;
        let mut minv = vec![inf; n + 1];
        let mut used = vec![false; n + 1];
        loop {
            used[j0] = true;
            let i0 = p[j0];
            let mut delta = inf;
            let mut j1 = 0usize;
            for j in 1..=n {
                if used[j] {
                    continue;
                }
                let cur = a[i0][j] - u[i0] - v[j];
                if cur < minv[j] {
                    minv[j] = cur;
                    way[j] = j0;
                }
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }
            for j in 0..=n {
                if used[j] {
                    u[p[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }
            j0 = j1;
            if p[j0] == 0 {
                break;
            }
        }
        loop {
            let j1 = way[j0];
            p[j0] = p[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut total = 0.0;
    for j in 1..=n {
        let i = p[j];
        if i >= 1 && i <= rows && j <= cols {
            total += cost[i - 1][j - 1];
        }
    }
    total
}
