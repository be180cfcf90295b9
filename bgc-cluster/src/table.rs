//! Renders the flat TSV contracts of `SPEC_FULL.md` §6/§4.7 from in-memory
//! rows. Grounded on the donor crate's manual `write!`-based table
//! rendering rather than a CSV-writer crate: the column set here is fixed
//! and narrow with nothing that needs quoting/escaping.

use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;

use bgc_align::PairScore;
use itertools::Itertools;

use crate::clan::Clan;
use crate::family::Family;

const EDGE_HEADER: &str = "Clustername 1\tClustername 2\tRaw distance\tSquared similarity\tJaccard index\tDSS index\tAdjacency index\traw DSS non-anchor\traw DSS anchor\tNon-anchor domains\tAnchor domains\tCombined group\tShared group";

/// Render the per-(class, cutoff) edge table. `cluster_name` maps a global
/// cluster index to its stable name; `group_of` maps a cluster name to its
/// (external, scoring-irrelevant) display group, if any was supplied.
#[must_use]
pub(crate) fn render_edge_table<'a>(
    members: &[usize],
    pair_scores: &[PairScore],
    cutoff: f64,
    cluster_name: impl Fn(usize) -> &'a str,
    group_of: impl Fn(&str) -> Option<&'a str>,
    include_singletons: bool,
) -> String {
    let mut out = String::new();
    writeln!(out, "{EDGE_HEADER}").unwrap();

    let mut has_edge: HashSet<usize> = HashSet::new();
    for row in pair_scores {
        if row.distance >= cutoff {
            continue;
        }
        has_edge.insert(row.cluster_a);
        has_edge.insert(row.cluster_b);
        write_edge_row(&mut out, row, &cluster_name, &group_of);
    }

    if include_singletons {
        for &m in members {
            if has_edge.contains(&m) {
                continue;
            }
            let name = cluster_name(m);
            writeln!(out, "{name}\t{name}\t0\t1\t1\t1\t1\t0\t0\t1\t1\t\t").unwrap();
        }
    }
    out
}

fn write_edge_row<'a>(out: &mut String, row: &PairScore, cluster_name: &impl Fn(usize) -> &'a str, group_of: &impl Fn(&str) -> Option<&'a str>) {
    let name_a = cluster_name(row.cluster_a);
    let name_b = cluster_name(row.cluster_b);
    let sim = row.similarity();
    let (combined, shared) = group_columns(group_of(name_a), group_of(name_b));
    writeln!(
        out,
        "{name_a}\t{name_b}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{combined}\t{shared}",
        row.distance,
        sim * sim,
        row.jaccard,
        row.dss,
        row.adjacency,
        row.dss_non_anchor,
        row.dss_anchor,
        row.non_anchor_domains,
        row.anchor_domains,
    )
    .unwrap();
}

fn group_columns(a: Option<&str>, b: Option<&str>) -> (String, String) {
    let combined = match (a, b) {
        (Some(a), Some(b)) if !a.is_empty() && !b.is_empty() && a == b => a.to_string(),
        (Some(a), Some(b)) if !a.is_empty() && !b.is_empty() => {
            if a <= b { format!("{a} - {b}") } else { format!("{b} - {a}") }
        }
        (Some(a), _) if !a.is_empty() => a.to_string(),
        (_, Some(b)) if !b.is_empty() => b.to_string(),
        _ => "NA".to_string(),
    };
    let shared = match (a, b) {
        (Some(a), Some(b)) if a == b => a.to_string(),
        _ => String::new(),
    };
    (combined, shared)
}

/// Render the per-(class, cutoff) family assignment table
/// (`#BGC Name\tFamily Number`, one row per cluster).
#[must_use]
pub(crate) fn render_family_table<'a>(families: &[Family], cluster_name: impl Fn(usize) -> &'a str) -> String {
    let rows = families
        .iter()
        .flat_map(|f| f.members.iter().map(move |&m| (m, f.label)))
        .sorted_by_key(|&(m, _)| m);

    let mut out = String::new();
    writeln!(out, "#BGC Name\tFamily Number").unwrap();
    for (member, label) in rows {
        writeln!(out, "{}\t{label}", cluster_name(member)).unwrap();
    }
    out
}

/// Render the clan-mode table (`#BGC Name\tClan Number\tFamily Number`).
#[must_use]
pub(crate) fn render_clan_table<'a>(clans: &[Clan], families: &[Family], cluster_name: impl Fn(usize) -> &'a str) -> String {
    let family_label_to_idx: HashMap<usize, usize> = families.iter().enumerate().map(|(i, f)| (f.label, i)).collect();

    let mut rows: Vec<(usize, usize, usize)> = Vec::new();
    for clan in clans {
        for &family_label in &clan.families {
            let family = &families[family_label_to_idx[&family_label]];
            for &member in &family.members {
                rows.push((member, clan.label, family_label));
            }
        }
    }
    let mut out = String::new();
    writeln!(out, "#BGC Name\tClan Number\tFamily Number").unwrap();
    for (member, clan_label, family_label) in rows.into_iter().sorted_by_key(|&(m, _, _)| m) {
        writeln!(out, "{}\t{clan_label}\t{family_label}", cluster_name(member)).unwrap();
    }
    out
}
