//! Parallel pair dispatch and affinity-propagation family/clan calling.
//!
//! This crate sits on top of `bgc-align`'s per-pair [`PairScore`] rows: it
//! enumerates the pairs to score for a BGC class ([`dispatcher`]), turns the
//! resulting distance matrix into gene-cluster families at a set of cutoffs
//! ([`family`]), optionally folds families into clans ([`clan`]), and
//! renders the flat TSV contracts consumers expect ([`table`]).

mod affinity_propagation;
mod clan;
mod classify;
mod config;
mod dispatcher;
mod error;
mod family;
mod table;

use std::collections::HashMap;

use bgc_align::PairScore;
use bgc_core::{BgcClass, DomainStore};

/// A subset of the types envisioned to be used the most.
pub mod prelude {
    pub use crate::{ClassOutput, CutoffOutput, RunConfig, RunMode, run_all_classes, run_class};
}

pub use clan::Clan;
pub use classify::classify_members;
pub use config::{RunConfig, RunMode};
pub use dispatcher::dispatch_pairs;
pub use error::ClusterError;
pub use family::Family;

/// Everything produced for one BGC class's working set: the raw pair rows
/// plus one [`CutoffOutput`] per requested cutoff.
#[derive(Clone, Debug)]
pub struct ClassOutput {
    pub class: BgcClass,
    pub pair_scores: Vec<PairScore>,
    pub cutoffs: Vec<CutoffOutput>,
}

/// Family (and, where applicable, clan) results and rendered tables for one
/// distance cutoff.
#[derive(Clone, Debug)]
pub struct CutoffOutput {
    pub cutoff: f64,
    pub families: Vec<Family>,
    pub edge_table: String,
    pub family_table: String,
    pub clans: Option<Vec<Clan>>,
    pub clan_table: Option<String>,
}

/// Run the full per-class pipeline: dispatch pairs, call families at every
/// requested cutoff, and (when clan mode is on and the cutoff matches
/// `clan_classification_cutoff`) call clans too. `groups` is an optional,
/// scoring-irrelevant cluster-name -> display-group map used only by the
/// edge table's "Combined group"/"Shared group" columns (`SPEC_FULL.md` §6).
///
/// Returns `None` without doing any work if `class` is in
/// `config.banned_classes`.
#[must_use]
#[allow(clippy::implicit_hasher, clippy::similar_names)]
pub fn run_class(store: &DomainStore, members: &[usize], class: BgcClass, config: &RunConfig, groups: Option<&HashMap<String, String>>) -> Option<ClassOutput> {
    if config.banned_classes.contains(&class) {
        return None;
    }

    let mode = config.mode.into();
    let pair_scores = dispatch_pairs(store, members, class, mode, config.cores);

    let cluster_name = |i: usize| store.cluster(i).name.as_str();
    let group_of = |name: &str| groups.and_then(|g| g.get(name)).map(String::as_str);

    let cutoffs = config
        .cutoffs
        .iter()
        .map(|&cutoff| {
            let families = family::call_families(members, &pair_scores, cutoff);
            let edge_table = table::render_edge_table(members, &pair_scores, cutoff, cluster_name, group_of, config.include_singletons);
            let family_table = table::render_family_table(&families, cluster_name);

            let (clans, clan_table) = if config.clans && (cutoff - config.clan_classification_cutoff).abs() < 1e-9 {
                let clans = clan::call_clans(&families, &pair_scores, config.clan_classification_cutoff, config.clan_distance_cutoff);
                let clan_table = table::render_clan_table(&clans, &families, cluster_name);
                (Some(clans), Some(clan_table))
            } else {
                (None, None)
            };

            CutoffOutput { cutoff, families, edge_table, family_table, clans, clan_table }
        })
        .collect();

    Some(ClassOutput { class, pair_scores, cutoffs })
}

/// Classify `members` per `config.hybrids`/`config.banned_classes` (see
/// [`classify_members`]) and run [`run_class`] once for every class that
/// ends up with at least one member.
#[must_use]
#[allow(clippy::implicit_hasher)]
pub fn run_all_classes(
    store: &DomainStore,
    members: &[usize],
    products: &HashMap<String, String>,
    config: &RunConfig,
    groups: Option<&HashMap<String, String>>,
) -> Vec<ClassOutput> {
    classify_members(store, members, products, config)
        .into_iter()
        .filter_map(|(class, class_members)| run_class(store, &class_members, class, config, groups))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bgc_core::{AlignedSequence, Cluster, DomainInstance, Orientation};

    fn store_with_clusters(n: usize) -> DomainStore {
        let mut store = DomainStore::new();
        let family = store.intern_domain_family("PF00001");
        for i in 0..n {
            let name = format!("bgc{i}");
            let cluster = Cluster {
                name: name.clone(),
                class: BgcClass::Nrps,
                contig_edge: false,
                domain_list: vec![family],
                domain_count_per_gene: vec![1],
                gene_orientation: vec![Orientation::Forward],
                core_biosynthetic_genes: vec![0],
            };
            let label = format!("{name}_0");
            let inst = DomainInstance { cluster: name, family, label: label.clone() };
            store.add_cluster(cluster, vec![inst]);
            store.set_aligned_sequence(label, AlignedSequence("MKTAYIAK".to_string()));
        }
        store
    }

    #[test]
    fn run_class_produces_one_family_for_identical_clusters() {
        let store = store_with_clusters(3);
        let members: Vec<usize> = (0..3).collect();
        let config = RunConfig { cutoffs: vec![0.3], ..RunConfig::default() };
        let output = run_class(&store, &members, BgcClass::Nrps, &config, None).unwrap();
        assert_eq!(output.pair_scores.len(), 3);
        assert_eq!(output.cutoffs.len(), 1);
        assert_eq!(output.cutoffs[0].families.len(), 1);
        assert!(output.cutoffs[0].edge_table.starts_with("Clustername 1\t"));
        assert!(output.cutoffs[0].family_table.starts_with("#BGC Name\t"));
    }

    #[test]
    fn run_class_emits_clan_table_only_at_the_classification_cutoff() {
        let store = store_with_clusters(2);
        let members: Vec<usize> = (0..2).collect();
        let config = RunConfig {
            cutoffs: vec![0.3, 0.5],
            clans: true,
            clan_classification_cutoff: 0.5,
            ..RunConfig::default()
        };
        let output = run_class(&store, &members, BgcClass::Nrps, &config, None).unwrap();
        assert!(output.cutoffs[0].clan_table.is_none());
        assert!(output.cutoffs[1].clan_table.is_some());
    }

    #[test]
    fn run_class_returns_none_for_a_banned_class() {
        let store = store_with_clusters(2);
        let members: Vec<usize> = (0..2).collect();
        let config = RunConfig { banned_classes: vec![BgcClass::Nrps], ..RunConfig::default() };
        assert!(run_class(&store, &members, BgcClass::Nrps, &config, None).is_none());
    }

    #[test]
    fn run_all_classes_skips_banned_classes_and_folds_hybrids() {
        let store = store_with_clusters(2);
        let members: Vec<usize> = (0..2).collect();
        let mut products = HashMap::new();
        products.insert("bgc0".to_string(), "nrps".to_string());
        products.insert("bgc1".to_string(), "nrps".to_string());
        let config = RunConfig { banned_classes: vec![BgcClass::Pksi], cutoffs: vec![0.3], ..RunConfig::default() };
        let outputs = run_all_classes(&store, &members, &products, &config, None);
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].class, BgcClass::Nrps);
    }
}
