//! Assigns clusters to one or more BGC-class working sets, honoring the
//! `hybrids` and `banned_classes` run-configuration options
//! (`SPEC_FULL.md` §6).

use std::collections::HashMap;

use bgc_core::{BgcClass, DomainStore};

use crate::RunConfig;

/// Partition `members` into one working set per BGC class. `products` maps a
/// cluster's name to its raw product annotation; a cluster absent from
/// `products` falls back to its already-resolved `Cluster::class` with no
/// hybrid duplication. A class in `config.banned_classes` never receives any
/// members, even ones a hybrid product would otherwise fold into it.
#[must_use]
#[allow(clippy::implicit_hasher)]
pub fn classify_members(
    store: &DomainStore,
    members: &[usize],
    products: &HashMap<String, String>,
    config: &RunConfig,
) -> HashMap<BgcClass, Vec<usize>> {
    let mut by_class: HashMap<BgcClass, Vec<usize>> = HashMap::new();
    for &idx in members {
        let cluster = store.cluster(idx);
        let classes = products
            .get(&cluster.name)
            .map_or_else(|| vec![cluster.class], |product| BgcClass::classes_for_product(product, config.hybrids));
        for class in classes {
            if config.banned_classes.contains(&class) {
                continue;
            }
            by_class.entry(class).or_default().push(idx);
        }
    }
    by_class
}

#[cfg(test)]
mod tests {
    use super::*;
    use bgc_core::{AlignedSequence, Cluster, DomainInstance, Orientation};

    fn store_with(names_and_classes: &[(&str, BgcClass)]) -> (DomainStore, Vec<usize>) {
        let mut store = DomainStore::new();
        let family = store.intern_domain_family("PF00001");
        let mut indices = Vec::new();
        for &(name, class) in names_and_classes {
            let cluster = Cluster {
                name: name.to_string(),
                class,
                contig_edge: false,
                domain_list: vec![family],
                domain_count_per_gene: vec![1],
                gene_orientation: vec![Orientation::Forward],
                core_biosynthetic_genes: vec![0],
            };
            let label = format!("{name}_0");
            let inst = DomainInstance { cluster: name.to_string(), family, label: label.clone() };
            let idx = store.add_cluster(cluster, vec![inst]);
            store.set_aligned_sequence(label, AlignedSequence("MK".to_string()));
            indices.push(idx);
        }
        (store, indices)
    }

    #[test]
    fn without_products_falls_back_to_the_resolved_class() {
        let (store, members) = store_with(&[("a", BgcClass::Nrps), ("b", BgcClass::Pksi)]);
        let config = RunConfig::default();
        let by_class = classify_members(&store, &members, &HashMap::new(), &config);
        assert_eq!(by_class.get(&BgcClass::Nrps), Some(&vec![members[0]]));
        assert_eq!(by_class.get(&BgcClass::Pksi), Some(&vec![members[1]]));
    }

    #[test]
    fn hybrids_flag_duplicates_a_hybrid_cluster_into_its_parents() {
        let (store, members) = store_with(&[("a", BgcClass::PksNrpHybrids)]);
        let mut products = HashMap::new();
        products.insert("a".to_string(), "t1pks-nrps".to_string());
        let config = RunConfig { hybrids: true, ..RunConfig::default() };
        let by_class = classify_members(&store, &members, &products, &config);
        assert_eq!(by_class.get(&BgcClass::PksNrpHybrids), Some(&vec![members[0]]));
        assert_eq!(by_class.get(&BgcClass::Nrps), Some(&vec![members[0]]));
        assert_eq!(by_class.get(&BgcClass::Pksi), Some(&vec![members[0]]));
    }

    #[test]
    fn banned_classes_drop_members_even_when_hybrids_would_add_them() {
        let (store, members) = store_with(&[("a", BgcClass::PksNrpHybrids)]);
        let mut products = HashMap::new();
        products.insert("a".to_string(), "t1pks-nrps".to_string());
        let config = RunConfig {
            hybrids: true,
            banned_classes: vec![BgcClass::Pksi],
            ..RunConfig::default()
        };
        let by_class = classify_members(&store, &members, &products, &config);
        assert!(!by_class.contains_key(&BgcClass::Pksi));
        assert_eq!(by_class.get(&BgcClass::Nrps), Some(&vec![members[0]]));
    }
}
