use std::collections::{HashMap, HashSet};

use crate::{AlignedSequence, Cluster, DomainFamilyId, DomainInstance, RawSequence};

/// Read-only (after construction) home for every per-cluster array the Pair
/// Aligner and Scorer need, keyed by cluster index. Workers share a `&DomainStore`
/// without locking; see `SPEC_FULL.md` §4.1 and §5.
#[derive(Debug, Default)]
pub struct DomainStore {
    family_names: Vec<String>,
    family_ids: HashMap<String, DomainFamilyId>,
    clusters: Vec<Cluster>,
    cluster_index: HashMap<String, usize>,
    /// Domain instances for a cluster, in cluster (gene) order, keyed by
    /// `(cluster_idx, family)`.
    instances_by_family: HashMap<(usize, DomainFamilyId), Vec<DomainInstance>>,
    aligned: HashMap<String, AlignedSequence>,
    raw: HashMap<String, RawSequence>,
    anchor_domains: HashSet<DomainFamilyId>,
}

impl DomainStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a textual domain family accession (e.g. a Pfam id) into a
    /// small integer token, creating one if this is the first time it is seen.
    pub fn intern_domain_family(&mut self, name: &str) -> DomainFamilyId {
        if let Some(&id) = self.family_ids.get(name) {
            return id;
        }
        let id = DomainFamilyId(self.family_names.len() as u32);
        self.family_names.push(name.to_string());
        self.family_ids.insert(name.to_string(), id);
        id
    }

    #[must_use]
    pub fn domain_family_name(&self, id: DomainFamilyId) -> &str {
        &self.family_names[id.0 as usize]
    }

    pub fn mark_anchor(&mut self, id: DomainFamilyId) {
        self.anchor_domains.insert(id);
    }

    #[must_use]
    pub fn is_anchor(&self, id: DomainFamilyId) -> bool {
        self.anchor_domains.contains(&id)
    }

    /// Register a cluster together with its domain instances (grouped by
    /// family, in cluster gene order). Returns the cluster's index.
    pub fn add_cluster(&mut self, cluster: Cluster, instances: Vec<DomainInstance>) -> usize {
        let idx = self.clusters.len();
        self.cluster_index.insert(cluster.name.clone(), idx);
        let mut grouped: HashMap<DomainFamilyId, Vec<DomainInstance>> = HashMap::new();
        for inst in instances {
            grouped.entry(inst.family).or_default().push(inst);
        }
        for (family, insts) in grouped {
            self.instances_by_family.insert((idx, family), insts);
        }
        self.clusters.push(cluster);
        idx
    }

    pub fn set_aligned_sequence(&mut self, instance_label: String, seq: AlignedSequence) {
        self.aligned.insert(instance_label, seq);
    }

    pub fn set_raw_sequence(&mut self, instance_label: String, seq: RawSequence) {
        self.raw.insert(instance_label, seq);
    }

    #[must_use]
    pub fn aligned_sequence(&self, instance_label: &str) -> Option<&AlignedSequence> {
        self.aligned.get(instance_label)
    }

    #[must_use]
    pub fn raw_sequence(&self, instance_label: &str) -> Option<&RawSequence> {
        self.raw.get(instance_label)
    }

    /// Lookup an internal-error fatal contract: an absent cluster index is a
    /// programming error, not a recoverable condition (`SPEC_FULL.md` §4.1).
    #[must_use]
    pub fn cluster(&self, idx: usize) -> &Cluster {
        &self.clusters[idx]
    }

    #[must_use]
    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    #[must_use]
    pub fn cluster_index_by_name(&self, name: &str) -> Option<usize> {
        self.cluster_index.get(name).copied()
    }

    /// All domain instances of `family` within cluster `idx`, in cluster
    /// gene order. Empty if the cluster has no instances of that family.
    #[must_use]
    pub fn instances_of_family(&self, idx: usize, family: DomainFamilyId) -> &[DomainInstance] {
        self.instances_by_family
            .get(&(idx, family))
            .map_or(&[], Vec::as_slice)
    }

    /// The set of distinct domain families present in cluster `idx`,
    /// restricted to the gene-instance range `[start, start+len)`.
    #[must_use]
    pub fn domain_family_set(&self, idx: usize, start: usize, len: usize) -> HashSet<DomainFamilyId> {
        let cluster = self.cluster(idx);
        cluster.domain_list[start..start + len].iter().copied().collect()
    }

    pub fn iter_clusters(&self) -> impl Iterator<Item = (usize, &Cluster)> {
        self.clusters.iter().enumerate()
    }
}
