use serde::{Deserialize, Serialize};

/// An interned domain family identifier (e.g. a Pfam accession), small enough
/// to use as the token type in the Pair Aligner's gene strings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DomainFamilyId(pub u32);

/// One occurrence of a domain family within a single cluster, identified by a
/// label unique within that cluster (gene id + coordinate tag).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DomainInstance {
    pub cluster: String,
    pub family: DomainFamilyId,
    /// Stable label unique within the cluster, e.g. `"gene_12:45-310"`.
    pub label: String,
}

/// A gap-padded alignment column string produced by an external domain
/// aligner. All instances of the same domain family share a column length.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedSequence(pub String);

impl AlignedSequence {
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The raw (unaligned) residue string for a domain instance, used as the
/// fallback-alignment input when no aligned sequence is available.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSequence(pub String);

impl RawSequence {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
