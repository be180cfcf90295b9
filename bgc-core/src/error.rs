use thiserror::Error;

/// Fatal conditions surfaced across the crate boundary. Recoverable
/// conditions (missing alignments, length mismatches, negative-distance
/// underflow, unknown BGC classes) are handled inline via `log::warn!`
/// instead, per `SPEC_FULL.md` §7: the run must keep producing a row for
/// every pair, so those are not modeled as `Result::Err`.
#[derive(Debug, Error)]
pub enum BgcError {
    #[error("cluster index {0} is out of range for this domain store")]
    ClusterNotFound(usize),

    #[error("domain family {0:?} is not known to this domain store")]
    UnknownDomainFamily(crate::DomainFamilyId),

    #[error("a worker panicked while scoring pairs: {0}")]
    WorkerCrash(String),
}
