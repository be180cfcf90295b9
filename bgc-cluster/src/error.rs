use thiserror::Error;

/// Fatal conditions surfaced by the dispatcher/family/clan stages. Everything
/// recoverable (missing alignments, underflow, unknown class) is handled by
/// `bgc-align`/`bgc-core` inline via `log::warn!`, see `SPEC_FULL.md` §7.
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("a worker panicked while scoring pairs: {0}")]
    WorkerCrash(String),
}
