use serde::{Deserialize, Serialize};

use bgc_align::AlignMode;
use bgc_core::BgcClass;

/// Library-level run configuration, see `SPEC_FULL.md` §6. A host binary's
/// own CLI layer is expected to populate this struct; argument parsing is
/// not this crate's concern.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunConfig {
    pub mode: RunMode,
    /// Distance cutoffs at which to call families, each in `(0, 1]`.
    pub cutoffs: Vec<f64>,
    pub clans: bool,
    pub clan_classification_cutoff: f64,
    pub clan_distance_cutoff: f64,
    /// Adds `PKS-NRP_Hybrids` handling for hyphenated hybrid products.
    pub hybrids: bool,
    pub include_singletons: bool,
    pub banned_classes: Vec<BgcClass>,
    pub cores: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            mode: RunMode::Auto,
            cutoffs: vec![0.3],
            clans: false,
            clan_classification_cutoff: 0.5,
            clan_distance_cutoff: 0.8,
            hybrids: false,
            include_singletons: false,
            banned_classes: Vec::new(),
            cores: 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunMode {
    Global,
    Lcs,
    Auto,
}

impl From<RunMode> for AlignMode {
    fn from(mode: RunMode) -> Self {
        match mode {
            RunMode::Global => Self::Global,
            RunMode::Lcs => Self::Lcs,
            RunMode::Auto => Self::Auto,
        }
    }
}
