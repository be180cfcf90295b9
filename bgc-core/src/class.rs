use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of BGC classes recognized by the family/clan caller, plus
/// the class-specific weight table consumed by the Scorer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BgcClass {
    Pksi,
    PksOther,
    Nrps,
    Ripps,
    Saccharides,
    Terpene,
    PksNrpHybrids,
    Others,
    Mix,
}

impl BgcClass {
    pub const ALL: [Self; 9] = [
        Self::Pksi,
        Self::PksOther,
        Self::Nrps,
        Self::Ripps,
        Self::Saccharides,
        Self::Terpene,
        Self::PksNrpHybrids,
        Self::Others,
        Self::Mix,
    ];

    /// Map a raw antiSMASH-style product string to a class, following the
    /// closed mapping: single products first, then hyphenated hybrids.
    #[must_use]
    pub fn from_product(product: &str) -> Self {
        if let Some(class) = Self::from_single_product(product) {
            return class;
        }
        if product.contains('-') {
            let parts: Vec<&str> = product.split('-').collect();
            let mapped: Vec<Option<Self>> = parts.iter().map(|p| Self::from_single_product(p)).collect();
            if mapped.iter().all(|c| matches!(c, Some(Self::Pksi | Self::PksOther))) {
                return Self::PksOther;
            }
            if mapped
                .iter()
                .all(|c| matches!(c, Some(Self::Pksi | Self::PksOther | Self::Nrps)))
            {
                return Self::PksNrpHybrids;
            }
            if mapped.iter().all(|c| matches!(c, Some(Self::Ripps))) {
                return Self::Ripps;
            }
        }
        Self::Others
    }

    /// Every class `product` should be counted towards under the `hybrids`
    /// run-configuration policy: without it, just the closed single-class
    /// mapping; with it, a product is also folded into additional "pure"
    /// classes it would otherwise be excluded from by the mapping above.
    /// A `PKS-NRP_Hybrids` product always also counts towards `NRPS`, plus
    /// `PKSI` if the raw product string contains `"t1pks"` or `PKSother`
    /// otherwise; an `Others` product with a hyphenated name also counts
    /// towards whichever of its hyphen-separated parts map to a non-`Others`
    /// class on their own.
    #[must_use]
    pub fn classes_for_product(product: &str, hybrids: bool) -> Vec<Self> {
        let primary = Self::from_product(product);
        let mut classes = vec![primary];
        if !hybrids {
            return classes;
        }
        match primary {
            Self::PksNrpHybrids => {
                classes.push(Self::Nrps);
                if product.contains("t1pks") {
                    classes.push(Self::Pksi);
                } else {
                    classes.push(Self::PksOther);
                }
            }
            Self::Others if product.contains('-') => {
                for part in product.split('-') {
                    if let Some(subclass) = Self::from_single_product(part) {
                        if !classes.contains(&subclass) {
                            classes.push(subclass);
                        }
                    }
                }
            }
            _ => {}
        }
        classes
    }

    fn from_single_product(product: &str) -> Option<Self> {
        match product {
            "t1pks" => Some(Self::Pksi),
            "transatpks" | "t2pks" | "t3pks" | "otherks" | "hglks" => Some(Self::PksOther),
            "nrps" => Some(Self::Nrps),
            "lantipeptide" | "thiopeptide" | "bacteriocin" | "linaridin" | "cyanobactin"
            | "glycocin" | "LAP" | "lassopeptide" | "sactipeptide" | "bottromycin"
            | "head_to_tail" | "microcin" | "microviridin" | "proteusin" => Some(Self::Ripps),
            "amglyccycl" | "oligosaccharide" | "cf_saccharide" => Some(Self::Saccharides),
            "terpene" => Some(Self::Terpene),
            _ => None,
        }
    }

    /// The composite-distance weights `(Wj, Wd, Wa, anchor_boost)` for this class.
    #[must_use]
    pub fn weights(self) -> ClassWeights {
        match self {
            Self::Pksi => ClassWeights { jaccard: 0.22, dss: 0.76, adjacency: 0.02, anchor_boost: 1.0 },
            Self::PksOther => ClassWeights { jaccard: 0.0, dss: 0.32, adjacency: 0.68, anchor_boost: 4.0 },
            Self::Nrps => ClassWeights { jaccard: 0.0, dss: 1.00, adjacency: 0.0, anchor_boost: 4.0 },
            Self::Ripps => ClassWeights { jaccard: 0.28, dss: 0.71, adjacency: 0.01, anchor_boost: 1.0 },
            Self::Saccharides => ClassWeights { jaccard: 0.0, dss: 0.0, adjacency: 1.0, anchor_boost: 1.0 },
            Self::Terpene => ClassWeights { jaccard: 0.20, dss: 0.75, adjacency: 0.05, anchor_boost: 2.0 },
            Self::PksNrpHybrids => ClassWeights { jaccard: 0.0, dss: 0.78, adjacency: 0.22, anchor_boost: 1.0 },
            Self::Others => ClassWeights { jaccard: 0.01, dss: 0.97, adjacency: 0.02, anchor_boost: 4.0 },
            Self::Mix => ClassWeights { jaccard: 0.20, dss: 0.75, adjacency: 0.05, anchor_boost: 2.0 },
        }
    }
}

impl fmt::Display for BgcClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pksi => "PKSI",
            Self::PksOther => "PKSother",
            Self::Nrps => "NRPS",
            Self::Ripps => "RiPPs",
            Self::Saccharides => "Saccharides",
            Self::Terpene => "Terpene",
            Self::PksNrpHybrids => "PKS-NRP_Hybrids",
            Self::Others => "Others",
            Self::Mix => "mix",
        };
        f.write_str(s)
    }
}

/// The `(Wj, Wd, Wa, anchor_boost)` tuple used by the Scorer's composite
/// distance and DSS anchor-weighting formulas, see `SPEC_FULL.md` §4.3.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassWeights {
    pub jaccard: f64,
    pub dss: f64,
    pub adjacency: f64,
    pub anchor_boost: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_single_products() {
        assert_eq!(BgcClass::from_product("t1pks"), BgcClass::Pksi);
        assert_eq!(BgcClass::from_product("nrps"), BgcClass::Nrps);
        assert_eq!(BgcClass::from_product("lassopeptide"), BgcClass::Ripps);
        assert_eq!(BgcClass::from_product("unknown_thing"), BgcClass::Others);
    }

    #[test]
    fn maps_hybrids() {
        assert_eq!(BgcClass::from_product("t1pks-nrps"), BgcClass::PksNrpHybrids);
        assert_eq!(BgcClass::from_product("t1pks-t2pks"), BgcClass::PksOther);
        assert_eq!(
            BgcClass::from_product("lantipeptide-bacteriocin"),
            BgcClass::Ripps
        );
    }

    #[test]
    fn hybrids_flag_folds_hybrid_products_into_their_parents() {
        assert_eq!(BgcClass::classes_for_product("t1pks-nrps", false), vec![BgcClass::PksNrpHybrids]);
        assert_eq!(
            BgcClass::classes_for_product("t1pks-nrps", true),
            vec![BgcClass::PksNrpHybrids, BgcClass::Nrps, BgcClass::Pksi]
        );
        assert_eq!(
            BgcClass::classes_for_product("otherks-nrps", true),
            vec![BgcClass::PksNrpHybrids, BgcClass::Nrps, BgcClass::PksOther]
        );
    }

    #[test]
    fn hybrids_flag_folds_others_hyphen_parts() {
        assert_eq!(
            BgcClass::classes_for_product("indole-terpene", true),
            vec![BgcClass::Others, BgcClass::Terpene]
        );
        assert_eq!(BgcClass::classes_for_product("indole-terpene", false), vec![BgcClass::Others]);
    }

    #[test]
    fn weights_sum_at_most_one() {
        for class in BgcClass::ALL {
            let w = class.weights();
            assert!(w.jaccard + w.dss + w.adjacency <= 1.0 + 1e-9);
        }
    }
}
