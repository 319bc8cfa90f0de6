//! Static flanker-offset tables.
//!
//! Each supported base orientation falls into one of five buckets. A bucket
//! holds two pairs of 8-element offset arrays: one pair for the coherent
//! configuration, one for the incoherent, with the variation flag picking
//! the array within a pair. The zero bucket uses the same pair for both
//! configurations; there the configuration only flips the sign of the
//! applied offsets.

use crate::domain::{Configuration, Variation};
use crate::error::DomainError;

/// Orientation-magnitude-and-sign bucket keying the offset tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OffsetBucket {
    Zero,
    SmallPositive,
    SmallNegative,
    LargePositive,
    LargeNegative,
}

/// One bucket's offset data: a `(var0, var1)` pair per configuration.
#[derive(Debug, Clone, Copy)]
pub struct OffsetTable {
    coherent: [[i32; 8]; 2],
    incoherent: [[i32; 8]; 2],
}

impl OffsetTable {
    /// The 8 offsets for a (configuration, variation) selection.
    pub fn offsets(&self, configuration: Configuration, variation: Variation) -> [i32; 8] {
        let pair = match configuration {
            Configuration::Coherent => &self.coherent,
            Configuration::Incoherent => &self.incoherent,
        };
        pair[variation.code() as usize]
    }
}

const ZERO_TABLE: OffsetTable = OffsetTable {
    coherent: [
        [60, 60, 80, 80, -20, -20, -20, -40],
        [60, 80, 80, 80, -20, -20, -40, -40],
    ],
    incoherent: [
        [60, 60, 80, 80, -20, -20, -20, -40],
        [60, 80, 80, 80, -20, -20, -40, -40],
    ],
};

const SMALL_TABLE: OffsetTable = OffsetTable {
    coherent: [
        [20, 40, 40, 60, -40, -60, -40, -20],
        [40, 40, 60, -20, -20, -20, -40, -40],
    ],
    incoherent: [
        [10, 20, 20, -20, -20, -20, -40, -40],
        [0, 0, 10, 20, -20, -20, -40, -40],
    ],
};

const LARGE_TABLE: OffsetTable = OffsetTable {
    coherent: [
        [20, 40, 40, 60, -20, -40, -40, -60],
        [40, 40, 60, -20, -20, -20, -40, -40],
    ],
    incoherent: [
        [0, 20, 20, -40, -40, -40, -40, -60],
        [0, 0, 0, 20, -40, -40, -60, -60],
    ],
};

impl OffsetBucket {
    /// Resolve a base orientation to its bucket.
    ///
    /// Only the discrete set {0, ±5, ±10, ±20} is supported; the tables are
    /// per-magnitude constants and there is nothing sensible to interpolate.
    pub fn for_orientation(orientation: i32) -> Result<OffsetBucket, DomainError> {
        match orientation {
            0 => Ok(OffsetBucket::Zero),
            5 => Ok(OffsetBucket::SmallPositive),
            -5 => Ok(OffsetBucket::SmallNegative),
            10 | 20 => Ok(OffsetBucket::LargePositive),
            -10 | -20 => Ok(OffsetBucket::LargeNegative),
            other => Err(DomainError::UnsupportedOrientation(other)),
        }
    }

    pub fn table(self) -> &'static OffsetTable {
        match self {
            OffsetBucket::Zero => &ZERO_TABLE,
            OffsetBucket::SmallPositive | OffsetBucket::SmallNegative => &SMALL_TABLE,
            OffsetBucket::LargePositive | OffsetBucket::LargeNegative => &LARGE_TABLE,
        }
    }
}

/// The base orientations the flanker tables support.
pub const SUPPORTED_ORIENTATIONS: [i32; 7] = [0, 5, -5, 10, -10, 20, -20];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_supported_orientation_resolves() {
        for ori in SUPPORTED_ORIENTATIONS {
            assert!(OffsetBucket::for_orientation(ori).is_ok(), "{ori}");
        }
    }

    #[test]
    fn unsupported_orientations_rejected() {
        for ori in [1, -3, 15, 30, -30, 90] {
            assert_eq!(
                OffsetBucket::for_orientation(ori),
                Err(DomainError::UnsupportedOrientation(ori))
            );
        }
    }

    #[test]
    fn magnitudes_share_tables_by_sign() {
        assert_eq!(
            OffsetBucket::for_orientation(10).unwrap(),
            OffsetBucket::for_orientation(20).unwrap()
        );
        assert_eq!(
            OffsetBucket::for_orientation(-10).unwrap(),
            OffsetBucket::for_orientation(-20).unwrap()
        );
        assert_ne!(
            OffsetBucket::for_orientation(5).unwrap(),
            OffsetBucket::for_orientation(10).unwrap()
        );
    }

    #[test]
    fn every_lookup_has_eight_offsets() {
        for bucket in [
            OffsetBucket::Zero,
            OffsetBucket::SmallPositive,
            OffsetBucket::SmallNegative,
            OffsetBucket::LargePositive,
            OffsetBucket::LargeNegative,
        ] {
            for config in Configuration::ALL {
                for var in Variation::ALL {
                    let offsets = bucket.table().offsets(config, var);
                    assert_eq!(offsets.len(), 8);
                }
            }
        }
    }

    #[test]
    fn zero_bucket_pairs_coincide() {
        let t = OffsetBucket::Zero.table();
        for var in Variation::ALL {
            assert_eq!(
                t.offsets(Configuration::Coherent, var),
                t.offsets(Configuration::Incoherent, var)
            );
        }
    }

    #[test]
    fn zero_var0_matches_source_constants() {
        let offsets = OffsetBucket::Zero
            .table()
            .offsets(Configuration::Coherent, Variation::First);
        assert_eq!(offsets, [60, 60, 80, 80, -20, -20, -20, -40]);
    }
}
