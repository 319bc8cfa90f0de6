//! Ensemble-scheme stimulus construction (second experiment version).
//!
//! Instead of per-bucket offset tables, the set is built from a pool of
//! nine orientations: a zero anchor, the cued tilt and its mirror, and two
//! magnitude triplets shifted so the set mean tracks `set_orientation`.

use crate::domain::GridPosition;
use crate::error::DomainError;
use crate::gaborset::GaborSet;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Tunable constants of the ensemble pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnsembleParams {
    /// The positive magnitude triplet before shifting; mirrored for the
    /// negative triplet.
    pub base_magnitudes: [i32; 3],
    /// Stand-in tilt for the cued-mirror pair when the cued orientation is
    /// zero, so the set never contains three zeros.
    pub zero_cue_filler: i32,
}

impl EnsembleParams {
    /// Constants used by the second experiment version.
    pub const SECOND_VERSION: EnsembleParams = EnsembleParams {
        base_magnitudes: [25, 30, 35],
        zero_cue_filler: 25,
    };

    /// Constants used by the practice-with-feedback trials.
    pub const PRACTICE: EnsembleParams = EnsembleParams {
        base_magnitudes: [5, 10, 15],
        zero_cue_filler: 15,
    };
}

/// Build the 9-element orientation pool for one ensemble trial.
///
/// Exposed separately so tests and the runner's orientation log can reason
/// about the pool before the random deal.
pub fn ensemble_pool(
    set_orientation: i32,
    cued_orientation: i32,
    params: &EnsembleParams,
) -> [i32; 9] {
    let mut pos_tri = params.base_magnitudes;
    let mut neg_tri = params.base_magnitudes.map(|m| -m);

    if set_orientation > 0 {
        pos_tri = pos_tri.map(|m| m + 2 * set_orientation);
        neg_tri = neg_tri.map(|m| m + set_orientation);
    } else if set_orientation < 0 {
        pos_tri = pos_tri.map(|m| m + set_orientation);
        neg_tri = neg_tri.map(|m| m + 2 * set_orientation);
    }

    let (mirror_pos, mirror_neg) = if cued_orientation == 0 {
        (params.zero_cue_filler, -params.zero_cue_filler)
    } else {
        (cued_orientation, -cued_orientation)
    };

    [
        0,
        mirror_pos,
        mirror_neg,
        pos_tri[0],
        pos_tri[1],
        pos_tri[2],
        neg_tri[0],
        neg_tri[1],
        neg_tri[2],
    ]
}

/// Assign the nine patch orientations for one ensemble-scheme trial.
///
/// The cued cell holds `cued_orientation`; one instance of that value is
/// removed from the pool and the remaining eight are dealt uniformly at
/// random to the other cells.
pub fn assign_ensemble<R: Rng + ?Sized>(
    set_orientation: i32,
    cued_orientation: i32,
    position: GridPosition,
    params: &EnsembleParams,
    rng: &mut R,
) -> Result<GaborSet, DomainError> {
    let pool = ensemble_pool(set_orientation, cued_orientation, params);

    // The pool always contains the cued value: index 0 when cued is zero,
    // index 1 otherwise.
    let cued_index = pool
        .iter()
        .position(|&o| o == cued_orientation)
        .expect("pool contains the cued orientation by construction");

    let mut rest: Vec<i32> = pool
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != cued_index)
        .map(|(_, &o)| o)
        .collect();
    rest.shuffle(rng);

    let mut cells = [0i32; 9];
    cells[(position.index() - 1) as usize] = cued_orientation;
    for (cell, ori) in position.cyclic_walk().zip(rest) {
        cells[(cell.index() - 1) as usize] = ori;
    }

    Ok(GaborSet::new(cells, position))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn pool_unshifted_for_zero_set() {
        let pool = ensemble_pool(0, 10, &EnsembleParams::SECOND_VERSION);
        assert_eq!(pool, [0, 10, -10, 25, 30, 35, -25, -30, -35]);
    }

    #[test]
    fn pool_shifts_for_positive_set() {
        // positive triplet gains 2·set, negative triplet gains set
        let pool = ensemble_pool(10, 20, &EnsembleParams::SECOND_VERSION);
        assert_eq!(pool, [0, 20, -20, 45, 50, 55, -15, -20, -25]);
    }

    #[test]
    fn pool_shifts_for_negative_set() {
        let pool = ensemble_pool(-10, 20, &EnsembleParams::SECOND_VERSION);
        assert_eq!(pool, [0, 20, -20, 15, 20, 25, -45, -50, -55]);
    }

    #[test]
    fn zero_cue_uses_filler_pair() {
        let pool = ensemble_pool(0, 0, &EnsembleParams::SECOND_VERSION);
        assert_eq!(pool[1], 25);
        assert_eq!(pool[2], -25);
        assert_eq!(pool.iter().filter(|&&o| o == 0).count(), 1);
    }

    #[test]
    fn practice_params_use_small_magnitudes() {
        let pool = ensemble_pool(0, 0, &EnsembleParams::PRACTICE);
        assert_eq!(pool, [0, 15, -15, 5, 10, 15, -5, -10, -15]);
    }

    #[test]
    fn cued_cell_holds_cued_orientation() {
        let mut rng = StdRng::seed_from_u64(5);
        let pos = GridPosition::new(4).unwrap();
        let set =
            assign_ensemble(20, -10, pos, &EnsembleParams::SECOND_VERSION, &mut rng).unwrap();
        assert_eq!(set.orientation_at(pos), -10);
        assert_eq!(set.cued_position(), pos);
    }

    #[test]
    fn cells_are_pool_minus_one_cued_instance() {
        let mut rng = StdRng::seed_from_u64(17);
        let pos = GridPosition::new(8).unwrap();
        let params = EnsembleParams::SECOND_VERSION;
        let set = assign_ensemble(-20, 20, pos, &params, &mut rng).unwrap();

        let mut drawn: Vec<i32> = set.as_array().to_vec();
        drawn.sort_unstable();
        let mut expected: Vec<i32> = ensemble_pool(-20, 20, &params).to_vec();
        expected.sort_unstable();
        assert_eq!(drawn, expected);
    }

    #[test]
    fn deterministic_under_fixed_seed() {
        let make = || {
            let mut rng = StdRng::seed_from_u64(1234);
            assign_ensemble(
                10,
                0,
                GridPosition::CENTER,
                &EnsembleParams::PRACTICE,
                &mut rng,
            )
            .unwrap()
        };
        assert_eq!(make(), make());
    }
}
