//! The 9-patch stimulus set and the flanker-offset assignment.
//!
//! One central cued patch plus eight flankers. The flanker orientations are
//! the shuffled offset table applied to the base orientation, dealt along
//! the cyclic walk of cells after the cued position.

use crate::domain::{Configuration, GridPosition, Variation};
use crate::error::DomainError;
use crate::offsets::OffsetBucket;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Orientations for all nine grid cells, plus which cell is cued.
///
/// Orientations are exact signed degrees; rendering layers convert as
/// needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GaborSet {
    /// Row-major: `cells[0]` is grid cell 1.
    cells: [i32; 9],
    cued: GridPosition,
}

impl GaborSet {
    pub fn new(cells: [i32; 9], cued: GridPosition) -> Self {
        Self { cells, cued }
    }

    pub fn orientation_at(&self, position: GridPosition) -> i32 {
        self.cells[(position.index() - 1) as usize]
    }

    pub fn cued_position(&self) -> GridPosition {
        self.cued
    }

    pub fn cued_orientation(&self) -> i32 {
        self.orientation_at(self.cued)
    }

    /// Row-major view of all nine orientations.
    pub fn as_array(&self) -> &[i32; 9] {
        &self.cells
    }

    /// `(position, orientation)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (GridPosition, i32)> + '_ {
        GridPosition::ALL
            .into_iter()
            .map(move |pos| (pos, self.orientation_at(pos)))
    }
}

/// Assign the nine patch orientations for one flanker-scheme trial.
///
/// The cell at `position` holds `orientation` unmodified. The offset table
/// selected by (orientation bucket, configuration, variation) is shuffled —
/// this is the trial's random draw — and dealt to the remaining cells in
/// cyclic row-major order starting after `position`. Coherent trials add
/// the drawn offset, incoherent trials subtract it.
pub fn assign_orientations<R: Rng + ?Sized>(
    orientation: i32,
    position: GridPosition,
    configuration: Configuration,
    variation: Variation,
    rng: &mut R,
) -> Result<GaborSet, DomainError> {
    let bucket = OffsetBucket::for_orientation(orientation)?;
    let mut offsets = bucket.table().offsets(configuration, variation);
    offsets.shuffle(rng);

    let mut cells = [0i32; 9];
    cells[(position.index() - 1) as usize] = orientation;
    for (cell, offset) in position.cyclic_walk().zip(offsets) {
        cells[(cell.index() - 1) as usize] = match configuration {
            Configuration::Coherent => orientation + offset,
            Configuration::Incoherent => orientation - offset,
        };
    }

    Ok(GaborSet::new(cells, position))
}
