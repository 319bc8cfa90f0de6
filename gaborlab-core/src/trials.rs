//! Trial-list generation: factorial expansion, position subsampling, and
//! the session-wide shuffle.

use crate::domain::{Condition, Configuration, EnsembleTrial, GridPosition, Trial, Variation};
use crate::error::DomainError;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Factor domains for the flanker scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialFactors {
    pub conditions: Vec<Condition>,
    pub orientations: Vec<i32>,
    pub positions: Vec<GridPosition>,
    pub configurations: Vec<Configuration>,
    pub variations: Vec<Variation>,
    /// How many of `positions` each (condition, orientation) bucket samples,
    /// without replacement.
    pub positions_per_orientation: usize,
}

impl TrialFactors {
    /// The full design of the first experiment version: 4 conditions ×
    /// 7 orientations × 5 of 9 positions × 2 configurations × 2 variations.
    pub fn flanker_default() -> Self {
        Self {
            conditions: Condition::ALL.to_vec(),
            orientations: vec![0, 5, -5, 10, -10, 20, -20],
            positions: GridPosition::ALL.to_vec(),
            configurations: Configuration::ALL.to_vec(),
            variations: Variation::ALL.to_vec(),
            positions_per_orientation: 5,
        }
    }

    /// Number of trials a well-formed expansion produces.
    pub fn size(&self) -> usize {
        self.conditions.len()
            * self.orientations.len()
            * self.positions_per_orientation
            * self.configurations.len()
            * self.variations.len()
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.conditions.is_empty() {
            return Err(DomainError::EmptyFactorDomain("conditions"));
        }
        if self.orientations.is_empty() {
            return Err(DomainError::EmptyFactorDomain("orientations"));
        }
        if self.positions.is_empty() {
            return Err(DomainError::EmptyFactorDomain("positions"));
        }
        if self.configurations.is_empty() {
            return Err(DomainError::EmptyFactorDomain("configurations"));
        }
        if self.variations.is_empty() {
            return Err(DomainError::EmptyFactorDomain("variations"));
        }
        if self.positions_per_orientation > self.positions.len() {
            return Err(DomainError::RepetitionsExceedPositions {
                requested: self.positions_per_orientation,
                available: self.positions.len(),
            });
        }
        Ok(())
    }
}

/// Factor domains for the ensemble scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnsembleFactors {
    pub conditions: Vec<Condition>,
    pub set_orientations: Vec<i32>,
    pub cued_orientations: Vec<i32>,
    pub positions: Vec<GridPosition>,
    /// How many of `positions` each (condition, set, cued) bucket samples,
    /// without replacement.
    pub positions_per_pair: usize,
}

impl EnsembleFactors {
    /// The second experiment version: 4 × 5 × 5 × 4 of 9 positions = 400.
    pub fn second_version_default() -> Self {
        Self {
            conditions: Condition::ALL.to_vec(),
            set_orientations: vec![0, 10, -10, 20, -20],
            cued_orientations: vec![0, 10, -10, 20, -20],
            positions: GridPosition::ALL.to_vec(),
            positions_per_pair: 4,
        }
    }

    /// The practice design: wider tilts, 2 of 9 positions.
    pub fn practice_default() -> Self {
        Self {
            conditions: Condition::ALL.to_vec(),
            set_orientations: vec![0, 10, -10, 20, -20, 30, -30],
            cued_orientations: vec![0, 10, -10, 20, -20, 30, -30],
            positions: GridPosition::ALL.to_vec(),
            positions_per_pair: 2,
        }
    }

    pub fn size(&self) -> usize {
        self.conditions.len()
            * self.set_orientations.len()
            * self.cued_orientations.len()
            * self.positions_per_pair
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.conditions.is_empty() {
            return Err(DomainError::EmptyFactorDomain("conditions"));
        }
        if self.set_orientations.is_empty() {
            return Err(DomainError::EmptyFactorDomain("set_orientations"));
        }
        if self.cued_orientations.is_empty() {
            return Err(DomainError::EmptyFactorDomain("cued_orientations"));
        }
        if self.positions.is_empty() {
            return Err(DomainError::EmptyFactorDomain("positions"));
        }
        if self.positions_per_pair > self.positions.len() {
            return Err(DomainError::RepetitionsExceedPositions {
                requested: self.positions_per_pair,
                available: self.positions.len(),
            });
        }
        Ok(())
    }
}

/// Sample `count` positions without replacement.
fn sample_positions<R: Rng + ?Sized>(
    positions: &[GridPosition],
    count: usize,
    rng: &mut R,
) -> Vec<GridPosition> {
    let mut pool = positions.to_vec();
    pool.shuffle(rng);
    pool.truncate(count);
    pool
}

/// Build the ordered flanker trial list for a session.
///
/// Each (condition, orientation) bucket draws its own position subset, then
/// contributes one trial per (position × configuration × variation). A
/// single shuffle of the assembled list interleaves blocks session-wide.
pub fn generate_trials<R: Rng + ?Sized>(
    factors: &TrialFactors,
    rng: &mut R,
) -> Result<Vec<Trial>, DomainError> {
    factors.validate()?;

    let mut trials = Vec::with_capacity(factors.size());
    for &condition in &factors.conditions {
        for &orientation in &factors.orientations {
            let sampled =
                sample_positions(&factors.positions, factors.positions_per_orientation, rng);
            for position in sampled {
                for &configuration in &factors.configurations {
                    for &variation in &factors.variations {
                        trials.push(Trial {
                            condition,
                            orientation,
                            position,
                            configuration,
                            variation,
                        });
                    }
                }
            }
        }
    }

    trials.shuffle(rng);
    Ok(trials)
}

/// Build the ordered ensemble trial list for a session.
pub fn generate_ensemble_trials<R: Rng + ?Sized>(
    factors: &EnsembleFactors,
    rng: &mut R,
) -> Result<Vec<EnsembleTrial>, DomainError> {
    factors.validate()?;

    let mut trials = Vec::with_capacity(factors.size());
    for &condition in &factors.conditions {
        for &set_orientation in &factors.set_orientations {
            for &cued_orientation in &factors.cued_orientations {
                let sampled = sample_positions(&factors.positions, factors.positions_per_pair, rng);
                for position in sampled {
                    trials.push(EnsembleTrial {
                        condition,
                        set_orientation,
                        cued_orientation,
                        position,
                    });
                }
            }
        }
    }

    trials.shuffle(rng);
    Ok(trials)
}
