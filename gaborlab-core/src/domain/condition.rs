//! Experimental conditions — which cue the observer sees before and after
//! the stimulus array.

use super::position::GridPosition;
use serde::{Deserialize, Serialize};

/// How much of the array a cue covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CueScope {
    /// A small circle around exactly one cell.
    Single,
    /// A large circle around all nine cells.
    Ensemble,
}

/// A concrete cue for one trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cue {
    /// Marker around the cued cell.
    Single(GridPosition),
    /// Marker around the whole array.
    Ensemble,
}

/// The four experimental conditions, crossing pre-cue scope with whether
/// the post-cue matches it.
///
/// | code | pre-cue  | post-cue |
/// | ---- | -------- | -------- |
/// | 1    | single   | single   |
/// | 2    | single   | ensemble |
/// | 3    | ensemble | ensemble |
/// | 4    | ensemble | single   |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    SingleCongruent,
    SingleIncongruent,
    EnsembleCongruent,
    EnsembleIncongruent,
}

impl Condition {
    pub const ALL: [Condition; 4] = [
        Condition::SingleCongruent,
        Condition::SingleIncongruent,
        Condition::EnsembleCongruent,
        Condition::EnsembleIncongruent,
    ];

    /// Numeric code used in trial lists and result files.
    pub fn code(self) -> u8 {
        match self {
            Condition::SingleCongruent => 1,
            Condition::SingleIncongruent => 2,
            Condition::EnsembleCongruent => 3,
            Condition::EnsembleIncongruent => 4,
        }
    }

    pub fn from_code(code: u8) -> Option<Condition> {
        match code {
            1 => Some(Condition::SingleCongruent),
            2 => Some(Condition::SingleIncongruent),
            3 => Some(Condition::EnsembleCongruent),
            4 => Some(Condition::EnsembleIncongruent),
            _ => None,
        }
    }

    pub fn precue_scope(self) -> CueScope {
        match self {
            Condition::SingleCongruent | Condition::SingleIncongruent => CueScope::Single,
            Condition::EnsembleCongruent | Condition::EnsembleIncongruent => CueScope::Ensemble,
        }
    }

    pub fn postcue_scope(self) -> CueScope {
        match self {
            Condition::SingleCongruent | Condition::EnsembleIncongruent => CueScope::Single,
            Condition::SingleIncongruent | Condition::EnsembleCongruent => CueScope::Ensemble,
        }
    }

    /// Whether the observer reports the single cued patch or the set
    /// average. Determined by the post-cue: that is the circle the report
    /// is made against.
    pub fn report_scope(self) -> CueScope {
        self.postcue_scope()
    }

    pub fn precue(self, position: GridPosition) -> Cue {
        match self.precue_scope() {
            CueScope::Single => Cue::Single(position),
            CueScope::Ensemble => Cue::Ensemble,
        }
    }

    pub fn postcue(self, position: GridPosition) -> Cue {
        match self.postcue_scope() {
            CueScope::Single => Cue::Single(position),
            CueScope::Ensemble => Cue::Ensemble,
        }
    }
}
