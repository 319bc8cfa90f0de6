//! Trial tuples and the per-trial factor flags.

use super::condition::Condition;
use super::position::GridPosition;
use serde::{Deserialize, Serialize};

/// Whether flanker offsets push with or against the cued tilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Configuration {
    /// Offsets are added to the base orientation.
    Coherent,
    /// Offsets are subtracted from the base orientation.
    Incoherent,
}

impl Configuration {
    pub const ALL: [Configuration; 2] = [Configuration::Coherent, Configuration::Incoherent];

    pub fn code(self) -> u8 {
        match self {
            Configuration::Coherent => 0,
            Configuration::Incoherent => 1,
        }
    }
}

/// Selects one of the two alternative offset arrays for a bucket.
///
/// Both arrays have the same statistical structure; alternating between
/// them avoids stimulus repetition across trials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variation {
    First,
    Second,
}

impl Variation {
    pub const ALL: [Variation; 2] = [Variation::First, Variation::Second];

    pub fn code(self) -> u8 {
        match self {
            Variation::First => 0,
            Variation::Second => 1,
        }
    }
}

/// The observer's two-alternative tilt judgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKey {
    /// 'f' — tilt to the left.
    Anticlockwise,
    /// 'j' — tilt to the right.
    Clockwise,
}

impl ResponseKey {
    /// The keyboard key the observer presses.
    pub fn key_name(self) -> &'static str {
        match self {
            ResponseKey::Anticlockwise => "f",
            ResponseKey::Clockwise => "j",
        }
    }

    pub fn from_key_name(name: &str) -> Option<ResponseKey> {
        match name {
            "f" => Some(ResponseKey::Anticlockwise),
            "j" => Some(ResponseKey::Clockwise),
            _ => None,
        }
    }
}

/// One trial of the flanker-offset scheme: a cued patch at `position`
/// tilted by `orientation`, surrounded by eight flankers drawn from the
/// offset table selected by (orientation bucket, configuration, variation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trial {
    pub condition: Condition,
    /// Signed tilt of the cued patch, degrees.
    pub orientation: i32,
    pub position: GridPosition,
    pub configuration: Configuration,
    pub variation: Variation,
}

/// One trial of the ensemble scheme (second experiment version): the cued
/// patch carries `cued_orientation` while the set as a whole is biased by
/// `set_orientation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnsembleTrial {
    pub condition: Condition,
    /// Signed mean tilt of the whole set, degrees.
    pub set_orientation: i32,
    /// Signed tilt of the cued patch, degrees.
    pub cued_orientation: i32,
    pub position: GridPosition,
}
