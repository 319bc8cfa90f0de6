//! Domain types for GaborLab.

pub mod condition;
pub mod position;
pub mod trial;

pub use condition::{Condition, Cue, CueScope};
pub use position::GridPosition;
pub use trial::{Configuration, EnsembleTrial, ResponseKey, Trial, Variation};
