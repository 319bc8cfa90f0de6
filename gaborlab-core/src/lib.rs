//! GaborLab Core — trial factors, offset tables, and orientation assignment.
//!
//! This crate contains the stimulus engine for a single/ensemble
//! orientation-judgement experiment:
//! - Domain types (conditions, grid positions, trials, responses)
//! - Static flanker-offset tables keyed by orientation bucket
//! - The two stimulus schemes: flanker offsets and ensemble pools
//! - Factorial trial-list generation with position subsampling
//! - A BLAKE3 seed hierarchy for reproducible sessions
//!
//! Everything here is pure computation: all randomness enters through an
//! injected `rand::Rng`, and the presentation/input surface lives entirely
//! in the runner crate.

pub mod domain;
pub mod ensemble;
pub mod error;
pub mod gaborset;
pub mod offsets;
pub mod rng;
pub mod trials;

pub use domain::{
    Condition, Configuration, Cue, CueScope, EnsembleTrial, GridPosition, ResponseKey, Trial,
    Variation,
};
pub use ensemble::{assign_ensemble, ensemble_pool, EnsembleParams};
pub use error::DomainError;
pub use gaborset::{assign_orientations, GaborSet};
pub use offsets::{OffsetBucket, OffsetTable, SUPPORTED_ORIENTATIONS};
pub use rng::SeedSchedule;
pub use trials::{generate_ensemble_trials, generate_trials, EnsembleFactors, TrialFactors};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: core types cross thread boundaries.
    ///
    /// The runner hands trial lists and stimulus sets to a presentation
    /// backend that may live on another thread.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Trial>();
        require_sync::<domain::Trial>();
        require_send::<domain::EnsembleTrial>();
        require_sync::<domain::EnsembleTrial>();
        require_send::<domain::Condition>();
        require_sync::<domain::Condition>();
        require_send::<domain::GridPosition>();
        require_sync::<domain::GridPosition>();
        require_send::<gaborset::GaborSet>();
        require_sync::<gaborset::GaborSet>();
        require_send::<trials::TrialFactors>();
        require_sync::<trials::TrialFactors>();
        require_send::<trials::EnsembleFactors>();
        require_sync::<trials::EnsembleFactors>();
        require_send::<rng::SeedSchedule>();
        require_sync::<rng::SeedSchedule>();
    }
}
