//! GaborLab Runner — session orchestration over an abstract presentation
//! backend.
//!
//! This crate turns the pure stimulus engine in `gaborlab-core` into a
//! runnable experiment session:
//! - `SessionConfig` — TOML-loadable, preset-backed configuration
//! - `Presenter` — the display-and-input trait a GUI backend implements
//! - `run_session` — the fixation → cue → stimulus → response trial loop
//! - result records, CSV/JSON export, artifact bundles
//! - per-condition summaries for psychometric-curve fitting

pub mod config;
pub mod export;
pub mod feedback;
pub mod presenter;
pub mod record;
pub mod session;
pub mod summary;

pub use config::{BreakConfig, ConfigError, SessionConfig, TimingConfig};
pub use export::{
    export_ensemble_trial_list_csv, export_json, export_orientations_csv, export_results_csv,
    export_trial_list_csv, import_json, load_artifacts, save_artifacts,
};
pub use feedback::evaluate_response;
pub use presenter::{
    BreakKind, BreakOutcome, KeyEvent, Presenter, PresenterError, ScriptedPresenter,
};
pub use record::{
    ParticipantInfo, SessionOutcome, SessionResult, TrialRecord, TrialSpec, Variant,
    SCHEMA_VERSION,
};
pub use session::{
    abort_flag, run_ensemble_session, run_flanker_session, run_session, SessionError,
};
pub use summary::{
    export_summary_csv, summarize_directory, summarize_session, ConditionSummary,
    OrientationCount, SessionSummary,
};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: results and configs cross thread boundaries
    /// (the CLI summariser fans out over sessions with rayon).
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<SessionConfig>();
        require_sync::<SessionConfig>();
        require_send::<SessionResult>();
        require_sync::<SessionResult>();
        require_send::<TrialRecord>();
        require_sync::<TrialRecord>();
        require_send::<SessionSummary>();
        require_sync::<SessionSummary>();
    }
}
