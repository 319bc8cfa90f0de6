//! Session results and per-trial records.

use gaborlab_core::{EnsembleTrial, GaborSet, ResponseKey, Trial};
use serde::{Deserialize, Serialize};

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// Observer metadata collected before the session.
///
/// Opaque strings as far as the engine is concerned; they are echoed into
/// every result row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantInfo {
    /// Session date, `YYYYMMDD`.
    pub date: String,
    /// Session start time, `HHMMSS`.
    pub time: String,
    pub name: String,
    pub age: String,
    pub gender: String,
    pub dominant_hand: String,
}

impl ParticipantInfo {
    /// Placeholder identity for headless simulations and tests.
    pub fn anonymous() -> Self {
        Self {
            date: String::new(),
            time: String::new(),
            name: "anonymous".into(),
            age: String::new(),
            gender: String::new(),
            dominant_hand: String::new(),
        }
    }

    /// Stamp empty date/time fields with the current local clock.
    pub fn with_current_datetime(mut self) -> Self {
        let now = chrono::Local::now();
        if self.date.is_empty() {
            self.date = now.format("%Y%m%d").to_string();
        }
        if self.time.is_empty() {
            self.time = now.format("%H%M%S").to_string();
        }
        self
    }
}

impl Default for ParticipantInfo {
    fn default() -> Self {
        Self::anonymous()
    }
}

/// The factor levels of one trial, either scheme.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum TrialSpec {
    Flanker(Trial),
    Ensemble(EnsembleTrial),
}

/// One completed trial: what was shown and what the observer did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    /// 1-based position in the session.
    pub trial_no: usize,
    pub spec: TrialSpec,
    /// The drawn orientations, logged for offline verification.
    pub stimulus: GaborSet,
    pub response: ResponseKey,
    /// Response latency in seconds.
    pub latency: f64,
}

/// How the session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionOutcome {
    /// Every planned trial ran.
    Completed,
    /// The observer quit or the caller raised the abort flag; the records
    /// for the first `completed` trials are kept.
    Aborted { completed: usize },
}

/// Which experiment variant a session ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// First version: flanker-offset tables.
    Flanker,
    /// Second version: ensemble orientation pools.
    Ensemble,
    /// Practice trials: ensemble pools plus feedback after each response.
    Practice,
}

/// Complete result of one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub session_id: String,
    pub variant: Variant,
    pub participant: ParticipantInfo,
    /// Master seed the whole session derives from.
    pub master_seed: u64,
    /// Number of trials the session was going to run.
    pub planned_trials: usize,
    pub records: Vec<TrialRecord>,
    pub outcome: SessionOutcome,
}

/// Default schema version for serde deserialization of older JSON without
/// the field.
fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}
