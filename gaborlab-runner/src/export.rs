//! Export — JSON, CSV, and artifact-bundle generation.
//!
//! Three surfaces:
//! - **JSON**: full round-trip serialization of `SessionResult` with schema
//!   versioning; unknown versions are rejected on load.
//! - **CSV**: the result table (one row per trial, columns matching the
//!   experiment's analysis pipeline) and the per-trial orientation backup.
//! - **Artifacts**: a per-session directory holding all of the above.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use gaborlab_core::{GridPosition, Trial};

use crate::record::{SessionResult, TrialSpec, Variant, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `SessionResult` to pretty JSON.
pub fn export_json(result: &SessionResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize SessionResult to JSON")
}

/// Deserialize a `SessionResult` from JSON, rejecting unknown schema
/// versions.
pub fn import_json(json: &str) -> Result<SessionResult> {
    let result: SessionResult =
        serde_json::from_str(json).context("failed to deserialize SessionResult from JSON")?;
    if result.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            result.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(result)
}

// ─── CSV export ─────────────────────────────────────────────────────

const FLANKER_HEADER: [&str; 14] = [
    "Exp_Date",
    "Exp_Time",
    "Sub_Name",
    "Age",
    "Gender",
    "Dominant_Hand",
    "Trial_No",
    "Condition",
    "Orientation",
    "Position",
    "Configuration",
    "Variation",
    "Response",
    "Latency",
];

const ENSEMBLE_HEADER: [&str; 13] = [
    "Exp_Date",
    "Exp_Time",
    "Sub_Name",
    "Age",
    "Gender",
    "Dominant_Hand",
    "Trial_No",
    "Condition",
    "Cued_Orientation",
    "Set_Orientation",
    "Position",
    "Response",
    "Latency",
];

/// Export the result table as CSV.
///
/// Column set depends on the session variant: flanker sessions carry the
/// configuration/variation flags, ensemble sessions the cued/set
/// orientation pair.
pub fn export_results_csv(result: &SessionResult) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    match result.variant {
        Variant::Flanker => wtr.write_record(FLANKER_HEADER)?,
        Variant::Ensemble | Variant::Practice => wtr.write_record(ENSEMBLE_HEADER)?,
    }

    let p = &result.participant;
    for record in &result.records {
        match record.spec {
            TrialSpec::Flanker(Trial {
                condition,
                orientation,
                position,
                configuration,
                variation,
            }) => {
                wtr.write_record([
                    p.date.as_str(),
                    p.time.as_str(),
                    p.name.as_str(),
                    p.age.as_str(),
                    p.gender.as_str(),
                    p.dominant_hand.as_str(),
                    &record.trial_no.to_string(),
                    &condition.code().to_string(),
                    &orientation.to_string(),
                    &position.to_string(),
                    &configuration.code().to_string(),
                    &variation.code().to_string(),
                    record.response.key_name(),
                    &format!("{:.4}", record.latency),
                ])?;
            }
            TrialSpec::Ensemble(trial) => {
                wtr.write_record([
                    p.date.as_str(),
                    p.time.as_str(),
                    p.name.as_str(),
                    p.age.as_str(),
                    p.gender.as_str(),
                    p.dominant_hand.as_str(),
                    &record.trial_no.to_string(),
                    &trial.condition.code().to_string(),
                    &trial.cued_orientation.to_string(),
                    &trial.set_orientation.to_string(),
                    &trial.position.to_string(),
                    record.response.key_name(),
                    &format!("{:.4}", record.latency),
                ])?;
            }
        }
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export the per-trial orientation backup: the nine drawn orientations of
/// every stimulus, row-major.
pub fn export_orientations_csv(result: &SessionResult) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = vec!["Trial_No".to_string(), "Cued_Position".to_string()];
    header.extend(GridPosition::ALL.iter().map(|pos| format!("Cell_{pos}")));
    wtr.write_record(&header)?;

    for record in &result.records {
        let mut row = vec![
            record.trial_no.to_string(),
            record.stimulus.cued_position().to_string(),
        ];
        row.extend(record.stimulus.as_array().iter().map(|o| o.to_string()));
        wtr.write_record(&row)?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export a generated flanker trial list (pre-session preview).
pub fn export_trial_list_csv(trials: &[Trial]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["Trial_No", "Condition", "Orientation", "Position", "Configuration", "Variation"])?;
    for (i, t) in trials.iter().enumerate() {
        wtr.write_record([
            &(i + 1).to_string(),
            &t.condition.code().to_string(),
            &t.orientation.to_string(),
            &t.position.to_string(),
            &t.configuration.code().to_string(),
            &t.variation.code().to_string(),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export a generated ensemble trial list (pre-session preview).
pub fn export_ensemble_trial_list_csv(trials: &[gaborlab_core::EnsembleTrial]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["Trial_No", "Condition", "Cued_Orientation", "Set_Orientation", "Position"])?;
    for (i, t) in trials.iter().enumerate() {
        wtr.write_record([
            &(i + 1).to_string(),
            &t.condition.code().to_string(),
            &t.cued_orientation.to_string(),
            &t.set_orientation.to_string(),
            &t.position.to_string(),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for one session.
///
/// Creates a directory named `{participant}_{timestamp}/` under
/// `output_dir` containing:
/// - `manifest.json` — the full `SessionResult`
/// - `results.csv` — the trial/response table
/// - `orientations.csv` — every drawn stimulus, for offline verification
///
/// Returns the path to the created directory.
pub fn save_artifacts(result: &SessionResult, output_dir: &Path) -> Result<PathBuf> {
    let name = if result.participant.name.is_empty() {
        "session"
    } else {
        result.participant.name.as_str()
    };
    let dirname = format!(
        "{}_{}",
        name,
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    let json = export_json(result)?;
    std::fs::write(run_dir.join("manifest.json"), &json)?;

    let results_csv = export_results_csv(result)?;
    std::fs::write(run_dir.join("results.csv"), &results_csv)?;

    let orientations_csv = export_orientations_csv(result)?;
    std::fs::write(run_dir.join("orientations.csv"), &orientations_csv)?;

    Ok(run_dir)
}

/// Load a `SessionResult` from an artifact directory's manifest.json.
///
/// Rejects unknown schema versions.
pub fn load_artifacts(dir: &Path) -> Result<SessionResult> {
    let manifest_path = dir.join("manifest.json");
    let json = std::fs::read_to_string(&manifest_path)
        .with_context(|| format!("failed to read {}", manifest_path.display()))?;
    import_json(&json)
}
