//! Session summarisation — psychometric-curve-ready counts per condition.
//!
//! For each condition: how often the observer answered "clockwise" at each
//! reference orientation, per-magnitude accuracy, and latency statistics.
//! `summarize_directory` batch-processes every saved session under a
//! directory, in parallel.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gaborlab_core::{Condition, CueScope, ResponseKey};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::export::load_artifacts;
use crate::record::{SessionResult, TrialRecord, TrialSpec};

/// Response tally at one reference orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrientationCount {
    pub clockwise: usize,
    pub total: usize,
}

/// One condition's aggregated responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionSummary {
    pub condition: Condition,
    /// Clockwise counts keyed by reference orientation (cued patch for
    /// single-report conditions, set tilt for ensemble-report ones).
    pub counts: BTreeMap<i32, OrientationCount>,
    /// Fraction of direction-correct responses per tilt magnitude
    /// (clockwise at +k plus anticlockwise at −k over the bucket sizes).
    pub accuracy: BTreeMap<i32, f64>,
    pub latency_mean: f64,
    /// Sample (n−1) standard deviation; zero with fewer than two trials.
    pub latency_sd: f64,
}

/// Aggregated view of one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub participant_name: String,
    pub trial_count: usize,
    pub conditions: Vec<ConditionSummary>,
}

/// The tilt the observer was asked to report on a trial.
fn reference_orientation(record: &TrialRecord) -> (Condition, i32) {
    match record.spec {
        TrialSpec::Flanker(t) => (t.condition, t.orientation),
        TrialSpec::Ensemble(t) => {
            let reference = match t.condition.report_scope() {
                CueScope::Single => t.cued_orientation,
                CueScope::Ensemble => t.set_orientation,
            };
            (t.condition, reference)
        }
    }
}

fn latency_stats(latencies: &[f64]) -> (f64, f64) {
    if latencies.is_empty() {
        return (0.0, 0.0);
    }
    let n = latencies.len() as f64;
    let mean = latencies.iter().sum::<f64>() / n;
    if latencies.len() < 2 {
        return (mean, 0.0);
    }
    let var = latencies.iter().map(|l| (l - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, var.sqrt())
}

/// Accuracy per tilt magnitude: direction-correct responses at ±k over the
/// number of trials at ±k. Zero-tilt trials have no correct direction and
/// are excluded.
fn accuracy_by_magnitude(counts: &BTreeMap<i32, OrientationCount>) -> BTreeMap<i32, f64> {
    let mut accuracy = BTreeMap::new();
    for (&ori, &pos_count) in counts.iter() {
        if ori <= 0 {
            continue;
        }
        let neg_count = counts.get(&-ori).copied().unwrap_or_default();
        let total = pos_count.total + neg_count.total;
        if total == 0 {
            continue;
        }
        let correct = pos_count.clockwise + (neg_count.total - neg_count.clockwise);
        accuracy.insert(ori, correct as f64 / total as f64);
    }
    // negative-only magnitudes still get an entry
    for (&ori, &neg_count) in counts.iter() {
        let magnitude = -ori;
        if ori >= 0 || accuracy.contains_key(&magnitude) || neg_count.total == 0 {
            continue;
        }
        let correct = neg_count.total - neg_count.clockwise;
        accuracy.insert(magnitude, correct as f64 / neg_count.total as f64);
    }
    accuracy
}

/// Aggregate one session.
pub fn summarize_session(result: &SessionResult) -> SessionSummary {
    let mut conditions = Vec::new();

    for condition in Condition::ALL {
        let records: Vec<&TrialRecord> = result
            .records
            .iter()
            .filter(|r| reference_orientation(r).0 == condition)
            .collect();
        if records.is_empty() {
            continue;
        }

        let mut counts: BTreeMap<i32, OrientationCount> = BTreeMap::new();
        for record in &records {
            let (_, reference) = reference_orientation(record);
            let entry = counts.entry(reference).or_default();
            entry.total += 1;
            if record.response == ResponseKey::Clockwise {
                entry.clockwise += 1;
            }
        }

        let latencies: Vec<f64> = records.iter().map(|r| r.latency).collect();
        let (latency_mean, latency_sd) = latency_stats(&latencies);

        conditions.push(ConditionSummary {
            condition,
            accuracy: accuracy_by_magnitude(&counts),
            counts,
            latency_mean,
            latency_sd,
        });
    }

    SessionSummary {
        session_id: result.session_id.clone(),
        participant_name: result.participant.name.clone(),
        trial_count: result.records.len(),
        conditions,
    }
}

/// Export a summary as CSV, one row per condition.
///
/// Count columns cover every reference orientation seen in the session;
/// accuracy columns every tilt magnitude.
pub fn export_summary_csv(summary: &SessionSummary) -> Result<String> {
    let mut orientations: Vec<i32> = summary
        .conditions
        .iter()
        .flat_map(|c| c.counts.keys().copied())
        .collect();
    orientations.sort_unstable();
    orientations.dedup();

    let mut magnitudes: Vec<i32> = summary
        .conditions
        .iter()
        .flat_map(|c| c.accuracy.keys().copied())
        .collect();
    magnitudes.sort_unstable();
    magnitudes.dedup();

    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = vec!["Sub_Name".to_string(), "Condition".to_string()];
    header.extend(orientations.iter().map(|o| format!("Count_{o:+}")));
    header.extend(magnitudes.iter().map(|m| format!("Accuracy_{m}")));
    header.push("Latency_Mean".to_string());
    header.push("Latency_SD".to_string());
    wtr.write_record(&header)?;

    for cond in &summary.conditions {
        let mut row = vec![
            summary.participant_name.clone(),
            cond.condition.code().to_string(),
        ];
        for ori in &orientations {
            let count = cond.counts.get(ori).copied().unwrap_or_default();
            row.push(count.clockwise.to_string());
        }
        for mag in &magnitudes {
            match cond.accuracy.get(mag) {
                Some(acc) => row.push(format!("{acc:.4}")),
                None => row.push(String::new()),
            }
        }
        row.push(format!("{:.4}", cond.latency_mean));
        row.push(format!("{:.4}", cond.latency_sd));
        wtr.write_record(&row)?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Summarise every saved session under `input_dir`.
///
/// Looks for artifact directories (those containing a `manifest.json`),
/// processes them in parallel, and writes `processed_{name}.csv` files
/// into `output_dir`. Returns the written paths.
pub fn summarize_directory(input_dir: &Path, output_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut session_dirs = Vec::new();
    for entry in std::fs::read_dir(input_dir)
        .with_context(|| format!("failed to read {}", input_dir.display()))?
    {
        let entry = entry?;
        if entry.path().join("manifest.json").exists() {
            session_dirs.push(entry.path());
        }
    }

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    session_dirs
        .par_iter()
        .map(|dir| {
            let result = load_artifacts(dir)?;
            let summary = summarize_session(&result);
            let csv = export_summary_csv(&summary)?;
            let name = dir
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| summary.session_id.clone());
            let out_path = output_dir.join(format!("processed_{name}.csv"));
            std::fs::write(&out_path, csv)
                .with_context(|| format!("failed to write {}", out_path.display()))?;
            Ok(out_path)
        })
        .collect()
}
