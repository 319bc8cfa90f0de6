//! End-to-end session tests against the scripted presenter.

use std::sync::atomic::Ordering;

use gaborlab_core::{Condition, Configuration, Cue, GridPosition, ResponseKey, Variation};
use gaborlab_runner::{
    abort_flag, run_ensemble_session, run_flanker_session, run_session, ScriptedPresenter,
    SessionConfig, SessionError, SessionOutcome, TrialSpec, Variant,
};

/// A small flanker design: 1 × 2 × 2 × 2 × 2 = 16 trials.
fn small_flanker_config(seed: u64) -> SessionConfig {
    let mut config = SessionConfig::preset(Variant::Flanker);
    config.seed = Some(seed);
    config.flanker_factors = Some(gaborlab_core::TrialFactors {
        conditions: vec![Condition::SingleCongruent],
        orientations: vec![0, 10],
        positions: GridPosition::ALL.to_vec(),
        configurations: Configuration::ALL.to_vec(),
        variations: Variation::ALL.to_vec(),
        positions_per_orientation: 2,
    });
    config
}

#[test]
fn completed_session_records_every_trial() {
    let config = small_flanker_config(7);
    let mut presenter = ScriptedPresenter::always(ResponseKey::Clockwise, 16);
    let result = run_flanker_session(&config, &mut presenter, abort_flag()).unwrap();

    assert_eq!(result.outcome, SessionOutcome::Completed);
    assert_eq!(result.planned_trials, 16);
    assert_eq!(result.records.len(), 16);
    assert!(presenter.debriefed);

    // trial numbers are 1-based and monotone
    for (i, record) in result.records.iter().enumerate() {
        assert_eq!(record.trial_no, i + 1);
        assert_eq!(record.response, ResponseKey::Clockwise);
    }

    // one fixation, stimulus, and cue pair per trial
    assert_eq!(presenter.fixations, 16);
    assert_eq!(presenter.stimuli.len(), 16);
    assert_eq!(presenter.cues.len(), 32);
}

#[test]
fn stimulus_log_matches_records() {
    let config = small_flanker_config(21);
    let mut presenter = ScriptedPresenter::always(ResponseKey::Anticlockwise, 16);
    let result = run_flanker_session(&config, &mut presenter, abort_flag()).unwrap();

    for (record, shown) in result.records.iter().zip(&presenter.stimuli) {
        assert_eq!(&record.stimulus, shown);
        let TrialSpec::Flanker(trial) = record.spec else {
            panic!("flanker session produced a non-flanker record");
        };
        assert_eq!(record.stimulus.cued_position(), trial.position);
        assert_eq!(record.stimulus.cued_orientation(), trial.orientation);
    }
}

#[test]
fn cue_sequence_follows_condition() {
    let config = small_flanker_config(3);
    let mut presenter = ScriptedPresenter::always(ResponseKey::Clockwise, 16);
    let result = run_flanker_session(&config, &mut presenter, abort_flag()).unwrap();

    // single_congruent: both cues are single markers at the trial position
    for (i, record) in result.records.iter().enumerate() {
        let TrialSpec::Flanker(trial) = record.spec else {
            panic!("unexpected record spec");
        };
        assert_eq!(presenter.cues[2 * i], Cue::Single(trial.position));
        assert_eq!(presenter.cues[2 * i + 1], Cue::Single(trial.position));
    }
}

#[test]
fn same_seed_reproduces_session() {
    let run = || {
        let config = small_flanker_config(99);
        let mut presenter = ScriptedPresenter::always(ResponseKey::Clockwise, 16);
        run_flanker_session(&config, &mut presenter, abort_flag())
            .unwrap()
            .records
    };
    assert_eq!(run(), run());
}

#[test]
fn quit_mid_session_keeps_prefix() {
    let config = small_flanker_config(5);
    // five responses, then the script falls off the end and quits
    let mut presenter = ScriptedPresenter::always(ResponseKey::Clockwise, 5);
    let result = run_flanker_session(&config, &mut presenter, abort_flag()).unwrap();

    assert_eq!(result.outcome, SessionOutcome::Aborted { completed: 5 });
    assert_eq!(result.records.len(), 5);
    assert_eq!(result.planned_trials, 16);
    assert!(!presenter.debriefed);
}

#[test]
fn abort_flag_stops_at_next_trial_boundary() {
    let config = small_flanker_config(5);
    let mut presenter = ScriptedPresenter::always(ResponseKey::Clockwise, 16);
    let abort = abort_flag();
    abort.store(true, Ordering::Relaxed);

    let result = run_flanker_session(&config, &mut presenter, abort).unwrap();
    assert_eq!(result.outcome, SessionOutcome::Aborted { completed: 0 });
    assert!(result.records.is_empty());
}

#[test]
fn max_trials_truncates_list() {
    let mut config = small_flanker_config(1);
    config.max_trials = Some(4);
    let mut presenter = ScriptedPresenter::always(ResponseKey::Clockwise, 4);
    let result = run_flanker_session(&config, &mut presenter, abort_flag()).unwrap();

    assert_eq!(result.outcome, SessionOutcome::Completed);
    assert_eq!(result.planned_trials, 4);
    assert_eq!(result.records.len(), 4);
}

#[test]
fn breaks_fire_at_quarter_points() {
    let mut config = small_flanker_config(11);
    config.max_trials = Some(8);
    let mut presenter = ScriptedPresenter::always(ResponseKey::Clockwise, 8);
    let result = run_flanker_session(&config, &mut presenter, abort_flag()).unwrap();

    assert_eq!(result.outcome, SessionOutcome::Completed);
    // 8 trials: optional after trial 2, mandatory after 4, optional after 6
    assert_eq!(presenter.breaks.len(), 3);
}

#[test]
fn ensemble_session_runs_without_feedback() {
    let mut config = SessionConfig::preset(Variant::Ensemble);
    config.seed = Some(13);
    config.max_trials = Some(10);
    let mut presenter = ScriptedPresenter::random(13, 10);
    let result = run_ensemble_session(&config, &mut presenter, abort_flag()).unwrap();

    assert_eq!(result.outcome, SessionOutcome::Completed);
    assert_eq!(result.records.len(), 10);
    assert!(presenter.feedback.is_empty());

    for record in &result.records {
        let TrialSpec::Ensemble(trial) = record.spec else {
            panic!("ensemble session produced a non-ensemble record");
        };
        assert_eq!(record.stimulus.cued_orientation(), trial.cued_orientation);
    }
}

#[test]
fn practice_session_shows_feedback_every_trial() {
    let mut config = SessionConfig::preset(Variant::Practice);
    config.seed = Some(17);
    config.max_trials = Some(12);
    let mut presenter = ScriptedPresenter::random(17, 12);
    let result = run_session(&config, &mut presenter, abort_flag()).unwrap();

    assert_eq!(result.outcome, SessionOutcome::Completed);
    assert_eq!(presenter.feedback.len(), 12);
}

#[test]
fn practice_feedback_matches_evaluation() {
    let mut config = SessionConfig::preset(Variant::Practice);
    config.seed = Some(29);
    config.max_trials = Some(20);
    let mut presenter = ScriptedPresenter::always(ResponseKey::Clockwise, 20);
    let result = run_session(&config, &mut presenter, abort_flag()).unwrap();

    for (record, &shown) in result.records.iter().zip(&presenter.feedback) {
        let TrialSpec::Ensemble(trial) = record.spec else {
            panic!("unexpected record spec");
        };
        let expected = gaborlab_runner::evaluate_response(
            trial.condition,
            trial.set_orientation,
            trial.cued_orientation,
            record.response,
        );
        assert_eq!(shown, expected);
    }
}

#[test]
fn variant_mismatch_is_rejected() {
    let config = SessionConfig::preset(Variant::Ensemble);
    let mut presenter = ScriptedPresenter::always(ResponseKey::Clockwise, 1);
    let err = run_flanker_session(&config, &mut presenter, abort_flag()).unwrap_err();
    assert!(matches!(err, SessionError::VariantMismatch { .. }));

    let config = SessionConfig::preset(Variant::Flanker);
    let mut presenter = ScriptedPresenter::always(ResponseKey::Clockwise, 1);
    let err = run_ensemble_session(&config, &mut presenter, abort_flag()).unwrap_err();
    assert!(matches!(err, SessionError::VariantMismatch { .. }));
}

#[test]
fn session_id_ties_to_seed() {
    let a = {
        let config = small_flanker_config(1);
        let mut p = ScriptedPresenter::always(ResponseKey::Clockwise, 16);
        run_flanker_session(&config, &mut p, abort_flag()).unwrap()
    };
    let b = {
        let config = small_flanker_config(2);
        let mut p = ScriptedPresenter::always(ResponseKey::Clockwise, 16);
        run_flanker_session(&config, &mut p, abort_flag()).unwrap()
    };
    assert_ne!(a.session_id, b.session_id);
    assert_eq!(a.master_seed, 1);
    assert_eq!(b.master_seed, 2);
}
