//! The trial loop.
//!
//! Two entry points, one per stimulus scheme:
//! - `run_flanker_session()` — first-version trials (offset tables)
//! - `run_ensemble_session()` — second-version and practice trials
//!
//! Both sequence fixation → pre-cue → stimulus → blank → post-cue →
//! response per trial, check the abort flag between trials, and return the
//! partial record set when the observer quits early.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use gaborlab_core::{
    assign_ensemble, assign_orientations, generate_ensemble_trials, generate_trials, DomainError,
    SeedSchedule,
};
use thiserror::Error;

use crate::config::{ConfigError, SessionConfig};
use crate::feedback::evaluate_response;
use crate::presenter::{BreakKind, BreakOutcome, KeyEvent, Presenter, PresenterError};
use crate::record::{
    SessionOutcome, SessionResult, TrialRecord, TrialSpec, Variant, SCHEMA_VERSION,
};

/// Errors from running a session.
///
/// Observer-initiated termination is not an error; it surfaces as
/// `SessionOutcome::Aborted` in the result.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),
    #[error("presenter error: {0}")]
    Presenter(#[from] PresenterError),
    #[error("config variant {actual:?} cannot run in a {expected:?} session")]
    VariantMismatch { expected: Variant, actual: Variant },
}

/// Rest points at the quarter marks of the list: optional at ¼ and ¾,
/// mandatory at ½.
fn break_after(trial_index: usize, total: usize, config: &SessionConfig) -> Option<BreakKind> {
    if !config.breaks.enabled || total < 4 {
        return None;
    }
    let optional = BreakKind::Optional {
        duration: Duration::from_secs(config.breaks.optional_secs),
    };
    let mandatory = BreakKind::Mandatory {
        duration: Duration::from_secs(config.breaks.mandatory_secs),
    };
    if trial_index + 1 == total / 2 {
        Some(mandatory)
    } else if trial_index + 1 == total / 4 || trial_index + 1 == 3 * total / 4 {
        Some(optional)
    } else {
        None
    }
}

/// Outcome of one per-trial presentation pass.
enum TrialFlow {
    Recorded(TrialRecord),
    Quit,
}

/// Run the shared fixation → cues → response timeline for one trial.
#[allow(clippy::too_many_arguments)]
fn present_trial<P: Presenter>(
    presenter: &mut P,
    config: &SessionConfig,
    trial_no: usize,
    spec: TrialSpec,
    stimulus: gaborlab_core::GaborSet,
    precue: gaborlab_core::Cue,
    postcue: gaborlab_core::Cue,
) -> Result<TrialFlow, SessionError> {
    let t = &config.timing;

    presenter.show_fixation(Duration::from_millis(t.fixation_ms))?;
    presenter.show_cue(precue, Duration::from_millis(t.precue_ms))?;
    presenter.show_stimulus(&stimulus, Duration::from_millis(t.stimulus_ms))?;
    presenter.show_blank(Duration::from_millis(t.blank_ms))?;
    presenter.show_cue(postcue, Duration::from_millis(0))?;

    let (key, latency) = presenter.await_response()?;
    let response = match key {
        KeyEvent::Quit => return Ok(TrialFlow::Quit),
        KeyEvent::Response(r) => r,
    };

    Ok(TrialFlow::Recorded(TrialRecord {
        trial_no,
        spec,
        stimulus,
        response,
        latency: latency.as_secs_f64(),
    }))
}

fn finish(
    config: &SessionConfig,
    seed: u64,
    planned: usize,
    records: Vec<TrialRecord>,
    outcome: SessionOutcome,
) -> SessionResult {
    SessionResult {
        schema_version: SCHEMA_VERSION,
        session_id: config.session_id(seed),
        variant: config.variant,
        participant: config.participant.clone().with_current_datetime(),
        master_seed: seed,
        planned_trials: planned,
        records,
        outcome,
    }
}

/// Run a first-version (flanker-offset) session.
pub fn run_flanker_session<P: Presenter>(
    config: &SessionConfig,
    presenter: &mut P,
    abort: Arc<AtomicBool>,
) -> Result<SessionResult, SessionError> {
    if config.variant != Variant::Flanker {
        return Err(SessionError::VariantMismatch {
            expected: Variant::Flanker,
            actual: config.variant,
        });
    }

    let seed = config.resolve_seed();
    let schedule = SeedSchedule::new(seed);

    let factors = config.flanker_factors();
    let mut trials = generate_trials(&factors, &mut schedule.trial_list_rng())?;
    if let Some(max) = config.max_trials {
        trials.truncate(max);
    }
    let planned = trials.len();

    if matches!(presenter.show_instructions()?, KeyEvent::Quit) {
        return Ok(finish(
            config,
            seed,
            planned,
            Vec::new(),
            SessionOutcome::Aborted { completed: 0 },
        ));
    }

    let mut records = Vec::with_capacity(planned);
    for (i, trial) in trials.iter().enumerate() {
        if abort.load(Ordering::Relaxed) {
            let completed = records.len();
            return Ok(finish(
                config,
                seed,
                planned,
                records,
                SessionOutcome::Aborted { completed },
            ));
        }

        let mut rng = schedule.stimulus_rng(i as u64);
        let stimulus = assign_orientations(
            trial.orientation,
            trial.position,
            trial.configuration,
            trial.variation,
            &mut rng,
        )?;

        let flow = present_trial(
            presenter,
            config,
            i + 1,
            TrialSpec::Flanker(*trial),
            stimulus,
            trial.condition.precue(trial.position),
            trial.condition.postcue(trial.position),
        )?;
        match flow {
            TrialFlow::Quit => {
                let completed = records.len();
                return Ok(finish(
                    config,
                    seed,
                    planned,
                    records,
                    SessionOutcome::Aborted { completed },
                ));
            }
            TrialFlow::Recorded(record) => records.push(record),
        }

        presenter.show_blank(Duration::from_millis(config.timing.intertrial_ms))?;

        if let Some(kind) = break_after(i, planned, config) {
            if presenter.run_break(kind)? == BreakOutcome::Quit {
                let completed = records.len();
                return Ok(finish(
                    config,
                    seed,
                    planned,
                    records,
                    SessionOutcome::Aborted { completed },
                ));
            }
        }
    }

    presenter.show_debrief()?;
    Ok(finish(
        config,
        seed,
        planned,
        records,
        SessionOutcome::Completed,
    ))
}

/// Run a second-version or practice (ensemble-pool) session.
///
/// Practice sessions additionally show colour feedback after each response.
pub fn run_ensemble_session<P: Presenter>(
    config: &SessionConfig,
    presenter: &mut P,
    abort: Arc<AtomicBool>,
) -> Result<SessionResult, SessionError> {
    if config.variant == Variant::Flanker {
        return Err(SessionError::VariantMismatch {
            expected: Variant::Ensemble,
            actual: config.variant,
        });
    }
    let with_feedback = config.variant == Variant::Practice;

    let seed = config.resolve_seed();
    let schedule = SeedSchedule::new(seed);

    let factors = config.ensemble_factors();
    let params = config.ensemble_params();
    let mut trials = generate_ensemble_trials(&factors, &mut schedule.trial_list_rng())?;
    if let Some(max) = config.max_trials {
        trials.truncate(max);
    }
    let planned = trials.len();

    if matches!(presenter.show_instructions()?, KeyEvent::Quit) {
        return Ok(finish(
            config,
            seed,
            planned,
            Vec::new(),
            SessionOutcome::Aborted { completed: 0 },
        ));
    }

    let mut records = Vec::with_capacity(planned);
    for (i, trial) in trials.iter().enumerate() {
        if abort.load(Ordering::Relaxed) {
            let completed = records.len();
            return Ok(finish(
                config,
                seed,
                planned,
                records,
                SessionOutcome::Aborted { completed },
            ));
        }

        let mut rng = schedule.stimulus_rng(i as u64);
        let stimulus = assign_ensemble(
            trial.set_orientation,
            trial.cued_orientation,
            trial.position,
            &params,
            &mut rng,
        )?;

        let flow = present_trial(
            presenter,
            config,
            i + 1,
            TrialSpec::Ensemble(*trial),
            stimulus,
            trial.condition.precue(trial.position),
            trial.condition.postcue(trial.position),
        )?;
        match flow {
            TrialFlow::Quit => {
                let completed = records.len();
                return Ok(finish(
                    config,
                    seed,
                    planned,
                    records,
                    SessionOutcome::Aborted { completed },
                ));
            }
            TrialFlow::Recorded(record) => {
                if with_feedback {
                    let correct = evaluate_response(
                        trial.condition,
                        trial.set_orientation,
                        trial.cued_orientation,
                        record.response,
                    );
                    presenter
                        .show_feedback(correct, Duration::from_millis(config.timing.feedback_ms))?;
                }
                records.push(record);
            }
        }

        presenter.show_blank(Duration::from_millis(config.timing.intertrial_ms))?;

        if let Some(kind) = break_after(i, planned, config) {
            if presenter.run_break(kind)? == BreakOutcome::Quit {
                let completed = records.len();
                return Ok(finish(
                    config,
                    seed,
                    planned,
                    records,
                    SessionOutcome::Aborted { completed },
                ));
            }
        }
    }

    presenter.show_debrief()?;
    Ok(finish(
        config,
        seed,
        planned,
        records,
        SessionOutcome::Completed,
    ))
}

/// Run whichever session the config's variant calls for.
pub fn run_session<P: Presenter>(
    config: &SessionConfig,
    presenter: &mut P,
    abort: Arc<AtomicBool>,
) -> Result<SessionResult, SessionError> {
    match config.variant {
        Variant::Flanker => run_flanker_session(config, presenter, abort),
        Variant::Ensemble | Variant::Practice => run_ensemble_session(config, presenter, abort),
    }
}

/// Fresh abort flag for a session; raise it from any thread to stop the
/// loop at the next trial boundary.
pub fn abort_flag() -> Arc<AtomicBool> {
    Arc::new(AtomicBool::new(false))
}
