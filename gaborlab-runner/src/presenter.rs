//! The presentation backend trait and a scripted implementation.
//!
//! `Presenter` abstracts over the display-and-input surface (window,
//! stimulus drawing, keyboard polling) so the trial loop can be driven by a
//! real GUI backend or, for tests and headless simulation, by
//! `ScriptedPresenter`.

use std::time::Duration;

use gaborlab_core::{Cue, GaborSet, ResponseKey};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

/// Failure surface of a presentation backend.
#[derive(Debug, Error)]
pub enum PresenterError {
    #[error("presentation backend error: {0}")]
    Backend(String),
}

/// A keypress relevant to the trial loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Response(ResponseKey),
    /// The quit key — terminate the session.
    Quit,
}

/// A rest point in the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakKind {
    /// Skippable break.
    Optional { duration: Duration },
    /// The observer must wait out the full duration.
    Mandatory { duration: Duration },
}

/// What the observer did at a rest point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakOutcome {
    Finished,
    Skipped,
    Quit,
}

/// The display-and-input surface the trial loop drives.
///
/// Implementations own all rendering and timing; hold durations are
/// requests, and `await_response` blocks until a response or quit key and
/// reports the measured latency.
pub trait Presenter {
    /// Show the instruction screen; returns the keypress that dismissed it.
    fn show_instructions(&mut self) -> Result<KeyEvent, PresenterError>;

    fn show_fixation(&mut self, hold: Duration) -> Result<(), PresenterError>;

    /// Show a pre- or post-cue marker.
    fn show_cue(&mut self, cue: Cue, hold: Duration) -> Result<(), PresenterError>;

    fn show_stimulus(&mut self, set: &GaborSet, hold: Duration) -> Result<(), PresenterError>;

    fn show_blank(&mut self, hold: Duration) -> Result<(), PresenterError>;

    /// Block until the observer responds; returns the key and its latency.
    fn await_response(&mut self) -> Result<(KeyEvent, Duration), PresenterError>;

    /// Practice-only: colour feedback after a response.
    fn show_feedback(&mut self, correct: bool, hold: Duration) -> Result<(), PresenterError>;

    fn run_break(&mut self, kind: BreakKind) -> Result<BreakOutcome, PresenterError>;

    fn show_debrief(&mut self) -> Result<(), PresenterError>;
}

/// A deterministic presenter for tests and headless simulation.
///
/// Responses come from a pre-loaded script; every screen call is counted so
/// tests can assert on the sequencing. Time never actually passes.
#[derive(Debug)]
pub struct ScriptedPresenter {
    responses: Vec<KeyEvent>,
    next_response: usize,
    latency: Duration,
    /// Screens shown, in order, for sequencing assertions.
    pub fixations: usize,
    pub cues: Vec<Cue>,
    pub stimuli: Vec<GaborSet>,
    pub blanks: usize,
    pub feedback: Vec<bool>,
    pub breaks: Vec<BreakKind>,
    pub debriefed: bool,
}

impl ScriptedPresenter {
    /// Play back the given responses in order; once exhausted, quit.
    pub fn new(responses: Vec<KeyEvent>) -> Self {
        Self {
            responses,
            next_response: 0,
            latency: Duration::from_millis(420),
            fixations: 0,
            cues: Vec::new(),
            stimuli: Vec::new(),
            blanks: 0,
            feedback: Vec::new(),
            breaks: Vec::new(),
            debriefed: false,
        }
    }

    /// Answer every trial with the same key.
    pub fn always(key: ResponseKey, trials: usize) -> Self {
        Self::new(vec![KeyEvent::Response(key); trials])
    }

    /// Uniformly random responses, reproducible from `seed`.
    pub fn random(seed: u64, trials: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let responses = (0..trials)
            .map(|_| {
                KeyEvent::Response(if rng.gen_bool(0.5) {
                    ResponseKey::Clockwise
                } else {
                    ResponseKey::Anticlockwise
                })
            })
            .collect();
        Self::new(responses)
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn next_key(&mut self) -> KeyEvent {
        let key = self
            .responses
            .get(self.next_response)
            .copied()
            .unwrap_or(KeyEvent::Quit);
        self.next_response += 1;
        key
    }
}

impl Presenter for ScriptedPresenter {
    fn show_instructions(&mut self) -> Result<KeyEvent, PresenterError> {
        // the instruction screen accepts any response key to begin
        Ok(KeyEvent::Response(ResponseKey::Anticlockwise))
    }

    fn show_fixation(&mut self, _hold: Duration) -> Result<(), PresenterError> {
        self.fixations += 1;
        Ok(())
    }

    fn show_cue(&mut self, cue: Cue, _hold: Duration) -> Result<(), PresenterError> {
        self.cues.push(cue);
        Ok(())
    }

    fn show_stimulus(&mut self, set: &GaborSet, _hold: Duration) -> Result<(), PresenterError> {
        self.stimuli.push(*set);
        Ok(())
    }

    fn show_blank(&mut self, _hold: Duration) -> Result<(), PresenterError> {
        self.blanks += 1;
        Ok(())
    }

    fn await_response(&mut self) -> Result<(KeyEvent, Duration), PresenterError> {
        Ok((self.next_key(), self.latency))
    }

    fn show_feedback(&mut self, correct: bool, _hold: Duration) -> Result<(), PresenterError> {
        self.feedback.push(correct);
        Ok(())
    }

    fn run_break(&mut self, kind: BreakKind) -> Result<BreakOutcome, PresenterError> {
        self.breaks.push(kind);
        Ok(match kind {
            BreakKind::Optional { .. } => BreakOutcome::Skipped,
            BreakKind::Mandatory { .. } => BreakOutcome::Finished,
        })
    }

    fn show_debrief(&mut self) -> Result<(), PresenterError> {
        self.debriefed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_replays_then_quits() {
        let mut p = ScriptedPresenter::new(vec![
            KeyEvent::Response(ResponseKey::Clockwise),
            KeyEvent::Response(ResponseKey::Anticlockwise),
        ]);
        assert_eq!(
            p.await_response().unwrap().0,
            KeyEvent::Response(ResponseKey::Clockwise)
        );
        assert_eq!(
            p.await_response().unwrap().0,
            KeyEvent::Response(ResponseKey::Anticlockwise)
        );
        assert_eq!(p.await_response().unwrap().0, KeyEvent::Quit);
    }

    #[test]
    fn random_script_is_reproducible() {
        let keys = |seed| {
            let mut p = ScriptedPresenter::random(seed, 20);
            (0..20).map(|_| p.await_response().unwrap().0).collect::<Vec<_>>()
        };
        assert_eq!(keys(5), keys(5));
        assert_ne!(keys(5), keys(6));
    }
}
