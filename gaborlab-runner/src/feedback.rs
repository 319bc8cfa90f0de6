//! Practice-trial feedback: was the response correct?

use gaborlab_core::{Condition, CueScope, ResponseKey};

/// Judge a response against the tilt the observer was asked to report.
///
/// Single-report conditions are judged against the cued patch's tilt;
/// ensemble-report conditions against the set tilt. A zero reference has no
/// correct direction, so any response counts as correct.
pub fn evaluate_response(
    condition: Condition,
    set_orientation: i32,
    cued_orientation: i32,
    response: ResponseKey,
) -> bool {
    let reference = match condition.report_scope() {
        CueScope::Single => cued_orientation,
        CueScope::Ensemble => set_orientation,
    };
    match reference.signum() {
        1 => response == ResponseKey::Clockwise,
        -1 => response == ResponseKey::Anticlockwise,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_report_judged_against_cued() {
        // conditions 1 and 4 post-cue a single patch
        for condition in [Condition::SingleCongruent, Condition::EnsembleIncongruent] {
            assert!(evaluate_response(condition, -20, 10, ResponseKey::Clockwise));
            assert!(!evaluate_response(condition, -20, 10, ResponseKey::Anticlockwise));
            assert!(evaluate_response(condition, 20, -10, ResponseKey::Anticlockwise));
        }
    }

    #[test]
    fn ensemble_report_judged_against_set() {
        // conditions 2 and 3 post-cue the whole set
        for condition in [Condition::SingleIncongruent, Condition::EnsembleCongruent] {
            assert!(evaluate_response(condition, -20, 10, ResponseKey::Anticlockwise));
            assert!(!evaluate_response(condition, -20, 10, ResponseKey::Clockwise));
            assert!(evaluate_response(condition, 20, -10, ResponseKey::Clockwise));
        }
    }

    #[test]
    fn zero_reference_always_correct() {
        assert!(evaluate_response(
            Condition::SingleCongruent,
            20,
            0,
            ResponseKey::Clockwise
        ));
        assert!(evaluate_response(
            Condition::SingleCongruent,
            20,
            0,
            ResponseKey::Anticlockwise
        ));
        assert!(evaluate_response(
            Condition::EnsembleCongruent,
            0,
            20,
            ResponseKey::Anticlockwise
        ));
    }
}
