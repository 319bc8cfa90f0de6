//! Structured error types for the stimulus engine.

use thiserror::Error;

/// Errors from trial generation and orientation assignment.
///
/// All of these are input-domain violations: the engine itself is pure
/// computation over finite domains and has no recoverable failure modes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("unsupported base orientation {0}° (expected 0, ±5, ±10, or ±20)")]
    UnsupportedOrientation(i32),

    #[error("grid position {0} out of range (expected 1–9)")]
    InvalidPosition(u8),

    #[error("factor domain '{0}' is empty")]
    EmptyFactorDomain(&'static str),

    #[error("requested {requested} positions per bucket but only {available} are available")]
    RepetitionsExceedPositions { requested: usize, available: usize },
}
