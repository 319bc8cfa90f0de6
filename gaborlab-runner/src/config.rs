//! Serializable session configuration.
//!
//! A `SessionConfig` captures everything needed to reproduce a session:
//! variant, factor domains, timings, break policy, participant metadata,
//! and the master seed. Presets reproduce the published parameter sets of
//! the three experiment scripts.

use std::path::Path;

use gaborlab_core::{
    DomainError, EnsembleFactors, EnsembleParams, TrialFactors, SUPPORTED_ORIENTATIONS,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::{ParticipantInfo, Variant};

/// Errors from loading or validating a session config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Screen hold durations, milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "TimingConfig::default_fixation_ms")]
    pub fixation_ms: u64,
    #[serde(default = "TimingConfig::default_precue_ms")]
    pub precue_ms: u64,
    #[serde(default = "TimingConfig::default_stimulus_ms")]
    pub stimulus_ms: u64,
    #[serde(default = "TimingConfig::default_blank_ms")]
    pub blank_ms: u64,
    #[serde(default = "TimingConfig::default_intertrial_ms")]
    pub intertrial_ms: u64,
    #[serde(default = "TimingConfig::default_feedback_ms")]
    pub feedback_ms: u64,
}

impl TimingConfig {
    fn default_fixation_ms() -> u64 {
        250
    }
    fn default_precue_ms() -> u64 {
        750
    }
    fn default_stimulus_ms() -> u64 {
        200
    }
    fn default_blank_ms() -> u64 {
        400
    }
    fn default_intertrial_ms() -> u64 {
        500
    }
    fn default_feedback_ms() -> u64 {
        1000
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            fixation_ms: Self::default_fixation_ms(),
            precue_ms: Self::default_precue_ms(),
            stimulus_ms: Self::default_stimulus_ms(),
            blank_ms: Self::default_blank_ms(),
            intertrial_ms: Self::default_intertrial_ms(),
            feedback_ms: Self::default_feedback_ms(),
        }
    }
}

/// Rest-point policy.
///
/// Breaks fall at the quarter points of the trial list; the midpoint break
/// is mandatory, the quarter breaks may be skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakConfig {
    #[serde(default = "BreakConfig::default_enabled")]
    pub enabled: bool,
    #[serde(default = "BreakConfig::default_optional_secs")]
    pub optional_secs: u64,
    #[serde(default = "BreakConfig::default_mandatory_secs")]
    pub mandatory_secs: u64,
}

impl BreakConfig {
    fn default_enabled() -> bool {
        true
    }
    fn default_optional_secs() -> u64 {
        60
    }
    fn default_mandatory_secs() -> u64 {
        120
    }
}

impl Default for BreakConfig {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            optional_secs: Self::default_optional_secs(),
            mandatory_secs: Self::default_mandatory_secs(),
        }
    }
}

/// Complete configuration for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub variant: Variant,

    /// Master seed; absent means draw one from OS entropy at run time.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Run only the first N trials of the generated list (the practice
    /// script runs 40 of its 392-item list).
    #[serde(default)]
    pub max_trials: Option<usize>,

    #[serde(default)]
    pub participant: ParticipantInfo,

    #[serde(default)]
    pub timing: TimingConfig,

    #[serde(default)]
    pub breaks: BreakConfig,

    /// Factor-domain override for the flanker variant.
    #[serde(default)]
    pub flanker_factors: Option<TrialFactors>,

    /// Factor-domain override for the ensemble/practice variants.
    #[serde(default)]
    pub ensemble_factors: Option<EnsembleFactors>,
}

impl SessionConfig {
    /// The published parameter set for a variant.
    pub fn preset(variant: Variant) -> Self {
        let mut config = Self {
            variant,
            seed: None,
            max_trials: None,
            participant: ParticipantInfo::anonymous(),
            timing: TimingConfig::default(),
            breaks: BreakConfig::default(),
            flanker_factors: None,
            ensemble_factors: None,
        };
        if variant == Variant::Practice {
            // the practice script builds the full factorial but runs 40
            config.max_trials = Some(40);
        }
        config
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// The flanker factor domains this session runs (override or default).
    pub fn flanker_factors(&self) -> TrialFactors {
        self.flanker_factors
            .clone()
            .unwrap_or_else(TrialFactors::flanker_default)
    }

    /// The ensemble factor domains this session runs (override or default
    /// for the variant).
    pub fn ensemble_factors(&self) -> EnsembleFactors {
        self.ensemble_factors.clone().unwrap_or_else(|| match self.variant {
            Variant::Practice => EnsembleFactors::practice_default(),
            _ => EnsembleFactors::second_version_default(),
        })
    }

    /// The pool constants the ensemble scheme uses for this variant.
    pub fn ensemble_params(&self) -> EnsembleParams {
        match self.variant {
            Variant::Practice => EnsembleParams::PRACTICE,
            _ => EnsembleParams::SECOND_VERSION,
        }
    }

    /// Resolve the master seed, drawing from OS entropy if unset.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }

    /// Deterministic session id: BLAKE3 over the canonical serialized
    /// config plus the resolved seed.
    pub fn session_id(&self, seed: u64) -> String {
        let json = serde_json::to_string(self).expect("SessionConfig serialization failed");
        let mut hasher = blake3::Hasher::new();
        hasher.update(json.as_bytes());
        hasher.update(&seed.to_le_bytes());
        hasher.finalize().to_hex().to_string()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(0) = self.max_trials {
            return Err(ConfigError::Invalid("max_trials must be at least 1".into()));
        }
        match self.variant {
            Variant::Flanker => {
                if self.ensemble_factors.is_some() {
                    return Err(ConfigError::Invalid(
                        "ensemble_factors set on a flanker-variant session".into(),
                    ));
                }
                let factors = self.flanker_factors();
                for &ori in &factors.orientations {
                    if !SUPPORTED_ORIENTATIONS.contains(&ori) {
                        return Err(ConfigError::Domain(DomainError::UnsupportedOrientation(
                            ori,
                        )));
                    }
                }
                if factors.positions_per_orientation > factors.positions.len() {
                    return Err(ConfigError::Domain(
                        DomainError::RepetitionsExceedPositions {
                            requested: factors.positions_per_orientation,
                            available: factors.positions.len(),
                        },
                    ));
                }
            }
            Variant::Ensemble | Variant::Practice => {
                if self.flanker_factors.is_some() {
                    return Err(ConfigError::Invalid(
                        "flanker_factors set on an ensemble-variant session".into(),
                    ));
                }
                let factors = self.ensemble_factors();
                if factors.positions_per_pair > factors.positions.len() {
                    return Err(ConfigError::Domain(
                        DomainError::RepetitionsExceedPositions {
                            requested: factors.positions_per_pair,
                            available: factors.positions.len(),
                        },
                    ));
                }
            }
        }
        Ok(())
    }
}
