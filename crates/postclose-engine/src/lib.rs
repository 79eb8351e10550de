//! Post-close compliance verification.
//!
//! Decides whether an agent's verbatim post-sale disclosure matches the
//! reference script closely enough to pass, and characterizes how it
//! deviates: omission, paraphrase, reordering, or insertion. The engine
//! is a pure function of its inputs; callers own persistence and
//! parallelize per transcript segment.

pub mod distance;
pub mod error;
pub mod matcher;
pub mod normalize;
pub mod script;
pub mod scorer;
pub mod sequence;

pub use error::ConfigError;

use shared_types::{ComplianceMode, ComplianceVerdict, ReferenceScript, Thresholds};

/// Tunable floors for the windowed matcher and extra-content detection.
///
/// Design defaults, not a fixed contract; agencies tune them alongside
/// their mode thresholds.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Window similarity at or above this counts as an exact recital
    pub exact_floor: f64,
    /// Window similarity at or above this counts as a paraphrase; below
    /// it the unit is missing
    pub fuzzy_floor: f64,
    /// Window length tolerance as a fraction of the unit's token count
    pub window_tolerance: f64,
    /// Uncovered transcript runs longer than this many tokens are
    /// reported as possible unauthorized statements
    pub extra_content_floor: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            exact_floor: 0.97,
            fuzzy_floor: 0.55,
            window_tolerance: 0.30,
            extra_content_floor: 15,
        }
    }
}

/// Verification engine entry point.
#[derive(Debug)]
pub struct PostCloseEngine {
    config: EngineConfig,
}

impl PostCloseEngine {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(config: EngineConfig) -> Result<Self, ConfigError> {
        for value in [
            config.exact_floor,
            config.fuzzy_floor,
            config.window_tolerance,
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidFloor { value });
            }
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Verify one transcript segment against a reference script.
    ///
    /// Configuration problems are rejected before any scoring; a
    /// transcript that scores badly, including an empty one, is a
    /// complete verdict, never an error.
    pub fn verify(
        &self,
        transcript: &str,
        script: &ReferenceScript,
        mode: ComplianceMode,
        thresholds: &Thresholds,
    ) -> Result<ComplianceVerdict, ConfigError> {
        for value in [thresholds.strict, thresholds.fuzzy] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigError::InvalidThreshold { value });
            }
        }

        let units = script::decompose(script)?;
        tracing::debug!(unit_count = units.len(), "decomposed reference script");

        let script_norm = normalize::normalize(&script.script_text);
        let transcript_norm = normalize::normalize(transcript);

        let matches: Vec<_> = units
            .iter()
            .map(|unit| matcher::match_unit(unit, &transcript_norm, transcript, &self.config))
            .collect();

        let (levenshtein_distance, similarity_score) =
            distance::distance_metrics(&script_norm.text, &transcript_norm.text);

        let verdict = scorer::score(
            &units,
            &matches,
            &transcript_norm,
            transcript,
            levenshtein_distance,
            similarity_score,
            mode,
            thresholds,
            &self.config,
        );
        tracing::debug!(
            overall_score = verdict.overall_score,
            compliance_passed = verdict.compliance_passed,
            flagged_for_review = verdict.flagged_for_review,
            "verification complete"
        );
        Ok(verdict)
    }
}

impl Default for PostCloseEngine {
    fn default() -> Self {
        Self::new()
    }
}
