//! Engine configuration: sensitivity presets, scoring weights, cue lexicons.
//!
//! Everything tunable lives here. Cue lists are data, not code, so the same
//! engine serves other languages or domains by swapping the lexicon; the
//! `Runtime*` mirrors load overrides from JSON without recompilation.

use std::fs;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

/// Named threshold presets trading false-positive against false-negative
/// speaker switches. `Low` flags fewer changes (loose thresholds, high
/// required score); `High` flags more.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sensitivity {
    Low,
    #[default]
    Medium,
    High,
}

impl Sensitivity {
    /// Preset table: (pause threshold s, energy ratio threshold, min score).
    fn thresholds(self) -> (f64, f64, f64) {
        match self {
            Sensitivity::Low => (3.0, 4.0, 4.0),
            Sensitivity::Medium => (2.0, 2.5, 3.0),
            Sensitivity::High => (1.5, 2.0, 2.0),
        }
    }
}

/// Language-specific cue lists and the length cutoffs that qualify them.
///
/// Cues are matched by containment (or prefix, for interrogatives) against
/// the lowercased segment text, so entries must be lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Lexicon {
    /// Affirmation/negation/confirmation words.
    pub acknowledgements: Vec<String>,
    /// Question-opening words, matched as prefixes.
    pub interrogatives: Vec<String>,
    /// Filler words.
    pub interjections: Vec<String>,
    /// Transition words.
    pub transitions: Vec<String>,
    /// Maximum trimmed length (chars) for acknowledgement and transition cues.
    pub short_ack_max_chars: usize,
    /// Maximum trimmed length (chars) for interjection cues.
    pub interjection_max_chars: usize,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::french()
    }
}

impl Lexicon {
    /// Cue lists for French conversation.
    pub fn french() -> Self {
        fn list(words: &[&str]) -> Vec<String> {
            words.iter().map(|word| word.to_string()).collect()
        }
        Self {
            acknowledgements: list(&[
                "oui",
                "non",
                "ok",
                "d'accord",
                "exactement",
                "précisément",
                "voilà",
            ]),
            interrogatives: list(&[
                "comment", "pourquoi", "quand", "où", "qui", "quoi", "combien", "est-ce",
            ]),
            interjections: list(&["euh", "hum", "ben", "bah", "hein", "ah"]),
            transitions: list(&["donc", "alors", "mais", "en fait", "bon"]),
            short_ack_max_chars: 25,
            interjection_max_chars: 15,
        }
    }

    /// True when at least one cue list has an entry. An empty lexicon
    /// disables the lexical signal entirely.
    pub fn has_cues(&self) -> bool {
        !(self.acknowledgements.is_empty()
            && self.interrogatives.is_empty()
            && self.interjections.is_empty()
            && self.transitions.is_empty())
    }

    /// Load a lexicon from a JSON file. Missing fields fall back to the
    /// French defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read lexicon file {:?}", path))?;
        serde_json::from_str(&data).context("failed to parse lexicon JSON")
    }
}

/// Weights, thresholds, and toggles for one segmentation run.
///
/// Construct through [`EngineConfig::preset`] (or `Default`, which is the
/// `Medium` preset) and adjust fields as needed; `TurnEngine::new` rejects
/// invalid values before any segment is processed.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Pause longer than this (seconds) earns the high pause weight.
    pub pause_threshold: f64,
    pub pause_weight_high: f64,
    /// Earned above 0.7x the pause threshold.
    pub pause_weight_low: f64,
    /// Loudness ratio outside [1/t, t] earns the high energy weight.
    pub energy_ratio_threshold: f64,
    pub energy_weight_high: f64,
    /// Earned outside the softer band at 0.8x the ratio threshold.
    pub energy_weight_low: f64,
    /// Denominator guard for the loudness ratio.
    pub energy_epsilon: f64,
    /// Minimum pause (seconds) required before a lexical cue may fire.
    pub lexical_pause_floor: f64,
    pub lexical_weight: f64,
    /// Earned when the text-length ratio leaves [1/3, 3].
    pub shape_weight: f64,
    /// How many recent turns must share a speaker before the cohesion
    /// deduction applies.
    pub cohesion_window: usize,
    pub cohesion_weight: f64,
    /// Consecutive turns a speaker must hold after a flip before the next
    /// flip goes unpenalized.
    pub min_turns_per_speaker: usize,
    pub guard_penalty: f64,
    /// A segment flips the active speaker when its score reaches this.
    pub min_score: f64,
    /// Master switch for the energy component (needs audio to matter).
    pub use_energy: bool,
    /// Master switch for the lexical component (needs a non-empty lexicon).
    pub use_lexical: bool,
    pub lexicon: Lexicon,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::preset(Sensitivity::default())
    }
}

impl EngineConfig {
    /// Build a configuration from a named sensitivity preset. Weights are
    /// the same at every sensitivity; only the thresholds and the required
    /// score move.
    pub fn preset(sensitivity: Sensitivity) -> Self {
        let (pause_threshold, energy_ratio_threshold, min_score) = sensitivity.thresholds();
        Self {
            pause_threshold,
            pause_weight_high: 3.0,
            pause_weight_low: 1.0,
            energy_ratio_threshold,
            energy_weight_high: 2.0,
            energy_weight_low: 1.0,
            energy_epsilon: 1e-8,
            lexical_pause_floor: 0.8,
            lexical_weight: 1.0,
            shape_weight: 1.0,
            cohesion_window: 3,
            cohesion_weight: 1.0,
            min_turns_per_speaker: 2,
            guard_penalty: 1.0,
            min_score,
            use_energy: true,
            use_lexical: true,
            lexicon: Lexicon::default(),
        }
    }

    /// Reject configurations that reflect a programming or config mistake.
    /// Noisy input is recovered elsewhere; a bad weight table is not.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.pause_threshold > 0.0,
            "pause_threshold must be positive (got {})",
            self.pause_threshold
        );
        ensure!(
            self.energy_ratio_threshold > 1.0,
            "energy_ratio_threshold must exceed 1.0 (got {})",
            self.energy_ratio_threshold
        );
        ensure!(
            self.energy_epsilon > 0.0,
            "energy_epsilon must be positive (got {})",
            self.energy_epsilon
        );
        ensure!(
            self.lexical_pause_floor >= 0.0,
            "lexical_pause_floor must be non-negative (got {})",
            self.lexical_pause_floor
        );
        let weights = [
            ("pause_weight_high", self.pause_weight_high),
            ("pause_weight_low", self.pause_weight_low),
            ("energy_weight_high", self.energy_weight_high),
            ("energy_weight_low", self.energy_weight_low),
            ("lexical_weight", self.lexical_weight),
            ("shape_weight", self.shape_weight),
            ("cohesion_weight", self.cohesion_weight),
            ("guard_penalty", self.guard_penalty),
        ];
        for (name, value) in weights {
            ensure!(value >= 0.0, "{} must be non-negative (got {})", name, value);
        }
        ensure!(
            self.min_score > 0.0,
            "min_score must be positive (got {})",
            self.min_score
        );
        ensure!(
            self.cohesion_window >= 1,
            "cohesion_window must be at least 1 (got {})",
            self.cohesion_window
        );
        ensure!(
            self.min_turns_per_speaker >= 1,
            "min_turns_per_speaker must be at least 1 (got {})",
            self.min_turns_per_speaker
        );
        Ok(())
    }
}

/// Runtime-configurable engine settings parsed from JSON input. Every field
/// is optional; unset fields keep the preset value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuntimeEngineConfig {
    #[serde(default)]
    pub sensitivity: Option<Sensitivity>,
    #[serde(default, alias = "pauseThreshold")]
    pub pause_threshold: Option<f64>,
    #[serde(default, alias = "energyRatioThreshold")]
    pub energy_ratio_threshold: Option<f64>,
    #[serde(default, alias = "minScore")]
    pub min_score: Option<f64>,
    #[serde(default, alias = "cohesionWindow")]
    pub cohesion_window: Option<usize>,
    #[serde(default, alias = "minTurnsPerSpeaker")]
    pub min_turns_per_speaker: Option<usize>,
    #[serde(default, alias = "useEnergy")]
    pub use_energy: Option<bool>,
    #[serde(default, alias = "useLexical")]
    pub use_lexical: Option<bool>,
    #[serde(default)]
    pub lexicon: Option<Lexicon>,
}

impl RuntimeEngineConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("failed to parse engine config JSON")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read engine config file {:?}", path))?;
        Self::from_json(&data)
    }

    /// Resolve to a full configuration: start from the preset, apply the
    /// overrides, validate the result.
    pub fn to_config(&self) -> Result<EngineConfig> {
        let mut config = EngineConfig::preset(self.sensitivity.unwrap_or_default());
        if let Some(value) = self.pause_threshold {
            config.pause_threshold = value;
        }
        if let Some(value) = self.energy_ratio_threshold {
            config.energy_ratio_threshold = value;
        }
        if let Some(value) = self.min_score {
            config.min_score = value;
        }
        if let Some(value) = self.cohesion_window {
            config.cohesion_window = value;
        }
        if let Some(value) = self.min_turns_per_speaker {
            config.min_turns_per_speaker = value;
        }
        if let Some(value) = self.use_energy {
            config.use_energy = value;
        }
        if let Some(value) = self.use_lexical {
            config.use_lexical = value;
        }
        if let Some(lexicon) = &self.lexicon {
            config.lexicon = lexicon.clone();
        }
        config.validate().context("engine config overrides rejected")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_table_matches_sensitivity() {
        let low = EngineConfig::preset(Sensitivity::Low);
        assert_eq!(low.pause_threshold, 3.0);
        assert_eq!(low.energy_ratio_threshold, 4.0);
        assert_eq!(low.min_score, 4.0);

        let medium = EngineConfig::preset(Sensitivity::Medium);
        assert_eq!(medium.pause_threshold, 2.0);
        assert_eq!(medium.energy_ratio_threshold, 2.5);
        assert_eq!(medium.min_score, 3.0);

        let high = EngineConfig::preset(Sensitivity::High);
        assert_eq!(high.pause_threshold, 1.5);
        assert_eq!(high.energy_ratio_threshold, 2.0);
        assert_eq!(high.min_score, 2.0);
    }

    #[test]
    fn default_is_medium() {
        let config = EngineConfig::default();
        assert_eq!(config.pause_threshold, 2.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_thresholds() {
        let mut config = EngineConfig::default();
        config.pause_threshold = 0.0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.energy_ratio_threshold = 1.0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.min_score = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_negative_weight() {
        let mut config = EngineConfig::default();
        config.lexical_weight = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_windows() {
        let mut config = EngineConfig::default();
        config.cohesion_window = 0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.min_turns_per_speaker = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn runtime_config_applies_overrides() {
        let raw = r#"{
            "sensitivity": "high",
            "pauseThreshold": 1.8,
            "useEnergy": false
        }"#;
        let runtime = RuntimeEngineConfig::from_json(raw).unwrap();
        let config = runtime.to_config().unwrap();
        assert_eq!(config.pause_threshold, 1.8);
        assert_eq!(config.min_score, 2.0); // from the high preset
        assert!(!config.use_energy);
    }

    #[test]
    fn runtime_config_rejects_invalid_override() {
        let runtime = RuntimeEngineConfig::from_json(r#"{"minScore": 0.0}"#).unwrap();
        assert!(runtime.to_config().is_err());
    }

    #[test]
    fn partial_lexicon_keeps_defaults() {
        let lexicon: Lexicon =
            serde_json::from_str(r#"{"acknowledgements": ["yes", "right"]}"#).unwrap();
        assert_eq!(lexicon.acknowledgements, vec!["yes", "right"]);
        assert_eq!(lexicon.short_ack_max_chars, 25);
        assert!(!lexicon.interrogatives.is_empty());
    }

    #[test]
    fn empty_lexicon_reports_no_cues() {
        let lexicon = Lexicon {
            acknowledgements: Vec::new(),
            interrogatives: Vec::new(),
            interjections: Vec::new(),
            transitions: Vec::new(),
            ..Lexicon::default()
        };
        assert!(!lexicon.has_cues());
        assert!(Lexicon::default().has_cues());
    }
}
