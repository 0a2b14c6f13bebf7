//! Identity labeling: maps anonymous turns onto display names.
//!
//! Relabels by position and content only. The pass never consults the
//! engine's speaker alternation, so it composes with turn segmentation but
//! stands alone: several anonymous speakers may collapse onto one name.

use anyhow::{ensure, Result};
use tracing::debug;

use crate::config::Lexicon;
use crate::types::{NamedTurn, Turn};

/// Naming policy for the relabeling pass. Windows are seconds measured from
/// the start and the end of the recording.
#[derive(Debug, Clone)]
pub struct LabelPolicy {
    /// Turns starting inside this opening window get the boundary name.
    pub early_window: f64,
    /// Turns starting inside this closing window get the boundary name.
    pub late_window: f64,
    pub boundary_name: String,
    pub interjection_name: String,
    pub main_name: String,
    /// Maximum trimmed length (chars) for a question-marked interjection.
    pub question_max_chars: usize,
    /// Maximum trimmed length (chars) for a starter-token interjection.
    pub short_max_chars: usize,
    /// Cue lists backing the starter-token check.
    pub lexicon: Lexicon,
}

impl Default for LabelPolicy {
    fn default() -> Self {
        Self {
            early_window: 300.0,
            late_window: 180.0,
            boundary_name: "host".to_string(),
            interjection_name: "interviewer".to_string(),
            main_name: "speaker".to_string(),
            question_max_chars: 120,
            short_max_chars: 80,
            lexicon: Lexicon::default(),
        }
    }
}

/// Post-processing pass assigning display names to anonymous turns.
#[derive(Debug, Clone)]
pub struct IdentityLabeler {
    policy: LabelPolicy,
}

impl IdentityLabeler {
    /// Build a labeler, rejecting a malformed policy up front.
    pub fn new(policy: LabelPolicy) -> Result<Self> {
        ensure!(
            policy.early_window >= 0.0,
            "early_window must be non-negative (got {})",
            policy.early_window
        );
        ensure!(
            policy.late_window >= 0.0,
            "late_window must be non-negative (got {})",
            policy.late_window
        );
        for (field, name) in [
            ("boundary_name", &policy.boundary_name),
            ("interjection_name", &policy.interjection_name),
            ("main_name", &policy.main_name),
        ] {
            ensure!(!name.trim().is_empty(), "{} must not be empty", field);
        }
        Ok(Self { policy })
    }

    pub fn policy(&self) -> &LabelPolicy {
        &self.policy
    }

    /// Single forward pass over the turns. The recording's total duration is
    /// the maximum segment end in the input.
    pub fn label(&self, turns: &[Turn]) -> Vec<NamedTurn> {
        if turns.is_empty() {
            return Vec::new();
        }
        let total_duration = turns
            .iter()
            .map(|turn| turn.segment.end)
            .fold(0.0, f64::max);
        let named: Vec<NamedTurn> = turns
            .iter()
            .map(|turn| NamedTurn {
                turn: turn.clone(),
                display_name: self.name_for(turn, total_duration).to_string(),
            })
            .collect();
        debug!(turns = named.len(), total_duration, "identity labeling finished");
        named
    }

    fn name_for(&self, turn: &Turn, total_duration: f64) -> &str {
        let start = turn.segment.start;
        let late_edge = (total_duration - self.policy.late_window).max(0.0);
        if start <= self.policy.early_window || start >= late_edge {
            &self.policy.boundary_name
        } else if self.is_short_interjection(&turn.segment.text) {
            &self.policy.interjection_name
        } else {
            &self.policy.main_name
        }
    }

    /// Short interrogative or acknowledgement utterances, the shape of an
    /// interviewer's interjections.
    fn is_short_interjection(&self, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return false;
        }
        let lower = trimmed.to_lowercase();
        let len = lower.chars().count();
        if lower.contains('?') && len <= self.policy.question_max_chars {
            return true;
        }
        len <= self.policy.short_max_chars
            && self
                .policy
                .lexicon
                .interrogatives
                .iter()
                .chain(self.policy.lexicon.acknowledgements.iter())
                .any(|cue| lower.starts_with(cue.as_str()))
    }
}
