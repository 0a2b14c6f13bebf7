use std::collections::VecDeque;

use tracing::debug;

use crate::config::EngineConfig;
use crate::scoring::{score_change, ScoringContext};
use crate::types::{ChangeReason, FeatureVector, Segment, SpeakerId, Turn};

pub(super) struct TurnAssigner<'a> {
    config: &'a EngineConfig,
    active: SpeakerId,
    recent: VecDeque<SpeakerId>,
    consecutive: usize,
    changed_before: bool,
    previous_features: Option<FeatureVector>,
    turns: Vec<Turn>,
}

impl<'a> TurnAssigner<'a> {
    pub(super) fn new(config: &'a EngineConfig) -> Self {
        Self {
            config,
            active: SpeakerId::FIRST,
            recent: VecDeque::with_capacity(config.cohesion_window),
            consecutive: 0,
            changed_before: false,
            previous_features: None,
            turns: Vec::new(),
        }
    }

    /// One transition of the state machine. Decides the speaker for
    /// `segment` from its features and the accumulated state, then emits
    /// exactly one turn.
    pub(super) fn handle_segment(&mut self, segment: &Segment, features: FeatureVector) {
        let context = ScoringContext {
            settled: self.recent.len() == self.config.cohesion_window
                && self.recent.iter().all(|speaker| *speaker == self.active),
            consecutive: self.consecutive,
            changed_before: self.changed_before,
        };
        let outcome = score_change(
            &features,
            self.previous_features.as_ref(),
            context,
            self.config,
        );

        // The first segment always belongs to the initial speaker.
        let changed = !self.turns.is_empty() && outcome.score >= self.config.min_score;
        if changed {
            self.active = self.active.toggled();
            self.consecutive = 1;
            self.changed_before = true;
            debug!(
                at = segment.start,
                speaker = %self.active,
                score = outcome.score,
                reason = ?outcome.reason,
                "speaker change"
            );
        } else {
            self.consecutive += 1;
        }

        let reason = if changed || outcome.reason == ChangeReason::Cohesion {
            outcome.reason
        } else {
            ChangeReason::None
        };
        self.turns.push(Turn {
            segment: segment.clone(),
            speaker: self.active,
            change_score: outcome.score,
            changed,
            reason,
            features,
        });

        self.recent.push_back(self.active);
        if self.recent.len() > self.config.cohesion_window {
            self.recent.pop_front();
        }
        self.previous_features = Some(features);
    }

    pub(super) fn into_turns(self) -> Vec<Turn> {
        self.turns
    }
}
