//! Turn segmentation: a forward-only sequential scan that assigns a speaker
//! to every transcript segment.
//!
//! Each run owns its own state, so independent clips can be processed on
//! independent engine instances in parallel; within one run the assigner's
//! transition order is the only hard sequencing constraint.

mod assigner;

use anyhow::Result;
use tracing::info;

use crate::config::EngineConfig;
use crate::features::extract_features;
use crate::types::{AudioData, Segment, Turn};

use assigner::TurnAssigner;

/// Heuristic speaker-turn segmentation engine.
///
/// Construction validates the configuration; a constructed engine is
/// immutable and reusable across runs.
#[derive(Debug, Clone)]
pub struct TurnEngine {
    config: EngineConfig,
}

impl TurnEngine {
    /// Build an engine, rejecting invalid configuration before any segment
    /// is processed.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Walk segments in time order and emit one speaker-attributed turn per
    /// segment.
    ///
    /// Missing audio or an empty lexicon silently disable the corresponding
    /// signal family; the scan itself never fails. Input timestamps and text
    /// pass through untouched.
    pub fn run(&self, segments: &[Segment], audio: Option<&AudioData>) -> Vec<Turn> {
        let audio = if self.config.use_energy { audio } else { None };
        let lexicon = (self.config.use_lexical && self.config.lexicon.has_cues())
            .then_some(&self.config.lexicon);

        let mut assigner = TurnAssigner::new(&self.config);
        let mut previous: Option<&Segment> = None;
        for segment in segments {
            let features = extract_features(segment, previous, audio, lexicon);
            assigner.handle_segment(segment, features);
            previous = Some(segment);
        }

        let turns = assigner.into_turns();
        let changes = turns.iter().filter(|turn| turn.changed).count();
        let speakers = turns
            .iter()
            .map(|turn| turn.speaker)
            .collect::<std::collections::BTreeSet<_>>()
            .len();
        info!(segments = turns.len(), changes, speakers, "turn segmentation finished");
        turns
    }
}
