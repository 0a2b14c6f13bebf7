//! Run statistics: per-speaker census over a finished segmentation pass.

use std::collections::BTreeMap;

use crate::types::{SpeakerId, Turn};

/// Aggregate figures for one speaker across a run.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeakerStats {
    pub speaker: SpeakerId,
    /// Turns attributed to this speaker.
    pub turns: usize,
    /// Summed segment durations, in seconds.
    pub speech_seconds: f64,
    /// Turns on which this speaker took over from another.
    pub changes: usize,
}

/// Census of a finished run, ordered by speaker id. Empty input gives an
/// empty census.
pub fn speaker_stats(turns: &[Turn]) -> Vec<SpeakerStats> {
    let mut by_speaker: BTreeMap<SpeakerId, SpeakerStats> = BTreeMap::new();
    for turn in turns {
        let entry = by_speaker
            .entry(turn.speaker)
            .or_insert_with(|| SpeakerStats {
                speaker: turn.speaker,
                turns: 0,
                speech_seconds: 0.0,
                changes: 0,
            });
        entry.turns += 1;
        entry.speech_seconds += turn.segment.end - turn.segment.start;
        if turn.changed {
            entry.changes += 1;
        }
    }
    by_speaker.into_values().collect()
}
