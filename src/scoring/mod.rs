//! Change scoring: combines per-segment signals into a single flip score.
//!
//! Additive point system. Each signal family contributes independently, the
//! cohesion and minimum-duration terms deduct, and the result is clamped at
//! zero. The largest-contributing family becomes the diagnostic reason.

use crate::config::EngineConfig;
use crate::types::{ChangeReason, FeatureVector};

/// Text-length ratio band; outside it the shape component fires.
const SHAPE_RATIO_HIGH: f64 = 3.0;
const SHAPE_RATIO_LOW: f64 = 1.0 / 3.0;

/// Rolling assignment state the scorer consults for its damping terms.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringContext {
    /// True when the recent-speaker window is full and every entry matches
    /// the active speaker.
    pub settled: bool,
    /// Consecutive turns the active speaker has held.
    pub consecutive: usize,
    /// Whether any flip has occurred earlier in the run. The minimum-duration
    /// guard stays inert until then, so an opening change is never penalized
    /// for the low count every run starts with.
    pub changed_before: bool,
}

/// Score plus the dominant signal behind it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreOutcome {
    pub score: f64,
    pub reason: ChangeReason,
}

/// Score the evidence that `current` opens a new speaker turn.
///
/// Returns zero with no reason for the first segment of a run. Deterministic
/// for fixed inputs; no history beyond `previous` and `context` is consulted.
pub fn score_change(
    current: &FeatureVector,
    previous: Option<&FeatureVector>,
    context: ScoringContext,
    config: &EngineConfig,
) -> ScoreOutcome {
    let Some(previous) = previous else {
        return ScoreOutcome::default();
    };

    let pause = pause_points(current, config);
    let energy = energy_points(current, previous, config);
    let lexical = lexical_points(current, config);
    let shape = shape_points(current, previous, config);
    let raw = pause + energy + lexical + shape;

    let mut deductions = 0.0;
    if context.settled {
        deductions += config.cohesion_weight;
    }
    if context.changed_before && context.consecutive < config.min_turns_per_speaker {
        deductions += config.guard_penalty;
    }
    let score = (raw - deductions).max(0.0);

    let mut reason = dominant_reason(pause, energy, lexical, shape);
    if raw >= config.min_score && score < config.min_score {
        // The deductions alone kept this below the flip threshold.
        reason = ChangeReason::Cohesion;
    }

    ScoreOutcome { score, reason }
}

fn pause_points(current: &FeatureVector, config: &EngineConfig) -> f64 {
    if current.pause_before > config.pause_threshold {
        config.pause_weight_high
    } else if current.pause_before > 0.7 * config.pause_threshold {
        config.pause_weight_low
    } else {
        0.0
    }
}

/// Loudness-shift points. Skipped unless both windows produced a strictly
/// positive mean amplitude; digital silence on either side says nothing
/// about who is speaking.
fn energy_points(current: &FeatureVector, previous: &FeatureVector, config: &EngineConfig) -> f64 {
    if current.energy <= 0.0 || previous.energy <= 0.0 {
        return 0.0;
    }
    let ratio = current.energy / (previous.energy + config.energy_epsilon);
    let hard = config.energy_ratio_threshold;
    let soft = 0.8 * hard;
    if ratio > hard || ratio < 1.0 / hard {
        config.energy_weight_high
    } else if ratio > soft || ratio < 1.0 / soft {
        config.energy_weight_low
    } else {
        0.0
    }
}

/// Cue points. Lexical cues corroborate, they never trigger alone: without a
/// pause above the confirmation floor even a question mark stays silent.
fn lexical_points(current: &FeatureVector, config: &EngineConfig) -> f64 {
    if current.lexical.any() && current.pause_before > config.lexical_pause_floor {
        config.lexical_weight
    } else {
        0.0
    }
}

fn shape_points(current: &FeatureVector, previous: &FeatureVector, config: &EngineConfig) -> f64 {
    if current.text_len == 0 || previous.text_len == 0 {
        // Empty text on either side carries no shape information.
        return 0.0;
    }
    let ratio = current.text_len as f64 / (previous.text_len as f64 + 1.0);
    if ratio > SHAPE_RATIO_HIGH || ratio < SHAPE_RATIO_LOW {
        config.shape_weight
    } else {
        0.0
    }
}

/// Largest contribution wins; ties resolve in signal-priority order (pause,
/// energy, lexical, shape).
fn dominant_reason(pause: f64, energy: f64, lexical: f64, shape: f64) -> ChangeReason {
    let components = [
        (pause, ChangeReason::Pause),
        (energy, ChangeReason::EnergyShift),
        (lexical, ChangeReason::LexicalCue),
        (shape, ChangeReason::Shape),
    ];
    let mut best = 0.0;
    let mut reason = ChangeReason::None;
    for (points, candidate) in components {
        if points > best {
            best = points;
            reason = candidate;
        }
    }
    reason
}
