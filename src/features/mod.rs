//! Signal extraction: per-segment scalar features for the change scorer.
//!
//! Pure computations over one segment, its predecessor, and (optionally) the
//! raw waveform. Malformed timing and out-of-range windows are clamped, not
//! reported; a missing waveform degrades the energy feature to zero.

use crate::config::Lexicon;
use crate::types::{AudioData, FeatureVector, LexicalFlags, Segment};

/// Compute the feature vector for `current`.
///
/// `lexicon` is `None` when the lexical signal is disabled or has no cues;
/// all flags stay false in that case.
pub fn extract_features(
    current: &Segment,
    previous: Option<&Segment>,
    audio: Option<&AudioData>,
    lexicon: Option<&Lexicon>,
) -> FeatureVector {
    FeatureVector {
        pause_before: pause_before(current, previous),
        energy: audio.map_or(0.0, |audio| segment_energy(audio, current.start, current.end)),
        text_len: current.text.trim().chars().count(),
        lexical: lexicon.map_or_else(LexicalFlags::default, |lexicon| {
            lexical_flags(&current.text, lexicon)
        }),
    }
}

/// Silence between the previous segment's end and this segment's start.
///
/// Zero for the first segment. Overlapping timestamps (upstream transcription
/// timing is noisy) clamp to zero instead of going negative.
pub fn pause_before(current: &Segment, previous: Option<&Segment>) -> f64 {
    previous.map_or(0.0, |previous| (current.start - previous.end).max(0.0))
}

/// Mean absolute amplitude over the sample window for `[start, end)`.
///
/// Indices are clamped to the buffer; an empty or out-of-range window gives
/// `0.0`.
pub fn segment_energy(audio: &AudioData, start: f64, end: f64) -> f64 {
    let rate = audio.sample_rate as f64;
    let total = audio.samples.len();
    let start_sample = ((start.max(0.0) * rate) as usize).min(total);
    let end_sample = ((end.max(0.0) * rate) as usize).min(total);
    if start_sample >= end_sample {
        return 0.0;
    }
    let window = &audio.samples[start_sample..end_sample];
    let sum: f64 = window.iter().map(|sample| sample.abs() as f64).sum();
    sum / window.len() as f64
}

/// Derive cue flags from the segment text via case-insensitive containment
/// (prefix matching for interrogatives) against the lexicon.
pub fn lexical_flags(text: &str, lexicon: &Lexicon) -> LexicalFlags {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return LexicalFlags::default();
    }
    let lower = trimmed.to_lowercase();
    let len = lower.chars().count();
    let contains_any =
        |cues: &[String]| cues.iter().any(|cue| lower.contains(cue.as_str()));
    let starts_with_any =
        |cues: &[String]| cues.iter().any(|cue| lower.starts_with(cue.as_str()));

    LexicalFlags {
        short_ack: len < lexicon.short_ack_max_chars && contains_any(&lexicon.acknowledgements),
        question: lower.contains('?') || starts_with_any(&lexicon.interrogatives),
        interjection: len < lexicon.interjection_max_chars
            && contains_any(&lexicon.interjections),
        discourse_marker: len < lexicon.short_ack_max_chars && contains_any(&lexicon.transitions),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn seg(start: f64, end: f64, text: &str) -> Segment {
        Segment {
            text: text.to_string(),
            start,
            end,
            confidence: None,
        }
    }

    #[test]
    fn pause_is_zero_for_first_segment() {
        let current = seg(4.0, 5.0, "Bonjour.");
        assert_eq!(pause_before(&current, None), 0.0);
    }

    #[test]
    fn pause_measures_gap_to_previous() {
        let previous = seg(0.0, 2.0, "Bonjour.");
        let current = seg(3.5, 5.0, "Bonjour.");
        assert_relative_eq!(pause_before(&current, Some(&previous)), 1.5);
    }

    #[test]
    fn overlapping_segments_clamp_to_zero() {
        let previous = seg(0.0, 3.0, "Bonjour.");
        let current = seg(2.0, 5.0, "Bonjour.");
        assert_eq!(pause_before(&current, Some(&previous)), 0.0);
    }

    #[test]
    fn energy_is_mean_absolute_amplitude() {
        let audio = AudioData {
            samples: vec![0.5; 10_000],
            sample_rate: 10_000,
        };
        assert_relative_eq!(segment_energy(&audio, 0.0, 0.5), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn energy_mixes_signed_samples_by_magnitude() {
        let mut samples = vec![0.2_f32; 500];
        samples.extend(vec![-0.6_f32; 500]);
        let audio = AudioData {
            samples,
            sample_rate: 1_000,
        };
        assert_relative_eq!(segment_energy(&audio, 0.0, 1.0), 0.4, epsilon = 1e-6);
    }

    #[test]
    fn energy_window_clamps_to_buffer() {
        let audio = AudioData {
            samples: vec![0.3; 1_000],
            sample_rate: 1_000,
        };
        // Window extends past the end of the clip.
        assert_relative_eq!(segment_energy(&audio, 0.5, 4.0), 0.3, epsilon = 1e-6);
        // Window entirely out of range.
        assert_eq!(segment_energy(&audio, 5.0, 6.0), 0.0);
    }

    #[test]
    fn empty_window_gives_zero_energy() {
        let audio = AudioData {
            samples: vec![0.3; 1_000],
            sample_rate: 1_000,
        };
        assert_eq!(segment_energy(&audio, 0.5, 0.5), 0.0);
    }

    #[test]
    fn short_ack_needs_cue_and_short_text() {
        let lexicon = Lexicon::french();
        assert!(lexical_flags("Oui, d'accord.", &lexicon).short_ack);
        assert!(!lexical_flags("Nous devons revoir toute l'architecture, oui.", &lexicon).short_ack);
        assert!(!lexical_flags("Parfait.", &lexicon).short_ack);
    }

    #[test]
    fn question_from_mark_or_starter() {
        let lexicon = Lexicon::french();
        assert!(lexical_flags("Tu viens demain ?", &lexicon).question);
        assert!(lexical_flags("Comment tu ferais ça", &lexicon).question);
        assert!(!lexical_flags("Je viens demain.", &lexicon).question);
    }

    #[test]
    fn interjection_uses_smaller_cutoff() {
        let lexicon = Lexicon::french();
        assert!(lexical_flags("Euh, attends.", &lexicon).interjection);
        assert!(!lexical_flags("Euh, je ne suis pas certain.", &lexicon).interjection);
    }

    #[test]
    fn discourse_marker_on_short_transitions() {
        let lexicon = Lexicon::french();
        assert!(lexical_flags("Donc on continue.", &lexicon).discourse_marker);
        assert!(
            !lexical_flags(
                "Donc pour reprendre le fil de la discussion précédente.",
                &lexicon
            )
            .discourse_marker
        );
    }

    #[test]
    fn empty_text_has_no_flags() {
        let lexicon = Lexicon::french();
        assert_eq!(lexical_flags("   ", &lexicon), LexicalFlags::default());
    }

    #[test]
    fn extract_degrades_without_audio_or_lexicon() {
        let previous = seg(0.0, 1.0, "Bonjour.");
        let current = seg(1.2, 2.0, "Oui.");
        let features = extract_features(&current, Some(&previous), None, None);
        assert_eq!(features.energy, 0.0);
        assert_eq!(features.lexical, LexicalFlags::default());
        assert_relative_eq!(features.pause_before, 0.2, epsilon = 1e-9);
        assert_eq!(features.text_len, 4);
    }
}
