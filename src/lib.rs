//! Palaver - heuristic speaker-turn segmentation for transcribed speech
//!
//! Takes the time-ordered segments an external speech-to-text engine
//! produced (plus, optionally, the decoded waveform) and partitions them
//! into speaker-attributed turns using pause, loudness, and lexical
//! heuristics. A separate labeling pass maps the anonymous speaker tokens
//! onto display names by position and utterance shape.
//!
//! ```
//! use palaver::{EngineConfig, Segment, Sensitivity, TurnEngine};
//!
//! # fn main() -> anyhow::Result<()> {
//! let engine = TurnEngine::new(EngineConfig::preset(Sensitivity::Medium))?;
//! let segments = vec![
//!     Segment { text: "Bonjour à tous.".into(), start: 0.0, end: 1.4, confidence: None },
//!     Segment { text: "Merci de me recevoir.".into(), start: 4.2, end: 5.9, confidence: None },
//! ];
//! let turns = engine.run(&segments, None);
//! assert_eq!(turns.len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod features;
pub mod labeling;
pub mod scoring;
pub mod segmentation;
pub mod summary;
pub mod types;

pub use config::{EngineConfig, Lexicon, RuntimeEngineConfig, Sensitivity};
pub use labeling::{IdentityLabeler, LabelPolicy};
pub use segmentation::TurnEngine;
pub use summary::{speaker_stats, SpeakerStats};
pub use types::{
    AudioData, ChangeReason, FeatureVector, LexicalFlags, NamedTurn, Segment, SpeakerId, Turn,
};
