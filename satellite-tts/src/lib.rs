// Satellite TTS Library
// Mimic engine adapter: subprocess synthesis, SSML rewriting, viseme timing

pub mod config;
pub mod error;
pub mod mimic;
pub mod plugin;
pub mod ssml;
pub mod viseme;

// Shared helpers (binary lookup)
pub(crate) mod utils;

// Export core types
pub use config::TtsConfig;
pub use error::{Result, TtsError};
pub use mimic::{EngineInvocation, MimicTts, MimicValidator, Synthesis};
pub use plugin::{Tts, TtsValidator};
pub use ssml::{modify_tag, remove_ssml, validate_ssml};
pub use viseme::{decode_visemes, viseme_for, TimedViseme, Viseme};
